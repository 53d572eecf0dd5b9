#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use hopmap_core::ErrorCode;
use hopmap_core::config::{UserConfig, load_user_config};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hopmap: map SSH jump hosts from your client config",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and the user config.
    fn output_mode(&self, user_output: Option<&str>) -> OutputMode {
        resolve_output_mode(self.format, self.json, user_output)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Print the jump-host topology graph",
        long_about = "Parse the SSH client config, build the jump-host graph and print it.",
        after_help = "EXAMPLES:\n    # Graph ~/.ssh/config\n    hopmap graph\n\n    # Anonymized Graphviz output\n    hopmap graph --anonymize --dot | dot -Tsvg > hops.svg\n\n    # Emit machine-readable output\n    hopmap graph --json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        about = "Print the parsed host table",
        after_help = "EXAMPLES:\n    # List hosts from a specific config\n    hopmap hosts --config ./ssh_config"
    )]
    Hosts(cmd::hosts::HostsArgs),

    #[command(about = "Generate shell completion scripts")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("HOPMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "hopmap_cli=debug,hopmap_core=debug,info"
        } else {
            "hopmap_cli=info,hopmap_core=info,warn"
        })
    });

    let format = env::var("HOPMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let user = match load_user_config() {
        Ok(user) => user,
        Err(e) => {
            let output = cli.output_mode(None);
            render_error(
                output,
                &CliError::from_code(ErrorCode::SettingsParseError, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };
    let UserConfig { output: user_output, run: base } = user;
    let output = cli.output_mode(user_output.as_deref());

    match cli.command {
        Commands::Graph(ref args) => cmd::graph::run_graph(args, &base, output),
        Commands::Hosts(ref args) => cmd::hosts::run_hosts(args, &base, output),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["hopmap", "--json", "graph"]);
        assert!(cli.json);
        assert!(cli.output_mode(None).is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["hopmap", "hosts", "--json"]);
        assert!(cli.output_mode(Some("pretty")).is_json());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["hopmap", "graph", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
    }

    #[test]
    fn graph_flags_parse() {
        let cli = Cli::parse_from([
            "hopmap",
            "graph",
            "--config",
            "/tmp/cfg",
            "--anonymize",
            "--remove-wildcards",
            "--no-root",
            "--root-name",
            "me",
            "--detect-cycles",
            "--dot",
            "--disclose",
        ]);
        let Commands::Graph(args) = cli.command else {
            panic!("expected graph command");
        };
        assert_eq!(
            args.source.config.as_deref(),
            Some(std::path::Path::new("/tmp/cfg"))
        );
        assert!(args.anonymize && args.remove_wildcards && args.no_root);
        assert!(args.source.detect_cycles && args.dot && args.disclose);
        assert_eq!(args.root_name.as_deref(), Some("me"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
