//! `hopmap hosts`: print the parsed host table.

use std::io::{self, Write};

use clap::Args;

use hopmap_core::config::RunConfig;
use hopmap_core::parse::{ConfigParser, HostTable};
use hopmap_core::source::FsSource;

use super::SourceArgs;
use crate::output::{CliError, OutputMode, pretty_section, render, render_error};

/// Arguments for `hopmap hosts`.
#[derive(Args, Debug, Default)]
pub struct HostsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

fn write_table(table: &HostTable, pretty: bool, w: &mut dyn Write) -> io::Result<()> {
    if pretty {
        pretty_section(w, &format!("Hosts ({})", table.len()))?;
    }
    for entry in table {
        let jump = entry.proxy_jump.as_deref().unwrap_or("-");
        if pretty {
            write!(w, "{:<28} via {jump}", entry.name)?;
            if !entry.additional_hosts.is_empty() {
                write!(w, "  aka {}", entry.additional_hosts.join(", "))?;
            }
            writeln!(w)?;
        } else {
            writeln!(
                w,
                "{}\t{jump}\t{}",
                entry.name,
                entry.additional_hosts.join(",")
            )?;
        }
    }
    Ok(())
}

/// Run `hopmap hosts`.
///
/// # Errors
///
/// Returns an error if the SSH config cannot be parsed or output fails.
pub fn run_hosts(args: &HostsArgs, base: &RunConfig, output: OutputMode) -> anyhow::Result<()> {
    let config = args.source.apply(base);
    let parser = ConfigParser::with_options(&FsSource, config.parse_options());
    let table = match parser.parse(&config.config_path) {
        Ok(table) => table,
        Err(e) => {
            render_error(output, &CliError::from(&e))?;
            anyhow::bail!("{e}");
        }
    };

    render(output, &table, |t, w| write_table(t, output.is_pretty(), w))
}
