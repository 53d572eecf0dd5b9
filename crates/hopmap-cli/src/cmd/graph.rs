//! `hopmap graph`: build and print the jump-host topology.
//!
//! - pretty/text: one line per host with its neighbours, then a summary line
//! - json: a [`GraphSnapshot`]
//! - `--dot`: Graphviz text, whatever the output mode

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::Args;
use tracing::info;

use hopmap_core::RunConfig;
use hopmap_core::export::{GraphSnapshot, to_dot};
use hopmap_core::graph::TopologyGraph;

use super::SourceArgs;
use crate::output::{CliError, OutputMode, pretty_rule, pretty_section, render, render_error};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

/// Arguments for `hopmap graph`.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Replace host names with hashed identifiers.
    #[arg(long)]
    pub anonymize: bool,

    /// Drop every host covered by a wildcard host.
    #[arg(long)]
    pub remove_wildcards: bool,

    /// Do not add the synthetic root node.
    #[arg(long)]
    pub no_root: bool,

    /// Name of the synthetic root node.
    #[arg(long, value_name = "NAME")]
    pub root_name: Option<String>,

    /// Print Graphviz DOT instead of the adjacency listing.
    #[arg(long)]
    pub dot: bool,

    /// With --anonymize, also print the anonymized → original mapping.
    #[arg(long)]
    pub disclose: bool,
}

impl GraphArgs {
    /// Overlay these flags on `base`.
    pub fn run_config(&self, base: &RunConfig) -> RunConfig {
        let mut config = self.source.apply(base);
        config.anonymize |= self.anonymize;
        config.remove_wildcards |= self.remove_wildcards;
        if self.no_root {
            config.add_root = false;
        }
        if let Some(name) = &self.root_name {
            config.root_name.clone_from(name);
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn summary(graph: &TopologyGraph) -> String {
    format!(
        "Graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    )
}

fn write_text(graph: &TopologyGraph, w: &mut dyn Write) -> io::Result<()> {
    for id in graph.node_ids() {
        writeln!(w, "{id}: {}", graph.neighbors(id).join(" "))?;
    }
    writeln!(w, "{}", summary(graph))
}

fn write_pretty(
    graph: &TopologyGraph,
    aliases: Option<&BTreeMap<String, String>>,
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, "Topology")?;
    for node in graph.nodes() {
        let via = node
            .proxy_jump()
            .map_or_else(String::new, |jump| format!("  (via {jump})"));
        writeln!(w, "{:<28} {}{via}", node.id, graph.neighbors(&node.id).join(", "))?;
    }
    pretty_rule(w)?;
    writeln!(w, "{}", summary(graph))?;

    if let Some(aliases) = aliases {
        writeln!(w)?;
        pretty_section(w, "Aliases")?;
        write_aliases(aliases, w)?;
    }
    Ok(())
}

fn write_aliases(aliases: &BTreeMap<String, String>, w: &mut dyn Write) -> io::Result<()> {
    for (anon, original) in aliases {
        writeln!(w, "{anon}\t{original}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run `hopmap graph`.
///
/// # Errors
///
/// Returns an error if the SSH config cannot be parsed or output fails.
pub fn run_graph(args: &GraphArgs, base: &RunConfig, output: OutputMode) -> anyhow::Result<()> {
    let config = args.run_config(base);
    let topology = match hopmap_core::run(&config) {
        Ok(topology) => topology,
        Err(e) => {
            render_error(output, &CliError::from(&e))?;
            anyhow::bail!("{e}");
        }
    };
    info!(
        nodes = topology.graph.node_count(),
        edges = topology.graph.edge_count(),
        "graph ready"
    );

    let aliases = if args.disclose {
        topology.aliases.as_ref()
    } else {
        None
    };

    if args.dot {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(to_dot(&topology.graph).as_bytes())?;
        if let Some(aliases) = aliases {
            write_aliases(aliases, &mut io::stderr().lock())?;
        }
        return Ok(());
    }

    let mut snapshot = GraphSnapshot::from_graph(&topology.graph);
    if let Some(aliases) = aliases {
        snapshot = snapshot.with_aliases(aliases.clone());
    }

    render(output, &snapshot, |_, w| {
        if output.is_pretty() {
            write_pretty(&topology.graph, aliases, w)
        } else {
            write_text(&topology.graph, w)?;
            match aliases {
                Some(aliases) => write_aliases(aliases, w),
                None => Ok(()),
            }
        }
    })
}
