//! End-to-end run: parse → build → anonymize → attach root.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use crate::config::RunConfig;
use crate::error::ParseError;
use crate::graph::{EventSink, GraphBuilder, TopologyGraph, TracingSink};
use crate::parse::{ConfigParser, HostTable, ParseOptions};
use crate::postprocess::{Anonymizer, anonymize_graph, attach_root};
use crate::source::{ConfigSource, FsSource};

/// Result of a run.
#[derive(Debug, Clone)]
pub struct Topology {
    /// The parsed table, before anonymization.
    pub hosts: HostTable,
    pub graph: TopologyGraph,
    /// Anonymized → original identifiers; `None` unless anonymization ran.
    pub aliases: Option<BTreeMap<String, String>>,
}

impl RunConfig {
    /// Parser options implied by this config, with `~` taken from the environment.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            detect_cycles: self.detect_cycles,
            max_include_depth: self.max_include_depth,
            ..ParseOptions::default()
        }
    }
}

/// Run the pipeline against the local filesystem.
///
/// # Errors
///
/// Any [`ParseError`] from reading the config.
pub fn run(config: &RunConfig) -> Result<Topology, ParseError> {
    run_with(&FsSource, config, config.parse_options(), &mut TracingSink)
}

/// Run the pipeline against `source`, reporting graph changes to `sink`.
///
/// # Errors
///
/// Any [`ParseError`] from reading the config.
#[instrument(skip_all, fields(config = %config.config_path.display()))]
pub fn run_with<S: ConfigSource + ?Sized>(
    source: &S,
    config: &RunConfig,
    options: ParseOptions,
    sink: &mut dyn EventSink,
) -> Result<Topology, ParseError> {
    let hosts = ConfigParser::with_options(source, options).parse(&config.config_path)?;

    let mut graph = GraphBuilder::new()
        .remove_wildcards(config.remove_wildcards)
        .build_with(&hosts, sink);

    let mut aliases = None;
    if config.anonymize {
        let mut anonymizer = Anonymizer::new();
        graph = anonymize_graph(&graph, &mut anonymizer);
        aliases = Some(anonymizer.into_aliases());
    }

    if config.add_root {
        attach_root(&mut graph, &config.root_name, sink);
    }

    info!(
        hosts = hosts.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "pipeline finished"
    );
    Ok(Topology {
        hosts,
        graph,
        aliases,
    })
}
