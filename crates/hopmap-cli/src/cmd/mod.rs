pub mod completions;
pub mod graph;
pub mod hosts;

use std::path::PathBuf;

use clap::Args;
use hopmap_core::RunConfig;

/// Input options shared by every command that reads an SSH config.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// SSH client config to read (default: ~/.ssh/config).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fail on an Include that re-enters a file being parsed.
    #[arg(long)]
    pub detect_cycles: bool,

    /// Maximum Include nesting depth.
    #[arg(long, value_name = "N")]
    pub max_include_depth: Option<usize>,
}

impl SourceArgs {
    /// Overlay these flags on `base` (usually the user config file).
    pub fn apply(&self, base: &RunConfig) -> RunConfig {
        let mut config = base.clone();
        if let Some(path) = &self.config {
            config.config_path.clone_from(path);
        }
        if self.detect_cycles {
            config.detect_cycles = true;
        }
        if let Some(depth) = self.max_include_depth {
            config.max_include_depth = depth;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_base() {
        let args = SourceArgs {
            config: Some(PathBuf::from("/tmp/ssh_config")),
            detect_cycles: true,
            max_include_depth: Some(3),
        };
        let config = args.apply(&RunConfig::default());
        assert_eq!(config.config_path, PathBuf::from("/tmp/ssh_config"));
        assert!(config.detect_cycles);
        assert_eq!(config.max_include_depth, 3);
    }

    #[test]
    fn absent_flags_keep_base() {
        let base = RunConfig {
            detect_cycles: true,
            ..RunConfig::default()
        };
        let config = SourceArgs::default().apply(&base);
        assert_eq!(config, base);
    }
}
