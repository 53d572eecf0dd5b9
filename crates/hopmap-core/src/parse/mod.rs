//! SSH client config parsing.
//!
//! # Overview
//!
//! [`ConfigParser`] reads one config file through a [`ConfigSource`] and
//! returns a flat [`HostTable`]: every `Host` declaration, every jump host a
//! `ProxyJump` chain names, and everything pulled in through `Include`.
//!
//! Only three keywords are understood, case-sensitively, as the first
//! whitespace-separated token of a trimmed line:
//!
//! | Keyword     | Effect                                                        |
//! |-------------|---------------------------------------------------------------|
//! | `Include`   | glob each pattern, parse every match, merge (last write wins) |
//! | `Host`      | start a new host context; extra names become aliases          |
//! | `ProxyJump` | set the jump host of the current context, chaining commas     |
//!
//! Everything else, including comments and blank lines, is skipped.
//!
//! ## `ProxyJump` chains
//!
//! `ProxyJump a,b,c` under `Host h` records `a → b`, `b → c` and `h → c`,
//! where `x → y` means "x's jump host is y". Intermediate hops that were never
//! declared get a bare entry so the chain shows up in the graph.
//!
//! ## Include recursion
//!
//! Includes are followed depth-first with no cycle check unless
//! [`ParseOptions::detect_cycles`] is set. A self-including config therefore
//! recurses until [`ParseOptions::max_include_depth`] and fails with
//! [`ParseError::IncludeDepthExceeded`].

pub mod host;
pub mod include;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::ParseError;
use crate::source::{ConfigSource, FsSource};

pub use host::{HostEntry, HostTable};
pub use include::{expand_home, resolve_include_pattern};

/// Default nesting limit for `Include`.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 256;

/// Knobs for [`ConfigParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Substituted for `~` in include patterns.
    pub home_dir: Option<PathBuf>,
    /// Fail with [`ParseError::CyclicInclude`] when a file includes one of
    /// its own ancestors.
    pub detect_cycles: bool,
    /// Maximum `Include` nesting below the root file.
    pub max_include_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            detect_cycles: false,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// A recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive<'a> {
    Include(Vec<&'a str>),
    Host { name: &'a str, aliases: Vec<&'a str> },
    ProxyJump(&'a str),
}

impl<'a> Directive<'a> {
    /// Classify a trimmed line. Keywords without arguments are not directives.
    fn parse(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?;
        let first = tokens.next()?;

        match keyword {
            "Include" => {
                let mut patterns = vec![first];
                patterns.extend(tokens);
                Some(Self::Include(patterns))
            }
            "Host" => Some(Self::Host {
                name: first,
                aliases: tokens.collect(),
            }),
            "ProxyJump" => Some(Self::ProxyJump(first)),
            _ => None,
        }
    }
}

/// Line-oriented parser over a [`ConfigSource`].
pub struct ConfigParser<'s, S: ConfigSource + ?Sized> {
    source: &'s S,
    options: ParseOptions,
}

impl<'s, S: ConfigSource + ?Sized> ConfigParser<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub const fn with_options(source: &'s S, options: ParseOptions) -> Self {
        Self { source, options }
    }

    /// Parse `path` and every file it transitively includes.
    ///
    /// # Errors
    ///
    /// - [`ParseError::ConfigRead`] if `path` or an included match cannot be read.
    /// - [`ParseError::MalformedDirective`] for a `ProxyJump` outside a host block.
    /// - [`ParseError::IncludeDepthExceeded`] / [`ParseError::CyclicInclude`]
    ///   for runaway includes.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn parse(&self, path: &Path) -> Result<HostTable, ParseError> {
        let mut stack = Vec::new();
        let table = self.parse_file(path, 0, &mut stack)?;
        info!(hosts = table.len(), "parsed ssh config");
        Ok(table)
    }

    /// Parse `text` as though it were the contents of `path`.
    ///
    /// `path` anchors relative `Include` patterns; it is not read.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigParser::parse`], minus the read of `path` itself.
    pub fn parse_str(&self, path: &Path, text: &str) -> Result<HostTable, ParseError> {
        let mut stack = Vec::new();
        if self.options.detect_cycles {
            stack.push(self.source.canonicalize(path));
        }
        self.parse_text(path, text, 0, &mut stack)
    }

    fn parse_file(
        &self,
        path: &Path,
        depth: usize,
        stack: &mut Vec<PathBuf>,
    ) -> Result<HostTable, ParseError> {
        if depth > self.options.max_include_depth {
            return Err(ParseError::IncludeDepthExceeded {
                path: path.to_path_buf(),
                limit: self.options.max_include_depth,
            });
        }

        if self.options.detect_cycles {
            let canonical = self.source.canonicalize(path);
            if stack.contains(&canonical) {
                return Err(ParseError::CyclicInclude {
                    path: path.to_path_buf(),
                });
            }
            stack.push(canonical);
        }

        let text = self
            .source
            .read_to_string(path)
            .map_err(|source| ParseError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;

        let table = self.parse_text(path, &text, depth, stack)?;

        if self.options.detect_cycles {
            stack.pop();
        }
        Ok(table)
    }

    fn parse_text(
        &self,
        path: &Path,
        text: &str,
        depth: usize,
        stack: &mut Vec<PathBuf>,
    ) -> Result<HostTable, ParseError> {
        let mut hosts = HostTable::new();
        let mut current_host: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let Some(directive) = Directive::parse(raw.trim()) else {
                continue;
            };

            match directive {
                Directive::Include(patterns) => {
                    for pattern in patterns {
                        let resolved = resolve_include_pattern(
                            pattern,
                            path,
                            self.options.home_dir.as_deref(),
                        );
                        let matched = self.source.glob(&resolved);
                        debug!(
                            line = line_no,
                            pattern = %resolved,
                            matches = matched.len(),
                            "Include"
                        );
                        for included in matched {
                            let table = self.parse_file(&included, depth + 1, stack)?;
                            hosts.merge(table);
                        }
                    }
                }
                Directive::Host { name, aliases } => {
                    debug!(line = line_no, host = name, "Host");
                    let aliases = aliases.into_iter().map(str::to_string).collect();
                    hosts.insert(HostEntry::new(name).with_additional_hosts(aliases));
                    current_host = Some(name.to_string());
                }
                Directive::ProxyJump(value) => {
                    let Some(current) = current_host.as_deref() else {
                        return Err(ParseError::MalformedDirective {
                            path: path.to_path_buf(),
                            line: line_no,
                            reason: "ProxyJump outside of a Host block".to_string(),
                        });
                    };
                    apply_proxy_jump(&mut hosts, current, value).map_err(|reason| {
                        ParseError::MalformedDirective {
                            path: path.to_path_buf(),
                            line: line_no,
                            reason,
                        }
                    })?;
                }
            }
        }

        Ok(hosts)
    }
}

/// Record a (possibly comma-chained) `ProxyJump` value for `current`.
fn apply_proxy_jump(hosts: &mut HostTable, current: &str, value: &str) -> Result<(), String> {
    let targets: Vec<&str> = value.split(',').collect();
    if targets.iter().any(|t| t.is_empty()) {
        return Err(format!("empty jump host in ProxyJump '{value}'"));
    }

    let mut previous: Option<&str> = None;
    for jump in targets {
        if let Some(prev) = previous {
            debug!(host = prev, jump, "ProxyJump chain link");
            hosts.entry_or_insert(prev).proxy_jump = Some(jump.to_string());
        }
        previous = Some(jump);
    }

    debug!(host = current, jump = ?previous, "ProxyJump");
    hosts.entry_or_insert(current).proxy_jump = previous.map(str::to_string);
    Ok(())
}

/// Parse the config at `path` from the local filesystem with default options.
///
/// # Errors
///
/// See [`ConfigParser::parse`].
pub fn parse(path: &Path) -> Result<HostTable, ParseError> {
    ConfigParser::new(&FsSource).parse(path)
}
