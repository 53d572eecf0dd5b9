use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripts and agents consuming hopmap output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    MalformedDirective,
    CyclicInclude,
    IncludeDepthExceeded,
    SettingsParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::MalformedDirective => "E1002",
            Self::CyclicInclude => "E1003",
            Self::IncludeDepthExceeded => "E1004",
            Self::SettingsParseError => "E2001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check the path passed with --config and its permissions."),
            Self::MalformedDirective => {
                Some("Every ProxyJump must follow a Host line and name non-empty targets.")
            }
            Self::CyclicInclude => Some("Remove the Include that points back to an enclosing file."),
            Self::IncludeDepthExceeded => {
                Some("An Include chain is probably self-referential; pass --detect-cycles to locate it.")
            }
            Self::SettingsParseError => Some("Fix syntax in the hopmap config.toml and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while turning config text into a [`crate::parse::HostTable`].
///
/// Parsing stops at the first error; there is no partial-table mode.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The root file, or a file matched by an `Include` pattern, could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directive was used where the parser cannot apply it.
    #[error("{}:{line}: {reason}", path.display())]
    MalformedDirective {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Cycle detection is enabled and an `Include` re-entered a file on the current stack.
    #[error("include cycle detected: {} is already being parsed", path.display())]
    CyclicInclude { path: PathBuf },

    /// Include nesting went past the configured limit.
    #[error("include depth limit ({limit}) exceeded at {}", path.display())]
    IncludeDepthExceeded { path: PathBuf, limit: usize },
}

impl ParseError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigRead { .. } => ErrorCode::ConfigReadFailed,
            Self::MalformedDirective { .. } => ErrorCode::MalformedDirective,
            Self::CyclicInclude { .. } => ErrorCode::CyclicInclude,
            Self::IncludeDepthExceeded { .. } => ErrorCode::IncludeDepthExceeded,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
