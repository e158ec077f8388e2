use std::fmt;

/// Machine-readable error codes for scripts and dashboards consuming `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputUnreadable,
    MalformedInput,
    ConfigParseError,
    UnsupportedMetric,
    DirectedOnlyMetric,
    AmbiguousAuthor,
    SourceFailed,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputUnreadable => "E1001",
            Self::MalformedInput => "E1002",
            Self::ConfigParseError => "E1003",
            Self::UnsupportedMetric => "E2001",
            Self::DirectedOnlyMetric => "E2002",
            Self::AmbiguousAuthor => "E3001",
            Self::SourceFailed => "E4001",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputUnreadable => "Thesis input could not be read",
            Self::MalformedInput => "Thesis input is malformed",
            Self::ConfigParseError => "Config file parse error",
            Self::UnsupportedMetric => "Unsupported metric",
            Self::DirectedOnlyMetric => "Metric requires a directed graph",
            Self::AmbiguousAuthor => "Author matches several supervisors",
            Self::SourceFailed => "Thesis source failed",
            Self::OutputWriteFailed => "Output file write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputUnreadable => Some("Check the --input path or [input].path in thesisnet.toml."),
            Self::MalformedInput => {
                Some("Every record needs `title`, `author` and a `directors` list.")
            }
            Self::ConfigParseError => Some("Fix syntax in thesisnet.toml and retry."),
            Self::UnsupportedMetric => {
                Some("Use one of: degree, betweenness, closeness, in-degree.")
            }
            Self::DirectedOnlyMetric => Some("Pass --directed to rank on the directed graph."),
            Self::AmbiguousAuthor => Some(
                "Fix the supervisor spellings in the input, or set names.ambiguity = \"last-wins\".",
            ),
            Self::SourceFailed => None,
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
