/// Invalid configuration, rejected when a session or environment is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A size that must be strictly positive was not.
    InvalidDimension { field: &'static str, value: i64 },
    /// A value outside its allowed range.
    InvalidValue {
        field: &'static str,
        reason: String,
    },
    /// TOML that could not be parsed into a config.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimension { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            },
            Self::InvalidValue { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::Parse(m) => write!(f, "config parse error: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A raw action outside `{0,1} x {0,1,2}`, or a malformed batch of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    JumpOutOfRange(u8),
    MoveOutOfRange(u8),
    /// A batched step got a different number of actions than environments.
    CountMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JumpOutOfRange(v) => write!(f, "jump must be 0 or 1, got {v}"),
            Self::MoveOutOfRange(v) => write!(f, "move must be 0, 1 or 2, got {v}"),
            Self::CountMismatch { expected, got } => {
                write!(f, "expected {expected} actions, got {got}")
            },
        }
    }
}

impl std::error::Error for ActionError {}
