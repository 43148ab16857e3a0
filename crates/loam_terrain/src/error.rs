use std::fmt;

/// Errors surfaced by configuration loading and generation runs.
///
/// Internal invariant violations (section index collisions, neighbor
/// indices out of bounds) are not represented here; they are debug
/// assertions.
#[derive(Debug)]
pub enum TerrainError {
    /// A configuration field is outside its accepted range.
    InvalidConfig { field: &'static str, reason: String },
    /// I/O error while reading a configuration file.
    Io(std::io::Error),
    /// Configuration JSON could not be parsed.
    Parse(serde_json::Error),
    /// A chunk worker panicked; the run was aborted.
    WorkerPanicked { section: Option<u32> },
    /// The join barrier completed without a chunk for this section.
    MissingChunk { section: u32 },
}

impl TerrainError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration: `{field}` {reason}")
            }
            TerrainError::Io(e) => write!(f, "I/O error: {e}"),
            TerrainError::Parse(e) => write!(f, "Configuration parse error: {e}"),
            TerrainError::WorkerPanicked { section: Some(section) } => {
                write!(f, "Chunk worker panicked while building section {section}")
            }
            TerrainError::WorkerPanicked { section: None } => write!(f, "Chunk worker panicked"),
            TerrainError::MissingChunk { section } => {
                write!(f, "No chunk was produced for section {section}")
            }
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::Io(e) => Some(e),
            TerrainError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(e: std::io::Error) -> Self {
        TerrainError::Io(e)
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(e: serde_json::Error) -> Self {
        TerrainError::Parse(e)
    }
}
