use thiserror::Error;

/// Errors that abort a layout run.
///
/// Per-item placement failures are not errors: they are reported through
/// [`Layout::unplaced`](crate::Layout::unplaced) and never stop the run.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Malformed input record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
}

impl CloudError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn item(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            index,
            reason: reason.into(),
        }
    }

    /// True for errors caused by the options rather than the item records.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
