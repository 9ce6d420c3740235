//! Error types for cellflow.

use crate::alignment::Alignment;
use thiserror::Error;

/// Errors from checked layout operations.
///
/// Soft lookups (find by name, find by view) return `Option` instead.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A non-`NONE` alignment carries neither horizontal nor vertical flags.
    #[error("invalid alignment {0:?}: needs a horizontal or vertical flag")]
    InvalidAlignment(Alignment),

    /// The container holds no cell for the given view.
    #[error("no cell for view '{0}'")]
    CellNotFound(String),

    /// A grid row view does not own cells.
    #[error("view '{0}' does not own cells")]
    NotCellsOwner(String),

    /// Grid sub-rows are only laid out vertically.
    #[error("stack '{0}' must be vertical to lay out grid rows")]
    GridRowsNeedVertical(String),

    /// Grids place cells by position, never by list index.
    #[error("grid '{grid}' fills cells by position; insertion index {index} unsupported")]
    IndexedGridInsert { grid: String, index: usize },

    /// A view path did not resolve.
    #[error("no view at path '{0}'")]
    PathNotFound(String),

    /// No ancestor of the view can arrange its children.
    #[error("no arranger above '{0}'")]
    NoArranger(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A stored value could not be encoded or decoded.
    #[error("storage error: {0}")]
    Storage(#[from] serde_json::Error),
}
