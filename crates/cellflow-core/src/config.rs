//! Layout defaults, loadable from TOML.

use crate::error::LayoutError;
use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable defaults for stacks, grids, dividers and text measurement.
///
/// Missing keys fall back to [`LayoutConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between consecutive stack cells
    pub stack_spacing: f32,
    /// Horizontal and vertical gaps between grid cells
    pub grid_spacing: Size,
    /// Intrinsic extent of a divider across its axis
    pub divider_thickness: f32,
    /// Second press within this many milliseconds is a double-click
    pub double_click_ms: u64,
    /// Presses further apart than this start a new click sequence
    pub click_reset_ms: u64,
    /// Maximum entries kept by a text metrics cache
    pub text_cache_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            stack_spacing: 6.0,
            grid_spacing: Size::new(6.0, 4.0),
            divider_thickness: 10.0,
            double_click_ms: 400,
            click_reset_ms: 1000,
            text_cache_capacity: 1024,
        }
    }
}

impl LayoutConfig {
    /// Parse from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(s)?)
    }

    /// Double-click window.
    #[must_use]
    pub const fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Click sequence reset window.
    #[must_use]
    pub const fn click_reset(&self) -> Duration {
        Duration::from_millis(self.click_reset_ms)
    }
}
