//! Grid and session configuration.
//!
//! # Responsibility
//! - Hold viewport geometry and initial placement defaults.
//! - Name the well-known store keys created at bootstrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key of the datum whose content is the next datum-name counter.
pub const NAME_COUNTER_KEY: &str = "name_datum";
/// Store key of the application root record.
pub const APPLICATION_KEY: &str = "main_app";
/// Store key of the grid created on first launch.
pub const MAIN_GRID_KEY: &str = "main_grid";

const DEFAULT_VIEWPORT_WIDTH: i64 = 12;
const DEFAULT_VIEWPORT_HEIGHT: i64 = 7;

/// Viewport and initial-position settings for grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of clip columns visible at once.
    pub viewport_width: i64,
    /// Number of clip rows visible at once.
    pub viewport_height: i64,
    /// Scroll offset of a freshly created grid.
    pub initial_offset: (i64, i64),
    /// Viewport-relative position of the selection cursor on a new grid.
    pub initial_main_cursor: (i64, i64),
    /// Absolute position of the marker cursor on a new grid.
    pub initial_secondary_cursor: (i64, i64),
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            // Home row sits third from the top.
            initial_offset: (0, -2),
            initial_main_cursor: (2, 2),
            initial_secondary_cursor: (2, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyViewport { width: i64, height: i64 },
    CursorOutsideViewport { x: i64, y: i64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport must be at least 1x1, got {width}x{height}")
            }
            Self::CursorOutsideViewport { x, y } => {
                write!(f, "initial selection cursor ({x}, {y}) is outside the viewport")
            }
        }
    }
}

impl Error for ConfigError {}

impl GridConfig {
    /// Creates a config with a custom viewport and default placement.
    pub fn with_viewport(width: i64, height: i64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width < 1 || self.viewport_height < 1 {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        let (x, y) = self.initial_main_cursor;
        if !(0..self.viewport_width).contains(&x) || !(0..self.viewport_height).contains(&y) {
            return Err(ConfigError::CursorOutsideViewport { x, y });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GridConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(GridConfig::default().validate().is_ok());
    }

    #[test]
    fn tiny_viewport_rejects_default_cursor() {
        let err = GridConfig::with_viewport(2, 2).validate().unwrap_err();
        assert_eq!(err, ConfigError::CursorOutsideViewport { x: 2, y: 2 });
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = GridConfig::with_viewport(0, 5).validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyViewport { .. }));
    }
}
