//! Packer tuning knobs, loadable from a TOML file.
//!
//! Every field has a default matching the twelve-column heatmap, so an empty
//! file (or no file at all) gives the stock layout.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Mode;

/// Upper bound on grid cells for either mode.
pub const MAX_GRID_CELLS: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    pub columns: usize,
    pub compact_rows: usize,
    pub expanded_rows: usize,
    pub compact_max_size: u32,
    pub expanded_max_size: u32,
    /// Clamped weights at or above this are placed before everything else.
    pub large_threshold: u32,
    /// Rows shown while the heatmap is collapsed.
    pub collapsed_rows: usize,
    /// Number of small items tried inside the collapsed rows in expanded mode.
    pub collapsed_soft_cap: usize,
    /// The collapsed-first pass only runs while the collapsed rows are filled
    /// below this ratio.
    pub collapsed_fill_threshold: f64,
    /// Height of the compact-mode visibility window.
    pub visible_rows: usize,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            columns: 12,
            compact_rows: 12,
            expanded_rows: 36,
            compact_max_size: 7,
            expanded_max_size: 5,
            large_threshold: 3,
            collapsed_rows: 12,
            collapsed_soft_cap: 20,
            collapsed_fill_threshold: 0.8,
            visible_rows: 12,
        }
    }
}

impl PackerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.compact_rows == 0 || self.expanded_rows == 0 {
            return Err(ConfigError::Invalid(
                "grid dimensions must be non-zero".to_string(),
            ));
        }
        let tallest = self.compact_rows.max(self.expanded_rows);
        match self.columns.checked_mul(tallest) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "grid {}x{} exceeds {} cells",
                    self.columns, tallest, MAX_GRID_CELLS
                )));
            }
        }
        if self.compact_max_size == 0 || self.expanded_max_size == 0 {
            return Err(ConfigError::Invalid(
                "max sizes must be non-zero".to_string(),
            ));
        }
        let widest = self.compact_max_size.max(self.expanded_max_size);
        if widest as usize > self.columns {
            return Err(ConfigError::Invalid(format!(
                "max size {} is wider than {} columns",
                widest, self.columns
            )));
        }
        if self.collapsed_rows > self.expanded_rows {
            return Err(ConfigError::Invalid(format!(
                "collapsed_rows {} exceeds expanded_rows {}",
                self.collapsed_rows, self.expanded_rows
            )));
        }
        if self.visible_rows == 0 {
            return Err(ConfigError::Invalid(
                "visible_rows must be non-zero".to_string(),
            ));
        }
        if self.visible_rows > tallest {
            return Err(ConfigError::Invalid(format!(
                "visible_rows {} exceeds the tallest grid ({} rows)",
                self.visible_rows, tallest
            )));
        }
        if !(0.0..=1.0).contains(&self.collapsed_fill_threshold) {
            return Err(ConfigError::Invalid(format!(
                "collapsed_fill_threshold {} is outside [0, 1]",
                self.collapsed_fill_threshold
            )));
        }
        Ok(())
    }

    pub fn rows(&self, mode: Mode) -> usize {
        match mode {
            Mode::Compact => self.compact_rows,
            Mode::Expanded => self.expanded_rows,
        }
    }

    pub fn max_size(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Compact => self.compact_max_size,
            Mode::Expanded => self.expanded_max_size,
        }
    }
}
