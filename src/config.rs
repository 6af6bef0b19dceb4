//! Transform parameters.

use crate::errors::ConfigError;

/// Smallest accepted scale factor on either axis
pub const MIN_SCALE: f64 = 0.01;
/// Most decimals the formatter can produce without overflowing
pub const MAX_DECIMALS: usize = 9;
/// Decimals written when nothing else is requested
pub const DEFAULT_DECIMALS: usize = 2;

/// Everything a processing pass needs to know, passed by reference through
/// the pipeline.
///
/// Transforms are applied in a fixed order regardless of how they were
/// requested: flip, mirror, rotate, scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Negate Y ("FlipHorizontal": flips across the horizontal axis)
    pub flip_horizontal: bool,
    /// Negate X ("FlipVertical": mirrors across the vertical axis)
    pub flip_vertical: bool,
    /// Quarter turn clockwise
    pub rotate90: bool,
    /// Drop every terminal and mark the element as a thumbnail
    pub remove_all_terminals: bool,
    pub decimals: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            flip_horizontal: false,
            flip_vertical: false,
            rotate90: false,
            remove_all_terminals: false,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl TransformConfig {
    /// Uniform scaling on both axes
    pub fn scaled(factor: f64) -> Self {
        Self {
            scale_x: factor,
            scale_y: factor,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [('x', self.scale_x), ('y', self.scale_y)] {
            if !value.is_finite() || value < MIN_SCALE {
                return Err(ConfigError::ScaleTooSmall { axis, value });
            }
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::TooManyDecimals {
                value: self.decimals,
                max: MAX_DECIMALS,
            });
        }
        Ok(())
    }

    /// Lines shorter than this would be written as a single point
    pub fn min_line_length(&self) -> f64 {
        10f64.powi(-(self.decimals as i32))
    }

    /// Distance under which two consecutive polygon points are merged
    pub fn merge_epsilon(&self) -> f64 {
        self.min_line_length() / 2.0
    }

    /// Factor for sizes that must keep their aspect (circle diameters,
    /// font sizes, line end lengths)
    pub fn uniform_scale(&self) -> f64 {
        self.scale_x.min(self.scale_y)
    }
}

/// Parse a number typed on a command line.
///
/// Accepts an optional sign, digits and at most one `.` or `,` as the
/// decimal separator. Exponents, `inf` and `nan` are rejected.
pub fn parse_factor(text: &str) -> Result<f64, ConfigError> {
    let not_a_number = || ConfigError::NotANumber {
        value: text.to_string(),
    };

    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    let mut separators = 0;
    let mut has_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => has_digit = true,
            '.' | ',' => separators += 1,
            _ => return Err(not_a_number()),
        }
    }
    if !has_digit || separators > 1 {
        return Err(not_a_number());
    }
    trimmed.replace(',', ".").parse().map_err(|_| not_a_number())
}
