use std::fmt;

use crate::format::format_int;

/// Font size used when an element gives none
pub const DEFAULT_FONT_SIZE: f64 = 9.0;

/// A packed Qt font string: `family,pointSize,pixelSize,styleHint,weight,
/// style,underline,strikeOut,fixedPitch,rawMode[,...]`.
///
/// Only the family and point size are interpreted for editing; the other
/// fields are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub point_size: f64,
    /// Fields after the point size
    pub flags: Vec<String>,
}

impl FontDescriptor {
    /// Parse a packed font string; `None` when family or size is unusable
    pub fn parse(packed: &str) -> Option<Self> {
        let mut fields = packed.split(',');
        let family = fields.next()?.to_string();
        let point_size = fields.next()?.trim().parse::<f64>().ok()?;
        if family.is_empty() || !point_size.is_finite() {
            return None;
        }
        Some(Self {
            family,
            point_size,
            flags: fields.map(str::to_string).collect(),
        })
    }

    /// Descriptor synthesized for elements that only stored a size
    pub fn legacy(size: f64) -> Self {
        Self {
            family: "Sans Serif".to_string(),
            point_size: size,
            flags: ["-1", "5", "50", "0", "0", "0", "0", "0"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    fn flag(&self, position: usize) -> Option<i64> {
        // positions count from the family name
        self.flags.get(position - 2)?.trim().parse().ok()
    }

    /// Qt 5 weights run up to 99 (75 = bold), Qt 6 up to 1000 (700 = bold)
    pub fn bold(&self) -> bool {
        match self.flag(4) {
            Some(weight) if weight > 99 => weight >= 600,
            Some(weight) => weight >= 63,
            None => false,
        }
    }

    pub fn italic(&self) -> bool {
        matches!(self.flag(5), Some(1 | 2))
    }

    pub fn underline(&self) -> bool {
        self.flag(6) == Some(1)
    }

    pub fn strike_out(&self) -> bool {
        self.flag(7) == Some(1)
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.family, format_int(self.point_size))?;
        for flag in &self.flags {
            write!(f, ",{flag}")?;
        }
        Ok(())
    }
}
