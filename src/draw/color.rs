//! RGBA color type and the annotation color palette.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use pagemark::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let semi_transparent_blue = Color { r: 0.0, g: 0.0, b: 1.0, a: 0.5 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Stroke colors an annotation can carry.
///
/// The store persists the palette entry, not the RGBA value, so renderers are
/// free to theme them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationColor {
    Red,
    Yellow,
    Green,
    #[default]
    Blue,
    Purple,
    Black,
}

impl AnnotationColor {
    /// Maps the palette entry to its display color.
    pub fn to_color(self) -> Color {
        match self {
            AnnotationColor::Red => RED,
            AnnotationColor::Yellow => YELLOW,
            AnnotationColor::Green => GREEN,
            AnnotationColor::Blue => BLUE,
            AnnotationColor::Purple => PURPLE,
            AnnotationColor::Black => BLACK,
        }
    }

    /// Parses a palette name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" => Some(AnnotationColor::Red),
            "yellow" => Some(AnnotationColor::Yellow),
            "green" => Some(AnnotationColor::Green),
            "blue" => Some(AnnotationColor::Blue),
            "purple" => Some(AnnotationColor::Purple),
            "black" => Some(AnnotationColor::Black),
            _ => None,
        }
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color
pub const RED: Color = Color {
    r: 0.96,
    g: 0.26,
    b: 0.21,
    a: 1.0,
};

/// Predefined yellow color
pub const YELLOW: Color = Color {
    r: 1.0,
    g: 0.76,
    b: 0.03,
    a: 1.0,
};

/// Predefined green color
pub const GREEN: Color = Color {
    r: 0.3,
    g: 0.69,
    b: 0.31,
    a: 1.0,
};

/// Predefined blue color
pub const BLUE: Color = Color {
    r: 0.13,
    g: 0.59,
    b: 0.95,
    a: 1.0,
};

/// Predefined purple color
pub const PURPLE: Color = Color {
    r: 0.61,
    g: 0.15,
    b: 0.69,
    a: 1.0,
};

/// Predefined black color
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_names_parse_case_insensitively() {
        assert_eq!(AnnotationColor::from_name("Red"), Some(AnnotationColor::Red));
        assert_eq!(
            AnnotationColor::from_name("PURPLE"),
            Some(AnnotationColor::Purple)
        );
        assert!(AnnotationColor::from_name("chartreuse").is_none());
    }

    #[test]
    fn default_palette_entry_is_blue() {
        assert_eq!(AnnotationColor::default(), AnnotationColor::Blue);
        assert_eq!(AnnotationColor::default().to_color(), BLUE);
    }
}
