use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::surface::Rgba;

/// Opaque RGB color, serialized in `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("color `{text}` is missing the `#` prefix"))?;
        // Byte-level check: rejects the leading `+` that `from_str_radix`
        // would accept and any multibyte character before slicing.
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(anyhow!("color `{text}` is not in #RRGGBB form"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| anyhow!("color `{text}` has a non-hex channel"))
        };
        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> Rgba {
        Rgba::rgba(self.r, self.g, self.b, 255)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Which shape the shape tool drags out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Rectangle
    }
}

/// Per-tool knobs, persisted between sessions. Unknown or missing fields fall
/// back to their defaults so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_pen_size")]
    pub pen_size: f32,
    #[serde(default = "default_color")]
    pub pen_color: Color,
    #[serde(default = "default_eraser_size")]
    pub eraser_size: f32,
    #[serde(default)]
    pub shape_kind: ShapeKind,
    #[serde(default = "default_color")]
    pub shape_color: Color,
    #[serde(default = "default_text_size")]
    pub text_size: f32,
    #[serde(default = "default_color")]
    pub text_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
}

fn default_pen_size() -> f32 {
    5.0
}

fn default_eraser_size() -> f32 {
    20.0
}

fn default_text_size() -> f32 {
    16.0
}

fn default_color() -> Color {
    Color::BLACK
}

fn default_background_color() -> Color {
    Color {
        r: 0xFB,
        g: 0xFC,
        b: 0xFF,
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            pen_size: default_pen_size(),
            pen_color: default_color(),
            eraser_size: default_eraser_size(),
            shape_kind: ShapeKind::default(),
            shape_color: default_color(),
            text_size: default_text_size(),
            text_color: default_color(),
            background_color: default_background_color(),
        }
    }
}
