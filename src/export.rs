use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::Color;
use crate::geometry::PixelRect;
use crate::surface::Surface;

/// Bake a cropped selection into a PNG. The selection is composited over the
/// note's background color, so transparent canvas regions come out as the
/// background rather than as holes. `rect` must already be clamped to the
/// surface bounds.
pub fn bake_selection(surface: &Surface, rect: PixelRect, background: Color) -> Result<Vec<u8>> {
    let mut cropped = Surface::new(rect.width as u32, rect.height as u32, background.to_rgba());
    for y in 0..rect.height as u32 {
        for x in 0..rect.width as u32 {
            let px = surface.pixel(rect.x as u32 + x, rect.y as u32 + y);
            cropped.blend_pixel_at(x as i32, y as i32, px);
        }
    }
    cropped.encode_png()
}

/// Suggested download name: the note's name with unsafe characters stripped,
/// falling back to `cana` when there is nothing usable.
pub fn download_file_name(note_name: Option<&str>) -> String {
    let raw = note_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("cana");
    let cleaned = file_name_pattern().replace_all(raw, "");
    let stem = cleaned.trim();
    if stem.is_empty() {
        "cana.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("valid file name regex")
    })
}

/// Append a `.png` extension when the picked path has none.
pub fn ensure_png_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path
    }
}

pub fn write_png(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write exported png {}", path.display()))
}
