//! Template font resolution.
//!
//! Priority: `PLEDGE_PRESS_FONT` env var, then a list of common system
//! font locations.

use anyhow::{Result, bail};

const SYSTEM_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load TTF/OTF bytes for the document templates.
pub fn load_font_data() -> Result<Vec<u8>> {
    if let Ok(path) = std::env::var("PLEDGE_PRESS_FONT") {
        tracing::debug!(path, "Loading font from PLEDGE_PRESS_FONT");
        return Ok(std::fs::read(&path)?);
    }

    for path in SYSTEM_CANDIDATES {
        if let Ok(data) = std::fs::read(path) {
            tracing::debug!(path, "Loaded system font");
            return Ok(data);
        }
    }

    bail!("no usable font found (set PLEDGE_PRESS_FONT or install system fonts)")
}
