use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Placeholder tile colours
// ---------------------------------------------------------------------------

/// Hues cycled through by consecutive placeholder tiles.
const PLACEHOLDER_HUES: usize = 12;

/// Muted colour for the tile shown while a thumbnail is missing.
///
/// Neighbouring items get visibly different hues; the colour depends only on
/// the listing position, so it stays put across frames.
pub fn placeholder_color(index: usize) -> Color32 {
    // Step by 5/12 of the wheel so adjacent tiles are far apart.
    let step = (index * 5) % PLACEHOLDER_HUES;
    let hue = (step as f32 / PLACEHOLDER_HUES as f32) * 360.0;
    let hsl = Hsl::new(hue, 0.35, 0.35);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
