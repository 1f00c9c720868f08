use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Accent colour of every bar chart (`#0083B8`).
pub const ACCENT: Color32 = Color32::from_rgb(0x00, 0x83, 0xB8);

/// Scatter layer of the location map: rgba(200, 30, 0, 160), premultiplied.
pub const SCATTER: Color32 = Color32::from_rgba_premultiplied(125, 19, 0, 160);

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting from the accent hue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (197.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.45))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Density ramp
// ---------------------------------------------------------------------------

/// Colour for a density in `[0, 1]`: pale yellow for sparse cells through
/// orange to dark red for the densest.
pub fn density_color(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let hue = 55.0 * (1.0 - t);
    let lightness = 0.82 - 0.45 * t;
    hsl_to_color32(Hsl::new(hue, 0.9, lightness))
}
