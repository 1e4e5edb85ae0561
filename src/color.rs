use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colour palette
// ---------------------------------------------------------------------------

/// Hue step between consecutive series, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_76;

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour of the `index`-th series. Consecutive indices land far apart on the
/// hue circle, so any prefix of the sequence stays visually distinct.
pub fn series_color(index: usize) -> Color32 {
    let hue = (index as f32 * GOLDEN_ANGLE) % 360.0;
    hsl_to_color32(hue, 0.75, 0.5)
}

/// Endless source of series colours.
#[derive(Debug, Clone, Default)]
pub struct ColorCycle {
    next: usize,
}

impl ColorCycle {
    pub fn next_color(&mut self) -> Color32 {
        let c = series_color(self.next);
        self.next += 1;
        c
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// `#rrggbb` text for list entries.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
