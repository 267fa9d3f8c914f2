use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Gives every country of a table its own colour, fixed for the table's
/// lifetime so a series keeps its colour while the selection changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(countries: impl IntoIterator<Item = &'a str>) -> Self {
        let countries: Vec<&str> = countries.into_iter().collect();
        let palette = generate_palette(countries.len());
        let mapping = countries
            .into_iter()
            .zip(palette)
            .map(|(c, colour)| (c.to_string(), colour))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        assert_ne!(palette[0], palette[3]);
    }

    #[test]
    fn countries_get_stable_distinct_colours() {
        let map = ColorMap::new(["Chile", "Peru", "Togo"]);
        assert_ne!(map.color_for("Chile"), map.color_for("Peru"));
        assert_eq!(map.color_for("Togo"), map.clone().color_for("Togo"));
        assert_eq!(map.color_for("Atlantis"), Color32::LIGHT_BLUE);
    }
}
