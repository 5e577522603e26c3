use std::collections::{BTreeMap, BTreeSet};

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Color mapping: collaboration pattern → Color32
// ---------------------------------------------------------------------------

/// Assigns each pattern of a dataset a fixed colour, so a pattern keeps its
/// colour when the region changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(patterns: &BTreeSet<String>) -> Self {
        let palette = generate_palette(patterns.len());
        let mapping = patterns.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour of a pattern; grey for patterns the dataset did not list.
    pub fn color_for(&self, pattern: &str) -> Color32 {
        self.mapping
            .get(pattern)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            assert!(palette[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_patterns_fall_back_to_grey() {
        let patterns: BTreeSet<String> =
            ["directive", "learning"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&patterns);
        assert_ne!(map.color_for("directive"), map.color_for("learning"));
        assert_eq!(map.color_for("validation"), Color32::GRAY);
    }
}
