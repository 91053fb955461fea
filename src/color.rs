use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Genre;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// `n` evenly spaced hues, offset so they avoid the known genres' hues.
fn spare_hues(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (i as f32 / n as f32) * 360.0 + 285.0)
        .map(|h| h % 360.0)
        .collect()
}

/// Base hue of the known genres: silence blue, salsa orange,
/// meditation green, edm red.
fn known_hue(genre: &Genre) -> Option<f32> {
    match genre {
        Genre::Silence => Some(210.0),
        Genre::Salsa => Some(28.0),
        Genre::Meditation => Some(125.0),
        Genre::Edm => Some(0.0),
        Genre::Other(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Genre colours: one hue per genre, lightness encodes time
// ---------------------------------------------------------------------------

/// Maps each genre to a hue.  Lines use a mid tone; time-encoded points use
/// a light-to-dark ramp of the same hue.
#[derive(Debug, Clone)]
pub struct GenreColors {
    hues: BTreeMap<Genre, f32>,
    default_color: Color32,
}

impl Default for GenreColors {
    fn default() -> Self {
        Self::new(&BTreeSet::new())
    }
}

impl GenreColors {
    /// Build the hue table for the genres present in a dataset.
    pub fn new(genres: &BTreeSet<Genre>) -> Self {
        let others: Vec<&Genre> = genres.iter().filter(|g| known_hue(g).is_none()).collect();
        let mut hues: BTreeMap<Genre, f32> = Genre::KNOWN
            .iter()
            .filter_map(|g| known_hue(g).map(|h| (g.clone(), h)))
            .collect();
        for (g, h) in others.into_iter().zip(spare_hues(genres.len())) {
            hues.insert(g.clone(), h);
        }

        GenreColors {
            hues,
            default_color: Color32::GRAY,
        }
    }

    /// Colour of the genre's line in the displacement charts.
    pub fn line_color(&self, genre: &Genre) -> Color32 {
        self.hues
            .get(genre)
            .map(|&h| hsl_to_color32(h, 0.75, 0.5))
            .unwrap_or(self.default_color)
    }

    /// Sequential colour for relative time `t` in `[0, 1]`; later is darker.
    pub fn time_color(&self, genre: &Genre, t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
        self.hues
            .get(genre)
            .map(|&h| hsl_to_color32(h, 0.7, 0.85 - 0.55 * t))
            .unwrap_or(self.default_color)
    }
}
