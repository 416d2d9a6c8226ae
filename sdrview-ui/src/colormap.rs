use eframe::epaint::Color32;

use crate::range::DisplayRange;

pub const PALETTE_SIZE: usize = 256;

/// Colour tables the waterfall and the plot fill can use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorTable {
    #[default]
    Classic,
    Grayscale,
    Heat,
    Ocean,
}

impl ColorTable {
    pub const ALL: [ColorTable; 4] = [
        ColorTable::Classic,
        ColorTable::Grayscale,
        ColorTable::Heat,
        ColorTable::Ocean,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorTable::Classic => "Classic",
            ColorTable::Grayscale => "Grayscale",
            ColorTable::Heat => "Heat",
            ColorTable::Ocean => "Ocean",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Gradient stops from the weakest to the strongest level.
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            ColorTable::Classic => &[
                [0, 0, 0],
                [0, 0, 128],
                [0, 128, 255],
                [0, 255, 255],
                [255, 255, 0],
                [255, 0, 0],
                [255, 255, 255],
            ],
            ColorTable::Grayscale => &[[0, 0, 0], [255, 255, 255]],
            ColorTable::Heat => &[[0, 0, 0], [160, 0, 0], [255, 160, 0], [255, 255, 255]],
            ColorTable::Ocean => &[[0, 0, 20], [0, 60, 120], [0, 160, 200], [200, 255, 255]],
        }
    }
}

/// A colour table expanded to [`PALETTE_SIZE`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    table: ColorTable,
    colors: Vec<Color32>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(ColorTable::default())
    }
}

impl Palette {
    pub fn new(table: ColorTable) -> Self {
        let stops = table.stops();
        let segments = (stops.len() - 1) as f32;
        let colors = (0..PALETTE_SIZE)
            .map(|i| {
                let t = i as f32 / (PALETTE_SIZE - 1) as f32 * segments;
                let lo = (t.floor() as usize).min(stops.len() - 2);
                let frac = t - lo as f32;
                let [r, g, b] = lerp(stops[lo], stops[lo + 1], frac);
                Color32::from_rgb(r, g, b)
            })
            .collect();
        Self { table, colors }
    }

    pub fn table(&self) -> ColorTable {
        self.table
    }

    /// Colour at a table index, clamped to the last entry.
    pub fn color(&self, index: usize) -> Color32 {
        self.colors[index.min(PALETTE_SIZE - 1)]
    }

    /// Colour for a dB value inside the display window.
    pub fn color_for(&self, value: f32, range: &DisplayRange) -> Color32 {
        self.color(range.squeeze(value, PALETTE_SIZE - 1))
    }

    /// Colour for a height `level` out of `extent`, used by the plot fill gradient.
    pub fn color_at_height(&self, level: usize, extent: usize) -> Color32 {
        if extent == 0 {
            return self.color(0);
        }
        self.color(level * (PALETTE_SIZE - 1) / extent)
    }
}

fn lerp(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_endpoints_match_stops() {
        for table in ColorTable::ALL {
            let palette = Palette::new(table);
            let first = table.stops()[0];
            let last = table.stops()[table.stops().len() - 1];
            assert_eq!(palette.color(0), Color32::from_rgb(first[0], first[1], first[2]));
            assert_eq!(palette.color(255), Color32::from_rgb(last[0], last[1], last[2]));
        }
    }

    #[test]
    fn test_grayscale_is_monotonic() {
        let palette = Palette::new(ColorTable::Grayscale);
        for i in 1..PALETTE_SIZE {
            assert!(palette.color(i).r() >= palette.color(i - 1).r());
        }
        assert_eq!(palette.color(1000), palette.color(255));
    }

    #[test]
    fn test_color_for_uses_squeeze() {
        let palette = Palette::new(ColorTable::Grayscale);
        let range = DisplayRange::default();
        assert_eq!(palette.color_for(-100.0, &range), Color32::BLACK);
        assert_eq!(palette.color_for(50.0, &range), Color32::WHITE);
    }

    #[test]
    fn test_cycle_visits_every_table() {
        let mut table = ColorTable::default();
        let mut seen = Vec::new();
        for _ in 0..ColorTable::ALL.len() {
            seen.push(table);
            table = table.next();
        }
        assert_eq!(table, ColorTable::default());
        assert_eq!(seen, ColorTable::ALL.to_vec());
    }
}
