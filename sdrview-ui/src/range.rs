pub const DEFAULT_MIN_DB: f32 = -70.0;
pub const DEFAULT_MAX_DB: f32 = 20.0;

const SHIFT_STEP_DB: f32 = 5.0;
const ZOOM_STEP_DB: f32 = 5.0;
const MIN_SPAN_DB: f32 = 10.0;

/// Clamped linear map of a dB value onto `0..=extent`, rounded to the nearest integer.
///
/// Values at or below `min_db` map to 0, values at or above `max_db` map to `extent`.
pub fn squeeze(value: f32, min_db: f32, max_db: f32, extent: usize) -> usize {
    if value <= min_db {
        0
    } else if value >= max_db {
        extent
    } else {
        let scaled = (value - min_db) / (max_db - min_db) * extent as f32;
        (scaled.round() as usize).min(extent)
    }
}

/// dB window mapped onto plot height and colour table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    min_db: f32,
    max_db: f32,
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self {
            min_db: DEFAULT_MIN_DB,
            max_db: DEFAULT_MAX_DB,
        }
    }
}

impl DisplayRange {
    /// `None` unless both bounds are finite and `max_db > min_db`.
    pub fn new(min_db: f32, max_db: f32) -> Option<Self> {
        (min_db.is_finite() && max_db.is_finite() && max_db > min_db)
            .then_some(Self { min_db, max_db })
    }

    pub fn min_db(&self) -> f32 {
        self.min_db
    }

    pub fn max_db(&self) -> f32 {
        self.max_db
    }

    pub fn span(&self) -> f32 {
        self.max_db - self.min_db
    }

    pub fn squeeze(&self, value: f32, extent: usize) -> usize {
        squeeze(value, self.min_db, self.max_db, extent)
    }

    /// Position of `value` inside the window, clamped to `0.0..=1.0`.
    pub fn fraction(&self, value: f32) -> f32 {
        ((value - self.min_db) / self.span()).clamp(0.0, 1.0)
    }

    pub fn shift_up(&mut self) {
        self.min_db += SHIFT_STEP_DB;
        self.max_db += SHIFT_STEP_DB;
    }

    pub fn shift_down(&mut self) {
        self.min_db -= SHIFT_STEP_DB;
        self.max_db -= SHIFT_STEP_DB;
    }

    /// Narrow the window on both sides, never below the minimum span.
    pub fn zoom_in(&mut self) {
        if self.span() - 2.0 * ZOOM_STEP_DB >= MIN_SPAN_DB {
            self.min_db += ZOOM_STEP_DB;
            self.max_db -= ZOOM_STEP_DB;
        }
    }

    pub fn zoom_out(&mut self) {
        self.min_db -= ZOOM_STEP_DB;
        self.max_db += ZOOM_STEP_DB;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squeeze_boundaries_are_exact() {
        for (min, max) in [(-70.0, 20.0), (-120.0, -119.5), (0.0, 1.0), (-3.0, 97.0)] {
            for extent in [0, 1, 255, 480] {
                assert_eq!(squeeze(min, min, max, extent), 0);
                assert_eq!(squeeze(max, min, max, extent), extent);
            }
        }
    }

    #[test]
    fn test_squeeze_clamps_and_rounds() {
        assert_eq!(squeeze(-200.0, -70.0, 20.0, 90), 0);
        assert_eq!(squeeze(200.0, -70.0, 20.0, 90), 90);
        assert_eq!(squeeze(-25.0, -70.0, 20.0, 90), 45);
        assert_eq!(squeeze(-69.4, -70.0, 20.0, 90), 1);
        assert_eq!(squeeze(-69.6, -70.0, 20.0, 90), 0);
        assert_eq!(squeeze(f32::NAN, -70.0, 20.0, 90), 0);
    }

    #[test]
    fn test_new_rejects_empty_window() {
        assert!(DisplayRange::new(-70.0, 20.0).is_some());
        assert!(DisplayRange::new(10.0, 10.0).is_none());
        assert!(DisplayRange::new(20.0, -70.0).is_none());
        assert!(DisplayRange::new(f32::NEG_INFINITY, 0.0).is_none());
    }

    #[test]
    fn test_shift_and_zoom() {
        let mut range = DisplayRange::default();
        range.shift_up();
        assert_eq!((range.min_db(), range.max_db()), (-65.0, 25.0));
        range.shift_down();
        range.shift_down();
        assert_eq!((range.min_db(), range.max_db()), (-75.0, 15.0));

        range.zoom_out();
        assert_eq!(range.span(), 100.0);

        let mut narrow = DisplayRange::new(0.0, 20.0).unwrap();
        narrow.zoom_in();
        assert_eq!((narrow.min_db(), narrow.max_db()), (5.0, 15.0));
        narrow.zoom_in();
        assert_eq!(narrow.span(), 10.0);
    }

    #[test]
    fn test_fraction() {
        let range = DisplayRange::default();
        assert_eq!(range.fraction(-70.0), 0.0);
        assert_eq!(range.fraction(20.0), 1.0);
        assert_eq!(range.fraction(-25.0), 0.5);
        assert_eq!(range.fraction(100.0), 1.0);
    }
}
