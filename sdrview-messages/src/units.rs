/// Frequency in Hertz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hertz(pub u64);

impl std::fmt::Display for Hertz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

impl Hertz {
    pub const fn khz(khz: u64) -> Self {
        Self(khz * 1_000)
    }

    pub const fn mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    pub const fn as_hz(self) -> u64 {
        self.0
    }

    /// Highest frequency accepted from the wire, 1 THz.
    pub const MAX: Self = Self(1_000_000_000_000);

    /// Convert a fractional MHz reading to whole Hertz, rounding to the nearest Hz.
    ///
    /// Returns `None` for negative or non-finite values and for values above [`Hertz::MAX`].
    pub fn from_mhz_f32(mhz: f32) -> Option<Self> {
        if !mhz.is_finite() || mhz < 0.0 || f64::from(mhz) * 1e6 > Self::MAX.0 as f64 {
            return None;
        }
        Some(Self((f64::from(mhz) * 1e6).round() as u64))
    }

    pub fn as_mhz(self) -> f64 {
        self.0 as f64 / 1e6
    }

    /// Human readable form with the largest unit that keeps the value above one.
    pub fn pretty(self) -> String {
        match self.0 {
            hz if hz >= 1_000_000_000 => format!("{:.3} GHz", hz as f64 / 1e9),
            hz if hz >= 1_000_000 => format!("{:.3} MHz", hz as f64 / 1e6),
            hz if hz >= 1_000 => format!("{:.1} kHz", hz as f64 / 1e3),
            hz => format!("{hz} Hz"),
        }
    }
}
