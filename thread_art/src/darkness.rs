use serde::{Deserialize, Serialize};

/// How much a residual pixel is paid down when a chord is drawn over it.
///
/// Implementations must never return a value below `value`.
pub trait Darkness: Send + Sync {
    fn compute(&self, value: u8) -> u8;
}

/// Lightens by a fixed amount, clamped to white.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatDarkness(pub u8);

impl FlatDarkness {
    pub const DEFAULT: u8 = 50;
}

impl Default for FlatDarkness {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Darkness for FlatDarkness {
    fn compute(&self, value: u8) -> u8 {
        value.saturating_add(self.0)
    }
}

/// Keeps a fraction of the ink still owed (`255 - value`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentageDarkness(pub f32);

impl Darkness for PercentageDarkness {
    fn compute(&self, value: u8) -> u8 {
        let owed = (255 - value) as f32 * self.0.clamp(0.0, 1.0);
        255 - owed.round() as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DarknessMode {
    Flat(u8),
    Percentage(f32),
}

impl Default for DarknessMode {
    fn default() -> Self {
        Self::Flat(FlatDarkness::DEFAULT)
    }
}

impl Darkness for DarknessMode {
    fn compute(&self, value: u8) -> u8 {
        match *self {
            Self::Flat(amount) => FlatDarkness(amount).compute(value),
            Self::Percentage(keep) => PercentageDarkness(keep).compute(value),
        }
    }
}
