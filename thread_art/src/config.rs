use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{darkness::DarknessMode, geometry::Circle, line_table::CacheMode, pair};

/// Parameters of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pins around the circle.
    pub pin_count: usize,
    /// Chords to select.
    pub steps: usize,
    /// Minimum circular index distance between the two pins of a chord.
    pub min_angular_gap: usize,
    /// Side of the rendered image; `0` reuses the input size.
    pub output_size: usize,
    pub darkness: DarknessMode,
    pub cache: CacheMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pin_count: 200,
            steps: 1000,
            min_angular_gap: 20,
            output_size: 0,
            darkness: DarknessMode::default(),
            cache: CacheMode::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin_count < Circle::MIN_PINS {
            return Err(ConfigError::PinCount(self.pin_count));
        }
        let max_gap = self.pin_count / 2;
        if self.min_angular_gap > max_gap {
            log::warn!(
                "min_angular_gap {} exceeds {max_gap}: no chord is legal and any step will fail",
                self.min_angular_gap
            );
        }
        let pairs = pair::pair_count(self.pin_count);
        if self.steps > pairs {
            log::warn!(
                "{} steps requested but only {pairs} chords exist: the run will run out of candidates",
                self.steps
            );
        }
        Ok(())
    }

    pub fn output_size(&self, input_size: usize) -> usize {
        if self.output_size == 0 {
            input_size
        } else {
            self.output_size
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least 3 pins are required, got {0}")]
    PinCount(usize),
    #[error("the image must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("the image must be at least 2 pixels wide, got {0}")]
    ImageTooSmall(usize),
    #[error("pin {index} falls outside the image")]
    PinOutOfBounds { index: usize },
}
