use crate::{config::ConfigError, grid::Grid};

use super::Point;

/// A point on the circumference where the thread may be hooked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub position: Point<i32>,
    pub index: usize,
}

impl Pin {
    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }
}

/// Pins evenly spaced around a circle.
///
/// Pin `k` sits at the vector `(0, radius)` rotated by `k * 360 / N` degrees and translated
/// to the center, rounded to the nearest pixel.
#[derive(Clone, Debug)]
pub struct Circle {
    center: Point<f64>,
    radius: f64,
    pins: Vec<Pin>,
}

impl Circle {
    pub const MIN_PINS: usize = 3;

    pub fn new(center: Point<f64>, radius: f64, pin_count: usize) -> Result<Self, ConfigError> {
        if pin_count < Self::MIN_PINS {
            return Err(ConfigError::PinCount(pin_count));
        }
        let step = 360.0 / pin_count as f64;
        let pins = (0..pin_count)
            .map(|index| {
                let (sin, cos) = (index as f64 * step).to_radians().sin_cos();
                let rotated = Point::new(-radius * sin, radius * cos);
                let position = (rotated + center).round_ties_even();
                Pin {
                    position: Point::new(position.x as i32, position.y as i32),
                    index,
                }
            })
            .collect();
        Ok(Self {
            center,
            radius,
            pins,
        })
    }

    /// Largest circle of pins that fits a `size x size` image with one pixel of margin.
    pub fn for_image(size: usize, pin_count: usize) -> Result<Self, ConfigError> {
        if size < 2 {
            return Err(ConfigError::ImageTooSmall(size));
        }
        let half = (size / 2) as f64;
        Self::new(Point::new(half, half), half - 1.0, pin_count)
    }

    pub fn center(&self) -> Point<f64> {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn pin(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    /// Circular index distance between two pins: `min(|a - b|, N - |a - b|)`.
    pub fn index_distance(&self, a: usize, b: usize) -> usize {
        let diff = a.abs_diff(b);
        diff.min(self.pins.len() - diff)
    }

    /// Fails if any pin would fall outside `grid`.
    pub fn check_fits(&self, grid: &Grid) -> Result<(), ConfigError> {
        match self.pins.iter().find(|pin| !grid.contains(pin.position)) {
            Some(pin) => Err(ConfigError::PinOutOfBounds { index: pin.index }),
            None => Ok(()),
        }
    }
}
