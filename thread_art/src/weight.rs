use std::cmp::Ordering;

use crate::{geometry::Point, image::Residual, Float};

/// Ink still owed along a path, kept as the exact ratio `owed / len`.
///
/// Ordering cross-multiplies, so two paths whose averages differ by less than the scoring
/// precision still compare correctly.
#[derive(Copy, Clone, Debug)]
pub struct Ink {
    owed: u64,
    len: u64,
}

impl Ink {
    pub const ZERO: Self = Self { owed: 0, len: 1 };

    /// An empty path owes nothing.
    pub fn new(owed: u64, len: u64) -> Self {
        if len == 0 {
            Self::ZERO
        } else {
            Self { owed, len }
        }
    }

    pub fn owed(self) -> u64 {
        self.owed
    }

    pub fn pixels(self) -> u64 {
        self.len
    }

    /// The average as a float. Both casts are exact for any realistic path.
    pub fn weight<S: Float>(self) -> S {
        let owed = <S as num_traits::NumCast>::from(self.owed).unwrap_or(S::INFINITY);
        let len = <S as num_traits::NumCast>::from(self.len).unwrap_or(S::INFINITY);
        owed / len
    }
}

impl Ord for Ink {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.owed as u128 * other.len as u128).cmp(&(other.owed as u128 * self.len as u128))
    }
}

impl PartialOrd for Ink {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ink {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ink {}

/// Exact ink owed along `path`: `sum(255 - residual[p])` over `len(path)`.
///
/// Pixels outside the residual count as white.
pub fn line_ink(residual: &Residual, path: &[Point<i32>]) -> Ink {
    let owed = path
        .iter()
        .filter_map(|&point| residual.get(point))
        .map(|&value| (255 - value) as u64)
        .sum();
    Ink::new(owed, path.len() as u64)
}

/// Average ink still owed along `path`: `sum(255 - residual[p]) / len(path)`.
///
/// Pixels outside the residual count as white. An empty path weighs zero.
pub fn line_weight<S: Float>(residual: &Residual, path: &[Point<i32>]) -> S {
    line_ink(residual, path).weight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;

    #[test]
    fn white_weighs_nothing() {
        let residual = Residual::filled(255, Grid::square(8));
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)];
        assert_eq!(line_weight::<f32>(&residual, &path), 0.0);
    }

    #[test]
    fn averages_inverse_brightness() {
        let mut residual = Residual::filled(255, Grid::square(4));
        *residual.get_mut(Point::new(0, 0)).unwrap() = 0;
        *residual.get_mut(Point::new(1, 0)).unwrap() = 128;
        let path = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)];
        assert_eq!(line_weight::<f64>(&residual, &path), (255.0 + 127.0) / 4.0);
    }

    #[test]
    fn black_weighs_most() {
        let residual = Residual::filled(0, Grid::square(4));
        let path = [Point::new(3, 0), Point::new(3, 1)];
        assert_eq!(line_weight::<f32>(&residual, &path), 255.0);
    }

    #[test]
    fn empty_path_is_zero() {
        let residual = Residual::filled(0, Grid::square(4));
        assert_eq!(line_weight::<f32>(&residual, &[]), 0.0);
    }

    #[test]
    fn ink_orders_exactly() {
        // 95211 / 476 exceeds 60607 / 303 by 1 / 144228, below single precision.
        let wide = Ink::new(95211, 476);
        let narrow = Ink::new(60607, 303);
        assert_eq!(wide.weight::<f32>(), narrow.weight::<f32>());
        assert!(wide > narrow);
        assert!(wide.weight::<f64>() > narrow.weight::<f64>());
    }

    #[test]
    fn equal_ratios_are_equal_ink() {
        assert_eq!(Ink::new(100, 2), Ink::new(50, 1));
        assert_eq!(Ink::new(0, 0), Ink::ZERO);
        assert_eq!(Ink::new(0, 7), Ink::ZERO);
    }
}
