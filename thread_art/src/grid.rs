use num_traits::NumCast;

use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl Grid {
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of `point`, or `None` if it lies outside the grid.
    pub fn index_of<T: NumCast + Copy>(&self, point: Point<T>) -> Option<usize> {
        let point = point.cast::<usize>()?;
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }

    pub fn contains<T: NumCast + Copy>(&self, point: Point<T>) -> bool {
        self.index_of(point).is_some()
    }
}
