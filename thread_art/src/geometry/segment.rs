use std::fmt;

use super::Point;
use crate::raster;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl Segment<i32> {
    /// Pixels covered by the segment, from `start` to `end`, both included.
    pub fn points_between(&self) -> Vec<Point<i32>> {
        raster::rasterize(self.start, self.end)
    }
}
