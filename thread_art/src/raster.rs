//! Integer line rasterization.

use crate::geometry::Point;

/// Rasterizes the segment `start -> end` with Bresenham's algorithm generalized to every
/// octant.
///
/// The path holds exactly `max(|dx|, |dy|) + 1` pixels, both endpoints included, ordered from
/// `start` to `end`. The line is always walked from the lexicographically smaller endpoint, so
/// `rasterize(a, b)` and `rasterize(b, a)` cover the same pixels in reverse order.
pub fn rasterize(start: Point<i32>, end: Point<i32>) -> Vec<Point<i32>> {
    if start <= end {
        walk(start, end)
    } else {
        let mut path = walk(end, start);
        path.reverse();
        path
    }
}

fn walk(start: Point<i32>, end: Point<i32>) -> Vec<Point<i32>> {
    let delta = end - start;
    let sign = Point::new(delta.x.signum(), delta.y.signum());
    let (dx, dy) = (delta.x.abs(), delta.y.abs());

    // Walk along the major axis, stepping the minor one when the error term goes positive.
    let steep = dy > dx;
    let (major, minor) = if steep { (dy, dx) } else { (dx, dy) };
    let mut error = 2 * minor - major;
    let mut offset = 0;

    let mut path = Vec::with_capacity(major as usize + 1);
    for step in 0..=major {
        path.push(if steep {
            Point::new(start.x + offset * sign.x, start.y + step * sign.y)
        } else {
            Point::new(start.x + step * sign.x, start.y + offset * sign.y)
        });
        if error > 0 {
            offset += 1;
            error -= 2 * major;
        }
        error += 2 * minor;
    }
    path
}
