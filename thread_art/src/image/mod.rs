use std::ops::Deref;

use image::{DynamicImage, GrayImage};

use crate::{config::ConfigError, darkness::Darkness, geometry::Point, Grid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        let mut pixels = Vec::with_capacity(grid.len());
        for y in 0..grid.height {
            for x in 0..grid.width {
                pixels.push(builder(Point { x, y }));
            }
        }
        Self { pixels, grid }
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get<I: num_traits::NumCast + Copy>(&self, point: Point<I>) -> Option<&T> {
        self.grid
            .index_of(point)
            .map(|index| &self.pixels[index])
    }

    pub fn get_mut<I: num_traits::NumCast + Copy>(&mut self, point: Point<I>) -> Option<&mut T> {
        self.grid
            .index_of(point)
            .map(|index| &mut self.pixels[index])
    }
}

impl<T: Clone> PixelData<T> {
    pub fn filled(value: T, grid: Grid) -> Self {
        Self {
            pixels: vec![value; grid.len()],
            grid,
        }
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

/// Working copy of the source luminance: 0 is black, 255 is white.
///
/// Pixels only ever get lighter as chords are inked over them.
pub type Residual = PixelData<u8>;

impl Residual {
    /// Builds the residual from a single channel image, which must be square.
    pub fn from_luma(image: GrayImage) -> Result<Self, ConfigError> {
        let (width, height) = image.dimensions();
        if width != height {
            return Err(ConfigError::NotSquare { width, height });
        }
        Ok(Self {
            grid: Grid::new(height as usize, width as usize),
            pixels: image.into_raw(),
        })
    }

    /// Converts any decoded image to luminance and builds the residual from it.
    pub fn from_image(image: DynamicImage) -> Result<Self, ConfigError> {
        Self::from_luma(image.into_luma8())
    }

    /// Side of the (square) residual.
    pub fn size(&self) -> usize {
        self.grid.width
    }

    /// Inks `path`: every pixel on it is lightened by `darkness`. Pixels outside the grid are
    /// ignored.
    pub fn darken(&mut self, path: &[Point<i32>], darkness: &impl Darkness) {
        for &point in path {
            if let Some(value) = self.get_mut(point) {
                *value = darkness.compute(*value);
            }
        }
    }

    pub fn to_image(&self) -> GrayImage {
        // The buffer length always matches the grid.
        GrayImage::from_fn(self.grid.width as u32, self.grid.height as u32, |x, y| {
            image::Luma([self.pixels[y as usize * self.grid.width + x as usize]])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darkness::FlatDarkness;

    #[test]
    fn rejects_non_square_images() {
        let image = GrayImage::new(10, 12);
        assert!(matches!(
            Residual::from_luma(image),
            Err(ConfigError::NotSquare {
                width: 10,
                height: 12
            })
        ));
    }

    #[test]
    fn keeps_luma_layout() {
        let image = GrayImage::from_fn(3, 3, |x, y| image::Luma([(y * 3 + x) as u8 * 10]));
        let residual = Residual::from_luma(image.clone()).unwrap();
        assert_eq!(residual.size(), 3);
        assert_eq!(residual.get(Point::new(2, 1)), Some(&50));
        assert_eq!(residual.to_image(), image);
    }

    #[test]
    fn converts_color_images() {
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        let residual = Residual::from_image(DynamicImage::ImageRgb8(rgb)).unwrap();
        assert!(residual.pixels().iter().all(|&value| value == 255));
    }

    #[test]
    fn darken_clamps_and_skips_outside() {
        let mut residual = Residual::filled(230, Grid::square(4));
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(-1, 2), Point::new(9, 9)];
        residual.darken(&path, &FlatDarkness::default());
        assert_eq!(residual.get(Point::new(0, 0)), Some(&255));
        assert_eq!(residual.get(Point::new(1, 1)), Some(&255));
        assert_eq!(residual.get(Point::new(2, 2)), Some(&230));
    }
}
