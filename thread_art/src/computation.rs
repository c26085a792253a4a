use std::{fmt::Write as _, path::Path};

use image::{DynamicImage, Pixel, Rgba, RgbImage, RgbaImage};
use thiserror::Error;

use crate::{
    algorithm::Chord,
    config::ConfigError,
    geometry::{Circle, Segment},
    image::Residual,
};

/// Opacity of a single thread when rendered, out of 255.
pub const THREAD_ALPHA: u8 = 75;

/// Result of a finished run.
pub struct Computation {
    circle: Circle,
    chords: Vec<Chord>,
    residual: Residual,
    output_size: usize,
}

impl Computation {
    pub(crate) fn new(
        circle: Circle,
        chords: Vec<Chord>,
        residual: Residual,
        output_size: usize,
    ) -> Self {
        Self {
            circle,
            chords,
            residual,
            output_size,
        }
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Pins of the input image the chords were selected on.
    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    /// Residual left after inking every chord.
    pub fn residual(&self) -> &Residual {
        &self.residual
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// The starting pin followed by the destination of every chord.
    pub fn visited_pins(&self) -> Vec<usize> {
        visited_pins(&self.chords)
    }

    /// Draws the chords in order on a white `size x size` canvas, each one as translucent
    /// black over what is already there.
    pub fn build_rgb(&self, size: usize) -> Result<RgbImage, ConfigError> {
        let circle = Circle::for_image(size, self.circle.len())?;
        let pins = circle.pins();
        let side = size as u32;
        let mut canvas = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));
        let ink = Rgba([0, 0, 0, THREAD_ALPHA]);
        for chord in &self.chords {
            let segment = Segment::new(pins[chord.from].position, pins[chord.to].position);
            for point in segment.points_between() {
                if let Some(point) = point.cast::<u32>() {
                    if point.x < side && point.y < side {
                        canvas.get_pixel_mut(point.x, point.y).blend(&ink);
                    }
                }
            }
        }
        Ok(DynamicImage::ImageRgba8(canvas).into_rgb8())
    }

    /// Vector rendering in the coordinates of the input image.
    pub fn build_svg(&self, line_thickness: f32) -> svg::Document {
        let size = self.residual.size() as i32;
        let mut doc = svg::Document::new().set("viewBox", (0, 0, size, size));
        for pin in self.circle.pins() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", pin.x())
                    .set("cy", pin.y())
                    .set("r", line_thickness)
                    .set("fill", "black"),
            );
        }

        let pins = self.circle.pins();
        let opacity = THREAD_ALPHA as f32 / 255.0;
        for chord in &self.chords {
            let (from, to) = (pins[chord.from], pins[chord.to]);
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y())
                    .set("stroke", "black")
                    .set("stroke-width", format!("{:.4}", line_thickness))
                    .set("stroke-opacity", format!("{:.4}", opacity)),
            );
        }
        doc
    }

    /// One visited pin per line, formatted `"<index>,"`.
    pub fn build_instructions(&self) -> String {
        let mut instructions = String::new();
        for pin in self.visited_pins() {
            // Writing to a String cannot fail.
            let _ = writeln!(instructions, "{pin},");
        }
        instructions
    }

    /// Renders at [`Self::output_size`] and saves with the format implied by the extension.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.build_rgb(self.output_size)?.save(path)?;
        Ok(())
    }

    pub fn save_svg(&self, path: impl AsRef<Path>, line_thickness: f32) -> Result<(), ExportError> {
        svg::save(path, &self.build_svg(line_thickness))?;
        Ok(())
    }

    pub fn save_instructions(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        std::fs::write(path, self.build_instructions())?;
        Ok(())
    }

    pub fn save_residual(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.residual.to_image().save(path)?;
        Ok(())
    }
}

/// The starting pin followed by the destination of every chord. Runs always start on pin 0.
pub fn visited_pins(chords: &[Chord]) -> Vec<usize> {
    let start = chords.first().map_or(0, |chord| chord.from);
    std::iter::once(start)
        .chain(chords.iter().map(|chord| chord.to))
        .collect()
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
