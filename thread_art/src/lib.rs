pub mod geometry {
    pub mod circle;
    pub mod point;
    pub mod segment;

    pub use circle::{Circle, Pin};
    pub use point::Point;
    pub use segment::Segment;
}

mod algorithm;
mod computation;
pub mod config;
pub mod darkness;
mod float;
pub mod grid;
pub mod image;
pub mod line_table;
pub mod pair;
pub mod raster;
pub mod verboser;
pub mod weight;

#[cfg(test)]
mod scenario_tests;

pub use algorithm::*;
pub use computation::*;
pub use config::{ConfigError, Settings};
pub use darkness::{Darkness, DarknessMode, FlatDarkness, PercentageDarkness};
pub use float::Float;
pub use grid::Grid;
pub use crate::image::Residual;
pub use line_table::{BakedLineTable, CacheMode, LazyLineTable, LineTable};
pub use pair::PairKey;
