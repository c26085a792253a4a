use std::sync::OnceLock;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Circle, Point, Segment},
    pair::{self, PairKey},
    verboser::{Message, Verboser},
};

/// Rasterized pixel path of a chord.
pub type Path = Box<[Point<i32>]>;

/// Read-only source of chord paths shared by every selection step.
pub trait LineTable: Send + Sync {
    fn pin_count(&self) -> usize;

    /// Path of the chord between two distinct pins.
    ///
    /// # Panics
    ///
    /// If `key` was built for a different pin count or names a pin twice.
    fn path(&self, key: PairKey) -> &[Point<i32>];
}

/// How the line table is populated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheMode {
    /// Rasterize every pair before the first step.
    #[default]
    Eager,
    /// Rasterize each pair the first time it is scored.
    Lazy,
}

fn chord(pins: &[Point<i32>], low: usize, high: usize) -> Path {
    Segment::new(pins[low], pins[high])
        .points_between()
        .into_boxed_slice()
}

/// Every chord rasterized up front.
pub struct BakedLineTable {
    pin_count: usize,
    paths: Vec<Path>,
}

impl BakedLineTable {
    pub fn new(circle: &Circle, verboser: &mut impl Verboser) -> Self {
        let positions: Vec<_> = circle.pins().iter().map(|pin| pin.position).collect();
        let pins = positions.as_slice();
        let pin_count = pins.len();
        verboser.verbose(Message::Baking(pair::pair_count(pin_count)));

        // Ordered by high pin then low pin, which is the triangular slot order.
        let paths: Vec<Path> = (1..pin_count)
            .into_par_iter()
            .flat_map_iter(move |high| (0..high).map(move |low| chord(pins, low, high)))
            .collect();

        verboser.verbose(Message::Baked(paths.len()));
        Self { pin_count, paths }
    }

    /// Total number of stored pixels across all chords.
    pub fn pixel_count(&self) -> usize {
        self.paths.iter().map(|path| path.len()).sum()
    }
}

impl LineTable for BakedLineTable {
    fn pin_count(&self) -> usize {
        self.pin_count
    }

    fn path(&self, key: PairKey) -> &[Point<i32>] {
        &self.paths[key.slot(self.pin_count)]
    }
}

/// Chords rasterized on demand and memoized.
pub struct LazyLineTable {
    pins: Vec<Point<i32>>,
    paths: Vec<OnceLock<Path>>,
}

impl LazyLineTable {
    pub fn new(circle: &Circle) -> Self {
        let pins: Vec<_> = circle.pins().iter().map(|pin| pin.position).collect();
        let paths = (0..pair::pair_count(pins.len()))
            .map(|_| OnceLock::new())
            .collect();
        Self { pins, paths }
    }

    /// Number of chords rasterized so far.
    pub fn baked(&self) -> usize {
        self.paths.iter().filter(|path| path.get().is_some()).count()
    }
}

impl LineTable for LazyLineTable {
    fn pin_count(&self) -> usize {
        self.pins.len()
    }

    fn path(&self, key: PairKey) -> &[Point<i32>] {
        let (low, high) = key.pins(self.pins.len());
        self.paths[pair::triangular_slot(low, high)].get_or_init(|| chord(&self.pins, low, high))
    }
}
