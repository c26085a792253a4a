use std::{collections::HashSet, marker::PhantomData, ops::Range};

use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    computation::Computation,
    config::{ConfigError, Settings},
    darkness::Darkness,
    geometry::Circle,
    image::Residual,
    line_table::{BakedLineTable, CacheMode, LazyLineTable, LineTable},
    pair::PairKey,
    verboser::{Message, Verboser},
    weight::{line_ink, Ink},
    Float,
};

/// Runs a whole reconstruction: lays out the pins for the residual, builds the line table
/// and selects `settings.steps` chords.
///
/// On failure nothing of the partial run is returned.
pub fn compute<S: Float>(
    residual: Residual,
    settings: &Settings,
    verboser: &mut impl Verboser,
) -> Result<Computation, Error> {
    settings.validate()?;
    let circle = Circle::for_image(residual.size(), settings.pin_count)?;
    circle.check_fits(residual.grid())?;
    verboser.verbose(Message::Pins(circle.len()));

    let output_size = settings.output_size(residual.size());
    let (chords, residual) = match settings.cache {
        CacheMode::Eager => {
            let table = BakedLineTable::new(&circle, verboser);
            select::<S, _>(&circle, &table, residual, settings, verboser)?
        }
        CacheMode::Lazy => {
            let table = LazyLineTable::new(&circle);
            select::<S, _>(&circle, &table, residual, settings, verboser)?
        }
    };
    log::info!("selected {} chords", chords.len());
    Ok(Computation::new(circle, chords, residual, output_size))
}

fn select<S: Float, T: LineTable>(
    circle: &Circle,
    table: &T,
    residual: Residual,
    settings: &Settings,
    verboser: &mut impl Verboser,
) -> Result<(Vec<Chord>, Residual), NoCandidateError> {
    let mut selector = Selector::<_, _, S>::new(
        circle,
        table,
        residual,
        settings.min_angular_gap,
        settings.darkness,
    );
    selector.run(settings.steps, verboser)?;
    Ok(selector.into_parts())
}

/// A selected chord, walked from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub from: usize,
    pub to: usize,
}

/// Greedy chord selection.
///
/// Every step scores the chords leaving the current pin against the residual, keeps the
/// heaviest one (the lowest pin index wins ties), inks it into the residual and moves to its
/// other end. Chords are never reused.
///
/// Candidates are compared on exact ink ratios; `S` only sets the precision of the reported
/// weight.
pub struct Selector<'a, T, D, S = f32> {
    circle: &'a Circle,
    table: &'a T,
    residual: Residual,
    used: HashSet<PairKey>,
    chords: Vec<Chord>,
    current: usize,
    min_angular_gap: usize,
    darkness: D,
    buffers: Vec<BatchBuffer>,
    precision: PhantomData<S>,
}

impl<'a, T: LineTable, D: Darkness, S: Float> Selector<'a, T, D, S> {
    /// Starts at pin 0 with nothing used.
    pub fn new(
        circle: &'a Circle,
        table: &'a T,
        residual: Residual,
        min_angular_gap: usize,
        darkness: D,
    ) -> Self {
        Self {
            circle,
            table,
            residual,
            used: HashSet::new(),
            chords: Vec::new(),
            current: 0,
            min_angular_gap,
            darkness,
            buffers: BatchBuffer::per_cpu(),
            precision: PhantomData,
        }
    }

    pub fn residual(&self) -> &Residual {
        &self.residual
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn used(&self) -> &HashSet<PairKey> {
        &self.used
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Selects `steps` more chords, stopping at the first step without a legal candidate.
    pub fn run(
        &mut self,
        steps: usize,
        verboser: &mut impl Verboser,
    ) -> Result<(), NoCandidateError> {
        for _ in 0..steps {
            self.step(verboser)?;
        }
        Ok(())
    }

    pub fn step(&mut self, verboser: &mut impl Verboser) -> Result<Chord, NoCandidateError> {
        let step = self.chords.len();
        verboser.verbose(Message::Computing(step));

        let best = self.best_candidate().ok_or(NoCandidateError {
            step,
            pin: self.current,
        })?;

        let table = self.table;
        self.residual.darken(table.path(best.key), &self.darkness);
        self.used.insert(best.key);
        let chord = Chord {
            from: self.current,
            to: best.pin,
        };
        self.chords.push(chord);
        self.current = best.pin;

        verboser.verbose(Message::Selected {
            step,
            from: chord.from,
            to: chord.to,
            weight: best.ink.weight::<S>().to_f64().unwrap_or(f64::NAN),
        });
        Ok(chord)
    }

    pub fn into_parts(self) -> (Vec<Chord>, Residual) {
        (self.chords, self.residual)
    }

    /// Scores every legal chord from the current pin against a frozen residual.
    fn best_candidate(&mut self) -> Option<Candidate> {
        let pin_count = self.circle.len();
        let ranges = batch_ranges(pin_count, self.buffers.len());
        for (buffer, range) in self.buffers.iter_mut().zip(ranges) {
            buffer.range = range;
        }

        let circle = self.circle;
        let table = self.table;
        let residual = &self.residual;
        let used = &self.used;
        let current = self.current;
        let min_angular_gap = self.min_angular_gap;

        self.buffers.par_iter_mut().for_each(|buffer| {
            buffer.result = None;
            for pin in buffer.range.clone() {
                if pin == current || circle.index_distance(current, pin) < min_angular_gap {
                    continue;
                }
                let key = PairKey::new(current, pin, pin_count);
                if used.contains(&key) {
                    continue;
                }
                let ink = line_ink(residual, table.path(key));
                if buffer.result.map_or(true, |best| ink > best.ink) {
                    buffer.result = Some(Candidate { pin, key, ink });
                }
            }
        });

        merge_batches(self.buffers.iter().map(|buffer| buffer.result))
    }
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    pin: usize,
    key: PairKey,
    ink: Ink,
}

struct BatchBuffer {
    range: Range<usize>,
    result: Option<Candidate>,
}

impl BatchBuffer {
    fn per_cpu() -> Vec<Self> {
        Self::batches(num_cpus::get())
    }

    fn batches(count: usize) -> Vec<Self> {
        (0..count.max(1))
            .map(|_| BatchBuffer {
                range: 0..0,
                result: None,
            })
            .collect()
    }
}

/// Splits `0..pin_count` into `batches` consecutive ranges, the last ones possibly empty.
fn batch_ranges(pin_count: usize, batches: usize) -> impl Iterator<Item = Range<usize>> {
    let chunk_size = pin_count.div_ceil(batches.max(1));
    (0..batches).map(move |index| {
        let start = (index * chunk_size).min(pin_count);
        start..(start + chunk_size).min(pin_count)
    })
}

/// Batches are ordered by pin index, so a later batch only wins on strictly more ink.
fn merge_batches(results: impl IntoIterator<Item = Option<Candidate>>) -> Option<Candidate> {
    results
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Candidate>, candidate| match best {
            Some(best) if candidate.ink <= best.ink => Some(best),
            _ => Some(candidate),
        })
}

/// Raised when every chord from the current pin is too short or already used.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no legal chord leaves pin {pin} at step {step}")]
pub struct NoCandidateError {
    pub step: usize,
    pub pin: usize,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    NoCandidate(#[from] NoCandidateError),
}
