use std::fmt::{Debug, Display};

use num_traits::ConstZero;

/// Scalar used to score chords. Implemented for `f32` and `f64`.
pub trait Float:
    'static + Debug + Display + Sync + Send + num_traits::Float + num_traits::NumCast + ConstZero
{
    const INFINITY: Self;
}

impl Float for f32 {
    const INFINITY: Self = f32::INFINITY;
}

impl Float for f64 {
    const INFINITY: Self = f64::INFINITY;
}
