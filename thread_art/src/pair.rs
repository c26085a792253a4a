/// Canonical key of an unordered pin pair, packed as `low * pin_count + high`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(u64);

impl PairKey {
    pub fn new(a: usize, b: usize, pin_count: usize) -> Self {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Self(low as u64 * pin_count as u64 + high as u64)
    }

    pub fn packed(self) -> u64 {
        self.0
    }

    /// The pair as `(low, high)`.
    pub fn pins(self, pin_count: usize) -> (usize, usize) {
        let pin_count = pin_count as u64;
        ((self.0 / pin_count) as usize, (self.0 % pin_count) as usize)
    }

    /// Dense index of the pair among all `pin_count * (pin_count - 1) / 2` distinct pairs.
    pub fn slot(self, pin_count: usize) -> usize {
        let (low, high) = self.pins(pin_count);
        triangular_slot(low, high)
    }
}

/// Slots enumerate pairs by `high` first, then `low`: `(0,1), (0,2), (1,2), (0,3), ...`.
pub(crate) fn triangular_slot(low: usize, high: usize) -> usize {
    high * (high - 1) / 2 + low
}

pub(crate) fn pair_count(pin_count: usize) -> usize {
    pin_count * pin_count.saturating_sub(1) / 2
}
