use rand::Rng;

/// Largest table that still fits a `u64`. Classes past this carry less than 2^-63 of the mass.
pub const MAX_CLASSES: usize = 63;

/// Builds the cumulative threshold table for `classes` magnitude classes.
///
/// The first threshold is `2^(m-1)` and each following one adds half of the previous increment,
/// so the table ends at `2^m - 1` and class `k` owns `2^(m-k)` of the draws.
///
/// ```
/// use MELODY_BREEDER::scaled_thresholds;
/// assert_eq!(scaled_thresholds(4), vec![8, 12, 14, 15]);
/// assert_eq!(scaled_thresholds(5), vec![16, 24, 28, 30, 31]);
/// ```
pub fn scaled_thresholds(classes: usize) -> Vec<u64> {
    assert!(classes > 0, "scaled_thresholds: need at least one class");
    let classes = classes.min(MAX_CLASSES);

    let mut increment = 1u64 << (classes - 1);
    let mut total = 0u64;
    let mut thresholds = Vec::with_capacity(classes);

    for _ in 0..classes {
        total += increment;
        thresholds.push(total);
        increment >>= 1;
    }

    thresholds
}

/// Draws a magnitude in `1..=m` where every step up is half as likely as the one before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedMagnitudeSelector {
    thresholds: Vec<u64>,
}

impl WeightedMagnitudeSelector {
    pub fn new(classes: usize) -> Self {
        Self {
            thresholds: scaled_thresholds(classes),
        }
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    pub fn classes(&self) -> usize {
        self.thresholds.len()
    }

    pub fn draw(&self, rng: &mut impl Rng) -> usize {
        let ceiling = self.thresholds[self.thresholds.len() - 1];
        let roll = rng.random_range(1..=ceiling);
        self.class_for(roll)
    }

    /// Maps a roll in `1..=T[m]` to the smallest class whose threshold covers it.
    fn class_for(&self, roll: u64) -> usize {
        self.thresholds.partition_point(|&threshold| threshold < roll) + 1
    }
}
