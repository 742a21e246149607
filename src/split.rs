//! Deterministic train/test splitting
//!
//! Membership is decided by a seeded pseudo-random sample of row indices:
//! `round(n * fraction)` rows form the training set, the complement forms the
//! test set. The same seed and dataset ordering always produce the same
//! partition, which is what makes error metrics reproducible across runs. Both
//! subsets are returned in source row order.

use crate::frame::DataFrame;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Split a frame into disjoint train/test subsets
///
/// The fraction is the training share and must lie strictly in `(0, 1)`. An
/// empty frame splits into two empty frames.
///
/// # Errors
///
/// Returns [`Error::Config`] for a fraction outside `(0, 1)`, or any take
/// failure from the underlying frame.
pub fn train_test_split(
    frame: &DataFrame,
    fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(Error::Config(format!(
            "split fraction must lie in (0, 1), got {fraction}"
        )));
    }

    let num_rows = frame.num_rows();
    let mut indices: Vec<usize> = (0..num_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let train_len = ((num_rows as f64) * fraction).round() as usize;
    let train_len = train_len.min(num_rows);

    let (sampled, rest) = indices.split_at(train_len);
    let mut train_idx = sampled.to_vec();
    let mut test_idx = rest.to_vec();
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    Ok((frame.take(&train_idx)?, frame.take(&test_idx)?))
}
