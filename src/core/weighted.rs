//! Weighted random selection over borrowed slices.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

/// Pick an index into `items` with probability proportional to `weight`.
///
/// Returns `None` for an empty slice or when no weight is positive.
pub fn choose_weighted_index<T, R>(
    items: &[T],
    weight: impl Fn(&T) -> f64,
    rng: &mut R,
) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    let weights: Vec<f64> = items.iter().map(weight).collect();
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(dist.sample(rng))
}

/// Pick an item from `items` with probability proportional to `weight`.
pub fn choose_weighted<'a, T, R>(
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    choose_weighted_index(items, weight, rng).map(|i| &items[i])
}
