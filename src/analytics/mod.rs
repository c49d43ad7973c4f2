pub mod favorites;
pub mod listen_time;
pub mod loyalty;
pub mod night_owls;

use std::collections::HashMap;
use std::hash::Hash;

use rayon::prelude::*;

/// Count rows per key with partition-and-merge aggregation: each worker
/// folds its partition into a local map, then the locals are merged by key.
/// Counting is commutative and associative, so the result is independent of
/// partitioning and thread count.
pub(crate) fn par_count_by<T, K, F>(items: &[T], key: F) -> HashMap<K, u64>
where
    T: Sync,
    K: Eq + Hash + Send,
    F: Fn(&T) -> K + Sync,
{
    items
        .par_iter()
        .fold(HashMap::new, |mut acc: HashMap<K, u64>, item| {
            *acc.entry(key(item)).or_insert(0) += 1;
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (k, v) in right {
                *left.entry(k).or_insert(0) += v;
            }
            left
        })
}

/// Sum and count per key in one pass, for mean computations.
pub(crate) fn par_sum_count_by<T, K, F, V>(items: &[T], extract: F) -> HashMap<K, (f64, u64)>
where
    T: Sync,
    K: Eq + Hash + Send,
    F: Fn(&T) -> (K, V) + Sync,
    V: Into<f64>,
{
    items
        .par_iter()
        .fold(HashMap::new, |mut acc: HashMap<K, (f64, u64)>, item| {
            let (k, v) = extract(item);
            let entry = acc.entry(k).or_insert((0.0, 0));
            entry.0 += v.into();
            entry.1 += 1;
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (k, (sum, count)) in right {
                let entry = left.entry(k).or_insert((0.0, 0));
                entry.0 += sum;
                entry.1 += count;
            }
            left
        })
}
