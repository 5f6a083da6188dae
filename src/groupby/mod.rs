use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Rows grouped by key, in order of first appearance
///
/// Keeps row positions rather than copies so that per-group results can be
/// scattered back onto the original rows (see [`GroupBy::transform`]).
#[derive(Debug)]
pub struct GroupBy<'a, K>
where
    K: Debug + Eq + Hash + Clone,
{
    /// Group keys with their row positions, in first-appearance order
    groups: Vec<(K, Vec<usize>)>,

    /// Key -> position in `groups`
    lookup: HashMap<K, usize>,

    /// Values being grouped
    source: &'a [f64],
}

impl<'a, K> GroupBy<'a, K>
where
    K: Debug + Eq + Hash + Clone,
{
    /// Group `source` by the parallel `keys`
    pub fn new(keys: Vec<K>, source: &'a [f64]) -> Result<Self> {
        if keys.len() != source.len() {
            return Err(Error::MalformedInput(format!(
                "key length ({}) does not match value length ({})",
                keys.len(),
                source.len()
            )));
        }

        let mut groups: Vec<(K, Vec<usize>)> = Vec::new();
        let mut lookup: HashMap<K, usize> = HashMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            match lookup.get(&key) {
                Some(&slot) => groups[slot].1.push(i),
                None => {
                    lookup.insert(key.clone(), groups.len());
                    groups.push((key, vec![i]));
                }
            }
        }

        Ok(GroupBy {
            groups,
            lookup,
            source,
        })
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Keys in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Row positions belonging to `key`
    pub fn indices(&self, key: &K) -> Option<&[usize]> {
        self.lookup
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Size of each group
    pub fn size(&self) -> Vec<(K, usize)> {
        self.groups
            .iter()
            .map(|(k, indices)| (k.clone(), indices.len()))
            .collect()
    }

    /// Minimum and maximum of each group
    pub fn min_max(&self) -> Vec<(K, f64, f64)> {
        self.groups
            .iter()
            .map(|(k, indices)| {
                let (min, max) = indices.iter().map(|&i| self.source[i]).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), v| (lo.min(v), hi.max(v)),
                );
                (k.clone(), min, max)
            })
            .collect()
    }

    /// Apply `f` to each group's values and place the results back on the
    /// original row positions
    ///
    /// `f` receives the group values in row order and must return one value
    /// per input; extra outputs are ignored and missing outputs leave the row
    /// at `0.0`.
    pub fn transform<F>(&self, mut f: F) -> Vec<f64>
    where
        F: FnMut(&K, &[f64]) -> Vec<f64>,
    {
        let mut out = vec![0.0; self.source.len()];
        for (key, indices) in &self.groups {
            let values: Vec<f64> = indices.iter().map(|&i| self.source[i]).collect();
            for (&row, value) in indices.iter().zip(f(key, &values)) {
                out[row] = value;
            }
        }
        out
    }
}
