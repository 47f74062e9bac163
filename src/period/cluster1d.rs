//! One-dimensional clustering of candidate tile sizes.
//!
//! Clusterers receive the raw values and a distance threshold and return
//! groups of indices into the input. Every index appears in exactly one group.
//! Groups are ordered by ascending value, and indices inside a group are sorted
//! by value.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Groups scalar values that lie within `max_distance` of each other.
pub trait Cluster1d {
    fn cluster(&self, values: &[f64], max_distance: f64) -> Vec<Vec<usize>>;
}

/// Available clusterers, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClusterMethod {
    /// Hierarchical single linkage cut at the distance threshold.
    #[default]
    SingleLinkage,
    /// Running-mean merge: a value joins the current group when it lies within
    /// the threshold of the group mean.
    GreedyMerge,
}

impl ClusterMethod {
    pub fn clusterer(self) -> &'static dyn Cluster1d {
        match self {
            ClusterMethod::SingleLinkage => &SingleLinkage,
            ClusterMethod::GreedyMerge => &GreedyMerge,
        }
    }
}

/// Single-linkage clustering.
///
/// In one dimension the dendrogram cut reduces to sorting and splitting
/// wherever two neighbours are further apart than the threshold.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleLinkage;

/// Greedy merge against the running group mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyMerge;

fn sorted_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

impl Cluster1d for SingleLinkage {
    fn cluster(&self, values: &[f64], max_distance: f64) -> Vec<Vec<usize>> {
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut cur: Vec<usize> = Vec::new();
        let mut last = f64::NAN;
        for idx in sorted_order(values) {
            let v = values[idx];
            if !cur.is_empty() && (v - last).abs() > max_distance {
                clusters.push(std::mem::take(&mut cur));
            }
            cur.push(idx);
            last = v;
        }
        if !cur.is_empty() {
            clusters.push(cur);
        }
        clusters
    }
}

impl Cluster1d for GreedyMerge {
    fn cluster(&self, values: &[f64], max_distance: f64) -> Vec<Vec<usize>> {
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut cur: Vec<usize> = Vec::new();
        let mut sum = 0.0;
        for idx in sorted_order(values) {
            let v = values[idx];
            if !cur.is_empty() && (v - sum / cur.len() as f64).abs() > max_distance {
                clusters.push(std::mem::take(&mut cur));
                sum = 0.0;
            }
            cur.push(idx);
            sum += v;
        }
        if !cur.is_empty() {
            clusters.push(cur);
        }
        clusters
    }
}
