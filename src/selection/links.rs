use std::collections::HashMap;

use log::warn;

use super::types::{ChainId, Link};

/// Normalised weight reported for every linked chain when all links carry the same count.
pub const DEGENERATE_NORMALIZED_WEIGHT: f64 = 0.5;

/// Read-only index over shared-validator counts between chain pairs.
#[derive(Clone, Debug, Default)]
pub struct LinkIndex {
	weights: HashMap<(ChainId, ChainId), u32>,
	bounds: Option<(u32, u32)>,
}

fn pair_key(a: &ChainId, b: &ChainId) -> (ChainId, ChainId) {
	if a <= b {
		(a.clone(), b.clone())
	} else {
		(b.clone(), a.clone())
	}
}

impl LinkIndex {
	pub fn new(links: impl IntoIterator<Item = Link>) -> Self {
		let mut weights = HashMap::new();
		for link in links {
			let key = pair_key(&link.chain_a, &link.chain_b);
			match weights.get(&key) {
				None => {
					weights.insert(key, link.shared_validators);
				}
				Some(&first) => warn!(
					"Link {} <-> {} listed twice ({} and {}), keeping the first count",
					link.chain_a, link.chain_b, first, link.shared_validators
				),
			}
		}
		let bounds = weights.values().fold(None, |acc: Option<(u32, u32)>, &w| {
			Some(acc.map_or((w, w), |(lo, hi)| (lo.min(w), hi.max(w))))
		});
		Self { weights, bounds }
	}

	/// Shared validators between two chains, in either order.
	pub fn weight_between(&self, a: &ChainId, b: &ChainId) -> Option<u32> {
		self.weights.get(&pair_key(a, b)).copied()
	}

	/// Smallest and largest shared-validator count; `None` without links.
	pub fn min_max_shared_validators(&self) -> Option<(u32, u32)> {
		self.bounds
	}

	/// Min-max scales `weight` into `[0, 1]` against the dataset bounds.
	///
	/// Returns [`DEGENERATE_NORMALIZED_WEIGHT`] when every link has the same count.
	pub fn normalize(&self, weight: u32) -> f64 {
		match self.bounds {
			Some((lo, hi)) if hi > lo => {
				((weight as f64 - lo as f64) / (hi as f64 - lo as f64)).clamp(0.0, 1.0)
			}
			_ => DEGENERATE_NORMALIZED_WEIGHT,
		}
	}

	pub fn links(&self) -> impl Iterator<Item = (&ChainId, &ChainId, u32)> {
		self.weights.iter().map(|((a, b), w)| (a, b, *w))
	}

	pub fn len(&self) -> usize {
		self.weights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.weights.is_empty()
	}
}
