use std::collections::{BTreeMap, HashMap};

use log::warn;

use super::types::{ChainId, ProposalKey, ValidatorId, VoteValue};

/// One validator's governance summary within a chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatorResult {
	pub voter: ValidatorId,
	pub cluster_label: Option<i64>,
	pub overall_match_rate: f64,
	pub cluster_match_rate: f64,
	pub participation_rate: f64,
	/// Agreement with other voters of the same chain, keyed by their id.
	pub pairwise: HashMap<ValidatorId, f64>,
	pub votes: BTreeMap<ProposalKey, VoteValue>,
	pub tsne: Option<(f64, f64)>,
	pub voting_power: Option<f64>,
}

impl ValidatorResult {
	/// Agreement with `other`, `0` when the dataset has no entry.
	pub fn match_rate_with(&self, other: &ValidatorId) -> f64 {
		self.pairwise.get(other).copied().unwrap_or(0.0)
	}
}

/// Validator results of a single chain, indexed by voter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainResults {
	chain: ChainId,
	records: Vec<ValidatorResult>,
	by_voter: HashMap<ValidatorId, usize>,
}

impl ChainResults {
	/// Keeps the first record of each voter.
	pub fn new(chain: ChainId, records: impl IntoIterator<Item = ValidatorResult>) -> Self {
		let mut results = Self {
			chain,
			..Self::default()
		};
		for record in records {
			if results.by_voter.contains_key(&record.voter) {
				warn!(
					"Duplicate results for {} on {}, keeping the first",
					record.voter, results.chain
				);
				continue;
			}
			results
				.by_voter
				.insert(record.voter.clone(), results.records.len());
			results.records.push(record);
		}
		results
	}

	pub fn chain(&self) -> &ChainId {
		&self.chain
	}

	pub fn get(&self, voter: &ValidatorId) -> Option<&ValidatorResult> {
		self.by_voter.get(voter).map(|&i| &self.records[i])
	}

	pub fn records(&self) -> &[ValidatorResult] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(voter: &str, participation_rate: f64) -> ValidatorResult {
		ValidatorResult {
			voter: voter.into(),
			participation_rate,
			..ValidatorResult::default()
		}
	}

	#[test]
	fn duplicate_voters_keep_the_first_record() {
		let results = ChainResults::new(
			"akash".into(),
			[record("v1", 0.9), record("v2", 0.5), record("v1", 0.1)],
		);
		assert_eq!(results.len(), 2);
		assert_eq!(results.get(&"v1".into()).map(|r| r.participation_rate), Some(0.9));
		let voters: Vec<&str> = results.records().iter().map(|r| r.voter.as_str()).collect();
		assert_eq!(voters, ["v1", "v2"]);
	}
}
