use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::DataError;
use crate::selection::{
	Chain, ChainId, ChainResults, Link, ProposalKey, ValidatorId, ValidatorResult, VoteValue,
};

#[derive(Debug, Deserialize)]
struct ChainRecord {
	chain: String,
	#[serde(default)]
	radius: f64,
	#[serde(default)]
	validator_num: u32,
	#[serde(default)]
	proposal_num: u32,
	#[serde(default)]
	cluster_num: u32,
	#[serde(default)]
	similar_chains: Vec<String>,
	#[serde(default)]
	validators: Vec<String>,
	#[serde(rename = "x-axis", default)]
	x_axis: f64,
	#[serde(rename = "y-axis", default)]
	y_axis: f64,
	#[serde(default)]
	proposal: BTreeMap<String, f64>,
	#[serde(default)]
	proportion: BTreeMap<String, f64>,
}

impl From<ChainRecord> for Chain {
	fn from(record: ChainRecord) -> Self {
		Chain {
			id: record.chain.into(),
			radius: record.radius,
			validator_count: record.validator_num,
			proposal_count: record.proposal_num,
			cluster_count: record.cluster_num,
			similar_chains: record.similar_chains.into_iter().map(ChainId::from).collect(),
			validators: record.validators.into_iter().map(ValidatorId::from).collect(),
			position: (record.x_axis, record.y_axis),
			proposal: record.proposal,
			proportion: record.proportion,
		}
	}
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
	chain1: String,
	chain2: String,
	shared_validators: u32,
}

#[derive(Debug, Deserialize)]
struct ValidatorRecord {
	voter: String,
	#[serde(default)]
	cluster_label: Option<i64>,
	#[serde(default)]
	overall_match_rate: Option<f64>,
	#[serde(default)]
	cluster_match_rate: Option<f64>,
	#[serde(default)]
	participation_rate: Option<f64>,
	#[serde(default)]
	tsne_x: Option<f64>,
	#[serde(default)]
	tsne_y: Option<f64>,
	#[serde(rename = "votingPower", default)]
	voting_power: Option<f64>,
	/// Pairwise match rates (numbers keyed by voter) and votes (strings keyed by proposal).
	#[serde(flatten)]
	extra: BTreeMap<String, Value>,
}

impl From<ValidatorRecord> for ValidatorResult {
	fn from(record: ValidatorRecord) -> Self {
		let mut pairwise = HashMap::new();
		let mut votes = BTreeMap::new();
		for (key, value) in record.extra {
			match value {
				Value::Number(rate) => {
					if let Some(rate) = rate.as_f64() {
						pairwise.insert(ValidatorId::from(key), rate);
					}
				}
				Value::String(_) => {
					let Some(proposal) = ProposalKey::parse(&key) else {
						continue;
					};
					if let Ok(vote) = serde_json::from_value::<VoteValue>(value) {
						votes.insert(proposal, vote);
					}
				}
				_ => {}
			}
		}

		ValidatorResult {
			voter: record.voter.into(),
			cluster_label: record.cluster_label,
			overall_match_rate: record.overall_match_rate.unwrap_or(0.0),
			cluster_match_rate: record.cluster_match_rate.unwrap_or(0.0),
			participation_rate: record.participation_rate.unwrap_or(0.0),
			pairwise,
			votes,
			tsne: record.tsne_x.zip(record.tsne_y),
			voting_power: record.voting_power,
		}
	}
}

/// Friendly and opposing clusters of one cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ClusterRelation {
	#[serde(default)]
	pub friendly: Vec<String>,
	#[serde(default)]
	pub opposition: Vec<String>,
}

/// Cluster relationships per chain, keyed by cluster label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ClusterRelationMap(HashMap<ChainId, HashMap<String, ClusterRelation>>);

impl ClusterRelationMap {
	pub fn relation(&self, chain: &ChainId, cluster_label: i64) -> Option<&ClusterRelation> {
		self.0.get(chain)?.get(&cluster_label.to_string())
	}
}

fn decode<T: DeserializeOwned>(url: &str, json: &str) -> Result<T, DataError> {
	serde_json::from_str(json).map_err(|err| DataError::Decode {
		url: url.to_owned(),
		message: err.to_string(),
	})
}

/// Decodes the chain metadata list.
pub fn parse_chains(url: &str, json: &str) -> Result<Vec<Chain>, DataError> {
	let records: Vec<ChainRecord> = decode(url, json)?;
	Ok(records.into_iter().map(Chain::from).collect())
}

/// Decodes the chain link list, skipping self-links.
pub fn parse_links(url: &str, json: &str) -> Result<Vec<Link>, DataError> {
	let records: Vec<LinkRecord> = decode(url, json)?;
	Ok(records
		.into_iter()
		.filter(|r| {
			let distinct = r.chain1 != r.chain2;
			if !distinct {
				warn!("Skipping self-link on {}", r.chain1);
			}
			distinct
		})
		.map(|r| Link {
			chain_a: r.chain1.into(),
			chain_b: r.chain2.into(),
			shared_validators: r.shared_validators,
		})
		.collect())
}

/// Decodes one chain's validator result list.
pub fn parse_validator_results(
	chain: &ChainId,
	url: &str,
	json: &str,
) -> Result<ChainResults, DataError> {
	let records: Vec<ValidatorRecord> = decode(url, json)?;
	Ok(ChainResults::new(
		chain.clone(),
		records.into_iter().map(ValidatorResult::from),
	))
}

pub fn parse_cluster_relations(url: &str, json: &str) -> Result<ClusterRelationMap, DataError> {
	decode(url, json)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chain_records_map_dataset_fields() {
		let json = r#"[{
			"chain": "akash",
			"radius": 0.42,
			"validator_num": 3,
			"proposal_num": 120,
			"cluster_num": 4,
			"similar_chains": ["osmosis"],
			"validators": ["v1", "v2", "v3"],
			"x-axis": 2.5,
			"y-axis": 7.0,
			"proposal": {"akash_1": 0.5},
			"proportion": {"cluster_0": 0.25, "cluster_1": 0.75}
		}]"#;
		let chains = parse_chains("chain_data.json", json).unwrap();
		assert_eq!(chains.len(), 1);
		let akash = &chains[0];
		assert_eq!(akash.id.as_str(), "akash");
		assert_eq!(akash.proposal_count, 120);
		assert_eq!(akash.similar_chains, [ChainId::from("osmosis")]);
		assert!(akash.validators.contains(&ValidatorId::from("v2")));
		assert_eq!(akash.position, (2.5, 7.0));
		assert_eq!(akash.proportion.get("cluster_1"), Some(&0.75));
	}

	#[test]
	fn self_links_are_dropped() {
		let json = r#"[
			{"chain1": "akash", "chain2": "osmosis", "shared_validators": 80},
			{"chain1": "akash", "chain2": "akash", "shared_validators": 3}
		]"#;
		let links = parse_links("chain_links.json", json).unwrap();
		assert_eq!(links.len(), 1);
		assert_eq!(links[0].shared_validators, 80);
	}

	#[test]
	fn validator_records_split_pairwise_rates_and_votes() {
		let json = r#"[{
			"voter": "v1",
			"cluster_label": 3,
			"overall_match_rate": 0.8,
			"cluster_match_rate": 0.9,
			"participation_rate": 0.95,
			"tsne_x": 1.5,
			"tsne_y": -2.0,
			"votingPower": 0.012,
			"v2": 0.42,
			"akash_14": "YES",
			"akash_15": "NO_WITH_VETO",
			"akash_16": null,
			"note": "something else"
		}]"#;
		let results = parse_validator_results(&"akash".into(), "r.json", json).unwrap();
		let v1 = results.get(&"v1".into()).unwrap();
		assert_eq!(v1.cluster_label, Some(3));
		assert_eq!(v1.match_rate_with(&"v2".into()), 0.42);
		assert_eq!(v1.pairwise.len(), 1);
		assert_eq!(v1.votes.len(), 2);
		assert_eq!(
			v1.votes.get(&ProposalKey::parse("akash_15").unwrap()),
			Some(&VoteValue::NoWithVeto)
		);
		assert_eq!(v1.tsne, Some((1.5, -2.0)));
		assert_eq!(v1.voting_power, Some(0.012));
	}

	#[test]
	fn malformed_json_reports_the_url() {
		let err = parse_links("chain_links.json", "{").unwrap_err();
		assert!(matches!(err, DataError::Decode { ref url, .. } if url == "chain_links.json"));
	}

	#[test]
	fn cluster_relations_lookup_by_label() {
		let json = r#"{"akash": {"2": {"friendly": ["1", "4"], "opposition": ["0"]}}}"#;
		let relations = parse_cluster_relations("c.json", json).unwrap();
		let rel = relations.relation(&"akash".into(), 2).unwrap();
		assert_eq!(rel.friendly, ["1", "4"]);
		assert_eq!(rel.opposition, ["0"]);
		assert_eq!(relations.relation(&"akash".into(), 3), None);
		assert_eq!(relations.relation(&"osmosis".into(), 2), None);
	}
}
