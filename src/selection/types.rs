use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a chain, e.g. `"osmosis"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

/// Address or moniker of a governance voter.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorId(String);

macro_rules! string_id {
	($name:ident) => {
		impl $name {
			/// Wraps a raw identifier.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_owned())
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}

		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
	};
}

string_id!(ChainId);
string_id!(ValidatorId);

/// Static description of one chain. Loaded once and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
	pub id: ChainId,
	/// Opinion-tolerance metric.
	pub radius: f64,
	pub validator_count: u32,
	pub proposal_count: u32,
	pub cluster_count: u32,
	pub similar_chains: Vec<ChainId>,
	pub validators: BTreeSet<ValidatorId>,
	/// Seed position on the overview map, in dataset units (0..10).
	pub position: (f64, f64),
	pub proposal: BTreeMap<String, f64>,
	/// Share of validators per cluster key (`cluster_0`, `cluster_1`, ...).
	pub proportion: BTreeMap<String, f64>,
}

impl Chain {
	/// A chain with no metadata beyond its validator set.
	pub fn with_validators<I, V>(id: impl Into<ChainId>, validators: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<ValidatorId>,
	{
		let validators: BTreeSet<ValidatorId> = validators.into_iter().map(Into::into).collect();
		Self {
			id: id.into(),
			radius: 0.0,
			validator_count: validators.len() as u32,
			proposal_count: 0,
			cluster_count: 0,
			similar_chains: Vec::new(),
			validators,
			position: (0.0, 0.0),
			proposal: BTreeMap::new(),
			proportion: BTreeMap::new(),
		}
	}
}

/// Unordered chain pair weighted by the number of validators both chains share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
	pub chain_a: ChainId,
	pub chain_b: ChainId,
	pub shared_validators: u32,
}

/// A single proposal, identified by the chain it was raised on and its on-chain number.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalKey {
	pub chain: ChainId,
	pub proposal: u64,
}

impl ProposalKey {
	/// Parses keys shaped like `cosmoshub_85` or `osmosis85`.
	pub fn parse(key: &str) -> Option<Self> {
		let digits_at = key
			.char_indices()
			.rev()
			.take_while(|(_, c)| c.is_ascii_digit())
			.last()
			.map(|(i, _)| i)?;
		let (prefix, digits) = key.split_at(digits_at);
		let chain = prefix.strip_suffix('_').unwrap_or(prefix);
		if chain.is_empty() || !chain.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
			return None;
		}
		let proposal = digits.parse().ok()?;
		Some(Self {
			chain: ChainId::new(chain),
			proposal,
		})
	}
}

impl fmt::Display for ProposalKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}_{}", self.chain, self.proposal)
	}
}

/// How a validator voted on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteValue {
	Yes,
	No,
	NoWithVeto,
	Abstain,
	NoVote,
}
