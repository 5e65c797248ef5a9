use std::collections::{BTreeSet, HashMap};

use log::warn;

use super::types::{Chain, ChainId, ValidatorId};

/// Read-only membership index over the chain dataset.
#[derive(Clone, Debug, Default)]
pub struct MetadataIndex {
	chains: HashMap<ChainId, Chain>,
	order: Vec<ChainId>,
	by_validator: HashMap<ValidatorId, BTreeSet<ChainId>>,
}

impl MetadataIndex {
	/// Builds the index. Later duplicates of a chain id are dropped.
	pub fn new(chains: impl IntoIterator<Item = Chain>) -> Self {
		let mut index = Self::default();
		for chain in chains {
			if index.chains.contains_key(&chain.id) {
				warn!("Skipping duplicate chain record {}", chain.id);
				continue;
			}
			for validator in &chain.validators {
				index
					.by_validator
					.entry(validator.clone())
					.or_default()
					.insert(chain.id.clone());
			}
			index.order.push(chain.id.clone());
			index.chains.insert(chain.id.clone(), chain);
		}
		index
	}

	pub fn metadata_of(&self, chain: &ChainId) -> Option<&Chain> {
		self.chains.get(chain)
	}

	/// Chains in dataset order.
	pub fn chains(&self) -> impl Iterator<Item = &Chain> {
		self.order.iter().filter_map(|id| self.chains.get(id))
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Whether any chain lists this validator.
	pub fn knows_validator(&self, validator: &ValidatorId) -> bool {
		self.by_validator.contains_key(validator)
	}

	/// Chains whose validator set is a superset of `validators`.
	///
	/// An empty input yields an empty set, never every chain.
	pub fn chains_containing_all<'a, I>(&self, validators: I) -> BTreeSet<ChainId>
	where
		I: IntoIterator<Item = &'a ValidatorId>,
	{
		let mut result: Option<BTreeSet<ChainId>> = None;
		for validator in validators {
			let Some(chains) = self.by_validator.get(validator) else {
				return BTreeSet::new();
			};
			result = Some(match result {
				None => chains.clone(),
				Some(acc) => acc.intersection(chains).cloned().collect(),
			});
			if result.as_ref().is_some_and(BTreeSet::is_empty) {
				break;
			}
		}
		result.unwrap_or_default()
	}

	/// Chains listing at least one of `validators`.
	pub fn chains_containing_any<'a, I>(&self, validators: I) -> BTreeSet<ChainId>
	where
		I: IntoIterator<Item = &'a ValidatorId>,
	{
		validators
			.into_iter()
			.filter_map(|v| self.by_validator.get(v))
			.flatten()
			.cloned()
			.collect()
	}

	/// Whether `chain` lists every one of `validators`.
	///
	/// An unknown chain behaves like a chain with no validators, so only the
	/// empty set is contained in it.
	pub fn contains_all<'a, I>(&self, chain: &ChainId, validators: I) -> bool
	where
		I: IntoIterator<Item = &'a ValidatorId>,
	{
		let members = self.chains.get(chain).map(|c| &c.validators);
		validators
			.into_iter()
			.all(|v| members.is_some_and(|m| m.contains(v)))
	}
}
