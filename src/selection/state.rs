use std::collections::BTreeSet;

use log::debug;

use super::metadata::MetadataIndex;
use super::types::{ChainId, ValidatorId};

/// Current cross-filter selection shared by every view.
///
/// Fields are private so a state can only come out of a transition, which always
/// builds a complete value through [`SelectionState::compose`]. That keeps the
/// derived `highlighted_chains` and the membership rules in step with the
/// selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
	selected_chain: Option<ChainId>,
	selected_validators: Vec<ValidatorId>,
	base_validator: Option<ValidatorId>,
	highlighted_chains: BTreeSet<ChainId>,
	single_select_mode: bool,
}

impl SelectionState {
	pub fn selected_chain(&self) -> Option<&ChainId> {
		self.selected_chain.as_ref()
	}

	/// Selected validators in the order they were picked.
	pub fn selected_validators(&self) -> &[ValidatorId] {
		&self.selected_validators
	}

	pub fn base_validator(&self) -> Option<&ValidatorId> {
		self.base_validator.as_ref()
	}

	/// Chains listing every selected validator. Empty while nothing is selected.
	pub fn highlighted_chains(&self) -> &BTreeSet<ChainId> {
		&self.highlighted_chains
	}

	pub fn single_select_mode(&self) -> bool {
		self.single_select_mode
	}

	pub fn is_validator_selected(&self, validator: &ValidatorId) -> bool {
		self.selected_validators.contains(validator)
	}

	/// Builds a full state, re-deriving everything that depends on the selection.
	///
	/// Duplicates are dropped keeping the first occurrence. If a chain is selected
	/// and the validators are not all members of it, the validator selection is
	/// cleared. Single-select mode keeps only the base (or first) validator. The
	/// base falls back to the first validator when it is not part of the selection.
	fn compose(
		index: &MetadataIndex,
		selected_chain: Option<ChainId>,
		validators: Vec<ValidatorId>,
		base_validator: Option<ValidatorId>,
		single_select_mode: bool,
	) -> Self {
		let mut selected_validators: Vec<ValidatorId> = Vec::with_capacity(validators.len());
		for validator in validators {
			if !selected_validators.contains(&validator) {
				selected_validators.push(validator);
			}
		}

		if let Some(chain) = &selected_chain {
			if !index.contains_all(chain, &selected_validators) {
				debug!("Validator selection is not contained in {chain}, clearing it");
				selected_validators.clear();
			}
		}

		let mut base_validator = base_validator.filter(|b| selected_validators.contains(b));

		if single_select_mode && selected_validators.len() > 1 {
			let keep = base_validator
				.clone()
				.unwrap_or_else(|| selected_validators[0].clone());
			selected_validators = vec![keep];
		}

		if base_validator.is_none() {
			base_validator = selected_validators.first().cloned();
		}

		let highlighted_chains = index.chains_containing_all(&selected_validators);

		Self {
			selected_chain,
			selected_validators,
			base_validator,
			highlighted_chains,
			single_select_mode,
		}
	}

	/// Selects `chain`, or clears everything when it is already selected.
	///
	/// The validator selection survives only if the new chain lists all of it.
	/// An unknown chain counts as a chain without validators.
	pub fn select_chain(&self, index: &MetadataIndex, chain: &ChainId) -> Self {
		if self.selected_chain.as_ref() == Some(chain) {
			return Self::default();
		}

		if index.contains_all(chain, &self.selected_validators) {
			Self::compose(
				index,
				Some(chain.clone()),
				self.selected_validators.clone(),
				self.base_validator.clone(),
				self.single_select_mode,
			)
		} else {
			Self::compose(index, Some(chain.clone()), Vec::new(), None, false)
		}
	}

	/// Replaces the validator selection.
	///
	/// An id that no chain lists makes the whole call a no-op.
	pub fn select_validators(&self, index: &MetadataIndex, validators: &[ValidatorId]) -> Self {
		if let Some(unknown) = validators.iter().find(|v| !index.knows_validator(v)) {
			debug!("Ignoring selection containing unknown validator {unknown}");
			return self.clone();
		}

		Self::compose(
			index,
			self.selected_chain.clone(),
			validators.to_vec(),
			self.base_validator.clone(),
			self.single_select_mode,
		)
	}

	/// Adds or removes one validator.
	///
	/// In single-select mode adding replaces the selection and removing the sole
	/// validator empties it.
	pub fn toggle_validator(&self, index: &MetadataIndex, validator: &ValidatorId) -> Self {
		let mut validators = self.selected_validators.clone();
		let mut base = self.base_validator.clone();

		if let Some(at) = validators.iter().position(|v| v == validator) {
			validators.remove(at);
			if base.as_ref() == Some(validator) {
				base = validators.first().cloned();
			}
		} else {
			if !index.knows_validator(validator) {
				debug!("Ignoring toggle of unknown validator {validator}");
				return self.clone();
			}
			if self.single_select_mode {
				validators = vec![validator.clone()];
				base = Some(validator.clone());
			} else {
				validators.push(validator.clone());
				if base.is_none() {
					base = Some(validator.clone());
				}
			}
		}

		Self::compose(
			index,
			self.selected_chain.clone(),
			validators,
			base,
			self.single_select_mode,
		)
	}

	/// Re-pivots the comparison on `validator` if it is selected; otherwise a no-op.
	pub fn set_base_validator(&self, validator: &ValidatorId) -> Self {
		if !self.selected_validators.contains(validator) {
			return self.clone();
		}
		Self {
			base_validator: Some(validator.clone()),
			..self.clone()
		}
	}

	/// Switches single-select mode. Enabling collapses a multi-selection to its base.
	pub fn set_single_select_mode(&self, index: &MetadataIndex, enabled: bool) -> Self {
		Self::compose(
			index,
			self.selected_chain.clone(),
			self.selected_validators.clone(),
			self.base_validator.clone(),
			enabled,
		)
	}

	/// Clears the validator selection, keeping the chain and the mode.
	pub fn reset(&self) -> Self {
		Self {
			selected_chain: self.selected_chain.clone(),
			single_select_mode: self.single_select_mode,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::selection::types::Chain;

	fn index() -> MetadataIndex {
		MetadataIndex::new([
			Chain::with_validators("akash", ["v1", "v2", "v3"]),
			Chain::with_validators("osmosis", ["v2", "v3", "v4"]),
			Chain::with_validators("juno", ["v2", "v3", "v5"]),
		])
	}

	fn ids(raw: &[&str]) -> Vec<ValidatorId> {
		raw.iter().map(|v| ValidatorId::from(*v)).collect()
	}

	#[test]
	fn selecting_the_same_chain_twice_clears_everything() {
		let index = index();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.select_validators(&index, &ids(&["v2"]))
			.set_single_select_mode(&index, true);
		assert_eq!(state.select_chain(&index, &"akash".into()), SelectionState::default());
	}

	#[test]
	fn switching_chain_keeps_contained_validators() {
		let index = index();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.select_validators(&index, &ids(&["v3", "v2"]))
			.select_chain(&index, &"osmosis".into());
		assert_eq!(state.selected_chain(), Some(&"osmosis".into()));
		assert_eq!(state.selected_validators(), ids(&["v3", "v2"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v3".into()));
		assert_eq!(state.highlighted_chains().len(), 3);
	}

	#[test]
	fn switching_chain_clears_foreign_validators_and_mode() {
		let index = index();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.set_single_select_mode(&index, true)
			.toggle_validator(&index, &"v1".into())
			.select_chain(&index, &"osmosis".into());
		assert!(state.selected_validators().is_empty());
		assert_eq!(state.base_validator(), None);
		assert!(state.highlighted_chains().is_empty());
		assert!(!state.single_select_mode());
	}

	#[test]
	fn unknown_chain_clears_validators() {
		let index = index();
		let state = SelectionState::default()
			.select_validators(&index, &ids(&["v2"]))
			.select_chain(&index, &"cosmoshub".into());
		assert_eq!(state.selected_chain(), Some(&"cosmoshub".into()));
		assert!(state.selected_validators().is_empty());
	}

	#[test]
	fn unknown_chain_keeps_single_select_mode_without_validators() {
		let index = index();
		let state = SelectionState::default()
			.set_single_select_mode(&index, true)
			.select_chain(&index, &"cosmoshub".into());
		assert_eq!(state.selected_chain(), Some(&"cosmoshub".into()));
		assert!(state.selected_validators().is_empty());
		assert!(state.single_select_mode());
	}

	#[test]
	fn select_validators_deduplicates_and_keeps_base() {
		let index = index();
		let state = SelectionState::default()
			.select_validators(&index, &ids(&["v2", "v3", "v2"]))
			.set_base_validator(&"v3".into())
			.select_validators(&index, &ids(&["v2", "v5", "v3"]));
		assert_eq!(state.selected_validators(), ids(&["v2", "v5", "v3"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v3".into()));
		assert_eq!(
			state.highlighted_chains().iter().collect::<Vec<_>>(),
			[&ChainId::from("juno")]
		);
	}

	#[test]
	fn select_validators_with_unknown_id_is_a_no_op() {
		let index = index();
		let state = SelectionState::default().select_validators(&index, &ids(&["v1"]));
		assert_eq!(state.select_validators(&index, &ids(&["v2", "ghost"])), state);
	}

	#[test]
	fn select_validators_outside_selected_chain_clears_selection() {
		let index = index();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.select_validators(&index, &ids(&["v1"]))
			.select_validators(&index, &ids(&["v1", "v4"]));
		assert_eq!(state.selected_chain(), Some(&"akash".into()));
		assert!(state.selected_validators().is_empty());
		assert_eq!(state.base_validator(), None);
	}

	#[test]
	fn toggling_appends_and_removes() {
		let index = index();
		let state = SelectionState::default()
			.toggle_validator(&index, &"v2".into())
			.toggle_validator(&index, &"v3".into());
		assert_eq!(state.selected_validators(), ids(&["v2", "v3"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v2".into()));

		let state = state.toggle_validator(&index, &"v3".into());
		assert_eq!(state.selected_validators(), ids(&["v2"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v2".into()));

		let state = state.toggle_validator(&index, &"v2".into());
		assert_eq!(state, SelectionState::default());
	}

	#[test]
	fn toggling_unknown_validator_is_a_no_op() {
		let index = index();
		let state = SelectionState::default().toggle_validator(&index, &"v2".into());
		assert_eq!(state.toggle_validator(&index, &"ghost".into()), state);
	}

	#[test]
	fn single_select_toggle_replaces_then_clears() {
		let index = index();
		let state = SelectionState::default()
			.set_single_select_mode(&index, true)
			.toggle_validator(&index, &"v2".into())
			.toggle_validator(&index, &"v3".into());
		assert_eq!(state.selected_validators(), ids(&["v3"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v3".into()));

		let state = state.toggle_validator(&index, &"v3".into());
		assert!(state.selected_validators().is_empty());
		assert!(state.single_select_mode());
	}

	#[test]
	fn enabling_single_select_collapses_to_base() {
		let index = index();
		let state = SelectionState::default()
			.select_validators(&index, &ids(&["v2", "v3", "v5"]))
			.set_base_validator(&"v5".into())
			.set_single_select_mode(&index, true);
		assert_eq!(state.selected_validators(), ids(&["v5"]).as_slice());
		assert_eq!(state.base_validator(), Some(&"v5".into()));
		assert_eq!(
			state.highlighted_chains().iter().collect::<Vec<_>>(),
			[&ChainId::from("juno")]
		);

		let relaxed = state.set_single_select_mode(&index, false);
		assert_eq!(relaxed.selected_validators(), state.selected_validators());
		assert!(!relaxed.single_select_mode());
	}

	#[test]
	fn single_select_caps_bulk_selection() {
		let index = index();
		let state = SelectionState::default()
			.set_single_select_mode(&index, true)
			.select_validators(&index, &ids(&["v3", "v2"]));
		assert_eq!(state.selected_validators(), ids(&["v3"]).as_slice());
	}

	#[test]
	fn base_can_only_move_within_selection() {
		let index = index();
		let state = SelectionState::default().select_validators(&index, &ids(&["v2", "v3"]));
		assert_eq!(state.set_base_validator(&"v4".into()), state);
		let pivoted = state.set_base_validator(&"v3".into());
		assert_eq!(pivoted.base_validator(), Some(&"v3".into()));
	}

	#[test]
	fn reset_keeps_chain_and_mode() {
		let index = index();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.set_single_select_mode(&index, true)
			.toggle_validator(&index, &"v1".into())
			.reset();
		assert_eq!(state.selected_chain(), Some(&"akash".into()));
		assert!(state.single_select_mode());
		assert!(state.selected_validators().is_empty());
		assert_eq!(state.base_validator(), None);
		assert!(state.highlighted_chains().is_empty());
	}
}
