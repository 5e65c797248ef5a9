use super::links::LinkIndex;
use super::state::SelectionState;
use super::types::ChainId;

pub const NEUTRAL_OPACITY: f64 = 1.0;
/// Floor for chains linked to the selected one; the link weight fills the rest.
pub const LINKED_BASE_OPACITY: f64 = 0.3;
pub const LINKED_OPACITY_SPAN: f64 = 0.7;
pub const CONTAINS_SELECTION_OPACITY: f64 = 0.7;
pub const OUTSIDE_SELECTION_OPACITY: f64 = 0.2;

/// Visual emphasis of `chain` in the network map for the given selection.
///
/// Always within `[0, 1]`. Pure, so views may call it per chain on every frame.
pub fn opacity(state: &SelectionState, links: &LinkIndex, chain: &ChainId) -> f64 {
	let Some(selected) = state.selected_chain() else {
		return NEUTRAL_OPACITY;
	};
	if selected == chain {
		return NEUTRAL_OPACITY;
	}

	let value = if state.selected_validators().is_empty() {
		match links.weight_between(selected, chain) {
			None => LINKED_BASE_OPACITY,
			Some(weight) => LINKED_BASE_OPACITY + LINKED_OPACITY_SPAN * links.normalize(weight),
		}
	} else if state.highlighted_chains().contains(chain) {
		CONTAINS_SELECTION_OPACITY
	} else {
		OUTSIDE_SELECTION_OPACITY
	};
	value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::selection::metadata::MetadataIndex;
	use crate::selection::types::{Chain, Link, ValidatorId};

	fn fixtures() -> (MetadataIndex, LinkIndex) {
		let index = MetadataIndex::new([
			Chain::with_validators("akash", ["v1", "v2", "v3"]),
			Chain::with_validators("osmosis", ["v2", "v3", "v4"]),
			Chain::with_validators("juno", ["v1"]),
			Chain::with_validators("stargaze", ["v9"]),
		]);
		let links = LinkIndex::new([
			Link {
				chain_a: "akash".into(),
				chain_b: "osmosis".into(),
				shared_validators: 80,
			},
			Link {
				chain_a: "juno".into(),
				chain_b: "akash".into(),
				shared_validators: 10,
			},
		]);
		(index, links)
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn everything_is_neutral_without_a_chain() {
		let (index, links) = fixtures();
		let state = SelectionState::default().select_validators(&index, &[ValidatorId::from("v2")]);
		for chain in index.chains() {
			assert_eq!(opacity(&state, &links, &chain.id), NEUTRAL_OPACITY);
		}
	}

	#[test]
	fn link_weight_scales_between_floor_and_full() {
		let (index, links) = fixtures();
		let state = SelectionState::default().select_chain(&index, &"akash".into());
		assert_eq!(opacity(&state, &links, &"akash".into()), 1.0);
		assert!(close(opacity(&state, &links, &"osmosis".into()), 1.0));
		assert!(close(opacity(&state, &links, &"juno".into()), 0.3));
		assert!(close(opacity(&state, &links, &"stargaze".into()), 0.3));
	}

	#[test]
	fn degenerate_bounds_use_midpoint() {
		let (index, _) = fixtures();
		let links = LinkIndex::new([Link {
			chain_a: "akash".into(),
			chain_b: "osmosis".into(),
			shared_validators: 5,
		}]);
		let state = SelectionState::default().select_chain(&index, &"akash".into());
		assert!(close(opacity(&state, &links, &"osmosis".into()), 0.65));
	}

	#[test]
	fn validator_selection_splits_containing_chains() {
		let (index, links) = fixtures();
		let state = SelectionState::default()
			.select_chain(&index, &"akash".into())
			.select_validators(&index, &[ValidatorId::from("v2")]);
		assert!(close(opacity(&state, &links, &"osmosis".into()), 0.7));
		assert!(close(opacity(&state, &links, &"juno".into()), 0.2));
		assert!(close(opacity(&state, &links, &"unknown".into()), 0.2));
	}
}
