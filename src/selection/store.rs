use std::sync::Arc;

use log::{debug, warn};

use super::links::LinkIndex;
use super::match_table::{MatchRow, SortColumn, TableSort, build_match_table};
use super::metadata::MetadataIndex;
use super::opacity::opacity;
use super::results::ChainResults;
use super::state::SelectionState;
use super::types::{Chain, ChainId, ValidatorId};
use crate::data::DataError;

/// Identifies the selection a per-chain fetch was started for.
///
/// A ticket only stays valid while the selected chain and validators are the
/// ones it was issued under; any later selection change makes it stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	chain: ChainId,
	generation: u64,
}

impl FetchTicket {
	pub fn chain(&self) -> &ChainId {
		&self.chain
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&SelectionState)>;

/// Owns the selection and everything derived from it.
///
/// Transitions replace the whole [`SelectionState`] and then notify observers,
/// so no observer sees a half-updated selection. Every transition returns
/// whether the state actually changed.
pub struct SelectionStore {
	metadata: Arc<MetadataIndex>,
	links: Arc<LinkIndex>,
	state: SelectionState,
	generation: u64,
	observers: Vec<(SubscriptionId, Observer)>,
	next_subscription: u64,
	pending: Option<FetchTicket>,
	dataset: Option<Arc<ChainResults>>,
	dataset_error: Option<DataError>,
	table_sort: Option<TableSort>,
}

impl SelectionStore {
	pub fn new(metadata: Arc<MetadataIndex>, links: Arc<LinkIndex>) -> Self {
		Self {
			metadata,
			links,
			state: SelectionState::default(),
			generation: 0,
			observers: Vec::new(),
			next_subscription: 0,
			pending: None,
			dataset: None,
			dataset_error: None,
			table_sort: None,
		}
	}

	pub fn metadata(&self) -> &MetadataIndex {
		&self.metadata
	}

	pub fn links(&self) -> &LinkIndex {
		&self.links
	}

	pub fn current_state(&self) -> &SelectionState {
		&self.state
	}

	pub fn selected_chain_metadata(&self) -> Option<&Chain> {
		self.state
			.selected_chain()
			.and_then(|c| self.metadata.metadata_of(c))
	}

	pub fn select_chain(&mut self, chain: &ChainId) -> bool {
		let next = self.state.select_chain(&self.metadata, chain);
		self.replace("select_chain", next)
	}

	pub fn select_validators(&mut self, validators: &[ValidatorId]) -> bool {
		let next = self.state.select_validators(&self.metadata, validators);
		self.replace("select_validators", next)
	}

	pub fn toggle_validator(&mut self, validator: &ValidatorId) -> bool {
		let next = self.state.toggle_validator(&self.metadata, validator);
		self.replace("toggle_validator", next)
	}

	pub fn set_base_validator(&mut self, validator: &ValidatorId) -> bool {
		let next = self.state.set_base_validator(validator);
		self.replace("set_base_validator", next)
	}

	pub fn set_single_select_mode(&mut self, enabled: bool) -> bool {
		let next = self.state.set_single_select_mode(&self.metadata, enabled);
		self.replace("set_single_select_mode", next)
	}

	pub fn reset(&mut self) -> bool {
		let next = self.state.reset();
		self.replace("reset", next)
	}

	fn replace(&mut self, transition: &str, next: SelectionState) -> bool {
		if next == self.state {
			debug!("{transition}: selection unchanged");
			return false;
		}

		let chain_changed = next.selected_chain() != self.state.selected_chain();
		if chain_changed || next.selected_validators() != self.state.selected_validators() {
			self.generation += 1;
			self.pending = None;
		}
		if chain_changed {
			self.dataset = None;
			self.dataset_error = None;
		}

		self.state = next;
		debug!(
			"{transition}: chain={:?} validators={} base={:?} highlighted={} single={}",
			self.state.selected_chain().map(ChainId::as_str),
			self.state.selected_validators().len(),
			self.state.base_validator().map(ValidatorId::as_str),
			self.state.highlighted_chains().len(),
			self.state.single_select_mode(),
		);

		for (_, observer) in &self.observers {
			observer(&self.state);
		}
		true
	}

	/// Registers an observer called with every new selection.
	pub fn subscribe(&mut self, observer: impl Fn(&SelectionState) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription += 1;
		self.observers.push((id, Box::new(observer)));
		id
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) {
		self.observers.retain(|(sub, _)| *sub != id);
	}

	pub fn opacity_of(&self, chain: &ChainId) -> f64 {
		opacity(&self.state, &self.links, chain)
	}

	/// Comparison table of the selected validators, empty until results for the
	/// selected chain are loaded.
	pub fn match_table(&self) -> Vec<MatchRow> {
		match (&self.dataset, self.state.selected_chain()) {
			(Some(results), Some(chain)) if results.chain() == chain => {
				build_match_table(results, &self.state, self.table_sort)
			}
			_ => Vec::new(),
		}
	}

	pub fn table_sort(&self) -> Option<TableSort> {
		self.table_sort
	}

	pub fn sort_table_by(&mut self, column: SortColumn) {
		self.table_sort = Some(TableSort::clicked(self.table_sort, column));
	}

	/// Starts a per-chain results fetch for the selected chain.
	pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
		let chain = self.state.selected_chain()?.clone();
		let ticket = FetchTicket {
			chain,
			generation: self.generation,
		};
		self.pending = Some(ticket.clone());
		Some(ticket)
	}

	/// Whether a fetch started under `ticket` may still be applied.
	pub fn accepts(&self, ticket: &FetchTicket) -> bool {
		ticket.generation == self.generation && self.state.selected_chain() == Some(&ticket.chain)
	}

	/// Applies a finished fetch, or drops it when the selection moved on.
	pub fn complete_fetch(
		&mut self,
		ticket: &FetchTicket,
		outcome: Result<ChainResults, DataError>,
	) -> bool {
		if !self.accepts(ticket) {
			debug!("Discarding stale results for {}", ticket.chain);
			return false;
		}
		self.pending = None;
		match outcome {
			Ok(results) => {
				debug!("Loaded {} validator results for {}", results.len(), ticket.chain);
				self.dataset = Some(Arc::new(results));
				self.dataset_error = None;
			}
			Err(err) => {
				warn!("Failed to load results for {}: {err}", ticket.chain);
				self.dataset = None;
				self.dataset_error = Some(err);
			}
		}
		true
	}

	pub fn is_loading(&self) -> bool {
		self.pending.is_some()
	}

	/// Results of the selected chain, once accepted.
	pub fn dataset(&self) -> Option<&Arc<ChainResults>> {
		self.dataset.as_ref()
	}

	pub fn dataset_error(&self) -> Option<&DataError> {
		self.dataset_error.as_ref()
	}
}
