use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::data::{DataSource, StaticData};
use crate::selection::{
	ChainId, SelectionState, SelectionStore, SortColumn, SubscriptionId, ValidatorId,
};

/// Reactive handle on the [`SelectionStore`] shared through context.
///
/// Views read through [`Coordinator::read`], which subscribes them to every
/// change of the store, and dispatch transitions through the methods below.
#[derive(Clone, Copy)]
pub struct Coordinator {
	store: StoredValue<SelectionStore, LocalStorage>,
	data: StoredValue<StaticData>,
	source: StoredValue<DataSource>,
	revision: RwSignal<u64>,
}

impl Coordinator {
	pub fn new(data: StaticData, source: DataSource) -> Self {
		let store = SelectionStore::new(data.metadata.clone(), data.links.clone());
		Self {
			store: StoredValue::new_local(store),
			data: StoredValue::new(data),
			source: StoredValue::new(source),
			revision: RwSignal::new(0),
		}
	}

	pub fn expect() -> Self {
		expect_context::<Coordinator>()
	}

	/// Reads the store and re-runs the caller on every store change.
	pub fn read<T>(&self, f: impl FnOnce(&SelectionStore) -> T) -> T {
		self.revision.track();
		self.store.with_value(f)
	}

	/// Reads the store without subscribing.
	pub fn peek<T>(&self, f: impl FnOnce(&SelectionStore) -> T) -> T {
		self.store.with_value(f)
	}

	pub fn state(&self) -> SelectionState {
		self.read(|s| s.current_state().clone())
	}

	pub fn static_data(&self) -> StaticData {
		self.data.get_value()
	}

	fn dispatch(&self, transition: impl FnOnce(&mut SelectionStore) -> bool) {
		if self.store.try_update_value(transition).unwrap_or(false) {
			self.bump();
		}
	}

	fn bump(&self) {
		self.revision.try_update(|r| *r += 1);
	}

	pub fn select_chain(&self, chain: ChainId) {
		self.dispatch(|s| s.select_chain(&chain));
	}

	pub fn select_validators(&self, validators: Vec<ValidatorId>) {
		self.dispatch(|s| s.select_validators(&validators));
	}

	pub fn toggle_validator(&self, validator: ValidatorId) {
		self.dispatch(|s| s.toggle_validator(&validator));
	}

	pub fn set_base_validator(&self, validator: ValidatorId) {
		self.dispatch(|s| s.set_base_validator(&validator));
	}

	pub fn set_single_select_mode(&self, enabled: bool) {
		self.dispatch(|s| s.set_single_select_mode(enabled));
	}

	pub fn reset(&self) {
		self.dispatch(|s| s.reset());
	}

	pub fn sort_table_by(&self, column: SortColumn) {
		self.dispatch(|s| {
			s.sort_table_by(column);
			true
		});
	}

	/// Registers a plain observer for views that render outside the reactive graph.
	pub fn subscribe(
		&self,
		observer: impl Fn(&SelectionState) + 'static,
	) -> Option<SubscriptionId> {
		self.store.try_update_value(|s| s.subscribe(observer))
	}

	pub fn unsubscribe(&self, id: SubscriptionId) {
		self.store.update_value(|s| s.unsubscribe(id));
	}

	/// Fetches results for the selected chain. Outdated responses are dropped by the store.
	pub fn refresh_results(&self) {
		let Some(ticket) = self.store.try_update_value(|s| s.begin_fetch()).flatten() else {
			return;
		};
		self.bump();

		let this = *self;
		let source = self.source.get_value();
		spawn_local(async move {
			debug!("Fetching results for {}", ticket.chain());
			let outcome = source.load_results(ticket.chain()).await;
			let applied = this
				.store
				.try_update_value(|s| s.complete_fetch(&ticket, outcome))
				.unwrap_or(false);
			if applied {
				this.bump();
			}
		});
	}

	pub fn source(&self) -> DataSource {
		self.source.get_value()
	}
}
