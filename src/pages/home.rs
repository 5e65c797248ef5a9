use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::components::{
	ChainSummary, ClusterPanel, Coordinator, MatchTableView, NetworkMap, ValidatorPicker,
};
use crate::config::DashboardConfig;
use crate::data::{DataError, DataSource, StaticData};
use crate::selection::{ChainId, ValidatorId};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let source = use_context::<DashboardConfig>().unwrap_or_default().data_source();
	let loaded: RwSignal<Option<Result<StaticData, DataError>>> = RwSignal::new(None);

	let fetch_from = source.clone();
	spawn_local(async move {
		let outcome = fetch_from.load_static().await;
		if let Err(err) = &outcome {
			warn!("Static datasets unavailable: {err}");
		}
		let _ = loaded.try_set(Some(outcome));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{move || match loaded.get() {
				None => Ok(view! { <p class="status">"Loading network…"</p> }.into_any()),
				Some(Ok(data)) => {
					let source = source.clone();
					Ok(view! { <Dashboard data source /> }.into_any())
				}
				Some(Err(err)) => Err(err),
			}}
		</ErrorBoundary>
	}
}

/// The network map beside the panels, all driven by one [`Coordinator`].
#[component]
fn Dashboard(data: StaticData, source: DataSource) -> impl IntoView {
	let chain_count = data.metadata.len();
	let coordinator = Coordinator::new(data, source);
	provide_context(coordinator);

	// Every change of chain or validators invalidates the previous results request.
	let fetch_key = Memo::new(move |_| {
		let state = coordinator.state();
		(
			state.selected_chain().cloned(),
			state.selected_validators().to_vec(),
		)
	});
	Effect::new(move |_| {
		let (chain, _): (Option<ChainId>, Vec<ValidatorId>) = fetch_key.get();
		if chain.is_some() {
			coordinator.refresh_results();
		}
	});

	view! {
		<div class="dashboard">
			<div class="map-pane">
				<NetworkMap />
				<div class="map-overlay">
					<h1>"Validator Lens"</h1>
					<p class="subtitle">
						{format!("{chain_count} chains. ")}
						"Click a chain to select it. Drag to pan, scroll to zoom."
					</p>
				</div>
			</div>
			<aside class="side-pane">
				<ChainSummary />
				<ValidatorPicker />
				<MatchTableView />
				<ClusterPanel />
			</aside>
		</div>
	}
}
