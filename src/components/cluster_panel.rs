use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::components::coordinator::Coordinator;
use crate::data::{ClusterRelationMap, DataError};
use crate::selection::cluster_name;

fn cluster_list(labels: &[String]) -> String {
	if labels.is_empty() {
		"None".to_owned()
	} else {
		labels.join(", ")
	}
}

/// Friendly and opposing clusters of the base validator's cluster.
#[component]
pub fn ClusterPanel() -> impl IntoView {
	let coordinator = Coordinator::expect();
	let relations: RwSignal<Option<Result<Arc<ClusterRelationMap>, DataError>>> =
		RwSignal::new(None);

	let source = coordinator.source();
	spawn_local(async move {
		let loaded = source.load_cluster_relations().await.map(Arc::new);
		if let Err(err) = &loaded {
			warn!("Cluster relationships unavailable: {err}");
		}
		let _ = relations.try_set(Some(loaded));
	});

	move || {
		let base_cluster = coordinator.read(|s| {
			let state = s.current_state();
			let chain = state.selected_chain()?.clone();
			let label = s.dataset()?.get(state.base_validator()?)?.cluster_label?;
			Some((chain, label))
		});
		let Some((chain, label)) = base_cluster else {
			return None;
		};

		let title = match cluster_name(label) {
			Some(name) => format!("Cluster {label} · {name}"),
			None => format!("Cluster {label}"),
		};
		let body = match relations.get() {
			None => view! { <p class="status">"Loading cluster relationships…"</p> }.into_any(),
			Some(Err(_)) => {
				view! { <p class="status">"Failed to load cluster relationships."</p> }.into_any()
			}
			Some(Ok(map)) => match map.relation(&chain, label) {
				None => {
					view! { <p class="hint">"No relationship data for this cluster."</p> }
						.into_any()
				}
				Some(relation) => {
					let friendly = cluster_list(&relation.friendly);
					let opposition = cluster_list(&relation.opposition);
					view! {
						<p class="friendly">"Friendly clusters: " {friendly}</p>
						<p class="opposition">"Opposing clusters: " {opposition}</p>
					}
					.into_any()
				}
			},
		};

		Some(view! {
			<section class="panel cluster-panel">
				<h3>"Cluster results"</h3>
				<p>{title}</p>
				{body}
			</section>
		})
	}
}
