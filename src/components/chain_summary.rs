use leptos::prelude::*;

use crate::components::coordinator::Coordinator;

/// Statistics of the selected chain and links to its most similar chains.
#[component]
pub fn ChainSummary() -> impl IntoView {
	let coordinator = Coordinator::expect();

	move || {
		let Some(chain) = coordinator.read(|s| s.selected_chain_metadata().cloned()) else {
			return view! { <p class="hint">"Click a chain on the map to inspect it."</p> }
				.into_any();
		};

		let deselect = chain.id.clone();
		let similar = chain
			.similar_chains
			.iter()
			.cloned()
			.map(|other| {
				let target = other.clone();
				view! {
					<li>
						<button
							class="link"
							on:click=move |_| coordinator.select_chain(target.clone())
						>
							{other.to_string()}
						</button>
					</li>
				}
			})
			.collect_view();

		view! {
			<section class="panel chain-summary">
				<header>
					<h2>{chain.id.to_string()}</h2>
					<button on:click=move |_| coordinator.select_chain(deselect.clone())>
						"Deselect"
					</button>
				</header>
				<dl>
					<dt>"Opinion radius"</dt>
					<dd>{format!("{:.3}", chain.radius)}</dd>
					<dt>"Validators"</dt>
					<dd>{chain.validator_count}</dd>
					<dt>"Proposals"</dt>
					<dd>{chain.proposal_count}</dd>
					<dt>"Clusters"</dt>
					<dd>{chain.cluster_count}</dd>
				</dl>
				<h4>"Similar chains"</h4>
				<ul class="similar-chains">{similar}</ul>
			</section>
		}
		.into_any()
	}
}
