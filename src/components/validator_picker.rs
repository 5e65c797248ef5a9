use leptos::prelude::*;

use crate::components::coordinator::Coordinator;
use crate::selection::ValidatorId;

/// Checklist of the selected chain's validators with the selection-mode controls.
#[component]
pub fn ValidatorPicker() -> impl IntoView {
	let coordinator = Coordinator::expect();
	let (filter, set_filter) = signal(String::new());

	let single_select = move || coordinator.read(|s| s.current_state().single_select_mode());
	let shared_by = move || {
		coordinator.read(|s| {
			let chains = s.current_state().highlighted_chains();
			if s.current_state().selected_validators().is_empty() {
				String::new()
			} else if chains.is_empty() {
				"No chain has all selected validators".to_owned()
			} else {
				let names: Vec<&str> = chains.iter().map(|c| c.as_str()).collect();
				format!("Shared by {}", names.join(", "))
			}
		})
	};

	let rows = move || {
		let needle = filter.get().to_lowercase();
		let state = coordinator.state();
		let validators: Vec<ValidatorId> = coordinator.read(|s| {
			s.selected_chain_metadata()
				.map(|c| c.validators.iter().cloned().collect())
				.unwrap_or_default()
		});
		if validators.is_empty() {
			return view! { <li class="hint">"Select a chain to list its validators."</li> }
				.into_any();
		}

		validators
			.into_iter()
			.filter(|v| v.as_str().to_lowercase().contains(&needle))
			.map(|validator| {
				let checked = state.is_validator_selected(&validator);
				let is_base = state.base_validator() == Some(&validator);
				let label = validator.to_string();
				view! {
					<li class:base=is_base>
						<label>
							<input
								type="checkbox"
								prop:checked=checked
								on:change=move |_| coordinator.toggle_validator(validator.clone())
							/>
							{label}
						</label>
					</li>
				}
			})
			.collect_view()
			.into_any()
	};

	view! {
		<section class="panel validator-picker">
			<header>
				<h3>"Validators"</h3>
				<label>
					<input
						type="checkbox"
						prop:checked=single_select
						on:change=move |ev| {
							coordinator.set_single_select_mode(event_target_checked(&ev))
						}
					/>
					"Single select"
				</label>
				<button on:click=move |_| coordinator.reset()>"Clear"</button>
			</header>
			<input
				type="search"
				placeholder="Filter validators"
				prop:value=filter
				on:input=move |ev| set_filter.set(event_target_value(&ev))
			/>
			<p class="shared-by">{shared_by}</p>
			<ul class="validator-list">{rows}</ul>
		</section>
	}
}
