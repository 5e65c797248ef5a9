use leptos::prelude::*;

use crate::components::coordinator::Coordinator;
use crate::selection::{
	MatchRow, SortColumn, SortDirection, TableSort, cluster_name, cluster_sort_key,
};

fn percent(rate: f64) -> String {
	format!("{:.2}", rate * 100.0)
}

fn cluster_cell(label: &str) -> String {
	match cluster_name(cluster_sort_key(label)) {
		Some(name) => format!("{label} ({name})"),
		None => label.to_owned(),
	}
}

fn sort_marker(sort: Option<TableSort>, column: SortColumn) -> &'static str {
	match sort {
		Some(s) if s.column == column => match s.direction {
			SortDirection::Ascending => " ▲",
			SortDirection::Descending => " ▼",
		},
		_ => "",
	}
}

/// Selected validators compared against the base validator.
///
/// Clicking a header sorts the non-base rows; clicking a non-base row makes it the base.
#[component]
pub fn MatchTableView() -> impl IntoView {
	let coordinator = Coordinator::expect();

	let status = move || {
		coordinator.read(|s| {
			if s.dataset_error().is_some() {
				Some("Failed to load validator results.")
			} else if s.is_loading() && s.dataset().is_none() {
				Some("Loading validator results…")
			} else {
				None
			}
		})
	};

	let headers = SortColumn::ALL
		.into_iter()
		.map(|column| {
			let marker = move || sort_marker(coordinator.read(|s| s.table_sort()), column);
			view! {
				<th>
					<button class="sort" on:click=move |_| coordinator.sort_table_by(column)>
						{column.title()}
						{marker}
					</button>
				</th>
			}
		})
		.collect_view();

	let body = move || {
		coordinator
			.read(|s| s.match_table())
			.into_iter()
			.enumerate()
			.map(|(i, row)| table_row(coordinator, i, row))
			.collect_view()
	};

	view! {
		<section class="panel match-table">
			<h3>"Validator results"</h3>
			{move || status().map(|text| view! { <p class="status">{text}</p> })}
			<div class="table-scroll">
				<table>
					<thead>
						<tr>
							<th>"No."</th>
							{headers}
						</tr>
					</thead>
					<tbody>{body}</tbody>
				</table>
			</div>
		</section>
	}
}

fn table_row(coordinator: Coordinator, index: usize, row: MatchRow) -> impl IntoView {
	let is_base = index == 0;
	let validator = row.validator.clone();
	let on_click = move |_: leptos::ev::MouseEvent| {
		if !is_base {
			coordinator.set_base_validator(validator.clone());
		}
	};

	view! {
		<tr class:base=is_base on:click=on_click>
			<td>{index + 1}</td>
			<td>{row.validator.to_string()}</td>
			<td>{if is_base { "-".to_owned() } else { percent(row.match_rate) }}</td>
			<td>{cluster_cell(&row.cluster)}</td>
			<td>{percent(row.overall_match_rate)}</td>
			<td>{percent(row.cluster_match_rate)}</td>
			<td>{percent(row.participation_rate)}</td>
		</tr>
	}
}
