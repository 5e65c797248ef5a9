use leptos::prelude::*;
use validator_lens::{App, DashboardConfig, init_logging};

fn main() {
	let config = DashboardConfig::from_document();
	init_logging(config.log_level);
	leptos::mount::mount_to_body(move || view! { <App config /> })
}
