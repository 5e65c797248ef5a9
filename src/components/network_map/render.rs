use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::NetworkMapState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &NetworkMapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f7f9fc");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &NetworkMapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (a, b) = (&n1.data.user_data, &n2.data.user_data);
		let weight = state.edge_weight(n1.index(), n2.index());

		// An edge fades with its fainter endpoint.
		let mut alpha = 0.15 + 0.45 * a.opacity.min(b.opacity);
		if state.hover.node.is_some() {
			let touches_hover =
				state.is_hover_neighborhood(n1.index()) && state.is_hover_neighborhood(n2.index());
			alpha = if touches_hover {
				alpha + (0.9 - alpha) * t
			} else {
				alpha * (1.0 - 0.6 * t)
			};
		}

		ctx.set_stroke_style_str(&format!("rgba(120, 130, 150, {alpha})"));
		ctx.set_line_width((0.5 + 4.0 * weight) / k);
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

fn draw_nodes(state: &NetworkMapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y, r) = (node.x() as f64, node.y() as f64, info.radius);

		ctx.set_global_alpha(info.opacity);
		let mut start = -PI / 2.0;
		for &(color, fraction) in &info.slices {
			let end = start + fraction * 2.0 * PI;
			ctx.begin_path();
			ctx.move_to(x, y);
			let _ = ctx.arc(x, y, r, start, end);
			ctx.close_path();
			ctx.set_fill_style_str(color);
			ctx.fill();
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(0.5 / k);
			ctx.stroke();
			start = end;
		}
		ctx.set_global_alpha(1.0);

		if info.highlighted || info.selected {
			ctx.begin_path();
			let _ = ctx.arc(x, y, r + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(if info.selected { "#1f2937" } else { "#d97706" });
			ctx.set_line_width(if info.selected { 2.5 / k } else { 1.5 / k });
			// Chains that merely share the selected validators get a dashed ring.
			if !info.selected {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(4.0 / k),
					&JsValue::from_f64(3.0 / k),
				));
			}
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let hovered = state.hover.node == Some(node.index());
		ctx.set_fill_style_str(&format!("rgba(31, 41, 55, {})", 0.4 + 0.6 * info.opacity));
		ctx.set_font(&format!(
			"{}{}px sans-serif",
			if hovered || info.selected { "bold " } else { "" },
			11.0 / k.max(0.5)
		));
		let _ = ctx.fill_text(info.chain.as_str(), x + r + 4.0, y + 4.0);
	});
}
