use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::selection::{
	ChainId, LinkIndex, MetadataIndex, SelectionState, cluster_sort_key, opacity,
};

const CLUSTER_COLORS: &[&str] = &[
	"#F28989", "#8AAED3", "#FAB393", "#FEDBD9", "#69CC99", "#9F95C7", "#8BE5F1", "#FEE7B5",
];

const MIN_NODE_RADIUS: f64 = 8.0;
const MAX_NODE_RADIUS: f64 = 22.0;
/// Pixels a press may travel and still count as a click.
const CLICK_SLOP: f64 = 3.0;
const MIN_ZOOM: f64 = 0.2;
const MAX_ZOOM: f64 = 8.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub chain: ChainId,
	pub radius: f64,
	/// Cluster wedges as (color, fraction of the pie).
	pub slices: Vec<(&'static str, f64)>,
	pub opacity: f64,
	pub highlighted: bool,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
}

pub struct NetworkMapState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Normalised shared-validator weight per edge.
	pub edge_weights: HashMap<(DefaultNodeIdx, DefaultNodeIdx), f64>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

fn cluster_slices(proportion: &BTreeMap<String, f64>) -> Vec<(&'static str, f64)> {
	let total: f64 = proportion.values().filter(|v| **v > 0.0).sum();
	if total <= 0.0 {
		return vec![(CLUSTER_COLORS[1], 1.0)];
	}
	proportion
		.iter()
		.filter(|(_, v)| **v > 0.0)
		.map(|(key, v)| {
			let label = cluster_sort_key(key).max(0) as usize;
			(CLUSTER_COLORS[label % CLUSTER_COLORS.len()], v / total)
		})
		.collect()
}

impl NetworkMapState {
	pub fn new(metadata: &MetadataIndex, links: &LinkIndex, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 400.0,
			force_spring: 0.03,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let count = metadata.len().max(1) as f64;

		for (i, chain) in metadata.chains().enumerate() {
			// Dataset coordinates span 0..10; chains without one go on a ring.
			let (x, y) = if chain.position == (0.0, 0.0) {
				let angle = (i as f64) * 2.0 * PI / count;
				(150.0 * angle.cos(), 150.0 * angle.sin())
			} else {
				(
					(chain.position.0 - 5.0) * width / 10.0,
					(chain.position.1 - 5.0) * height / 10.0,
				)
			};

			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					chain: chain.id.clone(),
					radius: MIN_NODE_RADIUS
						+ chain.radius.clamp(0.0, 1.0) * (MAX_NODE_RADIUS - MIN_NODE_RADIUS),
					slices: cluster_slices(&chain.proportion),
					opacity: 1.0,
					highlighted: false,
					selected: false,
				},
			});
			id_to_idx.insert(chain.id.clone(), idx);
		}

		let mut edges = Vec::new();
		let mut edge_weights = HashMap::new();
		for (a, b, weight) in links.links() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(a), id_to_idx.get(b)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
				edge_weights.insert((src, tgt), links.normalize(weight));
			}
		}

		Self {
			graph,
			edges,
			edge_weights,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Copies opacity and highlight flags of the given selection onto the nodes.
	pub fn apply_selection(&mut self, selection: &SelectionState, links: &LinkIndex) {
		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			info.opacity = opacity(selection, links, &info.chain);
			info.highlighted = selection.highlighted_chains().contains(&info.chain);
			info.selected = selection.selected_chain() == Some(&info.chain);
		});
	}

	pub fn edge_weight(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		self.edge_weights
			.get(&(a, b))
			.or_else(|| self.edge_weights.get(&(b, a)))
			.copied()
			.unwrap_or(0.0)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn chain_of(&self, idx: DefaultNodeIdx) -> Option<ChainId> {
		let mut chain = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				chain = Some(node.data.user_data.chain.clone());
			}
		});
		chain
	}

	/// Starts dragging the chain under the pointer, or panning when there is none.
	pub fn press(&mut self, x: f64, y: f64) {
		let Some(idx) = self.node_at_position(x, y) else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
			return;
		};

		let mut origin = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				origin = (node.x(), node.y());
			}
		});
		self.drag = DragState {
			active: true,
			moved: false,
			node_idx: Some(idx),
			start_x: x,
			start_y: y,
			node_start_x: origin.0,
			node_start_y: origin.1,
		};
	}

	/// Pointer motion: hover tracking, chain dragging or panning.
	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
			if self.pan.active {
				self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
				self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			}
			return;
		}

		// A press that stays within the slop is a click, not a drag.
		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			self.drag.moved = true;
		}
		let Some(idx) = self.drag.node_idx.filter(|_| self.drag.moved) else {
			return;
		};
		let k = self.transform.k;
		let (nx, ny) = (
			self.drag.node_start_x + (dx / k) as f32,
			self.drag.node_start_y + (dy / k) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
	}

	/// Ends a drag or pan. Returns the chain when the press was a click on it.
	pub fn release(&mut self) -> Option<ChainId> {
		let clicked = match (self.drag.active, self.drag.moved, self.drag.node_idx) {
			(true, false, Some(idx)) => self.chain_of(idx),
			_ => None,
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn pointer_left(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Zooms around the pointer, keeping the point under it fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_hover_neighborhood(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 1.5 * dt as f64;
		if self.hover.highlight_t < 0.01 && self.hover.node.is_none() {
			self.hover.highlight_t = 0.0;
		}
	}
}
