//! Procedural point cloud and its proximity edges.

use glam::Vec3;
use rand::Rng;

use super::config::GraphConfig;
use super::theme::{Color, WeightedPalette};

/// A generated point. Position and color never change after generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
	pub position: Vec3,
	pub color: Color,
}

/// Indices of two nodes closer than the connection distance. Always `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StaticEdge {
	pub a: usize,
	pub b: usize,
}

/// Nodes plus the static edge set, in generation order.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<Node>,
	pub edges: Vec<StaticEdge>,
}

/// Sample `config.node_count` nodes uniformly inside the spread box and
/// connect every pair closer than `config.connect_distance`.
///
/// All-pairs is fine here: it runs once per activation on a few hundred nodes.
pub fn generate<R: Rng>(
	config: &GraphConfig,
	palette: &WeightedPalette,
	rng: &mut R,
) -> GraphData {
	let nodes: Vec<Node> = (0..config.node_count)
		.map(|_| {
			let position = Vec3::new(
				(rng.random::<f32>() - 0.5) * config.spread_xy * 2.0,
				(rng.random::<f32>() - 0.5) * config.spread_xy * 2.0,
				(rng.random::<f32>() - 0.5) * config.spread_z * 2.0,
			);
			Node {
				position,
				color: palette.pick(rng.random::<f64>()),
			}
		})
		.collect();

	let edges = connect(&nodes, config.connect_distance);
	GraphData { nodes, edges }
}

/// Every `(i, j)` with `i < j` and `distance(i, j) < max_distance`.
pub fn connect(nodes: &[Node], max_distance: f32) -> Vec<StaticEdge> {
	let mut edges = Vec::new();
	for (a, na) in nodes.iter().enumerate() {
		for (offset, nb) in nodes[a + 1..].iter().enumerate() {
			if na.position.distance(nb.position) < max_distance {
				edges.push(StaticEdge {
					a,
					b: a + 1 + offset,
				});
			}
		}
	}
	edges
}
