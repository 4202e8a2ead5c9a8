use serde::Serialize;

use super::types::GraphNode;

/// Display-only performance figures for the detail panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeMetrics {
	/// Percentage, 0-100.
	pub success_rate: f64,
	pub response_time_ms: u32,
	/// Return on investment as a multiplier.
	pub roi: f64,
}

/// Source of per-node metrics, injected into the view.
pub trait MetricsProvider {
	fn metrics(&self, node: &GraphNode) -> NodeMetrics;
}

/// Stable pseudo-random metrics derived from the node id.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeededMetrics {
	pub salt: usize,
}

impl SeededMetrics {
	fn seed(&self, id: &str) -> usize {
		id.bytes()
			.fold(self.salt, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
	}
}

/// Linear congruential step mapped into [0, 1).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed % 233280 + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

impl MetricsProvider for SeededMetrics {
	fn metrics(&self, node: &GraphNode) -> NodeMetrics {
		let seed = self.seed(&node.id);
		let round1 = |v: f64| (v * 10.0).round() / 10.0;
		NodeMetrics {
			success_rate: round1(85.0 + rand_simple(seed) * 14.0),
			response_time_ms: 120 + (rand_simple(seed.wrapping_add(1)) * 800.0) as u32,
			roi: round1(1.5 + rand_simple(seed.wrapping_add(2)) * 3.5),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::store::tests::node;
	use crate::components::network_graph::types::NodeGroup;

	#[test]
	fn metrics_are_deterministic_and_bounded() {
		let provider = SeededMetrics::default();
		for id in ["crm", "lead-qualifier", "sales-rep", ""] {
			let n = node(id, NodeGroup::Agent, 0.0, 0.0);
			let m = provider.metrics(&n);
			assert_eq!(m, provider.metrics(&n));
			assert!((85.0..=99.0).contains(&m.success_rate));
			assert!((120..920).contains(&m.response_time_ms));
			assert!((1.5..=5.0).contains(&m.roi));
		}
	}

	#[test]
	fn salt_changes_output() {
		let n = node("outreach", NodeGroup::Agent, 0.0, 0.0);
		let (a, b) = (SeededMetrics { salt: 0 }, SeededMetrics { salt: 17 });
		assert_ne!(a.metrics(&n), b.metrics(&n));
	}
}
