use eframe::egui::{Pos2, Vec2, pos2};

use super::engine::{EngineEvent, FitTarget, GraphEngine, LayoutNode, NodeId, NodePatch};

/// In-memory engine with a fixed view transform and no simulation.
#[derive(Debug)]
pub(crate) struct MemoryEngine {
    pub(crate) nodes: Vec<LayoutNode>,
    pub(crate) edges: Vec<(NodeId, NodeId)>,
    pub(crate) events: Vec<EngineEvent>,
    pub(crate) fits: Vec<FitTarget>,
    origin: Pos2,
    scale: f32,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::with_view(pos2(0.0, 0.0), 1.0)
    }
}

impl MemoryEngine {
    pub(crate) fn with_view(origin: Pos2, scale: f32) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            events: Vec::new(),
            fits: Vec::new(),
            origin,
            scale,
        }
    }

    pub(crate) fn item_nodes(&self) -> Vec<&LayoutNode> {
        self.nodes.iter().filter(|node| node.id.is_item()).collect()
    }

    pub(crate) fn category(&self, title: &str) -> &LayoutNode {
        self.node(&NodeId::Category(title.to_owned()))
            .unwrap_or_else(|| panic!("category node {title} missing"))
    }
}

impl GraphEngine for MemoryEngine {
    fn add_node(&mut self, node: LayoutNode) {
        self.nodes.retain(|existing| existing.id != node.id);
        self.nodes.push(node);
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        match self.nodes.iter_mut().find(|node| &node.id == id) {
            Some(node) => {
                node.apply(&patch);
                true
            }
            None => false,
        }
    }

    fn remove_node(&mut self, id: &NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| &node.id != id);
        self.edges.retain(|(from, to)| from != id && to != id);
        self.nodes.len() != before
    }

    fn node(&self, id: &NodeId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push((from, to));
    }

    fn remove_edge(&mut self, from: &NodeId, to: &NodeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|(a, b)| !(a == from && b == to));
        self.edges.len() != before
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn project(&self, simulation: Vec2) -> Pos2 {
        self.origin + simulation * self.scale
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn request_fit(&mut self, target: FitTarget) {
        self.fits.push(target);
    }
}
