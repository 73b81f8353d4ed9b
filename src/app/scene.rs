use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::explorer::{EngineEvent, FitTarget, GraphEngine, LayoutNode, NodeId, NodePatch};

use super::physics::{PhysicsConfig, PhysicsScratch, step_physics};
use super::render_utils::{screen_to_world, world_to_screen};

const STABILIZATION_ITERATIONS: usize = 100;
const FIT_PADDING: f32 = 60.0;
const FIT_EASING: f32 = 0.18;

pub(in crate::app) struct SceneNode {
    pub(in crate::app) layout: LayoutNode,
    pub(in crate::app) velocity: Vec2,
}

#[derive(Clone, Copy)]
struct ViewGoal {
    pan: Vec2,
    zoom: f32,
}

/// egui-hosted graph engine: node and edge store, view transform and a
/// light force simulation.
pub(in crate::app) struct SimulationGraph {
    nodes: Vec<SceneNode>,
    index_by_id: HashMap<NodeId, usize>,
    edges: Vec<(NodeId, NodeId)>,
    pub(in crate::app) pan: Vec2,
    pub(in crate::app) zoom: f32,
    viewport: Rect,
    events: Vec<EngineEvent>,
    pending_fit: Option<FitTarget>,
    view_goal: Option<ViewGoal>,
    iterations: usize,
    stabilized: bool,
    physics: PhysicsConfig,
    scratch: PhysicsScratch,
}

impl SimulationGraph {
    pub(in crate::app) fn new(physics: PhysicsConfig) -> Self {
        Self {
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            edges: Vec::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            viewport: Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)),
            events: Vec::new(),
            pending_fit: None,
            view_goal: None,
            iterations: 0,
            stabilized: false,
            physics,
            scratch: PhysicsScratch::default(),
        }
    }

    pub(in crate::app) fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub(in crate::app) fn position_of(&self, id: &NodeId) -> Option<Vec2> {
        self.index_by_id
            .get(id)
            .map(|&index| self.nodes[index].layout.position)
    }

    pub(in crate::app) fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub(in crate::app) fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        screen_to_world(self.viewport, self.pan, self.zoom, screen)
    }

    /// Restarts the settle countdown, e.g. after the node set was rebuilt.
    pub(in crate::app) fn restart_stabilization(&mut self) {
        self.iterations = 0;
        self.stabilized = false;
    }

    pub(in crate::app) fn push_click(&mut self, target: Option<NodeId>) {
        self.events.push(EngineEvent::Click(target));
    }

    /// Manual zoom/pan cancels any pending camera fit.
    pub(in crate::app) fn cancel_view_goal(&mut self) {
        self.view_goal = None;
    }

    /// One simulation step; returns whether anything is still moving.
    pub(in crate::app) fn step(&mut self, delta_seconds: f32) -> bool {
        let index_by_id = &self.index_by_id;
        let springs = self
            .edges
            .iter()
            .filter_map(|(from, to)| Some((*index_by_id.get(from)?, *index_by_id.get(to)?)))
            .collect::<Vec<_>>();

        let moving = step_physics(
            &mut self.nodes,
            &springs,
            self.physics,
            delta_seconds,
            &mut self.scratch,
        );

        if !self.stabilized {
            self.iterations += 1;
            if !moving || self.iterations >= STABILIZATION_ITERATIONS {
                self.stabilized = true;
                self.events.push(EngineEvent::Stabilized);
            }
        }

        moving
    }

    /// Resolves a pending fit request into a view goal and eases toward it.
    /// Returns whether the camera is still moving.
    pub(in crate::app) fn update_camera(&mut self) -> bool {
        if let Some(target) = self.pending_fit.take() {
            self.view_goal = self.fit_goal(target);
        }

        let Some(goal) = self.view_goal else {
            return false;
        };

        self.pan += (goal.pan - self.pan) * FIT_EASING;
        self.zoom += (goal.zoom - self.zoom) * FIT_EASING;

        if (goal.pan - self.pan).length() < 0.5 && (goal.zoom - self.zoom).abs() < 0.001 {
            self.pan = goal.pan;
            self.zoom = goal.zoom;
            self.view_goal = None;
        }
        true
    }

    fn fit_goal(&self, target: FitTarget) -> Option<ViewGoal> {
        match target {
            FitTarget::Anchor => {
                let anchor = self.position_of(&NodeId::Anchor).unwrap_or(Vec2::ZERO);
                Some(ViewGoal {
                    pan: -anchor,
                    zoom: 1.0,
                })
            }
            FitTarget::All => {
                let mut visible = self
                    .nodes
                    .iter()
                    .filter(|node| !node.layout.hidden)
                    .map(|node| node.layout.position);
                let first = visible.next()?;
                let (min, max) = visible.fold((first, first), |(min, max), position| {
                    (min.min(position), max.max(position))
                });

                let span = (max - min).max(vec2(1.0, 1.0));
                let available = (self.viewport.size() - Vec2::splat(FIT_PADDING * 2.0))
                    .max(vec2(1.0, 1.0));
                let zoom = (available.x / span.x)
                    .min(available.y / span.y)
                    .clamp(0.05, 1.5);
                let center = (min + max) * 0.5;
                Some(ViewGoal {
                    pan: -center * zoom,
                    zoom,
                })
            }
        }
    }

    fn rebuild_index(&mut self) {
        self.index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.layout.id.clone(), index))
            .collect();
    }
}

impl GraphEngine for SimulationGraph {
    fn add_node(&mut self, node: LayoutNode) {
        if let Some(&index) = self.index_by_id.get(&node.id) {
            self.nodes[index].layout = node;
            self.nodes[index].velocity = Vec2::ZERO;
            return;
        }
        self.index_by_id.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(SceneNode {
            layout: node,
            velocity: Vec2::ZERO,
        });
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        let node = &mut self.nodes[index];
        node.layout.apply(&patch);
        if patch.position.is_some() {
            node.velocity = Vec2::ZERO;
        }
        true
    }

    fn remove_node(&mut self, id: &NodeId) -> bool {
        let Some(index) = self.index_by_id.remove(id) else {
            return false;
        };
        self.nodes.remove(index);
        self.edges.retain(|(from, to)| from != id && to != id);
        self.rebuild_index();
        true
    }

    fn node(&self, id: &NodeId) -> Option<&LayoutNode> {
        self.index_by_id
            .get(id)
            .map(|&index| &self.nodes[index].layout)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|node| node.layout.id.clone())
            .collect()
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        if !self.edges.iter().any(|(a, b)| a == &from && b == &to) {
            self.edges.push((from, to));
        }
    }

    fn remove_edge(&mut self, from: &NodeId, to: &NodeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|(a, b)| !(a == from && b == to));
        self.edges.len() != before
    }

    fn scale(&self) -> f32 {
        self.zoom
    }

    fn project(&self, simulation: Vec2) -> Pos2 {
        world_to_screen(self.viewport, self.pan, self.zoom, simulation)
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn request_fit(&mut self, target: FitTarget) {
        self.pending_fit = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn graph() -> SimulationGraph {
        let mut graph = SimulationGraph::new(PhysicsConfig::default());
        graph.set_viewport(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)));
        graph
    }

    #[test]
    fn removal_keeps_insertion_order_and_drops_edges() {
        let mut graph = graph();
        let ids = ["a", "b", "c"].map(|title| NodeId::Category(title.to_owned()));
        for id in &ids {
            graph.add_node(LayoutNode::new(id.clone(), id.to_string(), Vec2::ZERO));
        }
        graph.add_edge(ids[0].clone(), ids[1].clone());
        graph.add_edge(ids[1].clone(), ids[2].clone());

        assert!(graph.remove_node(&ids[1]));
        assert_eq!(graph.node_ids(), [ids[0].clone(), ids[2].clone()]);
        assert!(graph.edges().is_empty());
        assert!(graph.node(&ids[2]).is_some());
        assert!(!graph.remove_node(&ids[1]));
    }

    #[test]
    fn projection_uses_viewport_center_pan_and_zoom() {
        let mut graph = graph();
        graph.pan = vec2(10.0, -10.0);
        graph.zoom = 2.0;

        assert_eq!(graph.project(vec2(5.0, 5.0)), pos2(400.0 + 10.0 + 10.0, 300.0 - 10.0 + 10.0));
        assert_eq!(graph.scale(), 2.0);
        let world = graph.screen_to_world(graph.project(vec2(-3.0, 7.0)));
        assert!((world - vec2(-3.0, 7.0)).length() < 1e-4);
    }

    #[test]
    fn stabilization_fires_once() {
        let mut graph = graph();
        graph.add_node(
            LayoutNode::new(NodeId::Anchor, "", Vec2::ZERO)
                .with_physics(false)
                .with_fixed(true),
        );
        for _ in 0..(STABILIZATION_ITERATIONS + 5) {
            graph.step(1.0 / 60.0);
        }

        let events = graph.drain_events();
        assert_eq!(events, [EngineEvent::Stabilized]);
    }

    #[test]
    fn fixed_nodes_do_not_move() {
        let mut graph = graph();
        let pinned = NodeId::Category("pinned".to_owned());
        graph.add_node(
            LayoutNode::new(pinned.clone(), "pinned", vec2(1.0, 0.0))
                .with_physics(false)
                .with_fixed(true),
        );
        graph.add_node(LayoutNode::new(
            NodeId::Category("free".to_owned()),
            "free",
            vec2(2.0, 0.0),
        ));
        for _ in 0..10 {
            graph.step(1.0 / 60.0);
        }

        assert_eq!(graph.position_of(&pinned), Some(vec2(1.0, 0.0)));
    }

    #[test]
    fn fit_all_centres_visible_nodes() {
        let mut graph = graph();
        graph.add_node(LayoutNode::new(
            NodeId::Category("l".to_owned()),
            "l",
            vec2(-100.0, 0.0),
        ));
        graph.add_node(LayoutNode::new(
            NodeId::Category("r".to_owned()),
            "r",
            vec2(300.0, 0.0),
        ));
        graph.request_fit(FitTarget::All);
        while graph.update_camera() {}

        let center_screen = graph.project(vec2(100.0, 0.0));
        assert!((center_screen - pos2(400.0, 300.0)).length() < 1.0);
    }
}
