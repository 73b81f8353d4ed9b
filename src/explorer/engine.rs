use std::fmt;

use eframe::egui::{Pos2, Vec2};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    Anchor,
    Category(String),
    Item(String),
}

impl NodeId {
    pub const ITEM_PREFIX: &'static str = "project_";

    pub fn is_category(&self) -> bool {
        matches!(self, Self::Category(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchor => f.write_str("center"),
            Self::Category(title) => f.write_str(title),
            Self::Item(id) => write!(f, "{}{id}", Self::ITEM_PREFIX),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub label: String,
    pub position: Vec2,
    pub physics: bool,
    pub fixed: bool,
    pub hidden: bool,
}

impl LayoutNode {
    pub fn new(id: NodeId, label: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            physics: true,
            fixed: false,
            hidden: false,
        }
    }

    pub fn with_physics(mut self, physics: bool) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(physics) = patch.physics {
            self.physics = physics;
        }
        if let Some(fixed) = patch.fixed {
            self.fixed = fixed;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
    }
}

/// Partial node update; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodePatch {
    pub position: Option<Vec2>,
    pub physics: Option<bool>,
    pub fixed: Option<bool>,
    pub hidden: Option<bool>,
}

impl NodePatch {
    pub fn position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn physics(mut self, physics: bool) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Stabilized,
    Click(Option<NodeId>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitTarget {
    All,
    Anchor,
}

/// Simulation backend the explorer drives. Node order reported by
/// `node_ids` must be insertion order.
pub trait GraphEngine {
    fn add_node(&mut self, node: LayoutNode);
    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> bool;
    fn remove_node(&mut self, id: &NodeId) -> bool;
    fn node(&self, id: &NodeId) -> Option<&LayoutNode>;
    fn node_ids(&self) -> Vec<NodeId>;

    fn add_edge(&mut self, from: NodeId, to: NodeId);
    fn remove_edge(&mut self, from: &NodeId, to: &NodeId) -> bool;

    fn scale(&self) -> f32;
    fn project(&self, simulation: Vec2) -> Pos2;

    fn drain_events(&mut self) -> Vec<EngineEvent>;
    fn request_fit(&mut self, target: FitTarget);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_ids_match_node_kind() {
        assert_eq!(NodeId::Anchor.to_string(), "center");
        assert_eq!(NodeId::Category("UI".to_owned()).to_string(), "UI");
        assert_eq!(NodeId::Item("42".to_owned()).to_string(), "project_42");
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut node = LayoutNode::new(NodeId::Anchor, "hub", Vec2::ZERO).with_fixed(true);
        node.apply(&NodePatch::default().hidden(true));
        assert!(node.hidden);
        assert!(node.fixed);
        assert!(node.physics);
        assert_eq!(node.position, Vec2::ZERO);
    }
}
