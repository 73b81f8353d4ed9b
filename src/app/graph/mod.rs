use eframe::egui::{Vec2, vec2};

use crate::explorer::{LayoutNode, NodeId};

mod interaction;
mod view;

const ANCHOR_RADIUS: f32 = 10.0;
const ITEM_RADIUS: f32 = 8.0;
const CATEGORY_HALF_HEIGHT: f32 = 16.0;
const MIN_SCREEN_EXTENT: f32 = 4.0;

/// World-space footprint of a node, shared by drawing and hit testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum NodeShape {
    Circle { radius: f32 },
    Box { half_size: Vec2 },
}

impl NodeShape {
    pub(in crate::app) fn of(node: &LayoutNode) -> Self {
        match node.id {
            NodeId::Anchor => Self::Circle {
                radius: ANCHOR_RADIUS,
            },
            NodeId::Item(_) => Self::Circle {
                radius: ITEM_RADIUS,
            },
            NodeId::Category(_) => {
                let glyphs = node.label.chars().count() as f32;
                Self::Box {
                    half_size: vec2((glyphs * 4.0 + 14.0).clamp(28.0, 140.0), CATEGORY_HALF_HEIGHT),
                }
            }
        }
    }

    /// Extent in world units, never thinner than a few pixels on screen.
    pub(in crate::app) fn half_extent(self, zoom: f32) -> Vec2 {
        let floor = MIN_SCREEN_EXTENT / zoom.max(f32::EPSILON);
        match self {
            Self::Circle { radius } => Vec2::splat(radius.max(floor)),
            Self::Box { half_size } => half_size.max(Vec2::splat(floor)),
        }
    }

    pub(in crate::app) fn contains(self, center: Vec2, point: Vec2, zoom: f32) -> bool {
        let half = self.half_extent(zoom);
        let delta = point - center;
        match self {
            Self::Circle { .. } => delta.length() <= half.x,
            Self::Box { .. } => delta.x.abs() <= half.x && delta.y.abs() <= half.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, label: &str) -> LayoutNode {
        LayoutNode::new(id, label, Vec2::ZERO)
    }

    #[test]
    fn category_boxes_grow_with_label() {
        let short = NodeShape::of(&node(NodeId::Category("UI".to_owned()), "UI"));
        let long = NodeShape::of(&node(
            NodeId::Category("Data Visualisation".to_owned()),
            "Data Visualisation",
        ));
        assert!(long.half_extent(1.0).x > short.half_extent(1.0).x);
    }

    #[test]
    fn hit_testing_respects_shape() {
        let item = NodeShape::of(&node(NodeId::Item("a1".to_owned()), "a1"));
        assert!(item.contains(Vec2::ZERO, vec2(5.0, 5.0), 1.0));
        assert!(!item.contains(Vec2::ZERO, vec2(7.0, 7.0), 1.0));

        let category = NodeShape::of(&node(NodeId::Category("UI".to_owned()), "UI"));
        assert!(category.contains(Vec2::ZERO, vec2(25.0, 15.0), 1.0));
        assert!(!category.contains(Vec2::ZERO, vec2(0.0, 20.0), 1.0));
    }

    #[test]
    fn tiny_zoom_keeps_nodes_clickable() {
        let item = NodeShape::of(&node(NodeId::Item("a1".to_owned()), "a1"));
        assert_eq!(item.half_extent(0.25), Vec2::splat(16.0));
    }
}
