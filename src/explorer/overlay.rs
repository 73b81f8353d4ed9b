use eframe::egui::{Pos2, vec2};
use tracing::debug;

use super::engine::{GraphEngine, NodeId};

pub const VERTICAL_OFFSET: f32 = 10.0;

/// Something that can schedule another frame, e.g. an egui context.
pub trait FrameScheduler {
    fn request_frame(&self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub screen: Pos2,
    pub scale: f32,
}

/// One live projection task. Removing it from [`OverlaySync`] cancels it.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub item_index: usize,
    pub item_id: String,
    pub node: NodeId,
    pub placement: Option<OverlayPlacement>,
}

#[derive(Clone, Debug)]
pub struct OverlaySync {
    overlays: Vec<Overlay>,
    vertical_offset: f32,
}

impl Default for OverlaySync {
    fn default() -> Self {
        Self::new(VERTICAL_OFFSET)
    }
}

impl OverlaySync {
    pub fn new(vertical_offset: f32) -> Self {
        Self {
            overlays: Vec::new(),
            vertical_offset,
        }
    }

    pub fn open(&mut self, item_index: usize, item_id: &str) -> bool {
        if self.is_open(item_id) {
            return false;
        }
        self.overlays.push(Overlay {
            item_index,
            item_id: item_id.to_owned(),
            node: NodeId::Item(item_id.to_owned()),
            placement: None,
        });
        true
    }

    pub fn close(&mut self, item_id: &str) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|overlay| overlay.item_id != item_id);
        self.overlays.len() != before
    }

    pub fn is_open(&self, item_id: &str) -> bool {
        self.overlays
            .iter()
            .any(|overlay| overlay.item_id == item_id)
    }

    /// Cancels every task and returns the ids of the overlays that closed.
    pub fn cancel_all(&mut self) -> Vec<String> {
        self.overlays
            .drain(..)
            .map(|overlay| overlay.item_id)
            .collect()
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Runs one frame of every projection task. Tasks whose node is gone
    /// tear themselves down; their item ids are returned. Another frame is
    /// requested while any task is still live.
    pub fn tick(
        &mut self,
        engine: &dyn GraphEngine,
        scheduler: &dyn FrameScheduler,
    ) -> Vec<String> {
        let scale = engine.scale().max(f32::EPSILON);
        let offset = vec2(0.0, self.vertical_offset / scale);
        let mut vanished = Vec::new();

        self.overlays.retain_mut(|overlay| {
            let Some(node) = engine.node(&overlay.node) else {
                debug!(item_id = %overlay.item_id, "overlay node vanished; cancelling projection");
                vanished.push(overlay.item_id.clone());
                return false;
            };

            overlay.placement = Some(OverlayPlacement {
                screen: engine.project(node.position + offset),
                scale,
            });
            true
        });

        if !self.overlays.is_empty() {
            scheduler.request_frame();
        }

        vanished
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use eframe::egui::{Vec2, pos2};

    use super::*;
    use crate::explorer::engine::LayoutNode;
    use crate::explorer::testing::MemoryEngine;

    #[derive(Default)]
    struct CountingScheduler {
        frames: Cell<usize>,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&self) {
            self.frames.set(self.frames.get() + 1);
        }
    }

    fn engine_with_item(id: &str, position: Vec2, scale: f32) -> MemoryEngine {
        let mut engine = MemoryEngine::with_view(pos2(400.0, 300.0), scale);
        engine.add_node(LayoutNode::new(NodeId::Item(id.to_owned()), id, position));
        engine
    }

    #[test]
    fn projects_with_offset_divided_by_scale() {
        let engine = engine_with_item("a", vec2(10.0, 20.0), 2.0);
        let scheduler = CountingScheduler::default();
        let mut sync = OverlaySync::default();
        sync.open(0, "a");

        let vanished = sync.tick(&engine, &scheduler);
        assert!(vanished.is_empty());

        let placement = sync.overlays()[0].placement.expect("placed after tick");
        // node y 20 + 10 / 2, then scaled by 2 around the view origin
        assert_eq!(placement.screen, pos2(400.0 + 20.0, 300.0 + 50.0));
        assert_eq!(placement.scale, 2.0);
        assert_eq!(scheduler.frames.get(), 1);
    }

    #[test]
    fn follows_node_across_frames() {
        let mut engine = engine_with_item("a", Vec2::ZERO, 1.0);
        let scheduler = CountingScheduler::default();
        let mut sync = OverlaySync::default();
        sync.open(0, "a");

        sync.tick(&engine, &scheduler);
        engine.update_node(
            &NodeId::Item("a".to_owned()),
            crate::explorer::engine::NodePatch::default().position(vec2(5.0, 0.0)),
        );
        sync.tick(&engine, &scheduler);

        let placement = sync.overlays()[0].placement.expect("placed");
        assert_eq!(placement.screen, pos2(405.0, 310.0));
        assert_eq!(scheduler.frames.get(), 2);
    }

    #[test]
    fn vanished_node_cancels_overlay_without_rescheduling() {
        let mut engine = engine_with_item("a", Vec2::ZERO, 1.0);
        let scheduler = CountingScheduler::default();
        let mut sync = OverlaySync::default();
        sync.open(0, "a");

        engine.remove_node(&NodeId::Item("a".to_owned()));
        let vanished = sync.tick(&engine, &scheduler);

        assert_eq!(vanished, ["a"]);
        assert!(sync.is_empty());
        assert_eq!(scheduler.frames.get(), 0);
    }

    #[test]
    fn open_is_idempotent_and_close_reports_change() {
        let mut sync = OverlaySync::default();
        assert!(sync.open(0, "a"));
        assert!(!sync.open(0, "a"));
        assert_eq!(sync.len(), 1);
        assert!(sync.close("a"));
        assert!(!sync.close("a"));
    }

    #[test]
    fn cancel_all_returns_closed_ids() {
        let mut sync = OverlaySync::default();
        sync.open(0, "a");
        sync.open(1, "b");
        assert_eq!(sync.cancel_all(), ["a", "b"]);
        assert!(sync.is_empty());
    }
}
