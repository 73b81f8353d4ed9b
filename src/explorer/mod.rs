//! Category expansion state machine.
//!
//! The explorer owns the loaded items, the derived categories and the per
//! category page state, and drives an external [`GraphEngine`]: category
//! nodes orbit an anchor while idle, and one category at a time can be
//! expanded into a page of item nodes with tracking overlays.

mod engine;
mod overlay;
mod pagination;
mod tags;
#[cfg(test)]
pub(crate) mod testing;

use eframe::egui::Vec2;
use tracing::{debug, info};

use crate::catalog::Item;
use crate::layout::{
    DEFAULT_RADIUS, GridSpec, PIN_RADIUS_FACTOR, pack_grid, pin_position, radial_position,
};

pub use engine::{EngineEvent, FitTarget, GraphEngine, LayoutNode, NodeId, NodePatch};
pub use overlay::{FrameScheduler, Overlay, OverlayPlacement, VERTICAL_OFFSET};
pub use pagination::PaginationControls;
pub use tags::Category;

use overlay::OverlaySync;
use pagination::{PaginationState, page_range, total_pages};
use tags::{CategoryAssignment, assign_categories};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplorerConfig {
    pub radius: f32,
    pub grid: GridSpec,
    pub overlay_offset: f32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            grid: GridSpec::default(),
            overlay_offset: VERTICAL_OFFSET,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpansionState {
    Idle,
    Expanded(String),
}

/// Requests the explorer hands to whoever renders overlays and controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExplorerEvent {
    OverlayOpened(String),
    OverlayClosed(String),
    Pagination(Option<PaginationControls>),
}

pub struct Explorer {
    config: ExplorerConfig,
    items: Vec<Item>,
    assignment: CategoryAssignment,
    pages: PaginationState,
    state: ExpansionState,
    page_items: Vec<usize>,
    overlays: OverlaySync,
    controls: Option<PaginationControls>,
    events: Vec<ExplorerEvent>,
}

impl Explorer {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            overlays: OverlaySync::new(config.overlay_offset),
            config,
            items: Vec::new(),
            assignment: CategoryAssignment::default(),
            pages: PaginationState::default(),
            state: ExpansionState::Idle,
            page_items: Vec::new(),
            controls: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn expanded(&self) -> Option<&str> {
        match &self.state {
            ExpansionState::Idle => None,
            ExpansionState::Expanded(category) => Some(category),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.assignment.categories
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.overlays.overlays()
    }

    pub fn pagination(&self) -> Option<PaginationControls> {
        self.controls
    }

    pub fn item_count(&self, category_id: &str) -> usize {
        self.assignment.items_in(&self.items, category_id).len()
    }

    pub fn take_events(&mut self) -> Vec<ExplorerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the data set: every node the explorer created is rebuilt,
    /// page state is cleared and the explorer returns to idle.
    pub fn reload(&mut self, engine: &mut dyn GraphEngine, items: Vec<Item>) {
        if let ExpansionState::Expanded(category) = self.state.clone() {
            self.teardown_items(engine, &category);
        }
        for id in engine.node_ids() {
            if id.is_category() {
                engine.remove_edge(&NodeId::Anchor, &id);
                engine.remove_node(&id);
            }
        }
        engine.remove_node(&NodeId::Anchor);

        self.pages.clear();
        self.state = ExpansionState::Idle;
        self.set_controls(None);
        self.assignment = assign_categories(&items);
        self.items = items;

        engine.add_node(
            LayoutNode::new(NodeId::Anchor, "", Vec2::ZERO)
                .with_physics(false)
                .with_fixed(true),
        );

        let count = self.assignment.categories.len();
        for (index, category) in self.assignment.categories.iter().enumerate() {
            let id = NodeId::Category(category.id.clone());
            engine.add_node(
                LayoutNode::new(
                    id.clone(),
                    category.title.clone(),
                    radial_position(index, count, self.config.radius),
                )
                .with_physics(false)
                .with_fixed(true),
            );
            engine.add_edge(NodeId::Anchor, id);
        }

        info!(
            items = self.items.len(),
            categories = count,
            "category layout rebuilt"
        );
    }

    /// Initial settle finished: release category nodes into the simulation
    /// from their radial spots.
    pub fn on_stabilized(&mut self, engine: &mut dyn GraphEngine) {
        if self.state != ExpansionState::Idle {
            return;
        }
        self.place_radially(engine);
        debug!("category nodes released after stabilization");
    }

    pub fn handle_engine_events(&mut self, engine: &mut dyn GraphEngine) {
        for event in engine.drain_events() {
            match event {
                EngineEvent::Stabilized => self.on_stabilized(engine),
                EngineEvent::Click(target) => self.handle_click(engine, target.as_ref()),
            }
        }
    }

    pub fn handle_click(&mut self, engine: &mut dyn GraphEngine, target: Option<&NodeId>) {
        match target {
            None => self.click_background(engine),
            Some(NodeId::Anchor) => {}
            Some(NodeId::Category(category)) => self.select_category(engine, category),
            Some(NodeId::Item(item_id)) => self.click_item(engine, item_id),
        }
    }

    pub fn select_category(&mut self, engine: &mut dyn GraphEngine, category_id: &str) {
        if !self.assignment.contains(category_id) {
            debug!(category = category_id, "ignoring selection of unknown category");
            return;
        }

        match self.state.clone() {
            ExpansionState::Expanded(current) if current == category_id => self.collapse(engine),
            ExpansionState::Expanded(current) => {
                self.teardown_items(engine, &current);
                engine.update_node(
                    &NodeId::Category(current),
                    NodePatch::default()
                        .hidden(false)
                        .physics(true)
                        .fixed(false),
                );
                self.expand(engine, category_id);
            }
            ExpansionState::Idle => self.expand(engine, category_id),
        }
    }

    pub fn click_background(&mut self, engine: &mut dyn GraphEngine) {
        if self.state != ExpansionState::Idle {
            self.collapse(engine);
        }
    }

    pub fn change_page(&mut self, engine: &mut dyn GraphEngine, category_id: &str, page: usize) {
        if self.expanded() != Some(category_id) {
            debug!(
                category = category_id,
                "ignoring page change for a category that is not expanded"
            );
            return;
        }

        let count = self.item_count(category_id);
        self.teardown_items(engine, category_id);
        let page = self.pages.set(category_id, page, count);
        debug!(category = category_id, page, "page changed");
        self.materialize(engine, category_id);
    }

    pub fn next_page(&mut self, engine: &mut dyn GraphEngine) {
        if let Some(controls) = self.controls
            && controls.next_enabled
            && let Some(category) = self.expanded().map(str::to_owned)
        {
            self.change_page(engine, &category, controls.current_page + 1);
        }
    }

    pub fn prev_page(&mut self, engine: &mut dyn GraphEngine) {
        if let Some(controls) = self.controls
            && controls.prev_enabled
            && let Some(category) = self.expanded().map(str::to_owned)
        {
            self.change_page(engine, &category, controls.current_page - 1);
        }
    }

    /// Advances every overlay projection by one frame.
    pub fn tick(&mut self, engine: &dyn GraphEngine, scheduler: &dyn FrameScheduler) {
        for item_id in self.overlays.tick(engine, scheduler) {
            self.events.push(ExplorerEvent::OverlayClosed(item_id));
        }
    }

    fn click_item(&mut self, engine: &mut dyn GraphEngine, item_id: &str) {
        let node = NodeId::Item(item_id.to_owned());
        let Some(index) = self.items.iter().position(|item| item.id == item_id) else {
            debug!(item_id, "ignoring click on an item that is no longer loaded");
            return;
        };
        if !engine.update_node(&node, NodePatch::default().physics(false).fixed(false)) {
            debug!(item_id, "ignoring click on an item node that was torn down");
            return;
        }

        if self.overlays.close(item_id) {
            self.events
                .push(ExplorerEvent::OverlayClosed(item_id.to_owned()));
        } else if self.overlays.open(index, item_id) {
            self.events
                .push(ExplorerEvent::OverlayOpened(item_id.to_owned()));
        }
    }

    fn expand(&mut self, engine: &mut dyn GraphEngine, category_id: &str) {
        for id in engine.node_ids() {
            if let NodeId::Category(title) = &id {
                engine.update_node(&id, NodePatch::default().hidden(title != category_id));
            }
        }

        let category = NodeId::Category(category_id.to_owned());
        if let Some(current) = engine.node(&category).map(|node| node.position) {
            let pin = pin_position(self.anchor_position(engine), current, self.config.radius);
            engine.update_node(
                &category,
                NodePatch::default()
                    .position(pin)
                    .physics(false)
                    .fixed(true),
            );
        }

        self.state = ExpansionState::Expanded(category_id.to_owned());
        self.materialize(engine, category_id);
        info!(
            category = category_id,
            items = self.page_items.len(),
            "category expanded"
        );
    }

    fn materialize(&mut self, engine: &mut dyn GraphEngine, category_id: &str) {
        let members = self.assignment.items_in(&self.items, category_id);
        let page = self.pages.resolve(category_id, members.len());
        let page_members = members[page_range(members.len(), page)].to_vec();

        let category = NodeId::Category(category_id.to_owned());
        let center = self.anchor_position(engine);
        let pin = engine
            .node(&category)
            .map(|node| node.position)
            .unwrap_or(center);
        let placement = pack_grid(
            pin,
            center,
            page_members.len(),
            self.config.radius * PIN_RADIUS_FACTOR,
            &self.config.grid,
        );

        for (&index, &position) in page_members.iter().zip(&placement.positions) {
            let item = &self.items[index];
            let id = NodeId::Item(item.id.clone());
            engine.add_node(
                LayoutNode::new(id.clone(), item.display_title(), position)
                    .with_physics(false)
                    .with_fixed(false),
            );
            engine.add_edge(category.clone(), id);
            if self.overlays.open(index, &item.id) {
                self.events
                    .push(ExplorerEvent::OverlayOpened(item.id.clone()));
            }
        }

        self.page_items = page_members;
        self.set_controls(PaginationControls::for_page(
            page,
            total_pages(members.len()),
        ));
        engine.request_fit(FitTarget::All);
    }

    fn collapse(&mut self, engine: &mut dyn GraphEngine) {
        if let ExpansionState::Expanded(category) = self.state.clone() {
            self.teardown_items(engine, &category);
            info!(category = %category, "category collapsed");
        }

        self.state = ExpansionState::Idle;
        self.set_controls(None);
        self.place_radially(engine);
        engine.request_fit(FitTarget::Anchor);
    }

    /// Closes overlays and removes every item node and its edge.
    fn teardown_items(&mut self, engine: &mut dyn GraphEngine, category_id: &str) {
        for item_id in self.overlays.cancel_all() {
            self.events.push(ExplorerEvent::OverlayClosed(item_id));
        }

        let category = NodeId::Category(category_id.to_owned());
        for id in engine.node_ids() {
            if id.is_item() {
                engine.remove_edge(&category, &id);
                engine.remove_node(&id);
            }
        }
        self.page_items.clear();
    }

    /// Re-derives each category's angle from the current node order.
    fn place_radially(&self, engine: &mut dyn GraphEngine) {
        let categories = engine
            .node_ids()
            .into_iter()
            .filter(NodeId::is_category)
            .collect::<Vec<_>>();
        let count = categories.len();

        for (index, id) in categories.iter().enumerate() {
            engine.update_node(
                id,
                NodePatch::default()
                    .position(radial_position(index, count, self.config.radius))
                    .hidden(false)
                    .physics(true)
                    .fixed(false),
            );
        }
    }

    fn anchor_position(&self, engine: &dyn GraphEngine) -> Vec2 {
        engine
            .node(&NodeId::Anchor)
            .map(|node| node.position)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_controls(&mut self, controls: Option<PaginationControls>) {
        if self.controls != controls {
            self.controls = controls;
            self.events.push(ExplorerEvent::Pagination(controls));
        }
    }
}
