mod quadtree;

use eframe::egui::Vec2;

use super::scene::SceneNode;
use quadtree::{Cell, Repulsion};

const BARNES_HUT_THETA: f32 = 0.7;

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct PhysicsConfig {
    pub(in crate::app) repulsion: f32,
    pub(in crate::app) spring_length: f32,
    pub(in crate::app) spring_strength: f32,
    pub(in crate::app) center_pull: f32,
    pub(in crate::app) damping: f32,
    pub(in crate::app) max_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion: 60_000.0,
            spring_length: 120.0,
            spring_strength: 0.08,
            center_pull: 0.003,
            damping: 0.91,
            max_speed: 10.0,
        }
    }
}

#[derive(Default)]
pub(in crate::app) struct PhysicsScratch {
    slots: Vec<Option<usize>>,
    participants: Vec<usize>,
    positions: Vec<Vec2>,
    forces: Vec<Vec2>,
}

fn movable(node: &SceneNode) -> bool {
    node.layout.physics && !node.layout.fixed && !node.layout.hidden
}

/// Advances free nodes one step. Hidden nodes are ignored entirely;
/// pinned or non-physical nodes still repel but never move.
pub(in crate::app) fn step_physics(
    nodes: &mut [SceneNode],
    springs: &[(usize, usize)],
    config: PhysicsConfig,
    delta_seconds: f32,
    scratch: &mut PhysicsScratch,
) -> bool {
    if !nodes.iter().any(movable) {
        for node in nodes.iter_mut() {
            node.velocity = Vec2::ZERO;
        }
        return false;
    }

    scratch.slots.clear();
    scratch.participants.clear();
    scratch.positions.clear();
    for (index, node) in nodes.iter().enumerate() {
        if node.layout.hidden {
            scratch.slots.push(None);
            continue;
        }
        scratch.slots.push(Some(scratch.participants.len()));
        scratch.participants.push(index);
        scratch.positions.push(node.layout.position);
    }

    let positions = &scratch.positions;
    scratch.forces.clear();
    scratch.forces.resize(positions.len(), Vec2::ZERO);
    let forces = &mut scratch.forces;

    if let Some(tree) = Cell::build(positions) {
        let params = Repulsion {
            strength: config.repulsion,
            softening: 400.0,
            theta: BARNES_HUT_THETA,
        };
        for (slot, force) in forces.iter_mut().enumerate() {
            *force += tree.repulsion_on(slot, positions, params);
        }
    }

    for &(from, to) in springs {
        let (Some(Some(a)), Some(Some(b))) = (scratch.slots.get(from), scratch.slots.get(to))
        else {
            continue;
        };
        let (a, b) = (*a, *b);
        if a == b {
            continue;
        }

        let delta = positions[a] - positions[b];
        let distance = delta.length();
        if distance <= 1e-4 {
            continue;
        }
        let pull = delta / distance * ((distance - config.spring_length) * config.spring_strength);
        forces[a] -= pull;
        forces[b] += pull;
    }

    let time_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping = config.damping.powf(time_scale);
    let max_speed_sq = config.max_speed * config.max_speed;
    let mut any_motion = false;

    for (slot, &index) in scratch.participants.iter().enumerate() {
        let node = &mut nodes[index];
        if !movable(node) {
            node.velocity = Vec2::ZERO;
            continue;
        }

        let force = forces[slot] - node.layout.position * config.center_pull;
        let mut velocity = (node.velocity + force * (0.05 * time_scale)) * damping;
        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= config.max_speed / speed_sq.sqrt();
        }
        if velocity.length_sq() < 0.02 * 0.02 {
            velocity = Vec2::ZERO;
        } else {
            any_motion = true;
        }

        node.velocity = velocity;
        node.layout.position += velocity * time_scale;
    }

    any_motion
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::explorer::{LayoutNode, NodeId};

    fn node(title: &str, position: Vec2) -> SceneNode {
        SceneNode {
            layout: LayoutNode::new(NodeId::Category(title.to_owned()), title, position),
            velocity: Vec2::ZERO,
        }
    }

    #[test]
    fn crowded_free_nodes_spread_out() {
        let mut nodes = vec![node("a", vec2(-1.0, 0.0)), node("b", vec2(1.0, 0.0))];
        let mut scratch = PhysicsScratch::default();

        let moving = step_physics(
            &mut nodes,
            &[],
            PhysicsConfig::default(),
            1.0 / 60.0,
            &mut scratch,
        );

        assert!(moving);
        assert!(nodes[0].layout.position.x < -1.0);
        assert!(nodes[1].layout.position.x > 1.0);
    }

    #[test]
    fn hidden_nodes_neither_move_nor_push() {
        let mut nodes = vec![node("a", vec2(0.0, 0.0)), node("b", vec2(0.5, 0.0))];
        nodes[1].layout.hidden = true;
        let mut scratch = PhysicsScratch::default();

        step_physics(
            &mut nodes,
            &[],
            PhysicsConfig::default(),
            1.0 / 60.0,
            &mut scratch,
        );

        assert_eq!(nodes[1].layout.position, vec2(0.5, 0.0));
        assert_eq!(nodes[0].layout.position, Vec2::ZERO);
    }

    #[test]
    fn nothing_movable_reports_rest() {
        let mut nodes = vec![node("a", Vec2::ZERO)];
        nodes[0].layout.fixed = true;
        let mut scratch = PhysicsScratch::default();

        assert!(!step_physics(
            &mut nodes,
            &[],
            PhysicsConfig::default(),
            1.0 / 60.0,
            &mut scratch,
        ));
    }
}
