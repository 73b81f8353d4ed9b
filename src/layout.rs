use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

pub const DEFAULT_RADIUS: f32 = 120.0;
pub const PIN_RADIUS_FACTOR: f32 = 0.8;

/// Card footprint and spacing used when packing an expanded page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub card_width: f32,
    pub card_height: f32,
    pub node_to_card_spacing: f32,
    pub min_spacing: f32,
    pub safety_margin: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            card_width: 300.0,
            card_height: 400.0,
            node_to_card_spacing: 20.0,
            min_spacing: 50.0,
            safety_margin: 300.0,
        }
    }
}

impl GridSpec {
    pub fn unit_width(&self) -> f32 {
        self.card_width
    }

    pub fn unit_height(&self) -> f32 {
        self.card_height + self.node_to_card_spacing
    }
}

/// Evenly spaced points on a circle of `radius`, starting at angle zero.
pub fn radial_positions(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|index| radial_position(index, count, radius))
        .collect()
}

pub fn radial_position(index: usize, count: usize, radius: f32) -> Vec2 {
    if count == 0 {
        return Vec2::ZERO;
    }
    let angle = (index as f32 / count as f32) * TAU;
    vec2(angle.cos(), angle.sin()) * radius
}

/// Moves a category onto the pin circle (`0.8 * radius` around `center`)
/// keeping its bearing from the center.
pub fn pin_position(center: Vec2, category: Vec2, radius: f32) -> Vec2 {
    let delta = category - center;
    let angle = delta.y.atan2(delta.x);
    center + vec2(angle.cos(), angle.sin()) * (radius * PIN_RADIUS_FACTOR)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridPlacement {
    pub grid_size: usize,
    pub extent: Vec2,
    pub center: Vec2,
    pub positions: Vec<Vec2>,
}

impl GridPlacement {
    fn empty(pin: Vec2) -> Self {
        Self {
            grid_size: 0,
            extent: Vec2::ZERO,
            center: pin,
            positions: Vec::new(),
        }
    }
}

/// Lays out `count` item nodes on a square-ish grid beside the pinned
/// category. The grid is pushed sideways, perpendicular to the hub→pin
/// direction, far enough to clear the pin circle.
pub fn pack_grid(
    pin: Vec2,
    center: Vec2,
    count: usize,
    pin_radius: f32,
    grid: &GridSpec,
) -> GridPlacement {
    if count == 0 {
        return GridPlacement::empty(pin);
    }

    let grid_size = (count as f64).sqrt().ceil() as usize;
    let cells = grid_size as f32;
    let unit_width = grid.unit_width();
    let unit_height = grid.unit_height();

    let grid_width = unit_width * cells + grid.min_spacing * (cells - 1.0);
    let grid_height = unit_height * cells + grid.min_spacing * (cells - 1.0);

    let outward = pin - center;
    let outward = if outward.length_sq() > f32::EPSILON {
        outward.normalized()
    } else {
        vec2(1.0, 0.0)
    };
    let perpendicular = vec2(-outward.y, outward.x);

    let shift = grid_width / 2.0 + pin_radius + grid.safety_margin;
    let grid_center = pin + perpendicular * shift;
    let top_left = grid_center - vec2(grid_width, grid_height) / 2.0;

    let positions = (0..count)
        .map(|index| {
            let row = (index / grid_size) as f32;
            let col = (index % grid_size) as f32;
            let unit = top_left
                + vec2(
                    col * (unit_width + grid.min_spacing),
                    row * (unit_height + grid.min_spacing),
                );
            unit + vec2(unit_width / 2.0, 0.0)
        })
        .collect();

    GridPlacement {
        grid_size,
        extent: vec2(grid_width, grid_height),
        center: grid_center,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn radial_starts_on_positive_x_axis() {
        let points = radial_positions(4, 120.0);
        assert!((points[0] - vec2(120.0, 0.0)).length() < EPSILON);
        assert!((points[1] - vec2(0.0, 120.0)).length() < EPSILON);
        assert!((points[2] - vec2(-120.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn pin_keeps_bearing_at_eighty_percent() {
        let pin = pin_position(Vec2::ZERO, vec2(0.0, 300.0), 120.0);
        assert!((pin - vec2(0.0, 96.0)).length() < EPSILON);

        let offset_center = vec2(10.0, 10.0);
        let pin = pin_position(offset_center, vec2(10.0, 10.0), 120.0);
        assert!((pin - vec2(106.0, 10.0)).length() < EPSILON);
    }

    #[test]
    fn empty_page_produces_no_grid() {
        let placement = pack_grid(vec2(96.0, 0.0), Vec2::ZERO, 0, 96.0, &GridSpec::default());
        assert!(placement.positions.is_empty());
        assert_eq!(placement.grid_size, 0);
        assert_eq!(placement.center, vec2(96.0, 0.0));
    }

    #[test]
    fn grid_shifts_perpendicular_to_pin_direction() {
        let grid = GridSpec::default();
        let pin = vec2(96.0, 0.0);
        let placement = pack_grid(pin, Vec2::ZERO, 4, 96.0, &grid);

        assert_eq!(placement.grid_size, 2);
        let expected_width = 300.0 * 2.0 + 50.0;
        assert!((placement.extent.x - expected_width).abs() < EPSILON);
        let shift = expected_width / 2.0 + 96.0 + 300.0;
        assert!((placement.center - vec2(96.0, shift)).length() < EPSILON);

        let first = placement.positions[0];
        let top_left = placement.center - placement.extent / 2.0;
        assert!((first - (top_left + vec2(150.0, 0.0))).length() < EPSILON);
    }

    #[test]
    fn last_row_may_be_partial() {
        let placement = pack_grid(vec2(0.0, 96.0), Vec2::ZERO, 5, 96.0, &GridSpec::default());
        assert_eq!(placement.grid_size, 3);
        assert_eq!(placement.positions.len(), 5);
        assert!((placement.positions[3].y - placement.positions[4].y).abs() < EPSILON);
        assert!(placement.positions[3].y > placement.positions[0].y);
    }

    proptest! {
        #[test]
        fn radial_points_sit_on_circle_evenly(count in 1usize..64, radius in 1.0f32..2000.0) {
            let points = radial_positions(count, radius);
            prop_assert_eq!(points.len(), count);
            let step = TAU / count as f32;
            for (index, point) in points.iter().enumerate() {
                prop_assert!((point.length() - radius).abs() <= radius * 1e-4);
                let expected = step * index as f32;
                let actual = point.y.atan2(point.x).rem_euclid(TAU);
                let diff = (actual - expected).abs();
                prop_assert!(diff < 1e-3 || (TAU - diff) < 1e-3);
            }
            prop_assert_eq!(points, radial_positions(count, radius));
        }

        #[test]
        fn grid_cells_never_overlap(
            count in 1usize..120,
            angle in 0.0f32..TAU,
        ) {
            let grid = GridSpec::default();
            let pin = vec2(angle.cos(), angle.sin()) * 96.0;
            let placement = pack_grid(pin, Vec2::ZERO, count, 96.0, &grid);
            prop_assert_eq!(placement.positions.len(), count);

            let min_gap = grid.min_spacing + grid.unit_width() - 1e-2;
            for (i, a) in placement.positions.iter().enumerate() {
                for b in &placement.positions[i + 1..] {
                    prop_assert!((*a - *b).length() >= min_gap);
                }
            }
        }
    }
}
