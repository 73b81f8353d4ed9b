use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 10;

#[derive(Clone, Copy)]
struct Square {
    center: Vec2,
    half: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), point| (min.min(*point), max.max(*point)));
        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: span * 0.5 + 1.0,
        })
    }

    fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half && (point.y - self.center.y).abs() <= self.half
    }

    fn quadrant(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) + 2 * usize::from(point.y >= self.center.y)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let sign_x = if quadrant & 1 == 1 { 1.0 } else { -1.0 };
        let sign_y = if quadrant & 2 == 2 { 1.0 } else { -1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half: quarter,
        }
    }
}

/// Barnes–Hut cell over the visible node positions.
pub(super) struct Cell {
    square: Square,
    center_of_mass: Vec2,
    mass: f32,
    members: Vec<usize>,
    children: Vec<Cell>,
}

#[derive(Clone, Copy)]
pub(super) struct Repulsion {
    pub(super) strength: f32,
    pub(super) softening: f32,
    pub(super) theta: f32,
}

impl Repulsion {
    fn between(self, point: Vec2, other: Vec2, mass: f32) -> Vec2 {
        let delta = point - other;
        let distance_sq = delta.length_sq();
        let direction = if distance_sq > 1e-8 {
            delta / distance_sq.sqrt()
        } else {
            vec2(1.0, 0.0)
        };
        direction * (self.strength * mass / (distance_sq + self.softening))
    }
}

impl Cell {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        Some(Self::split(square, (0..positions.len()).collect(), positions, 0))
    }

    fn split(square: Square, members: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = members.len() as f32;
        let center_of_mass = if members.is_empty() {
            square.center
        } else {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / mass
        };

        let mut cell = Self {
            square,
            center_of_mass,
            mass,
            members,
            children: Vec::new(),
        };
        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &cell.members {
            buckets[square.quadrant(positions[index])].push(index);
        }
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        cell.children = buckets
            .into_iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(quadrant, bucket)| {
                Self::split(square.child(quadrant), bucket, positions, depth + 1)
            })
            .collect();
        cell.members.clear();
        cell
    }

    /// Accumulated repulsion on `positions[index]` from every other point.
    pub(super) fn repulsion_on(&self, index: usize, positions: &[Vec2], params: Repulsion) -> Vec2 {
        let point = positions[index];

        if self.children.is_empty() {
            return self
                .members
                .iter()
                .filter(|&&other| other != index)
                .fold(Vec2::ZERO, |force, &other| {
                    force + params.between(point, positions[other], 1.0)
                });
        }

        let distance = (point - self.center_of_mass).length().max(0.01);
        if !self.square.contains(point) && (self.square.half * 2.0) / distance < params.theta {
            return params.between(point, self.center_of_mass, self.mass);
        }

        self.children
            .iter()
            .fold(Vec2::ZERO, |force, child| {
                force + child.repulsion_on(index, positions, params)
            })
    }
}
