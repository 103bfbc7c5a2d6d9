use crate::error::Error;

mod defaults {
    pub const FIELD_WIDTH: f64 = 686.;

    /// Open sky above the Martian ground line. The last vertex repeats the
    /// first one, which makes the closing edge degenerate.
    pub const TERRAIN: [(f64, f64); 21] = [
        (0., 0.),
        (686., 0.),
        (686., 450.),
        (577., 605.),
        (548., 605.),
        (526., 594.),
        (512., 530.),
        (498., 520.),
        (382., 520.),
        (368., 527.),
        (336., 626.),
        (327., 636.),
        (309., 636.),
        (298., 623.),
        (275., 535.),
        (260., 504.),
        (218., 481.),
        (190., 481.),
        (150., 650.),
        (0., 650.),
        (0., 0.),
    ];

    pub const LEFT_OFFSET: f64 = 5.;
    pub const RIGHT_OFFSET: f64 = 89.;
    pub const BOTTOM_OFFSET: f64 = 92.;
    pub const SPRITE_WIDTH: f64 = 94.;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed polygon bounding the flyable region of the field. A point is
/// "in contact" with the polygon while it lies inside it, i.e. while it is
/// still clear of the ground.
#[derive(Debug, Clone)]
pub struct Terrain {
    vertices: Vec<Vec2>,
}

struct EdgeIterator<'a> {
    previous_point: Vec2,
    vertices: std::slice::Iter<'a, Vec2>,
}

impl<'a> EdgeIterator<'a> {
    fn new(vertices: &'a [Vec2]) -> Self {
        // start from the last vertex so the closing edge comes out first
        Self {
            previous_point: vertices.last().copied().unwrap_or_default(),
            vertices: vertices.iter(),
        }
    }
}

impl Iterator for EdgeIterator<'_> {
    type Item = (Vec2, Vec2);

    fn next(&mut self) -> Option<Self::Item> {
        let next_point = *self.vertices.next()?;
        let edge = (self.previous_point, next_point);
        self.previous_point = next_point;
        Some(edge)
    }
}

impl Terrain {
    pub const MARTIAN_FIELD_WIDTH: f64 = defaults::FIELD_WIDTH;

    pub fn try_new(vertices: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, Error> {
        let vertices: Vec<_> = vertices
            .into_iter()
            .map(|(x, y)| Vec2::new(x, y))
            .collect();
        if vertices.len() < 3 {
            return Err(Error::DegenerateTerrain(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn martian() -> Self {
        Self {
            vertices: defaults::TERRAIN
                .iter()
                .map(|&(x, y)| Vec2::new(x, y))
                .collect(),
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn iter_edges(&self) -> EdgeIterator<'_> {
        EdgeIterator::new(&self.vertices)
    }

    /// Crossing-number test. Counts the edges lying above the point (y grows
    /// downwards); an odd count means the point is inside.
    pub fn contains(&self, x0: f64, y0: f64) -> bool {
        self.iter_edges()
            .filter(|&(p1, p2)| crosses_above(p1, p2, x0, y0))
            .count()
            % 2
            == 1
    }

    pub fn resolve_contact(&self, probe: &ContactProbe) -> Contact {
        Contact {
            left: self.contains(probe.left_x, probe.bottom),
            right: self.contains(probe.right_x, probe.bottom),
        }
    }
}

fn crosses_above(p1: Vec2, p2: Vec2, x0: f64, y0: f64) -> bool {
    let dx = p2.x - p1.x;
    let slope = if dx != 0. { (p2.y - p1.y) / dx } else { 0. };

    let in_range = (p1.x <= x0 && x0 < p2.x) || (p2.x <= x0 && x0 < p1.x);
    let below = y0 > slope * (x0 - p1.x) + p1.y;
    in_range && below
}

/// Horizontal coordinate folded back onto `[0, field_width)`.
pub fn wrap_x(x: f64, field_width: f64) -> f64 {
    // rem_euclid rounds tiny negative inputs up to field_width itself
    let wrapped = x.rem_euclid(field_width);
    if wrapped >= field_width {
        0.
    } else {
        wrapped
    }
}

/// Sample points of the craft used against the terrain, relative to the
/// craft's top-left reference position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub left_offset: f64,
    pub right_offset: f64,
    pub bottom_offset: f64,
    pub width: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            left_offset: defaults::LEFT_OFFSET,
            right_offset: defaults::RIGHT_OFFSET,
            bottom_offset: defaults::BOTTOM_OFFSET,
            width: defaults::SPRITE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactProbe {
    pub left_x: f64,
    pub right_x: f64,
    pub bottom: f64,
}

impl Footprint {
    pub fn probe(&self, position: Vec2, field_width: f64) -> ContactProbe {
        ContactProbe {
            left_x: wrap_x(position.x + self.left_offset, field_width),
            right_x: wrap_x(position.x + self.right_offset, field_width),
            bottom: position.y + self.bottom_offset,
        }
    }
}

/// Containment result for both footprints. `true` means the footprint is
/// still inside the sky polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact {
    pub left: bool,
    pub right: bool,
}

impl Contact {
    pub fn is_clear(&self) -> bool {
        self.left && self.right
    }

    pub fn is_level(&self) -> bool {
        self.left == self.right
    }
}



#[cfg(test)]
mod edge_iterator_tests {
    use super::*;

    #[test]
    fn closing_edge_first() {
        let terrain = Terrain::try_new([(0., 0.), (10., 0.), (10., 10.)]).unwrap();
        let mut edges = terrain.iter_edges();

        assert_eq!(
            edges.next(),
            Some((Vec2::new(10., 10.), Vec2::new(0., 0.)))
        );
        assert_eq!(edges.next(), Some((Vec2::new(0., 0.), Vec2::new(10., 0.))));
        assert_eq!(
            edges.next(),
            Some((Vec2::new(10., 0.), Vec2::new(10., 10.)))
        );
        assert_eq!(edges.next(), None);
    }

    #[test]
    fn empty_vertices() {
        let mut edges = EdgeIterator::new(&[]);
        assert_eq!(edges.next(), None);
    }
}
