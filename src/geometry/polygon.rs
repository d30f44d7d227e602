use super::{GeometryFactory, LinearRing};
use crate::{BoundingBox, HasBoundingBox};

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    factory: GeometryFactory,
    rings: Vec<LinearRing>,
    bbox: BoundingBox,
}

impl Polygon {
    /// `rings` is the shell followed by the holes; empty for an empty polygon.
    pub(crate) fn from_parts(factory: GeometryFactory, rings: Vec<LinearRing>) -> Self {
        let bbox = rings
            .first()
            .map(|shell| shell.bounding_box())
            .unwrap_or_else(BoundingBox::new_empty);
        Polygon {
            factory,
            rings,
            bbox,
        }
    }

    pub fn factory(&self) -> &GeometryFactory {
        &self.factory
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn shell(&self) -> Option<&LinearRing> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[LinearRing] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }

    pub fn rings(&self) -> &[LinearRing] {
        &self.rings
    }

    pub fn area(&self) -> f64 {
        match self.shell() {
            None => 0.,
            Some(shell) => {
                shell.signed_area().abs()
                    - self
                        .holes()
                        .iter()
                        .map(|h| h.signed_area().abs())
                        .sum::<f64>()
            }
        }
    }

    pub fn perimeter(&self) -> f64 {
        self.rings.iter().map(|r| r.length()).sum()
    }

    /// An axis-aligned box: no holes, five shell vertices on the corners of
    /// the bounding box, and edges alternating between horizontal and vertical.
    pub fn is_rectangle(&self) -> bool {
        if self.rings.len() != 1 {
            return false;
        }
        let coords = self.rings[0].coords();
        if coords.len() != 5 {
            return false;
        }
        let bbox = self.bbox;
        for c in coords.iter() {
            if c.x != bbox.x_min && c.x != bbox.x_max {
                return false;
            }
            if c.y != bbox.y_min && c.y != bbox.y_max {
                return false;
            }
        }
        if bbox.width() == 0. || bbox.height() == 0. {
            return false;
        }
        let mut prev = coords.coordinate(0);
        let mut x_changed = None;
        for i in 1..coords.len() {
            let c = coords.coordinate(i);
            let dx = c.x != prev.x;
            let dy = c.y != prev.y;
            if dx == dy {
                return false;
            }
            if x_changed == Some(dx) {
                return false;
            }
            x_changed = Some(dx);
            prev = c;
        }
        true
    }

    pub fn reverse(&self) -> Polygon {
        Polygon::from_parts(self.factory, self.rings.iter().map(|r| r.reverse()).collect())
    }
}

impl HasBoundingBox for Polygon {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
