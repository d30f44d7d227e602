use super::GeometryFactory;
use crate::{BoundingBox, Coordinate, CoordinateSequence, HasBoundingBox};

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    factory: GeometryFactory,
    coords: CoordinateSequence,
    bbox: BoundingBox,
}

impl Point {
    /// `coords` holds zero or one vertex, already materialized by `factory`.
    pub(crate) fn from_parts(factory: GeometryFactory, coords: CoordinateSequence) -> Self {
        let bbox = coords.bounding_box();
        Point {
            factory,
            coords,
            bbox,
        }
    }

    pub fn factory(&self) -> &GeometryFactory {
        &self.factory
    }

    pub fn coords(&self) -> &CoordinateSequence {
        &self.coords
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coords.first()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

impl HasBoundingBox for Point {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
