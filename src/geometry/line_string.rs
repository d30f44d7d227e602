use super::GeometryFactory;
use crate::algorithms::orientation::signed_area;
use crate::{BoundingBox, Coordinate, CoordinateSequence, HasBoundingBox};

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    factory: GeometryFactory,
    coords: CoordinateSequence,
    bbox: BoundingBox,
}

impl LineString {
    /// The sequence must already be materialized through `factory`.
    pub(crate) fn from_parts(factory: GeometryFactory, coords: CoordinateSequence) -> Self {
        let bbox = coords.bounding_box();
        LineString {
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

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.coords.is_closed()
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.coords.first()
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.coords.last()
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(s, e)| s.distance(e)).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        segments_of(&self.coords)
    }

    pub fn reverse(&self) -> LineString {
        LineString::from_parts(self.factory, self.coords.reversed())
    }
}

impl HasBoundingBox for LineString {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}

/// A closed line string with at least four vertices, or an empty one.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    factory: GeometryFactory,
    coords: CoordinateSequence,
    bbox: BoundingBox,
}

impl LinearRing {
    pub(crate) fn from_parts(factory: GeometryFactory, coords: CoordinateSequence) -> Self {
        let bbox = coords.bounding_box();
        LinearRing {
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

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        segments_of(&self.coords)
    }

    /// Shoelace area: positive when the ring runs counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.coords.to_coordinates())
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(s, e)| s.distance(e)).sum()
    }

    pub fn reverse(&self) -> LinearRing {
        LinearRing::from_parts(self.factory, self.coords.reversed())
    }

    pub fn to_line_string(&self) -> LineString {
        LineString::from_parts(self.factory, self.coords.clone())
    }
}

impl HasBoundingBox for LinearRing {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}

fn segments_of(
    coords: &CoordinateSequence,
) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
    (1..coords.len()).map(move |i| (coords.coordinate(i - 1), coords.coordinate(i)))
}
