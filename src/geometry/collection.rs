use super::{Geometry, GeometryFactory, LineString, Point, Polygon};
use crate::{BoundingBox, HasBoundingBox};

/// A list of parts sharing one factory. The multi-geometries are collections
/// of a single concrete part type; `GeometryCollection` holds any geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    factory: GeometryFactory,
    parts: Vec<T>,
    bbox: BoundingBox,
}

pub type MultiPoint = Collection<Point>;
pub type MultiLineString = Collection<LineString>;
pub type MultiPolygon = Collection<Polygon>;
pub type GeometryCollection = Collection<Geometry>;

impl<T: HasBoundingBox> Collection<T> {
    pub(crate) fn from_parts(factory: GeometryFactory, parts: Vec<T>) -> Self {
        let bbox = parts.iter().fold(BoundingBox::new_empty(), |mut b, p| {
            b.expand(p.bounding_box());
            b
        });
        Collection {
            factory,
            parts,
            bbox,
        }
    }
}

impl<T> Collection<T> {
    pub fn factory(&self) -> &GeometryFactory {
        &self.factory
    }

    pub fn parts(&self) -> &[T] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bbox.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.parts.iter()
    }
}

impl<T> HasBoundingBox for Collection<T> {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}
