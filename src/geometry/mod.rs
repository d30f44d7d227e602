mod collection;
mod factory;
mod line_string;
mod point;
mod polygon;
mod precision;

pub use collection::{
    Collection, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon,
};
pub use factory::GeometryFactory;
pub use line_string::{LineString, LinearRing};
pub use point::Point;
pub use polygon::Polygon;
pub use precision::PrecisionModel;

use crate::algorithms::convex_hull::convex_hull;
use crate::errors::{GeometryError, Result};
use crate::{BoundingBox, Coordinate, CoordinateSequence, HasBoundingBox};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

/// The concrete kinds, declared in their sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    LinearRing,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Topological dimension, with `False` standing for "no points at all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    False,
    Zero,
    One,
    Two,
}

impl Dimension {
    /// -1 for `False`, otherwise the dimension itself.
    pub fn value(self) -> i8 {
        match self {
            Dimension::False => -1,
            Dimension::Zero => 0,
            Dimension::One => 1,
            Dimension::Two => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Dimension::False => 'F',
            Dimension::Zero => '0',
            Dimension::One => '1',
            Dimension::Two => '2',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl HasBoundingBox for Geometry {
    fn bounding_box(&self) -> BoundingBox {
        match self {
            Geometry::Point(g) => g.bounding_box(),
            Geometry::LineString(g) => g.bounding_box(),
            Geometry::LinearRing(g) => g.bounding_box(),
            Geometry::Polygon(g) => g.bounding_box(),
            Geometry::MultiPoint(g) => g.bounding_box(),
            Geometry::MultiLineString(g) => g.bounding_box(),
            Geometry::MultiPolygon(g) => g.bounding_box(),
            Geometry::GeometryCollection(g) => g.bounding_box(),
        }
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::LinearRing(_) => GeometryKind::LinearRing,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    pub fn factory(&self) -> &GeometryFactory {
        match self {
            Geometry::Point(g) => g.factory(),
            Geometry::LineString(g) => g.factory(),
            Geometry::LinearRing(g) => g.factory(),
            Geometry::Polygon(g) => g.factory(),
            Geometry::MultiPoint(g) => g.factory(),
            Geometry::MultiLineString(g) => g.factory(),
            Geometry::MultiPolygon(g) => g.factory(),
            Geometry::GeometryCollection(g) => g.factory(),
        }
    }

    pub fn srid(&self) -> i32 {
        self.factory().srid()
    }

    pub fn axis_count(&self) -> usize {
        self.factory().axis_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bounding_box().is_empty()
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Dimension::Zero,
            Geometry::LineString(_) | Geometry::LinearRing(_) | Geometry::MultiLineString(_) => {
                Dimension::One
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Dimension::Two,
            Geometry::GeometryCollection(c) => c
                .iter()
                .map(|g| g.dimension())
                .max()
                .unwrap_or(Dimension::False),
        }
    }

    /// The dimension of the boundary: `False` for points and for closed
    /// curves, `Zero` for open curves, `One` for areas.
    pub fn boundary_dimension(&self) -> Dimension {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) | Geometry::LinearRing(_) => {
                Dimension::False
            }
            Geometry::LineString(l) => {
                if mod2_boundary(std::iter::once(l.coords())).is_empty() {
                    Dimension::False
                } else {
                    Dimension::Zero
                }
            }
            Geometry::MultiLineString(m) => {
                if mod2_boundary(m.iter().map(|l| l.coords())).is_empty() {
                    Dimension::False
                } else {
                    Dimension::Zero
                }
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Dimension::One,
            Geometry::GeometryCollection(c) => c
                .iter()
                .map(|g| g.boundary_dimension())
                .max()
                .unwrap_or(Dimension::False),
        }
    }

    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(c) => c.len(),
            Geometry::MultiLineString(c) => c.len(),
            Geometry::MultiPolygon(c) => c.len(),
            Geometry::GeometryCollection(c) => c.len(),
            _ => 1,
        }
    }

    /// The `index`th part of a collection; an atomic geometry is its own
    /// only part.
    pub fn geometry_n(&self, index: usize) -> Option<Geometry> {
        match self {
            Geometry::MultiPoint(c) => c.parts().get(index).cloned().map(Geometry::Point),
            Geometry::MultiLineString(c) => {
                c.parts().get(index).cloned().map(Geometry::LineString)
            }
            Geometry::MultiPolygon(c) => c.parts().get(index).cloned().map(Geometry::Polygon),
            Geometry::GeometryCollection(c) => c.parts().get(index).cloned(),
            _ if index == 0 => Some(self.clone()),
            _ => None,
        }
    }

    pub fn coordinate_sequences(&self) -> Vec<&CoordinateSequence> {
        let mut sequences = Vec::new();
        self.collect_sequences(&mut sequences);
        sequences
    }

    fn collect_sequences<'a>(&'a self, out: &mut Vec<&'a CoordinateSequence>) {
        match self {
            Geometry::Point(p) => out.push(p.coords()),
            Geometry::LineString(l) => out.push(l.coords()),
            Geometry::LinearRing(r) => out.push(r.coords()),
            Geometry::Polygon(p) => out.extend(p.rings().iter().map(|r| r.coords())),
            Geometry::MultiPoint(c) => out.extend(c.iter().map(|p| p.coords())),
            Geometry::MultiLineString(c) => out.extend(c.iter().map(|l| l.coords())),
            Geometry::MultiPolygon(c) => {
                for p in c.iter() {
                    out.extend(p.rings().iter().map(|r| r.coords()));
                }
            }
            Geometry::GeometryCollection(c) => {
                for g in c.iter() {
                    g.collect_sequences(out);
                }
            }
        }
    }

    /// Every vertex in storage order. The iterator can be recreated at will
    /// and never outlives the geometry.
    pub fn vertices(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.coordinate_sequences()
            .into_iter()
            .flat_map(|s| s.iter())
    }

    pub fn is_rectangle(&self) -> bool {
        match self {
            Geometry::Polygon(p) => p.is_rectangle(),
            _ => false,
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(c) => c.iter().map(|p| p.area()).sum(),
            Geometry::GeometryCollection(c) => c.iter().map(|g| g.area()).sum(),
            _ => 0.,
        }
    }

    /// Curve length, or perimeter for areas.
    pub fn length(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0.,
            Geometry::LineString(l) => l.length(),
            Geometry::LinearRing(r) => r.length(),
            Geometry::Polygon(p) => p.perimeter(),
            Geometry::MultiLineString(c) => c.iter().map(|l| l.length()).sum(),
            Geometry::MultiPolygon(c) => c.iter().map(|p| p.perimeter()).sum(),
            Geometry::GeometryCollection(c) => c.iter().map(|g| g.length()).sum(),
        }
    }

    pub fn reverse(&self) -> Geometry {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => self.clone(),
            Geometry::LineString(l) => Geometry::LineString(l.reverse()),
            Geometry::LinearRing(r) => Geometry::LinearRing(r.reverse()),
            Geometry::Polygon(p) => Geometry::Polygon(p.reverse()),
            Geometry::MultiLineString(c) => Geometry::MultiLineString(Collection::from_parts(
                *c.factory(),
                c.iter().map(|l| l.reverse()).collect(),
            )),
            Geometry::MultiPolygon(c) => Geometry::MultiPolygon(Collection::from_parts(
                *c.factory(),
                c.iter().map(|p| p.reverse()).collect(),
            )),
            Geometry::GeometryCollection(c) => {
                Geometry::GeometryCollection(Collection::from_parts(
                    *c.factory(),
                    c.iter().map(|g| g.reverse()).collect(),
                ))
            }
        }
    }

    /// A total order: kind rank, then empty before non-empty, then vertex
    /// by vertex.
    pub fn compare_to(&self, other: &Geometry) -> Ordering {
        let by_kind = self.kind().cmp(&other.kind());
        if by_kind != Ordering::Equal {
            return by_kind;
        }
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => a.coords().compare(b.coords()),
            (Geometry::LineString(a), Geometry::LineString(b)) => a.coords().compare(b.coords()),
            (Geometry::LinearRing(a), Geometry::LinearRing(b)) => a.coords().compare(b.coords()),
            (Geometry::Polygon(a), Geometry::Polygon(b)) => compare_polygons(a, b),
            (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => {
                compare_parts(a.parts(), b.parts(), |p, q| p.coords().compare(q.coords()))
            }
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
                compare_parts(a.parts(), b.parts(), |p, q| p.coords().compare(q.coords()))
            }
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
                compare_parts(a.parts(), b.parts(), compare_polygons)
            }
            (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => {
                compare_parts(a.parts(), b.parts(), |p, q| p.compare_to(q))
            }
            _ => Ordering::Equal,
        }
    }

    /// Same kind, same axis count, compatible spatial reference, and
    /// identical ordinates on every axis.
    pub fn equals_exact(&self, other: &Geometry) -> bool {
        let axis_count = self.axis_count();
        let srid_compatible =
            self.srid() == other.srid() || self.srid() == 0 || other.srid() == 0;
        axis_count == other.axis_count()
            && srid_compatible
            && self.structurally_equal(other, &|a: &CoordinateSequence, b| {
                a.equals(b, axis_count)
            })
    }

    /// Same structure, with matching XY vertices no more than `tolerance`
    /// apart.
    pub fn equals_exact_tolerance(&self, other: &Geometry, tolerance: f64) -> bool {
        self.structurally_equal(other, &|a: &CoordinateSequence, b| {
            a.equals_tolerance(b, tolerance)
        })
    }

    fn structurally_equal<F>(&self, other: &Geometry, eq: &F) -> bool
    where
        F: Fn(&CoordinateSequence, &CoordinateSequence) -> bool,
    {
        let polygons_equal = |a: &Polygon, b: &Polygon| {
            a.rings().len() == b.rings().len()
                && a
                    .rings()
                    .iter()
                    .zip(b.rings())
                    .all(|(r, s)| eq(r.coords(), s.coords()))
        };
        match (self, other) {
            (Geometry::Point(a), Geometry::Point(b)) => eq(a.coords(), b.coords()),
            (Geometry::LineString(a), Geometry::LineString(b)) => eq(a.coords(), b.coords()),
            (Geometry::LinearRing(a), Geometry::LinearRing(b)) => eq(a.coords(), b.coords()),
            (Geometry::Polygon(a), Geometry::Polygon(b)) => polygons_equal(a, b),
            (Geometry::MultiPoint(a), Geometry::MultiPoint(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(p, q)| eq(p.coords(), q.coords()))
            }
            (Geometry::MultiLineString(a), Geometry::MultiLineString(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(p, q)| eq(p.coords(), q.coords()))
            }
            (Geometry::MultiPolygon(a), Geometry::MultiPolygon(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(p, q)| polygons_equal(p, q))
            }
            (Geometry::GeometryCollection(a), Geometry::GeometryCollection(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|(p, q)| p.structurally_equal(q, eq))
            }
            _ => false,
        }
    }

    /// This geometry as seen by `target`: borrowed when the factories agree,
    /// otherwise a deep copy re-quantized to the target precision. A target
    /// spatial reference of 0 keeps the source's id.
    pub fn convert(&self, target: &GeometryFactory) -> Result<Cow<'_, Geometry>> {
        if target.accepts(self.factory()) {
            return Ok(Cow::Borrowed(self));
        }
        let target = if target.srid() == 0 {
            target.with_srid(self.srid())
        } else {
            *target
        };
        Ok(Cow::Owned(self.copy_to(&target)?))
    }

    /// A deep copy built through `factory`.
    pub fn copy_to(&self, factory: &GeometryFactory) -> Result<Geometry> {
        Ok(match self {
            Geometry::Point(p) => Geometry::Point(factory.make_point(p.coords())?),
            Geometry::LineString(l) => Geometry::LineString(factory.make_line_string(l.coords())?),
            Geometry::LinearRing(r) => Geometry::LinearRing(factory.make_ring(r.coords())?),
            Geometry::Polygon(p) => Geometry::Polygon(copy_polygon(p, factory)?),
            Geometry::MultiPoint(c) => {
                let parts = c
                    .iter()
                    .map(|p| factory.make_point(p.coords()))
                    .collect::<Result<Vec<Point>>>()?;
                Geometry::MultiPoint(Collection::from_parts(*factory, parts))
            }
            Geometry::MultiLineString(c) => {
                let parts = c
                    .iter()
                    .map(|l| factory.make_line_string(l.coords()))
                    .collect::<Result<Vec<LineString>>>()?;
                Geometry::MultiLineString(Collection::from_parts(*factory, parts))
            }
            Geometry::MultiPolygon(c) => {
                let parts = c
                    .iter()
                    .map(|p| copy_polygon(p, factory))
                    .collect::<Result<Vec<Polygon>>>()?;
                Geometry::MultiPolygon(Collection::from_parts(*factory, parts))
            }
            Geometry::GeometryCollection(c) => {
                let parts = c
                    .iter()
                    .map(|g| g.copy_to(factory))
                    .collect::<Result<Vec<Geometry>>>()?;
                Geometry::GeometryCollection(Collection::from_parts(*factory, parts))
            }
        })
    }

    /// The smallest convex geometry containing every vertex: an empty
    /// collection, a point, a line string or a polygon.
    pub fn convex_hull(&self) -> Result<Geometry> {
        let factory = self.factory();
        let mut hull = convex_hull(self.vertices().collect());
        match hull.len() {
            0 => Ok(factory.empty(GeometryKind::GeometryCollection)),
            1 => Ok(factory.point_xy(hull[0])),
            2 => factory.line_string_xy(&hull),
            _ => {
                hull.push(hull[0]);
                factory.polygon(&[CoordinateSequence::from_coordinates(&hull)])
            }
        }
    }

    /// Fails for a collection mixing kinds; homogeneous collections are
    /// accepted by relate and overlay.
    pub(crate) fn check_homogeneous(&self) -> Result<()> {
        if let Geometry::GeometryCollection(c) = self {
            let mut kinds = c.iter().map(|g| match g.kind() {
                GeometryKind::MultiPoint => GeometryKind::Point,
                GeometryKind::MultiLineString | GeometryKind::LinearRing => {
                    GeometryKind::LineString
                }
                GeometryKind::MultiPolygon => GeometryKind::Polygon,
                kind => kind,
            });
            if let Some(first) = kinds.next() {
                if first == GeometryKind::GeometryCollection || kinds.any(|k| k != first) {
                    return Err(GeometryError::UnsupportedGeometryCollection);
                }
            }
        }
        Ok(())
    }
}

fn copy_polygon(polygon: &Polygon, factory: &GeometryFactory) -> Result<Polygon> {
    let rings: Vec<CoordinateSequence> = polygon
        .rings()
        .iter()
        .map(|r| r.coords().clone())
        .collect();
    factory.make_polygon(&rings)
}

fn compare_polygons(a: &Polygon, b: &Polygon) -> Ordering {
    compare_parts(a.rings(), b.rings(), |r, s| r.coords().compare(s.coords()))
}

fn compare_parts<T, F>(a: &[T], b: &[T], compare: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    for (p, q) in a.iter().zip(b.iter()) {
        let ordering = compare(p, q);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

/// Endpoints that occur an odd number of times over all `lines`.
pub(crate) fn mod2_boundary<'a, I>(lines: I) -> Vec<Coordinate>
where
    I: Iterator<Item = &'a CoordinateSequence>,
{
    let mut counts: HashMap<(u64, u64), (Coordinate, usize)> = HashMap::new();
    for line in lines {
        if let (Some(start), Some(end)) = (line.first(), line.last()) {
            for c in [start, end].iter() {
                counts.entry(c.key()).or_insert((*c, 0)).1 += 1;
            }
        }
    }
    let mut boundary: Vec<Coordinate> = counts
        .values()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(c, _)| *c)
        .collect();
    boundary.sort_by(|a, b| a.compare(b));
    boundary
}
