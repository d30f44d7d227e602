use super::{
    Collection, Geometry, GeometryKind, LineString, LinearRing, Point, Polygon, PrecisionModel,
};
use crate::errors::{GeometryError, Result};
use crate::{BoundingBox, Coordinate, CoordinateSequence};

/// The sole owner of spatial-reference and precision configuration. Every
/// geometry is built through a factory, which quantizes its ordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFactory {
    srid: i32,
    axis_count: usize,
    precision: PrecisionModel,
}

impl Default for GeometryFactory {
    fn default() -> Self {
        GeometryFactory::floating(0)
    }
}

impl GeometryFactory {
    pub fn new(srid: i32, axis_count: usize, precision: PrecisionModel) -> Result<Self> {
        // Validates the axis count.
        CoordinateSequence::empty(axis_count)?;
        Ok(GeometryFactory {
            srid,
            axis_count,
            precision,
        })
    }

    /// A 2-D factory with floating precision.
    pub fn floating(srid: i32) -> Self {
        GeometryFactory {
            srid,
            axis_count: 2,
            precision: PrecisionModel::floating(),
        }
    }

    /// A 2-D factory keeping X and Y on the grid `k / scale`.
    pub fn fixed(srid: i32, scale: f64) -> Self {
        GeometryFactory {
            srid,
            axis_count: 2,
            precision: PrecisionModel::fixed_xy(scale),
        }
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    pub fn with_srid(&self, srid: i32) -> Self {
        GeometryFactory { srid, ..*self }
    }

    /// True if geometries built by `source` can be used as-is by this
    /// factory. A spatial-reference id of 0 is compatible with any id.
    pub fn accepts(&self, source: &GeometryFactory) -> bool {
        let srid_compatible = self.srid == source.srid || self.srid == 0 || source.srid == 0;
        srid_compatible
            && self.axis_count == source.axis_count
            && self.precision.same_on_axes(&source.precision, self.axis_count)
    }

    /// Copy `coords` onto this factory's axis count and precision grid.
    pub fn materialize(&self, coords: &CoordinateSequence) -> Result<CoordinateSequence> {
        let precision = self.precision;
        Ok(coords
            .with_axis_count(self.axis_count)?
            .map_ordinates(|axis, value| precision.make_precise(axis, value)))
    }

    /// Build a geometry of `kind` from one coordinate sequence.
    pub fn create(&self, kind: GeometryKind, coords: &CoordinateSequence) -> Result<Geometry> {
        match kind {
            GeometryKind::Point => self.point(coords),
            GeometryKind::LineString => self.line_string(coords),
            GeometryKind::LinearRing => self.linear_ring(coords),
            GeometryKind::Polygon => self.polygon(&[coords.clone()]),
            GeometryKind::MultiPoint => self.multi_point(coords),
            GeometryKind::MultiLineString => self.multi_line_string(&[coords.clone()]),
            GeometryKind::MultiPolygon => self.multi_polygon(&[vec![coords.clone()]]),
            GeometryKind::GeometryCollection => Err(GeometryError::InvalidGeometryKind {
                kind,
                reason: "a collection is built from child geometries",
            }),
        }
    }

    /// Raw-ordinate ingest: `ordinates` holds `axis_count` values per vertex.
    pub fn from_coordinates(
        &self,
        kind: GeometryKind,
        axis_count: usize,
        ordinates: Vec<f64>,
    ) -> Result<Geometry> {
        let coords = CoordinateSequence::new(axis_count, ordinates)?;
        self.create(kind, &coords)
    }

    pub fn empty(&self, kind: GeometryKind) -> Geometry {
        let coords = CoordinateSequence::from_coordinates(&[]);
        let coords = match coords.with_axis_count(self.axis_count) {
            Ok(c) => c,
            Err(_) => coords,
        };
        match kind {
            GeometryKind::Point => Geometry::Point(Point::from_parts(*self, coords)),
            GeometryKind::LineString => {
                Geometry::LineString(LineString::from_parts(*self, coords))
            }
            GeometryKind::LinearRing => {
                Geometry::LinearRing(LinearRing::from_parts(*self, coords))
            }
            GeometryKind::Polygon => Geometry::Polygon(Polygon::from_parts(*self, Vec::new())),
            GeometryKind::MultiPoint => {
                Geometry::MultiPoint(Collection::from_parts(*self, Vec::new()))
            }
            GeometryKind::MultiLineString => {
                Geometry::MultiLineString(Collection::from_parts(*self, Vec::new()))
            }
            GeometryKind::MultiPolygon => {
                Geometry::MultiPolygon(Collection::from_parts(*self, Vec::new()))
            }
            GeometryKind::GeometryCollection => {
                Geometry::GeometryCollection(Collection::from_parts(*self, Vec::new()))
            }
        }
    }

    pub fn point(&self, coords: &CoordinateSequence) -> Result<Geometry> {
        Ok(Geometry::Point(self.make_point(coords)?))
    }

    pub fn point_xy(&self, coord: Coordinate) -> Geometry {
        Geometry::Point(self.make_point_xy(coord))
    }

    pub fn line_string(&self, coords: &CoordinateSequence) -> Result<Geometry> {
        Ok(Geometry::LineString(self.make_line_string(coords)?))
    }

    pub fn line_string_xy(&self, coords: &[Coordinate]) -> Result<Geometry> {
        self.line_string(&CoordinateSequence::from_coordinates(coords))
    }

    pub fn linear_ring(&self, coords: &CoordinateSequence) -> Result<Geometry> {
        Ok(Geometry::LinearRing(self.make_ring(coords)?))
    }

    /// `rings` is the shell followed by any holes.
    pub fn polygon(&self, rings: &[CoordinateSequence]) -> Result<Geometry> {
        Ok(Geometry::Polygon(self.make_polygon(rings)?))
    }

    pub fn polygon_from_xy(&self, rings: Vec<Vec<(f64, f64)>>) -> Result<Geometry> {
        let rings: Vec<CoordinateSequence> = rings
            .into_iter()
            .map(|ring| {
                let coords: Vec<Coordinate> = ring.into_iter().map(Coordinate::from).collect();
                CoordinateSequence::from_coordinates(&coords)
            })
            .collect();
        self.polygon(&rings)
    }

    /// One point per vertex of `coords`.
    pub fn multi_point(&self, coords: &CoordinateSequence) -> Result<Geometry> {
        let coords = self.materialize(coords)?;
        let points = (0..coords.len())
            .map(|i| {
                let vertex = coords.vertex(i).to_vec();
                CoordinateSequence::new(coords.axis_count(), vertex)
                    .map(|c| Point::from_parts(*self, c))
            })
            .collect::<Result<Vec<Point>>>()?;
        Ok(Geometry::MultiPoint(Collection::from_parts(*self, points)))
    }

    pub fn multi_line_string(&self, lines: &[CoordinateSequence]) -> Result<Geometry> {
        let lines = lines
            .iter()
            .map(|l| self.make_line_string(l))
            .collect::<Result<Vec<LineString>>>()?;
        Ok(Geometry::MultiLineString(Collection::from_parts(
            *self, lines,
        )))
    }

    pub fn multi_polygon(&self, polygons: &[Vec<CoordinateSequence>]) -> Result<Geometry> {
        let polygons = polygons
            .iter()
            .map(|rings| self.make_polygon(rings))
            .collect::<Result<Vec<Polygon>>>()?;
        Ok(Geometry::MultiPolygon(Collection::from_parts(
            *self, polygons,
        )))
    }

    /// Children built by another factory are re-materialized through this one.
    pub fn geometry_collection(&self, geometries: Vec<Geometry>) -> Result<Geometry> {
        let parts = geometries
            .into_iter()
            .map(|g| {
                if self.accepts(g.factory()) {
                    Ok(g)
                } else {
                    g.copy_to(self)
                }
            })
            .collect::<Result<Vec<Geometry>>>()?;
        Ok(Geometry::GeometryCollection(Collection::from_parts(
            *self, parts,
        )))
    }

    /// The polygon covering `bbox`, a point for a degenerate box, or an
    /// empty polygon for the empty box.
    pub fn bounding_box_polygon(&self, bbox: &BoundingBox) -> Result<Geometry> {
        if bbox.is_empty() {
            return Ok(self.empty(GeometryKind::Polygon));
        }
        let corners = bbox.corners();
        if bbox.width() == 0. && bbox.height() == 0. {
            return Ok(self.point_xy(corners[0]));
        }
        if bbox.width() == 0. || bbox.height() == 0. {
            return self.line_string_xy(&[corners[0], corners[2]]);
        }
        let ring = [corners[0], corners[1], corners[2], corners[3], corners[0]];
        self.polygon(&[CoordinateSequence::from_coordinates(&ring)])
    }

    pub(crate) fn make_point(&self, coords: &CoordinateSequence) -> Result<Point> {
        if coords.len() > 1 {
            return Err(GeometryError::InvalidGeometryKind {
                kind: GeometryKind::Point,
                reason: "a point has at most one vertex",
            });
        }
        Ok(Point::from_parts(*self, self.materialize(coords)?))
    }

    pub(crate) fn make_point_xy(&self, coord: Coordinate) -> Point {
        let coords = CoordinateSequence::from_coordinates(&[coord]);
        match self.materialize(&coords) {
            Ok(c) => Point::from_parts(*self, c),
            Err(_) => Point::from_parts(*self, coords),
        }
    }

    pub(crate) fn make_line_string(&self, coords: &CoordinateSequence) -> Result<LineString> {
        if coords.len() == 1 {
            return Err(GeometryError::InvalidGeometryKind {
                kind: GeometryKind::LineString,
                reason: "a line string needs zero or at least two vertices",
            });
        }
        Ok(LineString::from_parts(*self, self.materialize(coords)?))
    }

    pub(crate) fn make_ring(&self, coords: &CoordinateSequence) -> Result<LinearRing> {
        let coords = self.materialize(coords)?;
        if !coords.is_empty() {
            if coords.len() < 4 {
                return Err(GeometryError::InvalidGeometryKind {
                    kind: GeometryKind::LinearRing,
                    reason: "a ring needs at least four vertices",
                });
            }
            if !coords.is_closed() {
                return Err(GeometryError::InvalidGeometryKind {
                    kind: GeometryKind::LinearRing,
                    reason: "a ring must be closed",
                });
            }
        }
        Ok(LinearRing::from_parts(*self, coords))
    }

    pub(crate) fn make_polygon(&self, rings: &[CoordinateSequence]) -> Result<Polygon> {
        let rings = rings
            .iter()
            .map(|r| self.make_ring(r))
            .collect::<Result<Vec<LinearRing>>>()?;
        match rings.split_first() {
            None => Ok(Polygon::from_parts(*self, rings)),
            Some((shell, holes)) => {
                if shell.is_empty() {
                    if holes.is_empty() {
                        Ok(Polygon::from_parts(*self, Vec::new()))
                    } else {
                        Err(GeometryError::InvalidGeometryKind {
                            kind: GeometryKind::Polygon,
                            reason: "an empty shell cannot have holes",
                        })
                    }
                } else if holes.iter().any(|h| h.is_empty()) {
                    Err(GeometryError::InvalidGeometryKind {
                        kind: GeometryKind::Polygon,
                        reason: "holes must not be empty",
                    })
                } else {
                    Ok(Polygon::from_parts(*self, rings))
                }
            }
        }
    }

    pub(crate) fn make_polygon_xy(&self, rings: &[Vec<Coordinate>]) -> Result<Polygon> {
        let rings: Vec<CoordinateSequence> = rings
            .iter()
            .map(|r| CoordinateSequence::from_coordinates(r))
            .collect();
        self.make_polygon(&rings)
    }
}
