use super::conforming::{ConformingDelaunayTriangulator, SplitSnapPolicy};
use super::split::Segment;
use crate::errors::Result;
use crate::geometry::{Collection, Geometry, GeometryFactory};
use crate::{Coordinate, CoordinateSequence};

/// Builds a conforming Delaunay triangulation from geometries: every vertex
/// of the site geometry becomes a site, and every segment of the constraint
/// geometry becomes a constraint.
#[derive(Debug, Default)]
pub struct ConformingDelaunayBuilder {
    sites: Vec<Coordinate>,
    constraints: Vec<Segment>,
    constraint_vertices: Vec<Coordinate>,
    tolerance: f64,
    snap_policy: SplitSnapPolicy,
    triangulator: Option<ConformingDelaunayTriangulator>,
}

impl ConformingDelaunayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sites(&mut self, geometry: &Geometry) {
        let mut sites: Vec<Coordinate> = geometry.vertices().collect();
        sites.sort_by(|a, b| a.compare(b));
        sites.dedup();
        self.sites = sites;
        self.triangulator = None;
    }

    pub fn set_constraints(&mut self, geometry: &Geometry) {
        self.constraint_vertices = geometry.vertices().collect();
        self.constraints = geometry
            .coordinate_sequences()
            .into_iter()
            .flat_map(|s| {
                (1..s.len())
                    .map(|i| Segment::new(s.coordinate(i - 1), s.coordinate(i)))
                    .collect::<Vec<_>>()
            })
            .filter(|s| s.start != s.end)
            .collect();
        self.triangulator = None;
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
        self.triangulator = None;
    }

    pub fn set_split_snap_policy(&mut self, policy: SplitSnapPolicy) {
        self.snap_policy = policy;
        self.triangulator = None;
    }

    /// Run both triangulation phases, once per configuration.
    pub fn triangulate(&mut self) -> Result<&ConformingDelaunayTriangulator> {
        let triangulator = match self.triangulator.take() {
            Some(t) => t,
            None => self.build()?,
        };
        Ok(self.triangulator.insert(triangulator))
    }

    fn build(&self) -> Result<ConformingDelaunayTriangulator> {
        // Sites on a constraint enter with the constraint vertices.
        let mut constrained = self.constraint_vertices.clone();
        constrained.sort_by(|a, b| a.compare(b));
        let sites: Vec<Coordinate> = self
            .sites
            .iter()
            .copied()
            .filter(|s| constrained.binary_search_by(|c| c.compare(s)).is_err())
            .collect();

        let mut triangulator = ConformingDelaunayTriangulator::new(sites, self.tolerance);
        triangulator.set_split_snap_policy(self.snap_policy);
        triangulator.set_constraints(self.constraints.clone(), constrained)?;
        triangulator.form_initial_delaunay()?;
        triangulator.enforce_constraints()?;
        Ok(triangulator)
    }

    /// The triangulation edges as a MultiLineString.
    pub fn edges(&mut self, factory: &GeometryFactory) -> Result<Geometry> {
        let edges = self.triangulate()?.edges()?;
        let lines = edges
            .iter()
            .map(|e| {
                factory.make_line_string(&CoordinateSequence::from_coordinates(&[e.start, e.end]))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Geometry::MultiLineString(Collection::from_parts(*factory, lines)))
    }

    /// The triangles as a GeometryCollection of polygons.
    pub fn triangles(&mut self, factory: &GeometryFactory) -> Result<Geometry> {
        let triangles = self.triangulate()?.triangles()?;
        let polygons = triangles
            .iter()
            .map(|t| {
                factory
                    .make_polygon_xy(&[vec![t[0], t[1], t[2], t[0]]])
                    .map(Geometry::Polygon)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Geometry::GeometryCollection(Collection::from_parts(*factory, polygons)))
    }
}
