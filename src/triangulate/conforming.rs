use super::quadedge::Subdivision;
use super::split::{ConstraintSplitPointFinder, NonEncroachingSplitPointFinder, Segment};
use crate::algorithms::convex_hull::convex_hull;
use crate::errors::{EnforcementFailure, GeometryError, Result};
use crate::geometry::GeometryKind;
use crate::index::KdTree;
use crate::{BoundingBox, Coordinate};

/// Passes over the constraint list before enforcement gives up.
pub const MAX_SPLIT_ITERATIONS: usize = 99;
/// Margin added around the sites, as a fraction of their larger extent.
pub const ENVELOPE_PADDING_FRACTION: f64 = 0.2;
/// Margin used when the sites have no extent at all.
const DEGENERATE_PADDING: f64 = 1.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangulationState {
    Uninitialized,
    InitialDelaunayFormed,
    ConstraintsEnforced,
}

/// What to do when a split point lands within tolerance of an existing
/// site and snaps onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSnapPolicy {
    /// Split at the existing site, log a warning and keep a `SplitAnomaly`.
    Record,
    /// Stop with `ConstraintEnforcementFailure`.
    Fail,
}

impl Default for SplitSnapPolicy {
    fn default() -> Self {
        SplitSnapPolicy::Record
    }
}

/// A split point that snapped onto an existing site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitAnomaly {
    pub segment: Segment,
    pub intended: Coordinate,
    pub snapped_to: Coordinate,
}

/// A triangulation site, flagged when it lies on a constraint segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintVertex {
    coordinate: Coordinate,
    on_constraint: bool,
}

impl ConstraintVertex {
    pub fn new(coordinate: Coordinate, on_constraint: bool) -> Self {
        ConstraintVertex {
            coordinate,
            on_constraint,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn is_on_constraint(&self) -> bool {
        self.on_constraint
    }

    fn merge(&mut self, other: &ConstraintVertex) {
        self.on_constraint |= other.on_constraint;
    }
}

/// A Delaunay triangulation of a set of sites, refined with Steiner points
/// until every constraint segment satisfies the Gabriel condition and so
/// appears as a chain of triangulation edges.
///
/// ```
/// use planar_kernel::triangulate::{ConformingDelaunayTriangulator, Segment};
///
/// let sites = vec![(0., 0.).into(), (10., 0.).into(), (5., 1.).into()];
/// let mut cdt = ConformingDelaunayTriangulator::new(sites, 0.);
/// cdt.set_constraints(vec![Segment::new((0., 0.).into(), (10., 0.).into())], vec![])
///     .unwrap();
/// cdt.form_initial_delaunay().unwrap();
/// cdt.enforce_constraints().unwrap();
/// assert!(cdt.constraint_segments().len() > 1);
/// ```
#[derive(Debug)]
pub struct ConformingDelaunayTriangulator {
    initial_vertices: Vec<ConstraintVertex>,
    segment_vertices: Vec<ConstraintVertex>,
    segments: Vec<Segment>,
    tolerance: f64,
    split_finder: Box<dyn ConstraintSplitPointFinder>,
    snap_policy: SplitSnapPolicy,
    state: TriangulationState,
    kd_tree: KdTree<ConstraintVertex>,
    subdivision: Option<Subdivision>,
    anomalies: Vec<SplitAnomaly>,
    last_split_point: Option<Coordinate>,
}

impl ConformingDelaunayTriangulator {
    /// Sites closer than `tolerance` are merged into one.
    pub fn new(initial_vertices: Vec<Coordinate>, tolerance: f64) -> Self {
        ConformingDelaunayTriangulator {
            initial_vertices: initial_vertices
                .into_iter()
                .map(|c| ConstraintVertex::new(c, false))
                .collect(),
            segment_vertices: Vec::new(),
            segments: Vec::new(),
            tolerance,
            split_finder: Box::new(NonEncroachingSplitPointFinder),
            snap_policy: SplitSnapPolicy::default(),
            state: TriangulationState::Uninitialized,
            kd_tree: KdTree::new(tolerance),
            subdivision: None,
            anomalies: Vec::new(),
            last_split_point: None,
        }
    }

    /// Set the constraint segments. Their endpoints are added to
    /// `segment_vertices`, which may also hold other constrained sites.
    pub fn set_constraints(
        &mut self,
        segments: Vec<Segment>,
        segment_vertices: Vec<Coordinate>,
    ) -> Result<()> {
        self.expect_state(TriangulationState::Uninitialized)?;
        let mut vertices = segment_vertices;
        vertices.extend(segments.iter().flat_map(|s| vec![s.start, s.end]));
        vertices.sort_by(|a, b| a.compare(b));
        vertices.dedup();
        self.segment_vertices = vertices
            .into_iter()
            .map(|c| ConstraintVertex::new(c, true))
            .collect();
        self.segments = segments;
        Ok(())
    }

    pub fn set_split_point_finder(&mut self, finder: Box<dyn ConstraintSplitPointFinder>) {
        self.split_finder = finder;
    }

    pub fn set_split_snap_policy(&mut self, policy: SplitSnapPolicy) {
        self.snap_policy = policy;
    }

    pub fn state(&self) -> TriangulationState {
        self.state
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The constraint segments, split into their conforming pieces once
    /// constraints have been enforced.
    pub fn constraint_segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn anomalies(&self) -> &[SplitAnomaly] {
        &self.anomalies
    }

    pub fn last_split_point(&self) -> Option<Coordinate> {
        self.last_split_point
    }

    /// Distinct sites in the triangulation, Steiner points included.
    pub fn site_count(&self) -> usize {
        self.kd_tree.len()
    }

    /// Every distinct site with its merged constraint flag.
    pub fn vertices(&self) -> Vec<ConstraintVertex> {
        self.kd_tree.nodes().iter().map(|n| *n.data()).collect()
    }

    /// Counter-clockwise hull of all sites and constraint vertices.
    pub fn convex_hull(&self) -> Vec<Coordinate> {
        convex_hull(
            self.initial_vertices
                .iter()
                .chain(self.segment_vertices.iter())
                .map(|v| v.coordinate)
                .collect(),
        )
    }

    fn expect_state(&self, expected: TriangulationState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GeometryError::InvalidTriangulationState {
                expected,
                actual: self.state,
            })
        }
    }

    /// The extent of all sites, padded on every side.
    fn padded_extent(&self) -> BoundingBox {
        let mut extent = BoundingBox::of_coordinates(
            self.initial_vertices
                .iter()
                .chain(self.segment_vertices.iter())
                .map(|v| v.coordinate),
        );
        if extent.is_empty() {
            extent = BoundingBox::of_point(Coordinate::new(0., 0.));
        }
        let padding = extent.width().max(extent.height()) * ENVELOPE_PADDING_FRACTION;
        extent.expanded_by(if padding > 0. {
            padding
        } else {
            DEGENERATE_PADDING
        })
    }

    /// Triangulate the initial sites. Constraint vertices only shape the
    /// frame at this stage.
    pub fn form_initial_delaunay(&mut self) -> Result<()> {
        self.expect_state(TriangulationState::Uninitialized)?;
        let all_finite = self
            .initial_vertices
            .iter()
            .chain(self.segment_vertices.iter())
            .all(|v| v.coordinate.is_finite());
        if !all_finite {
            return Err(GeometryError::InvalidGeometryKind {
                kind: GeometryKind::Point,
                reason: "triangulation sites must be finite",
            });
        }

        self.subdivision = Some(Subdivision::new(self.padded_extent(), self.tolerance));
        let sites = std::mem::take(&mut self.initial_vertices);
        for site in sites.iter() {
            self.insert_site(*site)?;
        }
        self.initial_vertices = sites;
        self.state = TriangulationState::InitialDelaunayFormed;
        tracing::debug!(
            sites = self.site_count(),
            "formed initial Delaunay triangulation"
        );
        Ok(())
    }

    /// Insert a site unless one lies within tolerance; either way return
    /// the site that now stands for it.
    fn insert_site(&mut self, vertex: ConstraintVertex) -> Result<ConstraintVertex> {
        let node = self.kd_tree.insert(vertex.coordinate, vertex);
        if node.is_repeated() {
            node.data_mut().merge(&vertex);
            return Ok(*node.data());
        }
        if let Some(subdivision) = self.subdivision.as_mut() {
            subdivision.insert_site(vertex.coordinate)?;
        }
        Ok(vertex)
    }

    /// Split constraint segments until none has a site inside its Gabriel
    /// circle. Running again after convergence inserts nothing.
    pub fn enforce_constraints(&mut self) -> Result<()> {
        if self.state == TriangulationState::Uninitialized {
            return Err(GeometryError::InvalidTriangulationState {
                expected: TriangulationState::InitialDelaunayFormed,
                actual: self.state,
            });
        }
        let constraint_vertices = std::mem::take(&mut self.segment_vertices);
        for vertex in constraint_vertices.iter() {
            self.insert_site(*vertex)?;
        }
        self.segment_vertices = constraint_vertices;

        let mut passes = 0;
        loop {
            let splits = self.enforce_gabriel()?;
            passes += 1;
            tracing::debug!(pass = passes, splits, "constraint enforcement pass");
            if splits == 0 {
                break;
            }
            if passes == MAX_SPLIT_ITERATIONS {
                let split_point = self
                    .last_split_point
                    .unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN));
                let segment = self
                    .segments
                    .iter()
                    .find(|s| self.find_non_gabriel_point(s).is_some())
                    .map_or((split_point, split_point), |s| (s.start, s.end));
                return Err(GeometryError::ConstraintEnforcementFailure {
                    cause: EnforcementFailure::IterationLimit,
                    split_point,
                    segment,
                });
            }
        }
        self.state = TriangulationState::ConstraintsEnforced;
        Ok(())
    }

    /// One pass over the constraint list. Returns the number of splits.
    fn enforce_gabriel(&mut self) -> Result<usize> {
        let mut splits = 0;
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in std::mem::take(&mut self.segments) {
            let encroaching = match self.find_non_gabriel_point(&segment) {
                Some(c) => c,
                None => {
                    segments.push(segment);
                    continue;
                }
            };
            let split_point = self.split_finder.find_split_point(&segment, encroaching);
            self.last_split_point = Some(split_point);
            let inserted = self.insert_site(ConstraintVertex::new(split_point, true))?;
            let at = inserted.coordinate;
            if at != split_point {
                match self.snap_policy {
                    SplitSnapPolicy::Fail => {
                        return Err(GeometryError::ConstraintEnforcementFailure {
                            cause: EnforcementFailure::SplitPointSnapped,
                            split_point,
                            segment: (segment.start, segment.end),
                        });
                    }
                    SplitSnapPolicy::Record => {
                        tracing::warn!(
                            x = split_point.x,
                            y = split_point.y,
                            snapped_x = at.x,
                            snapped_y = at.y,
                            "split point snapped to an existing site"
                        );
                        self.anomalies.push(SplitAnomaly {
                            segment,
                            intended: split_point,
                            snapped_to: at,
                        });
                    }
                }
            }
            segments.push(Segment::new(segment.start, at));
            segments.push(Segment::new(at, segment.end));
            splits += 1;
        }
        self.segments = segments;
        Ok(splits)
    }

    /// The site closest to the midpoint among those strictly inside the
    /// circle with `segment` as diameter, ignoring its endpoints.
    fn find_non_gabriel_point(&self, segment: &Segment) -> Option<Coordinate> {
        let midpoint = segment.midpoint();
        let radius = segment.start.distance(midpoint);
        let search = BoundingBox::of_point(midpoint).expanded_by(radius);
        self.kd_tree
            .query(search)
            .into_iter()
            .map(|node| node.coordinate())
            .filter(|c| *c != segment.start && *c != segment.end)
            .map(|c| (c, midpoint.distance(c)))
            .filter(|(_, d)| *d < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }

    fn subdivision(&self) -> Result<&Subdivision> {
        match self.subdivision.as_ref() {
            Some(s) => Ok(s),
            None => Err(GeometryError::InvalidTriangulationState {
                expected: TriangulationState::InitialDelaunayFormed,
                actual: self.state,
            }),
        }
    }

    /// Triangles of the current triangulation, counter-clockwise, without
    /// those touching the enclosing frame.
    pub fn triangles(&self) -> Result<Vec<[Coordinate; 3]>> {
        let subdivision = self.subdivision()?;
        Ok(subdivision
            .triangles()
            .into_iter()
            .map(|t| {
                [
                    subdivision.vertex(t[0]),
                    subdivision.vertex(t[1]),
                    subdivision.vertex(t[2]),
                ]
            })
            .collect())
    }

    /// Edges of the current triangulation, without those touching the
    /// enclosing frame.
    pub fn edges(&self) -> Result<Vec<Segment>> {
        let subdivision = self.subdivision()?;
        Ok(subdivision
            .edges()
            .into_iter()
            .map(|(a, b)| Segment::new(subdivision.vertex(a), subdivision.vertex(b)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::split::MidpointSplitPointFinder;

    fn coords(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().map(|p| (*p).into()).collect()
    }

    fn segment(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(a.into(), b.into())
    }

    fn triangulator(
        sites: &[(f64, f64)],
        segments: Vec<Segment>,
        tolerance: f64,
    ) -> ConformingDelaunayTriangulator {
        let mut cdt = ConformingDelaunayTriangulator::new(coords(sites), tolerance);
        cdt.set_constraints(segments, vec![]).unwrap();
        cdt
    }

    fn assert_gabriel(cdt: &ConformingDelaunayTriangulator) {
        let sites: Vec<Coordinate> = cdt.vertices().iter().map(|v| v.coordinate()).collect();
        for s in cdt.constraint_segments() {
            let midpoint = s.midpoint();
            let radius = s.length() / 2.;
            for site in sites.iter() {
                if *site == s.start || *site == s.end {
                    continue;
                }
                assert!(
                    midpoint.distance(*site) >= radius,
                    "{} encroaches {:?}",
                    site,
                    s
                );
            }
        }
    }

    fn has_edge(cdt: &ConformingDelaunayTriangulator, s: &Segment) -> bool {
        cdt.edges()
            .unwrap()
            .iter()
            .any(|e| e == s || e.reversed() == *s)
    }

    #[test]
    fn test_state_machine() {
        let mut cdt = triangulator(&[(0., 0.), (1., 0.), (0., 1.)], vec![], 0.);
        assert_eq!(cdt.state(), TriangulationState::Uninitialized);
        assert_eq!(
            cdt.enforce_constraints(),
            Err(GeometryError::InvalidTriangulationState {
                expected: TriangulationState::InitialDelaunayFormed,
                actual: TriangulationState::Uninitialized,
            })
        );
        assert!(cdt.triangles().is_err());

        cdt.form_initial_delaunay().unwrap();
        assert_eq!(cdt.state(), TriangulationState::InitialDelaunayFormed);
        assert_eq!(cdt.triangles().unwrap().len(), 1);
        assert!(matches!(
            cdt.form_initial_delaunay(),
            Err(GeometryError::InvalidTriangulationState { .. })
        ));
        assert!(cdt.set_constraints(vec![], vec![]).is_err());

        cdt.enforce_constraints().unwrap();
        assert_eq!(cdt.state(), TriangulationState::ConstraintsEnforced);
    }

    #[test]
    fn test_non_finite_site() {
        let mut cdt = triangulator(&[(0., 0.), (f64::NAN, 1.)], vec![], 0.);
        assert!(matches!(
            cdt.form_initial_delaunay(),
            Err(GeometryError::InvalidGeometryKind { .. })
        ));
        assert_eq!(cdt.state(), TriangulationState::Uninitialized);
    }

    #[test]
    fn test_duplicate_sites_merge() {
        let mut cdt = triangulator(
            &[(0., 0.), (4., 0.), (0., 3.), (4., 0.)],
            vec![segment((0., 0.), (4., 0.))],
            0.,
        );
        cdt.form_initial_delaunay().unwrap();
        assert_eq!(cdt.site_count(), 3);
        cdt.enforce_constraints().unwrap();
        assert_eq!(cdt.site_count(), 3);
        let on_constraint: Vec<bool> = cdt
            .vertices()
            .iter()
            .map(|v| v.is_on_constraint())
            .collect();
        assert_eq!(on_constraint, vec![true, true, false]);
    }

    #[test]
    fn test_encroached_segment_is_split() {
        let mut cdt = triangulator(
            &[(0., 0.), (10., 0.), (4., 1.), (5., 8.)],
            vec![segment((0., 0.), (10., 0.))],
            0.,
        );
        cdt.form_initial_delaunay().unwrap();
        cdt.enforce_constraints().unwrap();

        assert!(cdt.constraint_segments().len() > 1);
        assert!(cdt.anomalies().is_empty());
        assert_gabriel(&cdt);
        for s in cdt.constraint_segments() {
            assert_eq!(s.start.y, 0.);
            assert_eq!(s.end.y, 0.);
            assert!(has_edge(&cdt, s), "{:?} is not an edge", s);
        }
        let total: f64 = cdt.constraint_segments().iter().map(|s| s.length()).sum();
        assert!((total - 10.).abs() < 1e-12);
    }

    #[test]
    fn test_enforcement_is_idempotent() {
        let mut cdt = triangulator(
            &[(1., 1.), (3., -1.), (6., 0.5), (8., -0.5)],
            vec![segment((0., 0.), (10., 0.)), segment((10., 0.), (10., 10.))],
            0.,
        );
        cdt.form_initial_delaunay().unwrap();
        cdt.enforce_constraints().unwrap();
        assert_gabriel(&cdt);

        let sites = cdt.site_count();
        let segments = cdt.constraint_segments().to_vec();
        cdt.enforce_constraints().unwrap();
        assert_eq!(cdt.site_count(), sites);
        assert_eq!(cdt.constraint_segments(), &segments[..]);
    }

    #[test]
    fn test_midpoint_finder() {
        let mut cdt = triangulator(
            &[(2., 0.5), (7., -1.)],
            vec![segment((0., 0.), (10., 0.))],
            0.,
        );
        cdt.set_split_point_finder(Box::new(MidpointSplitPointFinder));
        cdt.form_initial_delaunay().unwrap();
        cdt.enforce_constraints().unwrap();
        assert_gabriel(&cdt);
        assert!(cdt
            .constraint_segments()
            .iter()
            .any(|s| s.end == Coordinate::new(5., 0.)));
    }

    #[test]
    fn test_snapped_split_is_recorded() {
        let mut cdt = triangulator(&[(5., 0.5)], vec![segment((0., 0.), (10., 0.))], 1.);
        cdt.form_initial_delaunay().unwrap();
        cdt.enforce_constraints().unwrap();

        assert_eq!(
            cdt.anomalies(),
            &[SplitAnomaly {
                segment: segment((0., 0.), (10., 0.)),
                intended: (5., 0.).into(),
                snapped_to: (5., 0.5).into(),
            }]
        );
        assert_eq!(
            cdt.constraint_segments(),
            &[segment((0., 0.), (5., 0.5)), segment((5., 0.5), (10., 0.))]
        );
        assert_eq!(cdt.site_count(), 3);
        assert!(cdt.vertices().iter().all(|v| v.is_on_constraint()));
    }

    #[test]
    fn test_snapped_split_fails() {
        let mut cdt = triangulator(&[(5., 0.5)], vec![segment((0., 0.), (10., 0.))], 1.);
        cdt.set_split_snap_policy(SplitSnapPolicy::Fail);
        cdt.form_initial_delaunay().unwrap();
        assert_eq!(
            cdt.enforce_constraints(),
            Err(GeometryError::ConstraintEnforcementFailure {
                cause: EnforcementFailure::SplitPointSnapped,
                split_point: (5., 0.).into(),
                segment: ((0., 0.).into(), (10., 0.).into()),
            })
        );
        assert_eq!(cdt.last_split_point(), Some((5., 0.).into()));
    }

    #[test]
    fn test_convex_hull() {
        let cdt = triangulator(
            &[(1., 1.), (2., 2.), (0., 3.)],
            vec![segment((0., 0.), (4., 0.))],
            0.,
        );
        assert_eq!(
            cdt.convex_hull(),
            coords(&[(0., 0.), (4., 0.), (2., 2.), (0., 3.)])
        );
    }
}
