//! Quadedge subdivision holding an incremental Delaunay triangulation.
//!
//! Edges live in one arena: quad `q` owns the four directed edges
//! `4q..4q + 4`, where `4q` and `4q + 2` are the primal edge in both
//! directions and the odd ids are its duals. Only primal edges carry an
//! origin vertex.

use crate::algorithms::line_intersector::{point_on_segment, segment_distance};
use crate::algorithms::{in_circle, orientation_index};
use crate::errors::{GeometryError, Result};
use crate::{BoundingBox, Coordinate};

/// Distance of the frame vertices from the triangulated extent, as a
/// multiple of the extent's larger side.
const FRAME_SIZE_FACTOR: f64 = 10.;
/// A site closer to an edge than `tolerance / EDGE_COINCIDENCE_FACTOR` is
/// inserted on that edge.
const EDGE_COINCIDENCE_FACTOR: f64 = 1000.;
const FRAME_VERTEX_COUNT: usize = 3;
const NO_VERTEX: usize = usize::MAX;

pub(crate) type EdgeId = usize;

#[inline]
fn rot(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 1) & 3)
}

#[inline]
fn sym(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 2) & 3)
}

#[inline]
fn inv_rot(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 3) & 3)
}

#[derive(Debug, Clone)]
pub(crate) struct Subdivision {
    vertices: Vec<Coordinate>,
    next: Vec<EdgeId>,
    origin: Vec<usize>,
    live: Vec<bool>,
    last_found: EdgeId,
    tolerance: f64,
}

impl Subdivision {
    /// An empty triangulation: one frame triangle enclosing `extent` by a
    /// wide margin.
    pub(crate) fn new(extent: BoundingBox, tolerance: f64) -> Self {
        let offset = extent.width().max(extent.height()) * FRAME_SIZE_FACTOR;
        let frame = vec![
            Coordinate::new((extent.x_min + extent.x_max) / 2., extent.y_max + offset),
            Coordinate::new(extent.x_min - offset, extent.y_min - offset),
            Coordinate::new(extent.x_max + offset, extent.y_min - offset),
        ];
        let mut subdivision = Subdivision {
            vertices: frame,
            next: Vec::new(),
            origin: Vec::new(),
            live: Vec::new(),
            last_found: 0,
            tolerance,
        };
        let ea = subdivision.make_edge(0, 1);
        let eb = subdivision.make_edge(1, 2);
        subdivision.splice(sym(ea), eb);
        let ec = subdivision.make_edge(2, 0);
        subdivision.splice(sym(eb), ec);
        subdivision.splice(sym(ec), ea);
        subdivision.last_found = ea;
        subdivision
    }

    pub(crate) fn vertex(&self, index: usize) -> Coordinate {
        self.vertices[index]
    }

    pub(crate) fn is_frame_vertex(&self, index: usize) -> bool {
        index < FRAME_VERTEX_COUNT
    }

    fn onext(&self, e: EdgeId) -> EdgeId {
        self.next[e]
    }

    fn oprev(&self, e: EdgeId) -> EdgeId {
        rot(self.next[rot(e)])
    }

    fn dprev(&self, e: EdgeId) -> EdgeId {
        inv_rot(self.next[inv_rot(e)])
    }

    fn lnext(&self, e: EdgeId) -> EdgeId {
        rot(self.next[inv_rot(e)])
    }

    fn lprev(&self, e: EdgeId) -> EdgeId {
        sym(self.next[e])
    }

    pub(crate) fn orig(&self, e: EdgeId) -> usize {
        self.origin[e]
    }

    pub(crate) fn dest(&self, e: EdgeId) -> usize {
        self.origin[sym(e)]
    }

    fn orig_coord(&self, e: EdgeId) -> Coordinate {
        self.vertices[self.orig(e)]
    }

    fn dest_coord(&self, e: EdgeId) -> Coordinate {
        self.vertices[self.dest(e)]
    }

    fn make_edge(&mut self, from: usize, to: usize) -> EdgeId {
        let e = self.next.len();
        self.next.extend_from_slice(&[e, e + 3, e + 2, e + 1]);
        self.origin.extend_from_slice(&[from, NO_VERTEX, to, NO_VERTEX]);
        self.live.push(true);
        e
    }

    /// Exchange the origin rings of `a` and `b`, joining or separating them.
    fn splice(&mut self, a: EdgeId, b: EdgeId) {
        let alpha = rot(self.next[a]);
        let beta = rot(self.next[b]);
        self.next.swap(a, b);
        self.next.swap(alpha, beta);
    }

    /// A new edge from the destination of `a` to the origin of `b`, sharing
    /// the left face of both.
    fn connect(&mut self, a: EdgeId, b: EdgeId) -> EdgeId {
        let e = self.make_edge(self.dest(a), self.orig(b));
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        self.splice(sym(e), b);
        e
    }

    fn delete_edge(&mut self, e: EdgeId) {
        let e_oprev = self.oprev(e);
        self.splice(e, e_oprev);
        let s = sym(e);
        let s_oprev = self.oprev(s);
        self.splice(s, s_oprev);
        self.live[e / 4] = false;
    }

    /// Turn `e` counter-clockwise inside the quadrilateral formed by its
    /// two adjacent triangles.
    fn swap(&mut self, e: EdgeId) {
        let a = self.oprev(e);
        let b = self.oprev(sym(e));
        self.splice(e, a);
        self.splice(sym(e), b);
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        let b_lnext = self.lnext(b);
        self.splice(sym(e), b_lnext);
        self.origin[e] = self.dest(a);
        self.origin[sym(e)] = self.dest(b);
    }

    fn right_of(&self, point: Coordinate, e: EdgeId) -> bool {
        orientation_index(self.orig_coord(e), self.dest_coord(e), point) < 0
    }

    fn is_on_edge(&self, e: EdgeId, point: Coordinate) -> bool {
        let (start, end) = (self.orig_coord(e), self.dest_coord(e));
        point_on_segment(point, start, end)
            || segment_distance(point, start, end) < self.tolerance / EDGE_COINCIDENCE_FACTOR
    }

    /// An edge of the triangle containing `point`, or an edge with `point`
    /// as an endpoint. Walks from the edge found last.
    fn locate(&mut self, point: Coordinate) -> Result<EdgeId> {
        if !self.live[self.last_found / 4] {
            self.last_found = self
                .live
                .iter()
                .position(|live| *live)
                .map_or(0, |q| 4 * q);
        }
        let mut e = self.last_found;
        for _ in 0..self.next.len() {
            if point == self.orig_coord(e) || point == self.dest_coord(e) {
                self.last_found = e;
                return Ok(e);
            }
            if self.right_of(point, e) {
                e = sym(e);
            } else if !self.right_of(point, self.onext(e)) {
                e = self.onext(e);
            } else if !self.right_of(point, self.dprev(e)) {
                e = self.dprev(e);
            } else {
                self.last_found = e;
                return Ok(e);
            }
        }
        Err(GeometryError::TopologyCollapse { position: point })
    }

    /// Insert a site, restoring the Delaunay condition by edge flips.
    /// Returns the index of the new vertex, or of the existing vertex
    /// within tolerance of `point`.
    pub(crate) fn insert_site(&mut self, point: Coordinate) -> Result<usize> {
        let mut e = self.locate(point)?;
        for &end in [self.orig(e), self.dest(e)].iter() {
            if self.vertices[end].distance(point) <= self.tolerance {
                return Ok(end);
            }
        }

        let vertex = self.vertices.len();
        self.vertices.push(point);
        if self.is_on_edge(e, point) {
            e = self.oprev(e);
            let on_edge = self.onext(e);
            self.delete_edge(on_edge);
        }

        // Connect the new vertex to every vertex of the enclosing polygon.
        let mut base = self.make_edge(self.orig(e), vertex);
        self.splice(base, e);
        let start = base;
        loop {
            base = self.connect(e, sym(base));
            e = self.oprev(base);
            if self.lnext(e) == start {
                break;
            }
        }

        // Flip suspect edges until every triangle is Delaunay again.
        loop {
            let t = self.oprev(e);
            let t_dest = self.dest_coord(t);
            if self.right_of(t_dest, e)
                && in_circle(self.orig_coord(e), t_dest, self.dest_coord(e), point)
            {
                self.swap(e);
                e = self.oprev(e);
            } else if self.onext(e) == start {
                self.last_found = base;
                return Ok(vertex);
            } else {
                e = self.lprev(self.onext(e));
            }
        }
    }

    fn live_primal_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(q, _)| 4 * q)
    }

    /// Every edge with no frame endpoint, as a vertex index pair.
    pub(crate) fn edges(&self) -> Vec<(usize, usize)> {
        self.live_primal_edges()
            .map(|e| (self.orig(e), self.dest(e)))
            .filter(|(a, b)| !self.is_frame_vertex(*a) && !self.is_frame_vertex(*b))
            .collect()
    }

    /// Every triangle with no frame vertex, counter-clockwise.
    pub(crate) fn triangles(&self) -> Vec<[usize; 3]> {
        let mut visited = vec![false; self.next.len()];
        let mut triangles = Vec::new();
        for primal in self.live_primal_edges() {
            for &e in [primal, sym(primal)].iter() {
                if visited[e] {
                    continue;
                }
                let e1 = self.lnext(e);
                let e2 = self.lnext(e1);
                visited[e] = true;
                visited[e1] = true;
                visited[e2] = true;
                if self.lnext(e2) != e {
                    continue;
                }
                let triangle = [self.orig(e), self.orig(e1), self.orig(e2)];
                if triangle.iter().any(|v| self.is_frame_vertex(*v)) {
                    continue;
                }
                triangles.push(triangle);
            }
        }
        triangles
    }
}
