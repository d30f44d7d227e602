use super::OverlayOp;
use crate::algorithms::{locate_in_ring, orientation_index, signed_area, Location};
use crate::errors::{GeometryError, Result};
use crate::geometry::Dimension;
use crate::relate::arrangement::{Arrangement, Edge};
use crate::{BoundingBox, Coordinate};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A shell with the holes assigned to it.
pub(crate) type PolygonRings = Vec<Vec<Coordinate>>;

/// The arrangement of both inputs, with each edge classified against the
/// result of one overlay operation.
pub(crate) struct OverlayGraph<'a> {
    arrangement: &'a Arrangement,
    /// Whether the face on the left and on the right of each edge belongs to
    /// the result area.
    sides: Vec<(bool, bool)>,
    /// Edges kept as result lines.
    lines: Vec<bool>,
}

impl<'a> OverlayGraph<'a> {
    pub(crate) fn new(arrangement: &'a Arrangement, op: OverlayOp) -> Self {
        let sides: Vec<(bool, bool)> = arrangement
            .edges
            .iter()
            .map(|e| {
                let left = op.is_in_result(
                    e.left[0] == Location::Interior,
                    e.left[1] == Location::Interior,
                );
                let right = op.is_in_result(
                    e.right[0] == Location::Interior,
                    e.right[1] == Location::Interior,
                );
                (left, right)
            })
            .collect();
        let lines = arrangement
            .edges
            .iter()
            .zip(sides.iter())
            .map(|(e, (left, right))| {
                !left
                    && !right
                    && op.is_in_result(
                        e.location[0] != Location::Exterior,
                        e.location[1] != Location::Exterior,
                    )
            })
            .collect();
        OverlayGraph {
            arrangement,
            sides,
            lines,
        }
    }

    /// Result edges with the result area on exactly one side, directed to
    /// keep it on the left.
    fn boundary_edges(&self) -> Vec<(Coordinate, Coordinate)> {
        self.arrangement
            .edges
            .iter()
            .zip(self.sides.iter())
            .filter(|(_, (left, right))| left != right)
            .map(|(e, (left, _))| {
                if *left {
                    (e.start, e.end)
                } else {
                    (e.end, e.start)
                }
            })
            .collect()
    }

    /// Shells with their holes. Fails with a topology collapse when the
    /// boundary edges do not link up into consistent rings.
    pub(crate) fn polygons(&self) -> Result<Vec<PolygonRings>> {
        let rings = link_rings(&self.boundary_edges())?;
        let mut shells: Vec<(Vec<Coordinate>, f64, BoundingBox)> = Vec::new();
        let mut holes: Vec<Vec<Coordinate>> = Vec::new();
        for ring in rings {
            let area = signed_area(&ring);
            if area > 0. {
                let bbox = BoundingBox::of_coordinates(ring.iter().copied());
                shells.push((ring, area, bbox));
            } else if area < 0. {
                holes.push(ring);
            } else {
                return Err(GeometryError::TopologyCollapse { position: ring[0] });
            }
        }

        let mut polygons: Vec<PolygonRings> =
            shells.iter().map(|(ring, _, _)| vec![ring.clone()]).collect();
        for hole in holes {
            let hole_box = BoundingBox::of_coordinates(hole.iter().copied());
            let owner = shells
                .iter()
                .enumerate()
                .filter(|(_, (shell, _, bbox))| {
                    bbox.covers(hole_box) && encloses(shell, &hole)
                })
                .min_by(|(_, (_, a, _)), (_, (_, b, _))| a.total_cmp(b))
                .map(|(i, _)| i);
            match owner {
                Some(i) => polygons[i].push(hole),
                None => return Err(GeometryError::TopologyCollapse { position: hole[0] }),
            }
        }
        Ok(polygons)
    }

    /// Result line edges merged into maximal chains through nodes of
    /// degree two.
    pub(crate) fn lines(&self) -> Vec<Vec<Coordinate>> {
        let edges: Vec<&Edge> = self
            .arrangement
            .edges
            .iter()
            .zip(self.lines.iter())
            .filter(|(_, keep)| **keep)
            .map(|(e, _)| e)
            .collect();
        merge_lines(&edges)
    }

    /// Result nodes not already part of a result line or area.
    pub(crate) fn points(&self, op: OverlayOp) -> Vec<Coordinate> {
        let operands = &self.arrangement.operands;
        let mut points: Vec<Coordinate> = self
            .arrangement
            .nodes
            .iter()
            .filter(|n| {
                op.is_in_result(
                    n.location[0] != Location::Exterior,
                    n.location[1] != Location::Exterior,
                )
            })
            .filter(|n| {
                !n.edges.iter().any(|&e| {
                    let (left, right) = self.sides[e];
                    left || right || self.lines[e]
                })
            })
            .filter(|n| {
                let in_area = |i: usize| {
                    operands[i].dimension() == Dimension::Two
                        && n.location[i] != Location::Exterior
                };
                !n.edges.is_empty() || !op.is_in_result(in_area(0), in_area(1))
            })
            .map(|n| n.point)
            .collect();
        points.sort_by(|a, b| a.compare(b));
        points
    }
}

/// True if `hole` lies inside `shell`, judged by its first vertex off the
/// shell boundary.
fn encloses(shell: &[Coordinate], hole: &[Coordinate]) -> bool {
    for vertex in hole.iter() {
        match locate_in_ring(*vertex, shell) {
            Location::Interior => return true,
            Location::Exterior => return false,
            Location::Boundary => continue,
        }
    }
    // A hole lying entirely on its shell has collapsed; assign it anyway.
    true
}

/// 0 to 3, counter-clockwise from the positive x axis.
fn quadrant(origin: Coordinate, p: Coordinate) -> u8 {
    let (dx, dy) = (p.x - origin.x, p.y - origin.y);
    match (dx >= 0., dy >= 0.) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// Orders directions from `origin` counter-clockwise from the positive x axis.
fn compare_direction(origin: Coordinate, p: Coordinate, q: Coordinate) -> Ordering {
    let by_quadrant = quadrant(origin, p).cmp(&quadrant(origin, q));
    if by_quadrant != Ordering::Equal {
        return by_quadrant;
    }
    match orientation_index(origin, q, p) {
        1 => Ordering::Greater,
        -1 => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeEnd {
    edge: usize,
    outgoing: bool,
    toward: Coordinate,
}

/// Link directed edges with their area on the left into minimal rings. At
/// each node the ring turns onto the first edge clockwise from the one it
/// arrived on, which must leave the node.
fn link_rings(edges: &[(Coordinate, Coordinate)]) -> Result<Vec<Vec<Coordinate>>> {
    let mut stars: HashMap<(u64, u64), (Coordinate, Vec<EdgeEnd>)> = HashMap::new();
    for (i, (from, to)) in edges.iter().enumerate() {
        stars
            .entry(from.key())
            .or_insert_with(|| (*from, Vec::new()))
            .1
            .push(EdgeEnd {
                edge: i,
                outgoing: true,
                toward: *to,
            });
        stars
            .entry(to.key())
            .or_insert_with(|| (*to, Vec::new()))
            .1
            .push(EdgeEnd {
                edge: i,
                outgoing: false,
                toward: *from,
            });
    }
    for (origin, star) in stars.values_mut() {
        let origin = *origin;
        star.sort_by(|a, b| compare_direction(origin, a.toward, b.toward));
    }

    let next_edge = |arriving: usize| -> Result<usize> {
        let node = edges[arriving].1;
        let collapse = GeometryError::TopologyCollapse { position: node };
        let star = match stars.get(&node.key()) {
            Some((_, star)) => star,
            None => return Err(collapse),
        };
        let position = star
            .iter()
            .position(|end| end.edge == arriving && !end.outgoing)
            .ok_or_else(|| collapse.clone())?;
        let clockwise = star[(position + star.len() - 1) % star.len()];
        if clockwise.outgoing {
            Ok(clockwise.edge)
        } else {
            Err(collapse)
        }
    };

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut ring = vec![edges[start].0];
        let mut current = start;
        loop {
            used[current] = true;
            ring.push(edges[current].1);
            let next = next_edge(current)?;
            if next == start {
                break;
            }
            if used[next] || ring.len() > edges.len() {
                return Err(GeometryError::TopologyCollapse {
                    position: edges[next].0,
                });
            }
            current = next;
        }
        rings.push(ring);
    }
    Ok(rings)
}

fn merge_lines(edges: &[&Edge]) -> Vec<Vec<Coordinate>> {
    let mut incident: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        incident.entry(edge.start.key()).or_default().push(i);
        incident.entry(edge.end.key()).or_default().push(i);
    }
    let degree = |c: Coordinate| incident.get(&c.key()).map_or(0, |v| v.len());

    let mut used = vec![false; edges.len()];
    let mut lines = Vec::new();
    let mut walk = |from: Coordinate, first: usize, used: &mut Vec<bool>| {
        let mut line = vec![from];
        let mut node = from;
        let mut edge = first;
        loop {
            used[edge] = true;
            node = if edges[edge].start == node {
                edges[edge].end
            } else {
                edges[edge].start
            };
            line.push(node);
            if degree(node) != 2 {
                break;
            }
            let next = incident
                .get(&node.key())
                .and_then(|ends| ends.iter().copied().find(|&e| !used[e]));
            match next {
                Some(e) => edge = e,
                None => break,
            }
        }
        lines.push(line);
    };

    let mut ends: Vec<Coordinate> = edges
        .iter()
        .flat_map(|e| vec![e.start, e.end])
        .filter(|c| degree(*c) != 2)
        .collect();
    ends.sort_by(|a, b| a.compare(b));
    ends.dedup();
    for end in ends {
        if let Some(at_end) = incident.get(&end.key()) {
            for &e in at_end.iter() {
                if !used[e] {
                    walk(end, e, &mut used);
                }
            }
        }
    }
    // Whatever remains forms closed loops.
    for e in 0..edges.len() {
        if !used[e] {
            walk(edges[e].start, e, &mut used);
        }
    }
    lines
}
