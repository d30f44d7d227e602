use super::locator::SegmentLocator;
use super::IntersectionMatrix;
use crate::algorithms::line_intersector::{point_on_segment, projection_factor};
use crate::algorithms::Location;
use crate::errors::Result;
use crate::geometry::{mod2_boundary, Dimension, Geometry, Polygon};
use crate::index::KdTree;
use crate::noding::{Noder, SegmentString};
use crate::{BoundingBox, Coordinate, CoordinateSequence};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Which input a noded segment came from; ring segments also record the
/// polygon they bound and whether its area lies to their left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Source {
    operand: usize,
    ring: Option<RingSide>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RingSide {
    polygon: usize,
    interior_left: bool,
}

/// One oriented ring of an areal input.
#[derive(Debug, Clone)]
struct Ring {
    coords: Vec<Coordinate>,
    polygon: usize,
    interior_left: bool,
}

/// One input geometry flattened into points, lines and oriented rings.
/// The area of a collection is the union of its polygons.
#[derive(Debug, Clone)]
pub(crate) struct Operand {
    dimension: Dimension,
    points: Vec<Coordinate>,
    lines: Vec<Vec<Coordinate>>,
    rings: Vec<Ring>,
    boundary: Vec<Coordinate>,
    locator: SegmentLocator,
    /// One locator per polygon.
    areas: Vec<SegmentLocator>,
}

impl Operand {
    pub(crate) fn new(geometry: &Geometry) -> Self {
        let mut points = Vec::new();
        let mut sequences = Vec::new();
        let mut polygons = Vec::new();
        collect_parts(geometry, &mut points, &mut sequences, &mut polygons);
        points.sort_by(|a, b| a.compare(b));
        points.dedup();

        let mut lines = Vec::new();
        for sequence in sequences.iter() {
            let mut coords = sequence.to_coordinates();
            coords.dedup();
            if coords.len() > 1 {
                lines.push(coords);
            }
        }
        let boundary = mod2_boundary(sequences.iter().copied());

        let mut rings = Vec::new();
        let mut areas = Vec::with_capacity(polygons.len());
        for (index, polygon) in polygons.iter().enumerate() {
            let first = rings.len();
            for (i, ring) in polygon.rings().iter().enumerate() {
                let mut coords = ring.coords().to_coordinates();
                coords.dedup();
                if coords.len() < 4 {
                    continue;
                }
                // Shells wind counter-clockwise around their interior, holes
                // clockwise.
                let interior_left = ring.is_ccw() == (i == 0);
                rings.push(Ring {
                    coords,
                    polygon: index,
                    interior_left,
                });
            }
            areas.push(SegmentLocator::new(segments_of_all(
                rings[first..].iter().map(|r| &r.coords),
            )));
        }

        let dimension = if !rings.is_empty() {
            Dimension::Two
        } else if !lines.is_empty() {
            Dimension::One
        } else if !points.is_empty() {
            Dimension::Zero
        } else {
            Dimension::False
        };

        let locator = SegmentLocator::new(segments_of_all(lines.iter()));
        Operand {
            dimension,
            points,
            lines,
            rings,
            boundary,
            locator,
            areas,
        }
    }

    pub(crate) fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub(crate) fn points(&self) -> &[Coordinate] {
        &self.points
    }

    fn is_boundary_point(&self, point: Coordinate) -> bool {
        self.boundary
            .binary_search_by(|c| c.compare(&point))
            .is_ok()
    }

    /// Location of an arbitrary point in this input.
    pub(crate) fn locate(&self, point: Coordinate) -> Location {
        match self.dimension {
            Dimension::Two => {
                let mut location = Location::Exterior;
                for area in self.areas.iter() {
                    match area.locate_area(point) {
                        Location::Interior => return Location::Interior,
                        Location::Boundary => location = Location::Boundary,
                        Location::Exterior => {}
                    }
                }
                location
            }
            Dimension::One => {
                if self.is_boundary_point(point) {
                    Location::Boundary
                } else if self.locator.on_segment(point) {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            }
            Dimension::Zero => {
                if self.points.binary_search_by(|c| c.compare(&point)).is_ok() {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            }
            Dimension::False => Location::Exterior,
        }
    }

    fn push_strings(&self, operand: usize, out: &mut Vec<SegmentString<Source>>) {
        for line in self.lines.iter() {
            out.push(SegmentString::new(
                line.clone(),
                Source {
                    operand,
                    ring: None,
                },
            ));
        }
        for ring in self.rings.iter() {
            out.push(SegmentString::new(
                ring.coords.clone(),
                Source {
                    operand,
                    ring: Some(RingSide {
                        polygon: ring.polygon,
                        interior_left: ring.interior_left,
                    }),
                },
            ));
        }
    }
}

fn collect_parts<'a>(
    geometry: &'a Geometry,
    points: &mut Vec<Coordinate>,
    lines: &mut Vec<&'a CoordinateSequence>,
    polygons: &mut Vec<&'a Polygon>,
) {
    match geometry {
        Geometry::Point(p) => points.extend(p.coordinate()),
        Geometry::MultiPoint(m) => points.extend(m.iter().filter_map(|p| p.coordinate())),
        Geometry::LineString(l) => lines.push(l.coords()),
        Geometry::LinearRing(r) => lines.push(r.coords()),
        Geometry::MultiLineString(m) => lines.extend(m.iter().map(|l| l.coords())),
        Geometry::Polygon(p) => polygons.push(p),
        Geometry::MultiPolygon(m) => polygons.extend(m.iter()),
        Geometry::GeometryCollection(c) => {
            for child in c.iter() {
                collect_parts(child, points, lines, polygons);
            }
        }
    }
    lines.retain(|l| !l.is_empty());
    polygons.retain(|p| !p.is_empty());
}

fn segments_of_all<'a, I>(paths: I) -> Vec<(Coordinate, Coordinate)>
where
    I: Iterator<Item = &'a Vec<Coordinate>>,
{
    paths
        .flat_map(|coords| coords.windows(2).map(|w| (w[0], w[1])))
        .collect()
}

/// How one input covers an edge of the arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EdgeLabel {
    pub(crate) line: bool,
    pub(crate) ring: bool,
    interior_left: bool,
    interior_right: bool,
}

/// A segment of the noded arrangement. Edges are stored with `start`
/// before `end` in coordinate order; sides are relative to that direction.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) start: Coordinate,
    pub(crate) end: Coordinate,
    pub(crate) labels: [EdgeLabel; 2],
    /// Location of the edge interior in each input.
    pub(crate) location: [Location; 2],
    /// Location of the face on each side in each input.
    pub(crate) left: [Location; 2],
    pub(crate) right: [Location; 2],
    /// Polygons of each input whose rings run along the edge.
    polygons: [Vec<usize>; 2],
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) point: Coordinate,
    pub(crate) location: [Location; 2],
    pub(crate) edges: Vec<usize>,
    ring: [bool; 2],
    line: [bool; 2],
}

/// Both inputs noded together into one planar graph, with every edge,
/// face side and node labelled by its location in each input.
#[derive(Debug, Clone)]
pub(crate) struct Arrangement {
    pub(crate) operands: [Operand; 2],
    pub(crate) edges: Vec<Edge>,
    pub(crate) nodes: Vec<Node>,
    edge_index: HashMap<((u64, u64), (u64, u64)), usize>,
    node_index: HashMap<(u64, u64), usize>,
}

impl Arrangement {
    pub(crate) fn build<N: Noder<Source>>(a: &Geometry, b: &Geometry, noder: &N) -> Result<Self> {
        let operands = [Operand::new(a), Operand::new(b)];
        let mut strings = Vec::new();
        for (i, operand) in operands.iter().enumerate() {
            operand.push_strings(i, &mut strings);
        }
        let noded = noder.compute_nodes(strings)?;

        let mut isolated: KdTree<()> = KdTree::new(0.);
        for point in operands.iter().flat_map(|o| o.points().iter()) {
            isolated.insert(*point, ());
        }

        let mut arrangement = Arrangement {
            operands,
            edges: Vec::new(),
            nodes: Vec::new(),
            edge_index: HashMap::new(),
            node_index: HashMap::new(),
        };
        for string in noded.iter() {
            let source = *string.data();
            for (start, end) in string.segments() {
                // Rounding may collapse a segment to a point.
                if start == end {
                    continue;
                }
                let mut cuts: Vec<(f64, Coordinate)> = isolated
                    .query(BoundingBox::new(start, end))
                    .into_iter()
                    .map(|n| n.coordinate())
                    .filter(|&c| c != start && c != end && point_on_segment(c, start, end))
                    .map(|c| (projection_factor(c, start, end), c))
                    .collect();
                cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
                let mut previous = start;
                for (_, cut) in cuts {
                    arrangement.add_segment(previous, cut, source);
                    previous = cut;
                }
                arrangement.add_segment(previous, end, source);
            }
        }
        for i in 0..2 {
            for point in arrangement.operands[i].points().to_vec() {
                arrangement.node(point);
            }
        }
        arrangement.label();
        tracing::trace!(
            edges = arrangement.edges.len(),
            nodes = arrangement.nodes.len(),
            "built arrangement"
        );
        Ok(arrangement)
    }

    fn node(&mut self, point: Coordinate) -> usize {
        let nodes = &mut self.nodes;
        *self.node_index.entry(point.key()).or_insert_with(|| {
            nodes.push(Node {
                point,
                location: [Location::Exterior; 2],
                edges: Vec::new(),
                ring: [false; 2],
                line: [false; 2],
            });
            nodes.len() - 1
        })
    }

    fn add_segment(&mut self, a: Coordinate, b: Coordinate, source: Source) {
        let forward = a.compare(&b) == Ordering::Less;
        let (start, end) = if forward { (a, b) } else { (b, a) };
        let key = (start.key(), end.key());
        let index = match self.edge_index.get(&key) {
            Some(index) => *index,
            None => {
                let index = self.edges.len();
                self.edges.push(Edge {
                    start,
                    end,
                    labels: [EdgeLabel::default(); 2],
                    location: [Location::Exterior; 2],
                    left: [Location::Exterior; 2],
                    right: [Location::Exterior; 2],
                    polygons: [Vec::new(), Vec::new()],
                });
                self.edge_index.insert(key, index);
                let start_node = self.node(start);
                let end_node = self.node(end);
                self.nodes[start_node].edges.push(index);
                self.nodes[end_node].edges.push(index);
                index
            }
        };

        let operand = source.operand;
        let edge = &mut self.edges[index];
        let label = &mut edge.labels[operand];
        match source.ring {
            None => label.line = true,
            Some(side) => {
                label.ring = true;
                if side.interior_left == forward {
                    label.interior_left = true;
                } else {
                    label.interior_right = true;
                }
                if !edge.polygons[operand].contains(&side.polygon) {
                    edge.polygons[operand].push(side.polygon);
                }
            }
        }
        for point in [start, end].iter() {
            let node = self.node(*point);
            match source.ring {
                None => self.nodes[node].line[operand] = true,
                Some(_) => self.nodes[node].ring[operand] = true,
            }
        }
    }

    fn label(&mut self) {
        let operands = &self.operands;
        for edge in self.edges.iter_mut() {
            let midpoint = edge.start.midpoint(edge.end);
            for i in 0..2 {
                let label = edge.labels[i];
                let operand = &operands[i];
                if label.ring {
                    // Rings of different polygons may bound the edge from
                    // both sides, or another polygon may cover it.
                    let covered = (label.interior_left && label.interior_right)
                        || operand.areas.iter().enumerate().any(|(p, area)| {
                            !edge.polygons[i].contains(&p)
                                && area.locate_area(midpoint) == Location::Interior
                        });
                    if covered {
                        edge.location[i] = Location::Interior;
                        edge.left[i] = Location::Interior;
                        edge.right[i] = Location::Interior;
                    } else {
                        edge.location[i] = Location::Boundary;
                        edge.left[i] = side(label.interior_left);
                        edge.right[i] = side(label.interior_right);
                    }
                } else if label.line {
                    edge.location[i] = Location::Interior;
                } else if operand.dimension() == Dimension::Two {
                    let location = operand.locate(midpoint);
                    edge.location[i] = location;
                    edge.left[i] = side(location != Location::Exterior);
                    edge.right[i] = side(location != Location::Exterior);
                }
            }
        }
        let edges = &self.edges;
        for node in self.nodes.iter_mut() {
            for i in 0..2 {
                let operand = &operands[i];
                node.location[i] = if node.ring[i] {
                    let surrounded = node.edges.iter().all(|&e| {
                        edges[e].left[i] == Location::Interior
                            && edges[e].right[i] == Location::Interior
                    });
                    if surrounded {
                        Location::Interior
                    } else {
                        Location::Boundary
                    }
                } else if node.line[i] {
                    if operand.is_boundary_point(node.point) {
                        Location::Boundary
                    } else {
                        Location::Interior
                    }
                } else {
                    operand.locate(node.point)
                };
            }
        }
    }

    /// The DE-9IM matrix witnessed by the labelled edges, faces and nodes.
    pub(crate) fn intersection_matrix(&self) -> IntersectionMatrix {
        let mut matrix = IntersectionMatrix::new();
        matrix.set(Location::Exterior, Location::Exterior, Dimension::Two);
        for edge in self.edges.iter() {
            matrix.set_at_least(edge.location[0], edge.location[1], Dimension::One);
            matrix.set_at_least(edge.left[0], edge.left[1], Dimension::Two);
            matrix.set_at_least(edge.right[0], edge.right[1], Dimension::Two);
        }
        for node in self.nodes.iter() {
            matrix.set_at_least(node.location[0], node.location[1], Dimension::Zero);
        }
        matrix
    }
}

fn side(interior: bool) -> Location {
    if interior {
        Location::Interior
    } else {
        Location::Exterior
    }
}
