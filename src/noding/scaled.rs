use super::{check_finite, Noder, SegmentString};
use crate::errors::Result;
use crate::Coordinate;

/// Runs an inner noder on coordinates scaled onto the integer grid of a
/// fixed precision, then maps the result back. With a scale of 1000 the
/// inner noder sees millimetre units as whole numbers.
#[derive(Debug, Clone)]
pub struct ScaledNoder<N> {
    noder: N,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<N> ScaledNoder<N> {
    pub fn new(noder: N, scale: f64) -> Self {
        ScaledNoder::with_offset(noder, scale, 0., 0.)
    }

    /// Coordinates are translated by the offset before scaling, which keeps
    /// scaled values small for data far from the origin.
    pub fn with_offset(noder: N, scale: f64, offset_x: f64, offset_y: f64) -> Self {
        ScaledNoder {
            noder,
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_integer_precision(&self) -> bool {
        self.scale == 1.
    }

    fn to_grid(&self, c: Coordinate) -> Coordinate {
        Coordinate::new(
            ((c.x - self.offset_x) * self.scale).round(),
            ((c.y - self.offset_y) * self.scale).round(),
        )
    }

    fn from_grid(&self, c: Coordinate) -> Coordinate {
        Coordinate::new(
            c.x / self.scale + self.offset_x,
            c.y / self.scale + self.offset_y,
        )
    }
}

impl<D: Clone, N: Noder<D>> Noder<D> for ScaledNoder<N> {
    fn compute_nodes(&self, strings: Vec<SegmentString<D>>) -> Result<Vec<SegmentString<D>>> {
        check_finite(&strings)?;
        if self.is_integer_precision() && self.offset_x == 0. && self.offset_y == 0. {
            return self.noder.compute_nodes(strings);
        }
        let scaled: Vec<SegmentString<D>> = strings
            .into_iter()
            .map(|s| s.map_coords(|c| self.to_grid(c)).remove_repeated())
            .collect();
        check_finite(&scaled)?;
        let noded = self.noder.compute_nodes(scaled)?;
        Ok(noded
            .into_iter()
            .map(|s| s.map_coords(|c| self.from_grid(c)))
            .collect())
    }
}
