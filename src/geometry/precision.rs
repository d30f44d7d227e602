use crate::coordinate_sequence::MAX_AXIS_COUNT;

/// Per-axis precision. A scale of 0 means full floating precision; a
/// positive scale `s` keeps values on the grid `k / s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionModel {
    scales: [f64; MAX_AXIS_COUNT],
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel::floating()
    }
}

impl PrecisionModel {
    pub fn floating() -> Self {
        PrecisionModel {
            scales: [0.; MAX_AXIS_COUNT],
        }
    }

    /// The same scale on X and Y; Z and M stay floating.
    pub fn fixed_xy(scale: f64) -> Self {
        PrecisionModel {
            scales: [scale, scale, 0., 0.],
        }
    }

    pub fn with_scales(scales: [f64; MAX_AXIS_COUNT]) -> Self {
        let mut scales = scales;
        for scale in scales.iter_mut() {
            if !(scale.is_finite() && *scale > 0.) {
                *scale = 0.;
            }
        }
        PrecisionModel { scales }
    }

    pub fn scale(&self, axis: usize) -> f64 {
        self.scales.get(axis).copied().unwrap_or(0.)
    }

    pub fn is_floating(&self, axis: usize) -> bool {
        self.scale(axis) == 0.
    }

    /// Round `value` onto the grid of `axis`, ties away from zero.
    pub fn make_precise(&self, axis: usize, value: f64) -> f64 {
        let scale = self.scale(axis);
        if scale > 0. && value.is_finite() {
            (value * scale).round() / scale
        } else {
            value
        }
    }

    pub(crate) fn same_on_axes(&self, other: &PrecisionModel, axis_count: usize) -> bool {
        (0..axis_count).all(|axis| self.scale(axis) == other.scale(axis))
    }
}
