//! Staff context for a beam: where the staff sits and how big it is.
//!
//! Staff locations count half spaces from the bottom line (loc 0), so on a
//! five-line staff the top line is loc 8 and lines sit on even locations.
//! The drawing y axis points up and the staff y is its top line.

use serde::{Deserialize, Serialize};

use crate::beam::constants::{MAX_STEM_SHORTENING, STANDARD_STEMLENGTH_HALF_UNITS};
use crate::metrics::DocMetrics;
use crate::model::StemDirection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffContext {
    /// Staff number (1-based, top to bottom)
    #[serde(default = "default_staff_n")]
    pub n: u32,
    /// Drawing y of the top staff line
    pub y: f64,
    /// Staff size in percent
    #[serde(default = "default_staff_size")]
    pub staff_size: i32,
    #[serde(default = "default_lines")]
    pub lines: i32,
}

fn default_staff_n() -> u32 {
    1
}

fn default_staff_size() -> i32 {
    100
}

fn default_lines() -> i32 {
    5
}

impl Default for StaffContext {
    fn default() -> Self {
        StaffContext::new(0.0)
    }
}

impl StaffContext {
    /// A normal five-line staff with its top line at `y`.
    pub fn new(y: f64) -> Self {
        StaffContext {
            n: default_staff_n(),
            y,
            staff_size: default_staff_size(),
            lines: default_lines(),
        }
    }

    /// Location of the top line.
    pub fn top_loc(&self) -> i32 {
        (self.lines - 1) * 2
    }

    /// Y of a staff location relative to the staff y.
    pub fn pitch_pos_y_rel(&self, metrics: &dyn DocMetrics, loc: i32) -> f64 {
        (loc - self.top_loc()) as f64 * metrics.drawing_unit(self.staff_size)
    }

    /// Reference line used to decide placement when nothing else does:
    /// two spaces below the top line.
    pub fn vertical_center(&self, metrics: &dyn DocMetrics) -> f64 {
        self.y - metrics.drawing_double_unit(self.staff_size) * 2.0
    }

    /// Stem length in half units of a note at `loc` with a stem in `dir`,
    /// before any duration-specific adjustment.
    ///
    /// Stems pointing away from the staff from a note outside it are
    /// shortened by one half unit per location beyond the outer line, up to
    /// three units. Everything else gets the standard length.
    pub fn stem_len_in_half_units(&self, loc: i32, dir: StemDirection) -> i32 {
        let beyond = match dir {
            StemDirection::Up => loc - self.top_loc(),
            StemDirection::Down => -loc,
        };
        if beyond <= 0 {
            return STANDARD_STEMLENGTH_HALF_UNITS;
        }
        STANDARD_STEMLENGTH_HALF_UNITS - beyond.min(MAX_STEM_SHORTENING)
    }
}

/// Default stem direction of each layer on a staff.
///
/// `layers` gives, in layer order, whether each layer has content. With at
/// least two layers that have content, the first of them gets stems up and
/// the others stems down. Empty layers and single-layer staves get none.
pub fn layer_stem_directions(layers: &[bool]) -> Vec<Option<StemDirection>> {
    let non_empty = layers.iter().filter(|&&has_content| has_content).count();
    if non_empty < 2 {
        return vec![None; layers.len()];
    }

    let mut next = StemDirection::Up;
    layers
        .iter()
        .map(|&has_content| {
            if !has_content {
                return None;
            }
            let dir = next;
            next = StemDirection::Down;
            Some(dir)
        })
        .collect()
}
