//! Per-member beam coordinates and stem resolution.

use serde::Serialize;

use super::interface::BeamDrawingInterface;
use super::stem::stem_len_in_half_units;
use crate::metrics::DocMetrics;
use crate::model::{BeamPlace, Duration, LayerElement, StemDirection};
use crate::staff::StaffContext;

/// Stem of a beamed note or chord, relative to the element position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StemGeometry {
    pub dir: StemDirection,
    pub x_rel: f64,
    /// Notehead end of the stem
    pub y_rel: f64,
    /// Signed length from the beam end to the notehead end; negative for
    /// stems rising from their notehead
    pub len: f64,
}

/// Where one member of a beam sits and where its stem goes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamElementCoord {
    /// Index of the member in the element list
    pub element: usize,
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    /// Where the member meets the beam
    pub y_beam: f64,
    pub dur: Duration,
    /// Cue size of the element itself; stem offsets and anchors follow
    /// the beam-wide flag in [`BeamDrawingInterface`]
    pub cue_size: bool,
    pub stem_dir: Option<StemDirection>,
    pub on_staff_line: bool,
    pub shortenable: i32,
    /// Stem length picked by the stem resolver
    pub stem_len_half_units: Option<i32>,
    pub stem: Option<StemGeometry>,
    #[serde(skip)]
    has_stem: bool,
}

impl BeamElementCoord {
    pub fn new(index: usize, element: &LayerElement) -> Self {
        BeamElementCoord {
            element: index,
            x: element.x,
            y_top: element.y,
            y_bottom: element.y,
            y_beam: 0.0,
            dur: element.dur,
            cue_size: element.cue_size,
            stem_dir: None,
            on_staff_line: false,
            shortenable: 0,
            stem_len_half_units: None,
            stem: None,
            has_stem: element.kind.has_stem(),
        }
    }

    /// Whether the member has a stem interface (notes and chords).
    pub fn has_stem(&self) -> bool {
        self.has_stem
    }

    /// Take the position of the element again and clear everything a
    /// previous layout pass computed.
    pub(super) fn reset_drawing(&mut self, element: &LayerElement) {
        self.x = element.x;
        self.y_beam = 0.0;
        self.stem_dir = None;
        self.on_staff_line = false;
        self.shortenable = 0;
        self.stem_len_half_units = None;
        self.stem = None;
    }

    /// Point the stem in `dir` and move the beam end of the member to the
    /// tip of a stem of the length its duration asks for.
    ///
    /// Members without a stem are left untouched.
    pub fn set_drawing_stem_dir(
        &mut self,
        dir: StemDirection,
        element: &LayerElement,
        staff: &StaffContext,
        metrics: &dyn DocMetrics,
        iface: &BeamDrawingInterface,
    ) {
        if !self.has_stem {
            return;
        }

        self.stem_dir = Some(dir);
        self.on_staff_line = false;
        self.shortenable = 0;
        self.stem_len_half_units = None;

        self.y_beam = match dir {
            StemDirection::Up => self.y_top,
            StemDirection::Down => self.y_bottom,
        };
        self.x = element.x + iface.stem_x_offset(dir);

        let Some(loc) = element.stem_note_loc(dir) else {
            return;
        };
        self.on_staff_line = loc.rem_euclid(2) == 0;

        let clipped = staff.stem_len_in_half_units(loc, dir);
        let len = stem_len_in_half_units(self.dur, self.on_staff_line, clipped);
        self.stem_len_half_units = Some(len);
        self.y_beam += dir.sign() * len as f64 * metrics.drawing_unit(staff.staff_size) / 2.0;
    }

    /// Store the final stem of a note or chord from its beam end and its
    /// notehead anchor. Stemless notes get no stem.
    pub(super) fn set_stem_geometry(
        &mut self,
        element: &LayerElement,
        place: BeamPlace,
        staff: &StaffContext,
        metrics: &dyn DocMetrics,
        iface: &BeamDrawingInterface,
    ) {
        if !self.has_stem || element.stemless {
            self.stem = None;
            return;
        }

        let size = staff.staff_size;
        let stem_width = metrics.drawing_stem_width(size);
        let dir = self.stem_dir.unwrap_or(match place {
            BeamPlace::Above => StemDirection::Up,
            _ => StemDirection::Down,
        });
        let anchor = metrics.stem_anchor_y(dir, size, iface.cue_size);
        let (y1, y2) = match dir {
            StemDirection::Up => (self.y_beam - stem_width, self.y_bottom + anchor),
            StemDirection::Down => (self.y_beam + stem_width, self.y_top + anchor),
        };

        self.stem = Some(StemGeometry {
            dir,
            x_rel: self.x - element.x,
            y_rel: y2 - element.y,
            len: y2 - y1,
        });
    }
}
