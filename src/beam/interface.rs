//! Per-beam drawing values shared by all members of one beam.

use serde::Serialize;

use super::constants::{SMUFL_E0A3_NOTEHEAD_HALF, WHITE_WIDTH_64TH_FACTOR};
use crate::metrics::DocMetrics;
use crate::model::{BeamPlace, Duration, LayerElement, StemDirection};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BeamDrawingInterface {
    /// Resolved placement; written once per placement resolution
    pub drawing_place: BeamPlace,
    pub cross_staff: bool,
    /// Members carry both up and down stem directions
    pub has_multiple_stem_dir: bool,
    /// The one stem direction all members with a direction agree on
    pub notes_stem_dir: Option<StemDirection>,
    pub cue_size: bool,
    pub shortest_dur: Duration,
    /// Bowed tremolo style beams are kept horizontal
    pub repeated_pattern: bool,

    // ── Computed at the start of a layout pass ──────────────────────
    pub beam_width: f64,
    pub beam_width_black: f64,
    pub beam_width_white: f64,
    /// Stem x offsets from the notehead centre, indexed by cue size
    pub stem_x_above: [f64; 2],
    pub stem_x_below: [f64; 2],
}

impl BeamDrawingInterface {
    /// Summarize the members of a beam: cross-staff, stem directions, cue
    /// size and the shortest duration.
    pub fn from_members<'a>(members: impl IntoIterator<Item = &'a LayerElement>) -> Self {
        let mut iface = BeamDrawingInterface::default();
        let mut has_up = false;
        let mut has_down = false;

        for element in members {
            if element.cross_staff.is_some() {
                iface.cross_staff = true;
            }
            if element.cue_size {
                iface.cue_size = true;
            }
            if !element.is_note_or_chord() {
                continue;
            }
            iface.shortest_dur = iface.shortest_dur.max(element.dur);
            match element.stem_dir {
                Some(StemDirection::Up) => has_up = true,
                Some(StemDirection::Down) => has_down = true,
                None => {}
            }
        }

        iface.has_multiple_stem_dir = has_up && has_down;
        iface.notes_stem_dir = match (has_up, has_down) {
            (true, false) => Some(StemDirection::Up),
            (false, true) => Some(StemDirection::Down),
            _ => None,
        };
        iface
    }

    pub fn with_repeated_pattern(mut self, repeated_pattern: bool) -> Self {
        self.repeated_pattern = repeated_pattern;
        self
    }

    /// Beam thickness and stem x offsets for a staff size.
    pub(super) fn init_widths(&mut self, metrics: &dyn DocMetrics, staff_size: i32) {
        self.beam_width_black = metrics.drawing_beam_width(staff_size, self.cue_size);
        self.beam_width_white = metrics.drawing_beam_white_width(staff_size, self.cue_size);
        if self.shortest_dur == Duration::D64 {
            self.beam_width_white *= WHITE_WIDTH_64TH_FACTOR;
        }
        self.beam_width = self.beam_width_black + self.beam_width_white;

        let half_stem = metrics.drawing_stem_width(staff_size) / 2.0;
        for (i, cue) in [false, true].into_iter().enumerate() {
            let half_head = metrics.glyph_width(SMUFL_E0A3_NOTEHEAD_HALF, staff_size, cue) / 2.0;
            self.stem_x_above[i] = half_head - half_stem;
            self.stem_x_below[i] = -(half_head - half_stem);
        }
    }

    pub fn stem_x_offset(&self, dir: StemDirection) -> f64 {
        let cue = usize::from(self.cue_size);
        match dir {
            StemDirection::Up => self.stem_x_above[cue],
            StemDirection::Down => self.stem_x_below[cue],
        }
    }
}
