//! Beam segment: placement, slope and stem lengths for one beam.
//!
//! A layout pass runs in this order:
//!   1. initialization: member extents, beam thickness, stem offsets
//!   2. placement: above, below or mixed
//!   3. stem directions: with provisional beam ends at the stem tips
//!   4. slope: two-point slope between the outer notes, clamped
//!   5. propagation: every member is put on the beam line
//!   6. stems: final stem position and length of every note and chord
//!
//! [`BeamSegment::recompute_placement_only`] runs steps 2 to 6 again on
//! members that were already initialized.

use serde::Serialize;

use super::constants::*;
use super::coord::BeamElementCoord;
use super::interface::BeamDrawingInterface;
use crate::error::BeamError;
use crate::metrics::DocMetrics;
use crate::model::{BeamPlace, ElementKind, LayerElement, StemDirection};
use crate::staff::StaffContext;

/// What a beam is laid out against.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Elements the beam coordinates refer to by index
    pub elements: &'a [LayerElement],
    pub staff: &'a StaffContext,
    pub metrics: &'a dyn DocMetrics,
    /// Stem direction of the layer (voice) the beam is in, if it has one
    pub layer_stem_dir: Option<StemDirection>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        elements: &'a [LayerElement],
        staff: &'a StaffContext,
        metrics: &'a dyn DocMetrics,
    ) -> Self {
        LayoutContext { elements, staff, metrics, layer_stem_dir: None }
    }

    pub fn with_layer_stem_dir(mut self, dir: Option<StemDirection>) -> Self {
        self.layer_stem_dir = dir;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BeamSegment {
    pub starting_x: f64,
    pub starting_y: f64,
    pub slope: f64,
    pub vertical_center: f64,
    /// Mean y of the notes and chords
    pub avg_y: f64,
    /// Indices into the coordinates of the outer notes or chords
    pub first_note_or_chord: Option<usize>,
    pub last_note_or_chord: Option<usize>,
    pub nb_notes_or_chords: usize,
    /// Set once member extents and beam-wide values are computed
    #[serde(skip)]
    initialized: bool,
}

impl BeamSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Lay out a beam from scratch. Returns the resolved placement, which is
    /// also stored in `iface.drawing_place`.
    pub fn compute_beam_full(
        &mut self,
        coords: &mut [BeamElementCoord],
        ctx: &LayoutContext,
        iface: &mut BeamDrawingInterface,
        place: BeamPlace,
    ) -> Result<BeamPlace, BeamError> {
        check_coords(coords, ctx.elements)?;
        self.calc_beam_init(coords, ctx, iface)?;
        Ok(self.calc_beam(coords, ctx, iface, place))
    }

    /// Lay out an already initialized beam again with another placement,
    /// keeping the member extents and beam-wide values of the first pass.
    ///
    /// Fails with [`BeamError::NotInitialized`] unless
    /// [`compute_beam_full`](Self::compute_beam_full) succeeded since the
    /// last reset.
    pub fn recompute_placement_only(
        &mut self,
        coords: &mut [BeamElementCoord],
        ctx: &LayoutContext,
        iface: &mut BeamDrawingInterface,
        place: BeamPlace,
    ) -> Result<BeamPlace, BeamError> {
        if !self.initialized {
            return Err(BeamError::NotInitialized);
        }
        check_coords(coords, ctx.elements)?;
        Ok(self.calc_beam(coords, ctx, iface, place))
    }

    /// Whether member extents and beam-wide values are in place for a
    /// placement-only pass.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn calc_beam(
        &mut self,
        coords: &mut [BeamElementCoord],
        ctx: &LayoutContext,
        iface: &mut BeamDrawingInterface,
        place: BeamPlace,
    ) -> BeamPlace {
        let resolved = self.calc_beam_place(iface, ctx.layer_stem_dir, place);
        iface.drawing_place = resolved;
        log::debug!("Beam placed {resolved:?} (requested {place:?})");

        for (i, coord) in coords.iter_mut().enumerate() {
            if !coord.has_stem() {
                continue;
            }
            let element = &ctx.elements[coord.element];
            let dir = match resolved {
                BeamPlace::Above => Some(StemDirection::Up),
                BeamPlace::Below => Some(StemDirection::Down),
                BeamPlace::Mixed | BeamPlace::Unset => {
                    if let Some(staff_n) = element.cross_staff {
                        // TODO: pick the direction from the order of staff `staff_n` and the beam staff
                        log::warn!(
                            "No stem direction for cross-staff element {} on staff {staff_n}",
                            coord.element
                        );
                        None
                    } else if element.stem_dir.is_none() {
                        log::warn!("No stem direction for element {} in a mixed beam", coord.element);
                        None
                    } else {
                        element.stem_dir
                    }
                }
            };
            match dir {
                Some(dir) => {
                    coord.set_drawing_stem_dir(dir, element, ctx.staff, ctx.metrics, iface);
                }
                None if self.first_note_or_chord == Some(i) || self.last_note_or_chord == Some(i) => {
                    log::debug!(
                        "Beam end at element {} is unresolved, slope taken from y_beam {}",
                        coord.element,
                        coord.y_beam
                    );
                }
                None => {}
            }
        }

        self.slope = 0.0;
        if !iface.repeated_pattern {
            self.calc_beam_slope(coords, ctx, iface);
        }

        // The line goes through the first note or chord; members before it
        // (rests) are on its extension.
        let first_x = coords[0].x;
        self.starting_x = first_x;
        self.starting_y = match self.first_note_or_chord {
            Some(i) => coords[i].y_beam + self.slope * (first_x - coords[i].x),
            None => coords[0].y_beam,
        };

        for coord in coords.iter_mut() {
            coord.y_beam = self.starting_y + self.slope * (coord.x - self.starting_x);
        }

        for coord in coords.iter_mut() {
            let element = &ctx.elements[coord.element];
            coord.set_stem_geometry(element, resolved, ctx.staff, ctx.metrics, iface);
        }

        resolved
    }

    fn calc_beam_init(
        &mut self,
        coords: &mut [BeamElementCoord],
        ctx: &LayoutContext,
        iface: &mut BeamDrawingInterface,
    ) -> Result<(), BeamError> {
        self.initialized = false;
        let staff = ctx.staff;
        self.vertical_center = staff.vertical_center(ctx.metrics);
        iface.init_widths(ctx.metrics, staff.staff_size);

        self.avg_y = 0.0;
        self.first_note_or_chord = None;
        self.last_note_or_chord = None;
        self.nb_notes_or_chords = 0;

        let mut sum_y = 0.0;
        let mut nb_rests = 0usize;

        for (i, coord) in coords.iter_mut().enumerate() {
            let element = &ctx.elements[coord.element];
            coord.reset_drawing(element);

            if element.is_note_or_chord() {
                self.first_note_or_chord.get_or_insert(i);
                self.last_note_or_chord = Some(i);
                self.nb_notes_or_chords += 1;
            }

            match &element.kind {
                ElementKind::Chord { notes } => {
                    if notes.is_empty() {
                        return Err(BeamError::MissingChordNotes { index: coord.element });
                    }
                    let (y_max, y_min) = element.y_extremes();
                    coord.y_top = y_max;
                    coord.y_bottom = y_min;
                    sum_y += (y_max + y_min) / 2.0;
                }
                ElementKind::Note { .. } => {
                    coord.y_top = element.y;
                    coord.y_bottom = element.y;
                    sum_y += element.y;
                }
                ElementKind::Rest | ElementKind::Space => {
                    coord.y_top = element.y;
                    coord.y_bottom = element.y;
                    nb_rests += 1;
                }
            }
        }

        // A beam of rests only has no mean position.
        if coords.len() != nb_rests {
            self.avg_y = sum_y / (coords.len() - nb_rests) as f64;
        }

        self.initialized = true;
        Ok(())
    }

    /// Placement of the beam, highest precedence first: the requested one,
    /// mixed for cross-staff beams and contradicting stem directions, the
    /// members' common stem direction, the layer direction, and finally the
    /// mean note position against the staff centre.
    pub fn calc_beam_place(
        &self,
        iface: &BeamDrawingInterface,
        layer_stem_dir: Option<StemDirection>,
        place: BeamPlace,
    ) -> BeamPlace {
        if place != BeamPlace::Unset {
            return place;
        }
        if iface.cross_staff || iface.has_multiple_stem_dir {
            return BeamPlace::Mixed;
        }
        match iface.notes_stem_dir.or(layer_stem_dir) {
            Some(StemDirection::Up) => BeamPlace::Above,
            Some(StemDirection::Down) => BeamPlace::Below,
            None => {
                if self.avg_y < self.vertical_center {
                    BeamPlace::Above
                } else {
                    BeamPlace::Below
                }
            }
        }
    }

    fn calc_beam_slope(
        &mut self,
        coords: &mut [BeamElementCoord],
        ctx: &LayoutContext,
        iface: &BeamDrawingInterface,
    ) {
        self.slope = 0.0;

        if self.nb_notes_or_chords < 2 {
            return;
        }
        let (Some(first), Some(last)) = (self.first_note_or_chord, self.last_note_or_chord) else {
            return;
        };

        self.slope = calc_slope(&coords[first], &coords[last]);
        log::debug!("Slope (raw) {}", self.slope);

        if self.slope == 0.0 {
            return;
        }

        let unit = ctx.metrics.drawing_unit(ctx.staff.staff_size);
        let mut max_step = unit * MAX_STEP_UNITS;
        let cur_step = (coords[first].y_beam - coords[last].y_beam).abs();

        if self.nb_notes_or_chords == 2 {
            max_step = unit * TWO_NOTE_MAX_STEP_UNITS;
            let dist = (coords[last].x - coords[first].x).abs();
            if dist < unit * CLOSE_NOTES_DISTANCE_UNITS {
                max_step = unit / 2.0;
            }
        }

        if cur_step < max_step {
            return;
        }

        // Keep the end further from the notes and bring the other one closer.
        match iface.drawing_place {
            BeamPlace::Above => {
                if self.slope > 0.0 {
                    coords[first].y_beam = coords[last].y_beam - max_step;
                } else {
                    coords[last].y_beam = coords[first].y_beam - max_step;
                }
            }
            BeamPlace::Below => {
                if self.slope > 0.0 {
                    coords[last].y_beam = coords[first].y_beam + max_step;
                } else {
                    coords[first].y_beam = coords[last].y_beam + max_step;
                }
            }
            BeamPlace::Mixed | BeamPlace::Unset => {}
        }

        self.slope = calc_slope(&coords[first], &coords[last]);
        log::debug!("Slope (adjusted) {}", self.slope);
    }

    /// Y of the beam line at `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        self.starting_y + self.slope * (x - self.starting_x)
    }
}

fn calc_slope(p1: &BeamElementCoord, p2: &BeamElementCoord) -> f64 {
    let dx = p2.x - p1.x;
    if dx == 0.0 {
        return 0.0;
    }
    (p2.y_beam - p1.y_beam) / dx
}

fn check_coords(coords: &[BeamElementCoord], elements: &[LayerElement]) -> Result<(), BeamError> {
    if coords.is_empty() {
        return Err(BeamError::EmptyBeam);
    }
    if let Some(coord) = coords.iter().find(|c| c.element >= elements.len()) {
        return Err(BeamError::MissingElement { index: coord.element, len: elements.len() });
    }
    Ok(())
}
