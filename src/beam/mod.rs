//! Beam layout — stems, slope and placement of a group of beamed notes.
//!
//! A [`Beam`] owns the coordinates of its members and the segment that lays
//! them out. Members are given as indices into a caller-owned element list,
//! which has to be passed again to every layout pass.

pub(crate) mod constants;
mod coord;
mod interface;
mod segment;
pub mod stem;

pub use coord::{BeamElementCoord, StemGeometry};
pub use interface::BeamDrawingInterface;
pub use segment::{BeamSegment, LayoutContext};

use serde::Serialize;

use crate::error::BeamError;
use crate::model::{BeamPlace, LayerElement};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Result of a beam layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamLayout {
    pub place: BeamPlace,
    pub starting_x: f64,
    pub starting_y: f64,
    pub slope: f64,
    /// Distance from one beam to the next (black + white)
    pub beam_width: f64,
    pub beam_width_black: f64,
    pub beam_width_white: f64,
    pub members: Vec<BeamElementCoord>,
}

impl BeamLayout {
    /// Y of the beam line at `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        self.starting_y + self.slope * (x - self.starting_x)
    }
}

#[derive(Debug, Clone)]
pub struct Beam {
    members: Vec<usize>,
    coords: Vec<BeamElementCoord>,
    segment: BeamSegment,
    iface: BeamDrawingInterface,
    /// Placement asked for by the encoding
    place: BeamPlace,
}

impl Beam {
    /// A beam over `members`, given in musical order as indices into
    /// `elements`.
    pub fn new(elements: &[LayerElement], members: &[usize]) -> Result<Self, BeamError> {
        if let Some(&index) = members.iter().find(|&&i| i >= elements.len()) {
            return Err(BeamError::MissingElement { index, len: elements.len() });
        }

        let coords = members
            .iter()
            .map(|&i| BeamElementCoord::new(i, &elements[i]))
            .collect();
        let iface = BeamDrawingInterface::from_members(members.iter().map(|&i| &elements[i]));

        Ok(Beam {
            members: members.to_vec(),
            coords,
            segment: BeamSegment::new(),
            iface,
            place: BeamPlace::Unset,
        })
    }

    pub fn with_place(mut self, place: BeamPlace) -> Self {
        self.place = place;
        self
    }

    /// Keep the beam horizontal (bowed tremolos).
    pub fn with_repeated_pattern(mut self, repeated_pattern: bool) -> Self {
        self.iface.repeated_pattern = repeated_pattern;
        self
    }

    /// Lay out the beam and the stems of its members.
    pub fn calc_stem(&mut self, ctx: &LayoutContext) -> Result<BeamPlace, BeamError> {
        self.segment
            .compute_beam_full(&mut self.coords, ctx, &mut self.iface, self.place)
    }

    /// Lay out the beam again with another placement, without initializing
    /// the members again. Fails with [`BeamError::NotInitialized`] unless
    /// `calc_stem` succeeded since the last reset.
    pub fn recalc_place(
        &mut self,
        ctx: &LayoutContext,
        place: BeamPlace,
    ) -> Result<BeamPlace, BeamError> {
        self.segment
            .recompute_placement_only(&mut self.coords, ctx, &mut self.iface, place)
    }

    /// Forget everything the last layout pass computed.
    pub fn reset_drawing(&mut self, elements: &[LayerElement]) {
        self.segment.reset();
        self.iface.drawing_place = BeamPlace::Unset;
        for coord in &mut self.coords {
            if let Some(element) = elements.get(coord.element) {
                coord.reset_drawing(element);
            }
        }
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn coords(&self) -> &[BeamElementCoord] {
        &self.coords
    }

    pub fn segment(&self) -> &BeamSegment {
        &self.segment
    }

    pub fn interface(&self) -> &BeamDrawingInterface {
        &self.iface
    }

    /// Position of `element` in the beam. A chord tone takes the position of
    /// its chord.
    pub fn position(&self, elements: &[LayerElement], element: usize) -> Option<usize> {
        self.members.iter().position(|&m| m == element).or_else(|| {
            let chord = elements.get(element)?.chord?;
            self.members.iter().position(|&m| m == chord)
        })
    }

    pub fn is_first_in_beam(&self, elements: &[LayerElement], element: usize) -> bool {
        self.position(elements, element) == Some(0)
    }

    pub fn is_last_in_beam(&self, elements: &[LayerElement], element: usize) -> bool {
        match self.position(elements, element) {
            Some(pos) => pos + 1 == self.members.len(),
            None => false,
        }
    }

    pub fn layout(&self) -> BeamLayout {
        BeamLayout {
            place: self.iface.drawing_place,
            starting_x: self.segment.starting_x,
            starting_y: self.segment.starting_y,
            slope: self.segment.slope,
            beam_width: self.iface.beam_width,
            beam_width_black: self.iface.beam_width_black,
            beam_width_white: self.iface.beam_width_white,
            members: self.coords.clone(),
        }
    }
}
