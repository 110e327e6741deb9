//! Error types for beam layout.
//!
//! Only structural problems are errors: an empty beam, a member handle that
//! does not point into the element list, a chord without notes, a second
//! layout pass without a first one. Degenerate
//! but valid beams (all rests, a single note) lay out with a flat beam.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeamError {
    /// A beam computation was requested on a beam without members.
    #[error("Beam has no elements")]
    EmptyBeam,

    /// A member refers to an element that is not in the element list.
    #[error("Beam member refers to element {index}, but only {len} elements were given")]
    MissingElement { index: usize, len: usize },

    /// A placement-only pass was asked for before the beam was laid out once.
    #[error("Beam has not been laid out yet")]
    NotInitialized,

    /// A chord member has no notes to take its extremes from.
    #[error("Chord at element {index} has no notes")]
    MissingChordNotes { index: usize },

    /// A JSON beam request could not be read.
    #[error("Invalid beam request: {0}")]
    InvalidRequest(String),

    /// A beam layout could not be written out.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A font metrics file could not be read.
    #[error("Invalid glyph table: {0}")]
    GlyphTable(String),
}
