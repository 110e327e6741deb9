//! Shared constants for beam layout (stem lengths in half units, distances
//! in drawing units).

// ── Stems ───────────────────────────────────────────────────────────
pub(crate) const STANDARD_STEMLENGTH: i32 = 7; // in units; stems are measured in half units
pub(crate) const STANDARD_STEMLENGTH_HALF_UNITS: i32 = STANDARD_STEMLENGTH * 2;
pub(crate) const MAX_STEM_SHORTENING: i32 = 6; // half units

// ── Slope ───────────────────────────────────────────────────────────
pub(super) const MAX_STEP_UNITS: f64 = 4.0; // beams with 3+ notes
pub(super) const TWO_NOTE_MAX_STEP_UNITS: f64 = 2.0;
pub(super) const CLOSE_NOTES_DISTANCE_UNITS: f64 = 6.0; // two notes closer than this get a flatter beam

// ── Beam thickness ──────────────────────────────────────────────────
pub(super) const WHITE_WIDTH_64TH_FACTOR: f64 = 4.0 / 3.0;

// ── Glyphs ──────────────────────────────────────────────────────────
pub(crate) const SMUFL_E0A3_NOTEHEAD_HALF: u32 = 0xE0A3;
