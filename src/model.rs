//! Data model for the layer elements a beam is laid out over.
//!
//! These structures carry the read-only inputs of a beam computation:
//! element kind, drawing position, duration class, cue size and any
//! stem direction that was set by the encoding. They are owned by the
//! caller; the beam code only refers to them by index.

use serde::{Deserialize, Serialize};

/// Duration class of a note, rest or chord.
///
/// Ordered from longest to shortest so that `max()` over a beam yields
/// its shortest (fastest) duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "breve")]
    Breve,
    #[serde(rename = "1")]
    Whole,
    #[serde(rename = "2")]
    Half,
    #[serde(rename = "4")]
    Quarter,
    #[default]
    #[serde(rename = "8")]
    Eighth,
    #[serde(rename = "16")]
    D16,
    #[serde(rename = "32")]
    D32,
    #[serde(rename = "64")]
    D64,
    #[serde(rename = "128")]
    D128,
    #[serde(rename = "256")]
    D256,
    #[serde(rename = "512")]
    D512,
    #[serde(rename = "1024")]
    D1024,
}

/// Direction of a stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemDirection {
    Up,
    Down,
}

impl StemDirection {
    /// +1.0 for up, -1.0 for down (the drawing y axis points up).
    pub fn sign(self) -> f64 {
        match self {
            StemDirection::Up => 1.0,
            StemDirection::Down => -1.0,
        }
    }
}

/// Placement of a beam relative to its noteheads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamPlace {
    /// Nothing requested / not resolved yet
    #[default]
    Unset,
    Above,
    Below,
    /// Stems on both sides of the beam
    Mixed,
}

/// One notehead: its staff location (0 = bottom line, even = on a line)
/// and its drawing y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteHead {
    pub loc: i32,
    pub y: f64,
}

/// What a layer element is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Note { loc: i32 },
    Chord { notes: Vec<NoteHead> },
    Rest,
    /// Invisible placeholder taking up time
    Space,
}

impl ElementKind {
    pub fn is_note_or_chord(&self) -> bool {
        matches!(self, ElementKind::Note { .. } | ElementKind::Chord { .. })
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, ElementKind::Chord { .. })
    }

    /// Notes and chords carry a stem interface; rests and spaces do not.
    pub fn has_stem(&self) -> bool {
        self.is_note_or_chord()
    }
}

/// A layer element as seen by the beam code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerElement {
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Drawing x of the element (notehead centre)
    pub x: f64,
    /// Drawing y of the element. For a chord this is the y it is anchored to.
    pub y: f64,
    #[serde(default)]
    pub dur: Duration,
    #[serde(default)]
    pub cue_size: bool,
    /// Stem direction given by the encoding, if any
    #[serde(default)]
    pub stem_dir: Option<StemDirection>,
    /// Number of the staff this element is drawn on when it crosses staves
    #[serde(default)]
    pub cross_staff: Option<u32>,
    /// A note or chord drawn without a stem (e.g. whole notes in a tremolo)
    #[serde(default)]
    pub stemless: bool,
    /// Index of the chord this note belongs to, for chord tones
    #[serde(default)]
    pub chord: Option<usize>,
}

impl LayerElement {
    /// A single note with default duration and no stem direction.
    pub fn note(x: f64, y: f64, loc: i32, dur: Duration) -> Self {
        LayerElement {
            kind: ElementKind::Note { loc },
            x,
            y,
            dur,
            cue_size: false,
            stem_dir: None,
            cross_staff: None,
            stemless: false,
            chord: None,
        }
    }

    pub fn rest(x: f64, y: f64, dur: Duration) -> Self {
        LayerElement {
            kind: ElementKind::Rest,
            ..LayerElement::note(x, y, 0, dur)
        }
    }

    pub fn chord(x: f64, notes: Vec<NoteHead>, dur: Duration) -> Self {
        let y = notes.iter().map(|n| n.y).fold(f64::MIN, f64::max);
        LayerElement {
            kind: ElementKind::Chord { notes },
            ..LayerElement::note(x, y, 0, dur)
        }
    }

    pub fn with_stem_dir(mut self, dir: StemDirection) -> Self {
        self.stem_dir = Some(dir);
        self
    }

    pub fn with_cue_size(mut self) -> Self {
        self.cue_size = true;
        self
    }

    pub fn is_note_or_chord(&self) -> bool {
        self.kind.is_note_or_chord()
    }

    /// Highest and lowest notehead y of a chord, or the element y otherwise.
    pub fn y_extremes(&self) -> (f64, f64) {
        match &self.kind {
            ElementKind::Chord { notes } if !notes.is_empty() => {
                let max = notes.iter().map(|n| n.y).fold(f64::MIN, f64::max);
                let min = notes.iter().map(|n| n.y).fold(f64::MAX, f64::min);
                (max, min)
            }
            _ => (self.y, self.y),
        }
    }

    /// The notehead a stem in `dir` starts from: the top note of a chord for
    /// up-stems, the bottom note for down-stems, or the note itself.
    pub fn stem_note_loc(&self, dir: StemDirection) -> Option<i32> {
        match &self.kind {
            ElementKind::Note { loc } => Some(*loc),
            ElementKind::Chord { notes } => match dir {
                StemDirection::Up => notes.iter().map(|n| n.loc).max(),
                StemDirection::Down => notes.iter().map(|n| n.loc).min(),
            },
            ElementKind::Rest | ElementKind::Space => None,
        }
    }
}
