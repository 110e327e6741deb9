//! Drawing metrics: unit sizes, stem and beam widths, glyph widths.
//!
//! Every length the beam code uses comes from a [`DocMetrics`]
//! implementation. [`StandardMetrics`] derives them from an
//! [`EngravingOptions`] value (all lengths in drawing units at staff size
//! 100) and, optionally, from a [`GlyphTable`] read from a font metrics
//! file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::beam::constants::SMUFL_E0A3_NOTEHEAD_HALF;
use crate::error::BeamError;
use crate::model::StemDirection;

/// Lookups the beam code needs from the surrounding document.
///
/// `staff_size` is a percentage (100 = normal staff).
pub trait DocMetrics {
    /// Drawing unit: half the distance between two staff lines.
    fn drawing_unit(&self, staff_size: i32) -> f64;

    fn drawing_double_unit(&self, staff_size: i32) -> f64 {
        self.drawing_unit(staff_size) * 2.0
    }

    fn drawing_stem_width(&self, staff_size: i32) -> f64;

    fn drawing_beam_width(&self, staff_size: i32, cue_size: bool) -> f64;

    /// Gap between two stacked beams.
    fn drawing_beam_white_width(&self, staff_size: i32, cue_size: bool) -> f64;

    fn glyph_width(&self, code: u32, staff_size: i32, cue_size: bool) -> f64;

    /// Vertical offset from the notehead centre to where a stem attaches.
    fn stem_anchor_y(&self, dir: StemDirection, staff_size: i32, cue_size: bool) -> f64;
}

/// Engraving options. Lengths are in drawing units at staff size 100,
/// except `unit` which is the drawing unit itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingOptions {
    pub unit: f64,
    /// Scale of cue-sized notes relative to normal ones
    pub cue_factor: f64,
    pub stem_width: f64,
    pub beam_width: f64,
    pub beam_white_width: f64,
    /// Width of a half notehead (SMuFL E0A3)
    pub notehead_width: f64,
    /// Stem attachment point above (stem up) or below (stem down) the notehead centre
    pub stem_anchor_y: f64,
}

impl Default for EngravingOptions {
    fn default() -> Self {
        EngravingOptions {
            unit: 9.0,
            cue_factor: 0.75,
            stem_width: 0.2,
            beam_width: 1.0,
            beam_white_width: 0.5,
            notehead_width: 2.36,
            stem_anchor_y: 0.336,
        }
    }
}

impl EngravingOptions {
    /// Read options from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, BeamError> {
        serde_json::from_str(json).map_err(|e| BeamError::InvalidRequest(format!("options: {e}")))
    }
}

/// Metrics computed from [`EngravingOptions`].
#[derive(Debug, Clone, Default)]
pub struct StandardMetrics {
    options: EngravingOptions,
    glyphs: Option<GlyphTable>,
}

impl StandardMetrics {
    pub fn new(options: EngravingOptions) -> Self {
        StandardMetrics { options, glyphs: None }
    }

    /// Take glyph widths from a font metrics table instead of the options.
    pub fn with_glyphs(mut self, glyphs: GlyphTable) -> Self {
        self.glyphs = Some(glyphs);
        self
    }

    pub fn options(&self) -> &EngravingOptions {
        &self.options
    }

    fn scaled(&self, units: f64, staff_size: i32, cue_size: bool) -> f64 {
        let len = units * self.drawing_unit(staff_size);
        if cue_size {
            len * self.options.cue_factor
        } else {
            len
        }
    }
}

impl DocMetrics for StandardMetrics {
    fn drawing_unit(&self, staff_size: i32) -> f64 {
        self.options.unit * staff_size as f64 / 100.0
    }

    fn drawing_stem_width(&self, staff_size: i32) -> f64 {
        self.scaled(self.options.stem_width, staff_size, false)
    }

    fn drawing_beam_width(&self, staff_size: i32, cue_size: bool) -> f64 {
        self.scaled(self.options.beam_width, staff_size, cue_size)
    }

    fn drawing_beam_white_width(&self, staff_size: i32, cue_size: bool) -> f64 {
        self.scaled(self.options.beam_white_width, staff_size, cue_size)
    }

    fn glyph_width(&self, code: u32, staff_size: i32, cue_size: bool) -> f64 {
        let units = self
            .glyphs
            .as_ref()
            .and_then(|g| g.width_in_units(code))
            .unwrap_or_else(|| {
                if code != SMUFL_E0A3_NOTEHEAD_HALF {
                    log::debug!("No width for glyph U+{code:04X}, using notehead width");
                }
                self.options.notehead_width
            });
        self.scaled(units, staff_size, cue_size)
    }

    fn stem_anchor_y(&self, dir: StemDirection, staff_size: i32, cue_size: bool) -> f64 {
        dir.sign() * self.scaled(self.options.stem_anchor_y, staff_size, cue_size)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Font metrics
// ═══════════════════════════════════════════════════════════════════════

/// Glyph bounding boxes read from a font metrics file.
///
/// The file lists one `<g>` element per glyph with its SMuFL code point in
/// `c` and its bounding box in font units:
///
/// ```xml
/// <bounding-boxes font-family="Bravura" units-per-em="1000">
///   <g c="E0A3" x="0" y="-140" w="295" h="280"/>
/// </bounding-boxes>
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    pub font_family: Option<String>,
    pub units_per_em: f64,
    boxes: HashMap<u32, GlyphBox>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One em is the height of the staff: four spaces, eight drawing units.
const UNITS_PER_EM_IN_DRAWING_UNITS: f64 = 8.0;

impl GlyphTable {
    pub fn parse(xml: &str) -> Result<Self, BeamError> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| BeamError::GlyphTable(format!("Failed to parse font metrics: {e}")))?;

        let root = doc.root_element();
        let units_per_em = match root.attribute("units-per-em") {
            Some(v) => parse_number(v, "units-per-em")?,
            None => 1000.0,
        };
        if units_per_em <= 0.0 {
            return Err(BeamError::GlyphTable(format!(
                "units-per-em must be positive, got {units_per_em}"
            )));
        }

        let mut boxes = HashMap::new();
        for node in root.descendants().filter(|n| n.has_tag_name("g")) {
            let code = match node.attribute("c") {
                Some(c) => u32::from_str_radix(c, 16)
                    .map_err(|e| BeamError::GlyphTable(format!("Bad glyph code '{c}': {e}")))?,
                None => continue,
            };
            let attr = |name: &str| -> Result<f64, BeamError> {
                node.attribute(name).map_or(Ok(0.0), |v| parse_number(v, name))
            };
            boxes.insert(
                code,
                GlyphBox {
                    x: attr("x")?,
                    y: attr("y")?,
                    width: attr("w")?,
                    height: attr("h")?,
                },
            );
        }

        Ok(GlyphTable {
            font_family: root.attribute("font-family").map(str::to_string),
            units_per_em,
            boxes,
        })
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn glyph(&self, code: u32) -> Option<&GlyphBox> {
        self.boxes.get(&code)
    }

    /// Glyph width in drawing units at staff size 100.
    pub fn width_in_units(&self, code: u32) -> Option<f64> {
        self.glyph(code)
            .map(|b| b.width / self.units_per_em * UNITS_PER_EM_IN_DRAWING_UNITS)
    }
}

fn parse_number(value: &str, name: &str) -> Result<f64, BeamError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| BeamError::GlyphTable(format!("Bad value '{value}' for '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BRAVURA_SNIPPET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bounding-boxes font-family="Bravura" units-per-em="1000">
  <g c="E0A3" x="0" y="-140" w="295" h="280" />
  <g c="E0A4" x="0" y="-140" w="295" h="280" />
  <g c="E4E5" x="0" y="-375" w="270" h="750" />
</bounding-boxes>"#;

    #[test]
    fn options_from_partial_json_keep_defaults() {
        let options = EngravingOptions::from_json(r#"{ "unit": 10.0 }"#).unwrap();
        assert_eq!(options.unit, 10.0);
        assert_eq!(options.cue_factor, 0.75);
        assert_eq!(options.stem_width, 0.2);
    }

    #[test]
    fn options_reject_bad_json() {
        let err = EngravingOptions::from_json(r#"{ "unit": "ten" }"#).unwrap_err();
        assert!(matches!(err, BeamError::InvalidRequest(_)));
    }

    #[test]
    fn units_scale_with_staff_size_and_cue() {
        let metrics = StandardMetrics::new(EngravingOptions { unit: 10.0, ..Default::default() });
        assert_eq!(metrics.drawing_unit(100), 10.0);
        assert_eq!(metrics.drawing_unit(50), 5.0);
        assert_eq!(metrics.drawing_double_unit(100), 20.0);
        assert_eq!(metrics.drawing_stem_width(100), 2.0);
        assert_eq!(metrics.drawing_beam_width(100, false), 10.0);
        assert_eq!(metrics.drawing_beam_width(100, true), 7.5);
        let anchor = metrics.stem_anchor_y(StemDirection::Down, 100, false);
        assert!((anchor + 3.36).abs() < 1e-9, "down anchor was {anchor}");
    }

    #[test]
    fn glyph_table_parses_bravura_boxes() {
        let table = GlyphTable::parse(BRAVURA_SNIPPET).unwrap();
        assert_eq!(table.font_family.as_deref(), Some("Bravura"));
        assert_eq!(table.len(), 3);
        let half = table.glyph(0xE0A3).unwrap();
        assert_eq!(half.width, 295.0);
        assert_eq!(half.y, -140.0);
        assert_eq!(table.width_in_units(0xE0A3), Some(2.36));
        assert_eq!(table.width_in_units(0xE0A0), None);
    }

    #[test]
    fn glyph_table_overrides_option_width() {
        let table = GlyphTable::parse(
            r#"<bounding-boxes units-per-em="2000"><g c="E0A3" w="500"/></bounding-boxes>"#,
        )
        .unwrap();
        let metrics = StandardMetrics::new(EngravingOptions { unit: 10.0, ..Default::default() })
            .with_glyphs(table);
        assert_eq!(metrics.glyph_width(0xE0A3, 100, false), 20.0);
        assert_eq!(metrics.glyph_width(0xE0A3, 100, true), 15.0);
    }

    #[test]
    fn glyph_table_errors() {
        assert!(matches!(GlyphTable::parse("<bounding-boxes>"), Err(BeamError::GlyphTable(_))));
        assert!(matches!(
            GlyphTable::parse(r#"<bounding-boxes><g c="XYZ" w="1"/></bounding-boxes>"#),
            Err(BeamError::GlyphTable(_))
        ));
        assert!(matches!(
            GlyphTable::parse(r#"<bounding-boxes units-per-em="0"/>"#),
            Err(BeamError::GlyphTable(_))
        ));
    }
}
