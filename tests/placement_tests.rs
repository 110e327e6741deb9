//! Placement tests — which side of the notes a beam goes, and re-running the
//! layout with another placement.

use beamlib::{
    layer_stem_directions, Beam, BeamError, BeamPlace, Duration, EngravingOptions, LayerElement,
    LayoutContext, NoteHead, StaffContext, StandardMetrics, StemDirection,
};
use pretty_assertions::assert_eq;

const STAFF_Y: f64 = 200.0;
const UNIT: f64 = 10.0;

fn metrics() -> StandardMetrics {
    StandardMetrics::new(EngravingOptions { unit: UNIT, ..Default::default() })
}

fn note(x: f64, loc: i32) -> LayerElement {
    LayerElement::note(x, STAFF_Y + (loc - 8) as f64 * UNIT, loc, Duration::D16)
}

/// Lay out all `elements` as one beam and return the resolved placement.
fn resolve(
    elements: &[LayerElement],
    place: BeamPlace,
    layer_stem_dir: Option<StemDirection>,
) -> (BeamPlace, Beam) {
    let staff = StaffContext::new(STAFF_Y);
    let metrics = metrics();
    let members: Vec<usize> = (0..elements.len()).collect();
    let mut beam = Beam::new(elements, &members).unwrap().with_place(place);
    let ctx = LayoutContext::new(elements, &staff, &metrics).with_layer_stem_dir(layer_stem_dir);
    let resolved = beam.calc_stem(&ctx).unwrap();
    assert_eq!(resolved, beam.interface().drawing_place);
    (resolved, beam)
}

fn low_notes() -> Vec<LayerElement> {
    vec![note(0.0, 1), note(40.0, 2), note(80.0, 3)]
}

fn high_notes() -> Vec<LayerElement> {
    vec![note(0.0, 6), note(40.0, 7), note(80.0, 9)]
}

#[test]
fn low_notes_get_the_beam_above() {
    let (place, beam) = resolve(&low_notes(), BeamPlace::Unset, None);
    assert_eq!(place, BeamPlace::Above);
    assert!(beam.segment().avg_y < beam.segment().vertical_center);
    for coord in beam.coords() {
        assert_eq!(coord.stem_dir, Some(StemDirection::Up));
    }
}

#[test]
fn high_notes_get_the_beam_below() {
    let (place, _) = resolve(&high_notes(), BeamPlace::Unset, None);
    assert_eq!(place, BeamPlace::Below);
}

#[test]
fn notes_on_the_centre_line_get_the_beam_below() {
    let elements = vec![note(0.0, 4), note(40.0, 4)];
    let (place, beam) = resolve(&elements, BeamPlace::Unset, None);
    assert_eq!(beam.segment().avg_y, beam.segment().vertical_center);
    assert_eq!(place, BeamPlace::Below);
}

#[test]
fn requested_place_wins() {
    let elements: Vec<LayerElement> = low_notes()
        .into_iter()
        .map(|n| n.with_stem_dir(StemDirection::Up))
        .collect();
    let (place, beam) = resolve(&elements, BeamPlace::Below, Some(StemDirection::Up));
    assert_eq!(place, BeamPlace::Below);
    for coord in beam.coords() {
        assert_eq!(coord.stem_dir, Some(StemDirection::Down));
    }

    let (place, _) = resolve(&high_notes(), BeamPlace::Mixed, None);
    assert_eq!(place, BeamPlace::Mixed);
}

#[test]
fn cross_staff_beams_are_mixed() {
    let mut elements = low_notes();
    elements[1].cross_staff = Some(2);
    let (place, beam) = resolve(&elements, BeamPlace::Unset, Some(StemDirection::Up));
    assert_eq!(place, BeamPlace::Mixed);
    assert!(beam.interface().cross_staff);
    // No stem direction is made up for the cross-staff member.
    assert_eq!(beam.coords()[1].stem_dir, None);
}

#[test]
fn contradicting_stem_directions_are_mixed() {
    let elements = vec![
        note(0.0, 2).with_stem_dir(StemDirection::Up),
        note(40.0, 6).with_stem_dir(StemDirection::Down),
        note(80.0, 3).with_stem_dir(StemDirection::Up),
    ];
    let (place, beam) = resolve(&elements, BeamPlace::Unset, None);
    assert_eq!(place, BeamPlace::Mixed);
    assert!(beam.interface().has_multiple_stem_dir);

    let dirs: Vec<_> = beam.coords().iter().map(|c| c.stem_dir).collect();
    assert_eq!(
        dirs,
        vec![Some(StemDirection::Up), Some(StemDirection::Down), Some(StemDirection::Up)]
    );
    let stems: Vec<_> = beam.coords().iter().map(|c| c.stem.unwrap().dir).collect();
    assert_eq!(stems, vec![StemDirection::Up, StemDirection::Down, StemDirection::Up]);
}

#[test]
fn common_stem_direction_beats_the_layer() {
    let elements: Vec<LayerElement> = high_notes()
        .into_iter()
        .enumerate()
        .map(|(i, n)| if i == 0 { n.with_stem_dir(StemDirection::Up) } else { n })
        .collect();
    let (place, _) = resolve(&elements, BeamPlace::Unset, Some(StemDirection::Down));
    assert_eq!(place, BeamPlace::Above);
}

#[test]
fn layer_direction_beats_the_note_positions() {
    let (place, _) = resolve(&low_notes(), BeamPlace::Unset, Some(StemDirection::Down));
    assert_eq!(place, BeamPlace::Below);
    let (place, _) = resolve(&high_notes(), BeamPlace::Unset, Some(StemDirection::Up));
    assert_eq!(place, BeamPlace::Above);
}

#[test]
fn layer_directions_for_two_voices() {
    let dirs = layer_stem_directions(&[true, true]);
    let (place, _) = resolve(&high_notes(), BeamPlace::Unset, dirs[0]);
    assert_eq!(place, BeamPlace::Above);
    let (place, _) = resolve(&low_notes(), BeamPlace::Unset, dirs[1]);
    assert_eq!(place, BeamPlace::Below);
}

#[test]
fn placement_is_deterministic() {
    for _ in 0..3 {
        assert_eq!(resolve(&low_notes(), BeamPlace::Unset, None).0, BeamPlace::Above);
        assert_eq!(resolve(&high_notes(), BeamPlace::Unset, None).0, BeamPlace::Below);
    }
}

// ─── Second pass ────────────────────────────────────────────────────

#[test]
fn recomputing_the_placement_keeps_member_extents() {
    let elements = vec![
        note(0.0, 2).with_stem_dir(StemDirection::Up),
        note(40.0, 6).with_stem_dir(StemDirection::Down),
        note(80.0, 3),
    ];
    let staff = StaffContext::new(STAFF_Y);
    let metrics = metrics();
    let ctx = LayoutContext::new(&elements, &staff, &metrics);
    let mut beam = Beam::new(&elements, &[0, 1, 2]).unwrap();

    assert_eq!(beam.calc_stem(&ctx).unwrap(), BeamPlace::Mixed);
    let extents: Vec<(f64, f64)> = beam.coords().iter().map(|c| (c.y_top, c.y_bottom)).collect();
    let avg_y = beam.segment().avg_y;

    // Mixed makes no sense here: the third note has no direction.
    assert_eq!(beam.recalc_place(&ctx, BeamPlace::Above).unwrap(), BeamPlace::Above);
    assert_eq!(beam.interface().drawing_place, BeamPlace::Above);

    let again: Vec<(f64, f64)> = beam.coords().iter().map(|c| (c.y_top, c.y_bottom)).collect();
    assert_eq!(again, extents);
    assert_eq!(beam.segment().avg_y, avg_y);

    let offset = beam.interface().stem_x_above[0];
    for (coord, element) in beam.coords().iter().zip(&elements) {
        assert_eq!(coord.stem_dir, Some(StemDirection::Up));
        assert_eq!(coord.x, element.x + offset);
    }

    // Running the second pass twice gives the same layout.
    let first = beam.layout();
    beam.recalc_place(&ctx, BeamPlace::Above).unwrap();
    assert_eq!(beam.layout(), first);
}

#[test]
fn full_and_partial_passes_agree_for_the_same_place() {
    let elements = low_notes();
    let staff = StaffContext::new(STAFF_Y);
    let metrics = metrics();
    let ctx = LayoutContext::new(&elements, &staff, &metrics);

    let mut full = Beam::new(&elements, &[0, 1, 2]).unwrap().with_place(BeamPlace::Below);
    full.calc_stem(&ctx).unwrap();

    let mut partial = Beam::new(&elements, &[0, 1, 2]).unwrap();
    partial.calc_stem(&ctx).unwrap();
    partial.recalc_place(&ctx, BeamPlace::Below).unwrap();

    assert_eq!(partial.layout(), full.layout());
}

#[test]
fn recomputing_the_placement_needs_a_first_pass() {
    let chord = LayerElement::chord(
        0.0,
        vec![
            NoteHead { loc: 2, y: STAFF_Y - 6.0 * UNIT },
            NoteHead { loc: 6, y: STAFF_Y - 2.0 * UNIT },
        ],
        Duration::D16,
    );
    let elements = vec![chord, note(40.0, 4)];
    let staff = StaffContext::new(STAFF_Y);
    let metrics = metrics();
    let ctx = LayoutContext::new(&elements, &staff, &metrics);
    let mut beam = Beam::new(&elements, &[0, 1]).unwrap();

    assert!(!beam.segment().is_initialized());
    assert_eq!(beam.recalc_place(&ctx, BeamPlace::Below), Err(BeamError::NotInitialized));

    beam.calc_stem(&ctx).unwrap();
    assert!(beam.segment().is_initialized());
    assert_eq!(beam.recalc_place(&ctx, BeamPlace::Below), Ok(BeamPlace::Below));
    let chord = &beam.coords()[0];
    assert_eq!(chord.y_top, STAFF_Y - 2.0 * UNIT);
    assert_eq!(chord.y_bottom, STAFF_Y - 6.0 * UNIT);
    assert!(beam.interface().beam_width > 0.0);
    assert!(beam.interface().stem_x_below[0] < 0.0);

    beam.reset_drawing(&elements);
    assert_eq!(beam.recalc_place(&ctx, BeamPlace::Above), Err(BeamError::NotInitialized));
}

#[test]
fn mixed_beam_with_an_undirected_end_still_lays_out() {
    let elements = vec![
        note(0.0, 2),
        note(40.0, 6).with_stem_dir(StemDirection::Down),
        note(80.0, 3).with_stem_dir(StemDirection::Up),
    ];
    let (place, beam) = resolve(&elements, BeamPlace::Unset, None);
    assert_eq!(place, BeamPlace::Mixed);

    let first = &beam.coords()[0];
    assert_eq!(first.stem_dir, None);
    assert_eq!(first.stem.map(|s| s.dir), Some(StemDirection::Down));
    assert!(beam.segment().slope.is_finite());
    let segment = beam.segment();
    for coord in beam.coords() {
        let expected = segment.starting_y + segment.slope * (coord.x - segment.starting_x);
        assert!((coord.y_beam - expected).abs() < 1e-9);
    }
}
