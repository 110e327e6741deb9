//! beamlib — beam and stem geometry for engraved music notation.
//!
//! Given the members of a beam (notes, chords, rests) with their drawing
//! positions, the library decides where the beam goes, how steep it is and
//! how long every stem has to be.
//!
//! # Example
//! ```
//! use beamlib::{Beam, Duration, LayerElement, LayoutContext, StaffContext, StandardMetrics};
//!
//! let staff = StaffContext::new(0.0);
//! let metrics = StandardMetrics::default();
//! let elements = vec![
//!     LayerElement::note(0.0, -36.0, 4, Duration::Eighth),
//!     LayerElement::note(40.0, -27.0, 5, Duration::Eighth),
//! ];
//!
//! let mut beam = Beam::new(&elements, &[0, 1]).unwrap();
//! let ctx = LayoutContext::new(&elements, &staff, &metrics);
//! let place = beam.calc_stem(&ctx).unwrap();
//! println!("Placed {:?}, slope {}", place, beam.segment().slope);
//! ```

pub mod beam;
pub mod error;
pub mod metrics;
pub mod model;
pub mod staff;

#[cfg(target_os = "android")]
pub mod android;

use serde::Deserialize;

pub use beam::{
    Beam, BeamDrawingInterface, BeamElementCoord, BeamLayout, BeamSegment, LayoutContext,
    StemGeometry,
};
pub use error::BeamError;
pub use metrics::{DocMetrics, EngravingOptions, GlyphTable, StandardMetrics};
pub use model::*;
pub use staff::{layer_stem_directions, StaffContext};

/// Everything needed to lay out one beam, as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct BeamRequest {
    pub staff: StaffContext,
    #[serde(default)]
    pub options: EngravingOptions,
    pub elements: Vec<LayerElement>,
    /// Indices of the beam members in `elements`; all elements when absent
    #[serde(default)]
    pub members: Option<Vec<usize>>,
    #[serde(default)]
    pub place: BeamPlace,
    #[serde(default)]
    pub layer_stem_dir: Option<StemDirection>,
    #[serde(default)]
    pub repeated_pattern: bool,
}

/// Lay out the beam described by a request.
pub fn compute_beam(request: &BeamRequest) -> Result<BeamLayout, BeamError> {
    let metrics = StandardMetrics::new(request.options.clone());
    let members: Vec<usize> = match &request.members {
        Some(members) => members.clone(),
        None => (0..request.elements.len()).collect(),
    };

    let mut beam = Beam::new(&request.elements, &members)?
        .with_place(request.place)
        .with_repeated_pattern(request.repeated_pattern);
    let ctx = LayoutContext::new(&request.elements, &request.staff, &metrics)
        .with_layer_stem_dir(request.layer_stem_dir);
    beam.calc_stem(&ctx)?;

    Ok(beam.layout())
}

/// Lay out a beam from a JSON request and return the layout as JSON.
pub fn compute_beam_json(json: &str) -> Result<String, BeamError> {
    let request: BeamRequest =
        serde_json::from_str(json).map_err(|e| BeamError::InvalidRequest(e.to_string()))?;
    layout_to_json(&compute_beam(&request)?)
}

/// Convert a beam layout to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn layout_to_json(layout: &BeamLayout) -> Result<String, BeamError> {
    serde_json::to_string_pretty(layout).map_err(|e| BeamError::Serialization(e.to_string()))
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Lay out a beam from a JSON request and return the layout as a JSON C string.
/// The caller must free the returned string with `beamlib_free_string`.
/// Returns null on any error.
///
/// # Safety
/// `request` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn beamlib_compute_beam(request: *const c_char) -> *mut c_char {
    if request.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(request) };
    let json = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match compute_beam_json(json) {
        Ok(layout) => CString::new(layout).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("Beam layout failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by beamlib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a beamlib function, or null.
#[no_mangle]
pub unsafe extern "C" fn beamlib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
