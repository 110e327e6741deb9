//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::compute_beam_json;

/// Lay out a beam from a JSON request and return the layout as JSON.
///
/// Called from Kotlin as:
///   external fun computeBeam(request: String): String?
#[no_mangle]
pub extern "system" fn Java_org_beamlib_BeamLib_computeBeam(
    mut env: JNIEnv,
    _class: JClass,
    request: JString,
) -> jstring {
    let json: String = match env.get_string(&request) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    match compute_beam_json(&json) {
        Ok(layout) => match env.new_string(&layout) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::warn!("Beam layout failed: {e}");
            std::ptr::null_mut()
        }
    }
}
