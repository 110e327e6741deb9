//! Stem lengths of beamed notes, in half units.

use super::constants::STANDARD_STEMLENGTH_HALF_UNITS;
use crate::model::Duration;

/// Stem length in half units of a beamed note.
///
/// `clipped` is the length the staff allows for the note (see
/// [`StaffContext::stem_len_in_half_units`](crate::staff::StaffContext::stem_len_in_half_units)).
/// Notes on a staff line get one extra half unit unless the staff already
/// shortened their stem. Shortened eighth-note stems keep the staff length.
pub fn stem_len_in_half_units(dur: Duration, on_staff_line: bool, clipped: i32) -> i32 {
    let clipped_by_staff = clipped != STANDARD_STEMLENGTH_HALF_UNITS;
    let extend = on_staff_line && !clipped_by_staff;

    let (extended, regular) = match dur {
        Duration::Eighth => {
            if clipped_by_staff {
                return clipped;
            }
            return if on_staff_line { 14 } else { 13 };
        }
        Duration::D16 => (14, 13),
        Duration::D32 => (18, 16),
        Duration::D64 => (22, 20),
        Duration::D128 => (26, 24),
        Duration::D256 => (30, 28),
        Duration::D512 => (34, 32),
        Duration::D1024 => (38, 36),
        _ => return 14,
    };

    if extend {
        extended
    } else {
        regular
    }
}
