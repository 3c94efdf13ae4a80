//! DOS date/time encoding.
//!
//! Every ZIP record carries its modification time in the two 16-bit fields
//! inherited from MS-DOS:
//!
//! ```text
//! date: bits 0-4 day, 5-8 month, 9-15 year-1980
//! time: bits 0-4 seconds/2, 5-10 minutes, 11-15 hours
//! ```
//!
//! The encoding has 2-second resolution and can only represent the years
//! 1980 through 2107; timestamps outside that range are clamped to the
//! nearest representable instant.
//!
//! ziptree converts in UTC. The calendar arithmetic is exact (proleptic
//! Gregorian), not an approximation, so month lengths and leap years round
//! correctly.

use std::time::{SystemTime, UNIX_EPOCH};

/// A calendar time packed into the two DOS fields.
///
/// One value is computed per archive build and shared by every entry, so
/// two builds from the same tree and timestamp are byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    /// Packed date: `day + month * 32 + (year - 1980) * 512`.
    pub date: u16,
    /// Packed time: `seconds / 2 + minutes * 32 + hours * 2048`.
    pub time: u16,
}

impl DosDateTime {
    /// Encode a Unix timestamp (seconds since the epoch, UTC).
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(86400);
        let tod = secs.rem_euclid(86400) as u32;

        let (year, month, day) = civil_from_days(days);

        // Clamp to the representable DOS range.
        if year < 1980 {
            return Self { date: (1 << 5) | 1, time: 0 };
        }
        if year > 2107 {
            return Self {
                date: (127 << 9) | (12 << 5) | 31,
                time: (23 << 11) | (59 << 5) | 29,
            };
        }

        let hours = tod / 3600;
        let minutes = (tod % 3600) / 60;
        let seconds = tod % 60;

        Self {
            date: (day as u16) + (month as u16) * 32 + ((year - 1980) as u16) * 512,
            time: (seconds as u16) / 2 + (minutes as u16) * 32 + (hours as u16) * 2048,
        }
    }

    /// Encode the current system time.
    pub fn now() -> Self {
        let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Self::from_unix(secs)
    }
}

/// Convert days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}
