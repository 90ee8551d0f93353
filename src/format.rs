use std::fmt;

use crate::standings::Gap;

/// Display form of a [`Gap`] as shown in the overlay's gap column.
///
/// Race time gaps use tenths (`m:ss.s` past a minute); best-lap gaps outside
/// races use thousandths.
pub struct GapDisplay {
    gap: Gap,
    is_race: bool,
}

impl Gap {
    pub fn display(self, is_race: bool) -> GapDisplay {
        GapDisplay { gap: self, is_race }
    }
}

impl fmt::Display for GapDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.gap {
            Gap::Leader => write!(f, "Leader"),
            Gap::Disconnected => write!(f, "D/C"),
            Gap::Unresolved => Ok(()),
            Gap::LapsBehind(laps) => write!(f, "{}L", laps),
            Gap::TimeGap(seconds) if !self.is_race => write!(f, "{:.3}", seconds),
            Gap::TimeGap(seconds) => {
                // Round first so 59.96 carries into the minutes instead of showing "60.0".
                let tenths = (seconds * 10.0).round();
                if tenths < 600.0 {
                    write!(f, "{:.1}", tenths / 10.0)
                } else {
                    let minutes = (tenths / 600.0).floor();
                    write!(f, "{}:{:04.1}", minutes as u64, (tenths - minutes * 600.0) / 10.0)
                }
            },
        }
    }
}
