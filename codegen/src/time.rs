// time.rs — Time & value model
//
// A time value is a signed magnitude paired with a unit. The unit `None`
// marks a dimensionless magnitude; such a value only counts as a time when
// its magnitude is zero.
//
// Preconditions: none (value types only).
// Postconditions: none.
// Failure modes: `TimeUnit::from_name` returns `None` for unknown spellings.
// Side effects: none.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Units ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    None,
    Nsec,
    Usec,
    Msec,
    Sec,
    Min,
    Hour,
    Day,
    Week,
}

/// All units with a dimension, in increasing order of magnitude.
pub const TIME_UNITS: [TimeUnit; 8] = [
    TimeUnit::Nsec,
    TimeUnit::Usec,
    TimeUnit::Msec,
    TimeUnit::Sec,
    TimeUnit::Min,
    TimeUnit::Hour,
    TimeUnit::Day,
    TimeUnit::Week,
];

impl TimeUnit {
    /// Canonical lower-case unit name (`"msec"`, `"sec"`, ...). Empty for `None`.
    pub fn canonical_name(self) -> &'static str {
        match self {
            TimeUnit::None => "",
            TimeUnit::Nsec => "nsec",
            TimeUnit::Usec => "usec",
            TimeUnit::Msec => "msec",
            TimeUnit::Sec => "sec",
            TimeUnit::Min => "min",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
        }
    }

    /// Parse a unit as written in source. Accepts the canonical name plus the
    /// usual abbreviations and plurals.
    pub fn from_name(name: &str) -> Option<TimeUnit> {
        let unit = match name {
            "ns" | "nsec" | "nsecs" => TimeUnit::Nsec,
            "us" | "usec" | "usecs" => TimeUnit::Usec,
            "ms" | "msec" | "msecs" => TimeUnit::Msec,
            "s" | "sec" | "secs" | "second" | "seconds" => TimeUnit::Sec,
            "min" | "mins" | "minute" | "minutes" => TimeUnit::Min,
            "h" | "hour" | "hours" => TimeUnit::Hour,
            "d" | "day" | "days" => TimeUnit::Day,
            "week" | "weeks" => TimeUnit::Week,
            _ => return None,
        };
        Some(unit)
    }

    /// Nanoseconds per unit. `None` counts as nanoseconds.
    pub fn nanos_per_unit(self) -> i128 {
        match self {
            TimeUnit::None | TimeUnit::Nsec => 1,
            TimeUnit::Usec => 1_000,
            TimeUnit::Msec => 1_000_000,
            TimeUnit::Sec => 1_000_000_000,
            TimeUnit::Min => 60 * 1_000_000_000,
            TimeUnit::Hour => 3_600 * 1_000_000_000,
            TimeUnit::Day => 86_400 * 1_000_000_000,
            TimeUnit::Week => 604_800 * 1_000_000_000,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ── Time value ──────────────────────────────────────────────────────────────

/// A magnitude with a unit, e.g. `100 msec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeValue {
    pub magnitude: i64,
    pub unit: TimeUnit,
}

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue {
        magnitude: 0,
        unit: TimeUnit::None,
    };

    pub fn new(magnitude: i64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0
    }

    /// A literal time is well-formed if it has a unit, or if it is zero.
    pub fn is_valid_time(&self) -> bool {
        self.unit != TimeUnit::None || self.is_zero()
    }

    /// Total length in nanoseconds, widened so no unit overflows.
    pub fn to_nanos(&self) -> i128 {
        self.magnitude as i128 * self.unit.nanos_per_unit()
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TimeUnit::None => write!(f, "{}", self.magnitude),
            unit => write!(f, "{} {}", self.magnitude, unit),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
