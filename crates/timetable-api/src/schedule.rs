// Weekly schedule model and its string codec.
//
// The API stores a staff member's schedule as an opaque JSON string. Decoding
// is total: corrupt or partial data degrades to empty days, one key at a
// time, so a bad record never blocks the caller.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

/// Day of the week, in schedule key order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A half-open `HH:MM` interval within one day.
///
/// Only the shape is enforced. `start < end` and non-overlap across slots
/// are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Signed length in minutes, or `None` if either end isn't `HH:MM`.
    pub fn minutes(&self) -> Option<i64> {
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;
        Some((end - start).num_minutes())
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Seven-day map of time slots.
///
/// Field order is the serialization order, so [`Schedule::encode`] is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub monday: Vec<TimeSlot>,
    pub tuesday: Vec<TimeSlot>,
    pub wednesday: Vec<TimeSlot>,
    pub thursday: Vec<TimeSlot>,
    pub friday: Vec<TimeSlot>,
    pub saturday: Vec<TimeSlot>,
    pub sunday: Vec<TimeSlot>,
}

impl Schedule {
    /// All seven days with no slots.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a serialized schedule. Never fails.
    ///
    /// Anything that isn't a JSON object yields [`Schedule::empty`]. Inside
    /// an object, a day that is missing or not an array becomes an empty
    /// day. An array keeps its well-formed slots in order; elements without
    /// the `{start, end}` shape are dropped.
    pub fn decode(serialized: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(serialized) else {
            debug!("schedule is not a JSON object, using empty schedule");
            return Self::empty();
        };

        let mut schedule = Self::empty();
        for day in Weekday::iter() {
            match map.get(day.as_ref()).and_then(day_slots) {
                Some(slots) => *schedule.day_mut(day) = slots,
                None => debug!(%day, "day missing or not an array, using no slots"),
            }
        }
        schedule
    }

    /// Serialize all seven days as compact JSON in weekday order.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("schedule serialization should not fail")
    }

    /// Strict parse for user-supplied input: unknown days are ignored and
    /// missing days default to empty, but malformed slots are an error.
    pub fn parse_strict(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn day(&self, day: Weekday) -> &[TimeSlot] {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<TimeSlot> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Days in order, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[TimeSlot])> {
        Weekday::iter().map(move |day| (day, self.day(day)))
    }

    /// `true` when no day has any slot.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, slots)| slots.is_empty())
    }

    /// Sum of the positive, parseable slot lengths of one day.
    pub fn day_minutes(&self, day: Weekday) -> i64 {
        self.day(day)
            .iter()
            .filter_map(TimeSlot::minutes)
            .filter(|m| *m > 0)
            .sum()
    }

    /// [`Schedule::day_minutes`] summed over the week.
    pub fn total_minutes(&self) -> i64 {
        Weekday::iter().map(|day| self.day_minutes(day)).sum()
    }
}

/// Well-formed slots of one day, in order. `None` if the value isn't an array.
fn day_slots(value: &Value) -> Option<Vec<TimeSlot>> {
    let slots = value
        .as_array()?
        .iter()
        .filter_map(|slot| TimeSlot::deserialize(slot).ok())
        .collect();
    Some(slots)
}
