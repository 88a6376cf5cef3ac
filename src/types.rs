use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Latitude/longitude pair. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            other => Err(format!("unknown workout type: {other:?}")),
        }
    }
}

/// Correlation key between a workout, its list row (`data-id`) and storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out millisecond-based ids that never repeat: each id is at least one
/// greater than the previous one, even when two workouts land in the same ms.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above every numeric id already in use. Non-numeric ids are ignored.
    pub fn seeded_from<'a>(ids: impl IntoIterator<Item = &'a WorkoutId>) -> Self {
        let last = ids
            .into_iter()
            .filter_map(|id| id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_at(&mut self, now: DateTime<Local>) -> WorkoutId {
        let v = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = v;
        WorkoutId(v.to_string())
    }
}

/// Type-specific input plus the metric derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metrics {
    /// `cadence` in steps/min, `pace` in min/km.
    Running { cadence: f64, pace: f64 },
    /// `elevation_gain` in meters, `speed` in km/h.
    Cycling { elevation_gain: f64, speed: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub date: DateTime<Local>,
    pub coords: Coords,
    /// km
    pub distance: f64,
    /// min
    pub duration: f64,
    pub description: String,
    pub metrics: Metrics,
}

impl Workout {
    pub fn running(
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        Self {
            description: describe(WorkoutKind::Running, date),
            metrics: Metrics::Running {
                cadence,
                pace: calc_pace(distance, duration),
            },
            id,
            date,
            coords,
            distance,
            duration,
        }
    }

    pub fn cycling(
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        Self {
            description: describe(WorkoutKind::Cycling, date),
            metrics: Metrics::Cycling {
                elevation_gain,
                speed: calc_speed(distance, duration),
            },
            id,
            date,
            coords,
            distance,
            duration,
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.metrics {
            Metrics::Running { .. } => WorkoutKind::Running,
            Metrics::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn pace(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Running { pace, .. } => Some(pace),
            Metrics::Cycling { .. } => None,
        }
    }

    pub const fn speed(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Cycling { speed, .. } => Some(speed),
            Metrics::Running { .. } => None,
        }
    }

    /// Rewrites `description` from the kind and creation date.
    pub fn refresh_description(&mut self) {
        self.description = describe(self.kind(), self.date);
    }
}

/// min/km
pub fn calc_pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// km/h
pub fn calc_speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// `"Running on March 14"`
pub fn describe(kind: WorkoutKind, date: DateTime<Local>) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} on {month} {}", kind.label(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn running_derives_pace_and_description() {
        let w = Workout::running(
            WorkoutId::new("1"),
            at(2024, 3, 14),
            Coords::new(10.0, 20.0),
            5.0,
            30.0,
            150.0,
        );
        assert_eq!(w.pace(), Some(6.0));
        assert_eq!(w.speed(), None);
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.description, "Running on March 14");
    }

    #[test]
    fn cycling_derives_speed() {
        let w = Workout::cycling(
            WorkoutId::new("2"),
            at(2024, 12, 1),
            Coords::new(0.0, 0.0),
            20.0,
            60.0,
            500.0,
        );
        assert_eq!(w.speed(), Some(20.0));
        assert_eq!(w.description, "Cycling on December 1");
    }

    #[test]
    fn pace_and_speed_follow_their_formulas() {
        for (distance, duration) in [(1.0, 1.0), (3.3, 17.9), (42.195, 241.5), (0.1, 1000.0)] {
            assert_eq!(calc_pace(distance, duration), duration / distance);
            assert_eq!(calc_speed(distance, duration), distance / (duration / 60.0));
        }
    }

    #[test]
    fn refresh_description_overwrites() {
        let mut w = Workout::running(
            WorkoutId::new("3"),
            at(2024, 1, 31),
            Coords::new(0.0, 0.0),
            1.0,
            1.0,
            1.0,
        );
        w.description = "stale".into();
        w.refresh_description();
        assert_eq!(w.description, "Running on January 31");
    }

    #[test]
    fn ids_are_strictly_increasing_within_one_millisecond() {
        let now = at(2024, 3, 14);
        let mut ids = IdGenerator::new();
        let a = ids.next_at(now);
        let b = ids.next_at(now);
        assert_eq!(a.as_str(), now.timestamp_millis().to_string());
        assert!(b.as_str().parse::<i64>().unwrap() > a.as_str().parse::<i64>().unwrap());
    }

    #[test]
    fn seeded_ids_skip_existing() {
        let existing = [WorkoutId::new("9999999999999"), WorkoutId::new("legacy")];
        let mut ids = IdGenerator::seeded_from(&existing);
        let next = ids.next_at(at(2000, 1, 1));
        assert_eq!(next.as_str(), "10000000000000");
    }

    #[test]
    fn kind_parses_lowercase_only() {
        assert_eq!("running".parse::<WorkoutKind>(), Ok(WorkoutKind::Running));
        assert_eq!("cycling".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("Running".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn coords_serialize_as_pair() {
        let json = serde_json::to_string(&Coords::new(10.5, -20.25)).unwrap();
        assert_eq!(json, "[10.5,-20.25]");
        let back: Coords = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Coords::new(10.5, -20.25));
    }
}
