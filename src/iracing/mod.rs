use yaml_rust::{YamlLoader, Yaml};

pub mod data_collector;
pub mod data_producer;
pub mod snapshot;
pub mod synthetic;

use std::convert::TryFrom;

use crate::error::SessionInfoError;

/// Per-car telemetry for one tick, indexed by car slot.
///
/// Vectors may be shorter than the field or empty; accessors treat anything
/// out of range as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub class_position: Vec<i32>,
    pub lap: Vec<i32>,
    pub lap_dist_pct: Vec<f32>,
    pub est_time: Vec<f32>,
    pub player_slot: Option<i32>,
    pub session_num: Option<i32>,
}

impl TelemetrySnapshot {
    pub fn class_position(&self, slot: usize) -> Option<i32> {
        self.class_position.get(slot).copied()
    }

    pub fn lap(&self, slot: usize) -> Option<i32> {
        self.lap.get(slot).copied()
    }

    /// Lap distance fraction, with anything outside `0.0..=1.0` reported as `0.0`.
    pub fn lap_dist_pct(&self, slot: usize) -> Option<f64> {
        self.lap_dist_pct.get(slot).map(|&pct| {
            let pct = pct as f64;
            if (0.0..=1.0).contains(&pct) { pct } else { 0.0 }
        })
    }

    pub fn est_time(&self, slot: usize) -> Option<f64> {
        self.est_time.get(slot).map(|&time| time as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub car_idx: i32,
    pub user_name: String,
    pub car_number: String,
    pub car_class_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverRoster {
    pub drivers: Vec<DriverInfo>,
}

impl DriverRoster {
    pub fn new(drivers: Vec<DriverInfo>) -> DriverRoster {
        DriverRoster { drivers }
    }

    pub fn get(&self, slot: usize) -> Option<&DriverInfo> {
        self.drivers.iter().find(|driver| usize::try_from(driver.car_idx) == Ok(slot))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult {
    pub car_idx: i32,
    pub fastest_time: f64,
}

/// Lap time used whenever no driver in the session has set a valid lap.
pub const DEFAULT_LAP_TIME: f64 = 90.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub session_type: String,
    pub results: Vec<SessionResult>,
}

impl SessionContext {
    pub fn new(session_type: &str, results: Vec<SessionResult>) -> SessionContext {
        SessionContext { session_type: session_type.to_string(), results }
    }

    pub fn is_race(&self) -> bool {
        self.session_type.eq_ignore_ascii_case("race")
    }

    /// Fastest valid lap of the whole session, or [`DEFAULT_LAP_TIME`].
    pub fn representative_lap_time(&self) -> f64 {
        self.results.iter()
            .map(|result| result.fastest_time)
            .filter(|&time| time > 0.0)
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(DEFAULT_LAP_TIME)
    }

    /// Best lap of one car. Cars without a result entry get [`DEFAULT_LAP_TIME`].
    pub fn best_lap(&self, slot: usize) -> f64 {
        self.results.iter()
            .find(|result| usize::try_from(result.car_idx) == Ok(slot))
            .map(|result| result.fastest_time)
            .unwrap_or(DEFAULT_LAP_TIME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSpec {
    pub name: String,
    pub configuration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub track: TrackSpec,
    pub roster: DriverRoster,
    pub sessions: Vec<SessionContext>,
}

impl SessionInfo {
    /// The session selected by the `SessionNum` telemetry variable. Unknown
    /// indices fall back to an empty, non-race context.
    pub fn context_for(&self, session_num: Option<i32>) -> SessionContext {
        session_num
            .and_then(|num| usize::try_from(num).ok())
            .and_then(|num| self.sessions.get(num))
            .cloned()
            .unwrap_or_default()
    }
}

fn as_integer(value: &Yaml) -> Option<i32> {
    match value {
        Yaml::Integer(int) => i32::try_from(*int).ok(),
        _ => None,
    }
}

fn as_number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Integer(int) => Some(*int as f64),
        Yaml::Real(_) => value.as_f64(),
        _ => None,
    }
}

fn as_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(text) => Some(text.clone()),
        Yaml::Integer(int) => Some(int.to_string()),
        Yaml::Real(real) => Some(real.clone()),
        _ => None,
    }
}

fn parse_driver(entry: &Yaml) -> Option<DriverInfo> {
    Some(DriverInfo {
        car_idx: as_integer(&entry["CarIdx"])?,
        user_name: as_text(&entry["UserName"]).unwrap_or_default(),
        car_number: as_text(&entry["CarNumber"]).unwrap_or_default(),
        car_class_id: as_integer(&entry["CarClassID"]).unwrap_or(0),
    })
}

fn parse_session(entry: &Yaml) -> SessionContext {
    let session_type = as_text(&entry["SessionType"]).unwrap_or_default();
    let results = match &entry["ResultsPositions"] {
        Yaml::Array(positions) => positions.iter()
            .filter_map(|position| Some(SessionResult {
                car_idx: as_integer(&position["CarIdx"])?,
                fastest_time: as_number(&position["FastestTime"])?,
            }))
            .collect(),
        _ => vec![],
    };

    SessionContext { session_type, results }
}

impl TryFrom<&str> for SessionInfo {
    type Error = SessionInfoError;

    fn try_from(str: &str) -> Result<Self, Self::Error> {
        if str.trim().is_empty() {
            return Err(SessionInfoError::Empty);
        }

        let documents = YamlLoader::load_from_str(str)?;
        let parsed = documents.first().ok_or(SessionInfoError::Empty)?;

        let track_name = parsed["WeekendInfo"]["TrackName"].as_str()
                .ok_or(SessionInfoError::MissingField("WeekendInfo.TrackName"))?;
        let track_configuration = match &parsed["WeekendInfo"]["TrackConfigName"] {
            Yaml::String(track_config_name) => Ok(track_config_name.clone()),
            Yaml::Null | Yaml::BadValue => Ok("Grand Prix".to_string()),
            _ => Err(SessionInfoError::InvalidField("WeekendInfo.TrackConfigName"))
        }?;

        let drivers = match &parsed["DriverInfo"]["Drivers"] {
            Yaml::Array(drivers) => drivers.iter().filter_map(parse_driver).collect(),
            _ => vec![],
        };

        let sessions = match &parsed["SessionInfo"]["Sessions"] {
            Yaml::Array(sessions) => sessions.iter().map(parse_session).collect(),
            _ => vec![],
        };

        Ok(SessionInfo {
            track: TrackSpec {
                name: track_name.to_string(),
                configuration: track_configuration,
            },
            roster: DriverRoster::new(drivers),
            sessions,
        })
    }
}

impl TryFrom<&String> for SessionInfo {
    type Error = SessionInfoError;

    fn try_from(str: &String) -> Result<Self, Self::Error> {
        SessionInfo::try_from(str.as_str())
    }
}
