//! Division leaderboards for league racing overlays.
//!
//! Telemetry snapshots from the simulator are ranked, split into league
//! divisions and annotated with the gap to the car ahead in the same division.
//! [`standings::compute`] is the engine; the `iracing` module adapts raw
//! simulator data to it and runs the acquisition side, `overlay` the
//! presentation side.

#[macro_use] extern crate log;

pub mod config;
pub mod divisions;
pub mod error;
pub mod format;
pub mod iracing;
pub mod overlay;
pub mod publish;
pub mod standings;

pub use divisions::{ DivisionMap, DivisionResolver, DEFAULT_DIVISION };
pub use error::StandingsError;
pub use iracing::{ DriverInfo, DriverRoster, SessionContext, SessionResult, TelemetrySnapshot };
pub use standings::{ compute, Gap, RaceStandingsRow, Standings };
