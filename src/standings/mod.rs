//! The standings engine.
//!
//! One call to [`compute`] turns a telemetry snapshot, the driver roster and the
//! active session into an ordered leaderboard:
//!
//! 1. rank every car on track ([`RankingStrategy`]): live track position in races,
//!    the simulator's class position otherwise,
//! 2. partition the ranked cars by division ([`DivisionGroups`]),
//! 3. measure each car against the car directly ahead in its division ([`gap_for`]).
//!
//! Nothing is remembered between calls. Incomplete telemetry only ever removes
//! rows or turns a gap into [`Gap::Unresolved`] / [`Gap::Disconnected`].

pub mod gap;
pub mod grouping;
pub mod ranking;

use std::collections::{BTreeSet, HashSet};
use std::convert::TryFrom;

use crate::divisions::{ DivisionResolver, DEFAULT_DIVISION };
use crate::error::StandingsError;
use crate::iracing::{ DriverRoster, SessionContext, TelemetrySnapshot };

pub use gap::{ gap_for, Gap };
pub use grouping::DivisionGroups;
pub use ranking::{ RankedDriver, RankingStrategy };

#[derive(Debug, Clone, PartialEq)]
pub struct RaceStandingsRow {
    /// Overall position within the class, as ranked for this session type.
    pub position: i32,
    pub division_position: usize,
    pub division: String,
    pub car_number: String,
    pub driver_name: String,
    pub gap: Gap,
    pub slot: usize,
    pub is_player: bool,
}

/// One published leaderboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    pub tick: u64,
    pub session_type: String,
    pub rows: Vec<RaceStandingsRow>,
}

impl Standings {
    pub fn is_race(&self) -> bool {
        self.session_type.eq_ignore_ascii_case("race")
    }

    pub fn player_row(&self) -> Option<&RaceStandingsRow> {
        self.rows.iter().find(|row| row.is_player)
    }

    /// Divisions with at least one car in these standings, not counting the default one.
    pub fn divisions_present(&self) -> BTreeSet<&str> {
        self.rows.iter()
            .map(|row| row.division.as_str())
            .filter(|division| *division != DEFAULT_DIVISION)
            .collect()
    }
}

fn slot_index(slot: i32) -> Result<usize, StandingsError> {
    usize::try_from(slot).map_err(|_| StandingsError::NegativeSlot { slot })
}

fn validate_roster(roster: &DriverRoster) -> Result<(), StandingsError> {
    let mut seen = HashSet::with_capacity(roster.drivers.len());
    for driver in &roster.drivers {
        slot_index(driver.car_idx)?;
        if !seen.insert(driver.car_idx) {
            return Err(StandingsError::DuplicateRosterSlot { slot: driver.car_idx });
        }
    }
    Ok(())
}

/// Computes the leaderboard for one tick, ordered by position.
///
/// Errors only on inputs no simulator produces: negative slot indices or a
/// roster listing the same slot twice.
pub fn compute(
    snapshot: &TelemetrySnapshot,
    roster: &DriverRoster,
    session: &SessionContext,
    player_slot: Option<i32>,
    divisions: &dyn DivisionResolver,
) -> Result<Vec<RaceStandingsRow>, StandingsError> {
    validate_roster(roster)?;
    let player_slot = player_slot.map(slot_index).transpose()?;

    let is_race = session.is_race();
    let player_class_id = player_slot
        .and_then(|slot| roster.get(slot))
        .map(|driver| driver.car_class_id);

    let ranked = RankingStrategy::for_session(is_race).rank(snapshot, roster, player_class_id);
    if ranked.is_empty() {
        return Ok(vec![]);
    }

    let groups = DivisionGroups::group(&ranked, divisions);
    let division_ranks = groups.division_ranks();

    let mut rows = Vec::with_capacity(ranked.len());
    for driver in &ranked {
        let (division_rank, (division, members)) = match (division_ranks.get(&driver.slot), groups.division_of(driver.slot)) {
            (Some(&division_rank), Some(division)) => (division_rank, division),
            _ => continue,
        };

        rows.push(RaceStandingsRow {
            position: driver.rank,
            division_position: division_rank,
            division: division.to_string(),
            car_number: driver.driver.car_number.clone(),
            driver_name: driver.driver.user_name.clone(),
            gap: gap_for(driver.slot, division_rank, members, snapshot, session, is_race),
            slot: driver.slot,
            is_player: Some(driver.slot) == player_slot,
        });
    }

    rows.sort_by_key(|row| row.position);
    debug!("Computed {} standings rows in {} divisions", rows.len(), groups.divisions().count());
    Ok(rows)
}
