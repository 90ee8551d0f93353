use std::convert::TryFrom;

use crate::iracing::{ SessionContext, TelemetrySnapshot };
use crate::standings::ranking::RankedDriver;

/// Distance from a car to the car directly ahead of it in the same division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gap {
    Leader,
    /// Seconds, always non-negative.
    TimeGap(f64),
    LapsBehind(u32),
    Disconnected,
    /// No car ahead, or not enough timing data to say.
    Unresolved,
}

fn car_ahead(slot: usize, members: &[RankedDriver]) -> Option<usize> {
    let idx = members.iter().position(|driver| driver.slot == slot)?;
    let ahead = idx.checked_sub(1)?;
    members.get(ahead).map(|driver| driver.slot)
}

/// Gap of the car in `slot` to the division member ranked directly above it.
/// `members` must be the car's division, sorted by rank.
pub fn gap_for(slot: usize, division_rank: usize, members: &[RankedDriver], snapshot: &TelemetrySnapshot, session: &SessionContext, is_race: bool) -> Gap {
    if division_rank == 1 {
        return Gap::Leader;
    }

    let ahead = match car_ahead(slot, members) {
        Some(ahead) => ahead,
        None => return Gap::Unresolved,
    };

    if is_race {
        race_gap(slot, ahead, snapshot, session)
    } else {
        best_lap_gap(slot, ahead, session)
    }
}

fn race_gap(slot: usize, ahead: usize, snapshot: &TelemetrySnapshot, session: &SessionContext) -> Gap {
    let (own_est, ahead_est) = match (snapshot.est_time(slot), snapshot.est_time(ahead)) {
        (Some(own_est), Some(ahead_est)) => (own_est, ahead_est),
        _ => return Gap::Disconnected,
    };
    if own_est <= 0.0 || ahead_est <= 0.0 {
        return Gap::Disconnected;
    }

    let (own_lap, ahead_lap) = match (snapshot.lap(slot), snapshot.lap(ahead)) {
        (Some(own_lap), Some(ahead_lap)) => (own_lap, ahead_lap),
        _ => return Gap::Unresolved,
    };
    let own_pct = snapshot.lap_dist_pct(slot).unwrap_or(0.0);
    let ahead_pct = snapshot.lap_dist_pct(ahead).unwrap_or(0.0);
    let lap_time = session.representative_lap_time();

    // A NaN estimate gets past the disconnect check; fall back to track distance.
    let mut time_gap = if own_est > 0.0 && ahead_est > 0.0 {
        ahead_est - own_est
    } else {
        (ahead_pct - own_pct) * lap_time
    };

    // One lap up but not yet a full lap clear: same lap, measured in time.
    let mut lap_difference = ahead_lap.saturating_sub(own_lap);
    if lap_difference == 1 && ahead_pct < own_pct {
        time_gap += lap_time;
        lap_difference = 0;
    }

    match u32::try_from(lap_difference) {
        Ok(laps) if laps > 0 => Gap::LapsBehind(laps),
        _ => Gap::TimeGap(time_gap.abs()),
    }
}

fn best_lap_gap(slot: usize, ahead: usize, session: &SessionContext) -> Gap {
    let own_best = session.best_lap(slot);
    let ahead_best = session.best_lap(ahead);

    if own_best > 0.0 && ahead_best > 0.0 {
        Gap::TimeGap((own_best - ahead_best).abs())
    } else {
        Gap::Unresolved
    }
}
