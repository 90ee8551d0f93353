use std::convert::TryFrom;

use crate::iracing::{ DriverInfo, DriverRoster, TelemetrySnapshot };

/// How race order is derived from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStrategy {
    /// Order by distance covered (`lap + lap fraction`), highest first. Used in races.
    LiveRank,
    /// The class position reported by the simulator. Used in practice and qualifying.
    OfficialRank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedDriver<'a> {
    pub slot: usize,
    pub rank: i32,
    pub official_position: i32,
    pub driver: &'a DriverInfo,
}

impl RankingStrategy {
    pub fn for_session(is_race: bool) -> RankingStrategy {
        if is_race { RankingStrategy::LiveRank } else { RankingStrategy::OfficialRank }
    }

    /// Ranks every car on track that has a roster entry and, when `player_class_id`
    /// is known, races in the player's class. The result is sorted by rank.
    pub fn rank<'a>(self, snapshot: &TelemetrySnapshot, roster: &'a DriverRoster, player_class_id: Option<i32>) -> Vec<RankedDriver<'a>> {
        match self {
            RankingStrategy::LiveRank => live_rank(snapshot, roster, player_class_id),
            RankingStrategy::OfficialRank => official_rank(snapshot, roster, player_class_id),
        }
    }
}

fn active_drivers<'s, 'a: 's>(snapshot: &'s TelemetrySnapshot, roster: &'a DriverRoster, player_class_id: Option<i32>) -> impl Iterator<Item = (usize, i32, &'a DriverInfo)> + 's {
    snapshot.class_position.iter().enumerate()
        .filter(|(_, &class_position)| class_position != 0)
        .filter_map(move |(slot, &class_position)| match roster.get(slot) {
            Some(driver) => Some((slot, class_position, driver)),
            None => {
                trace!("Car slot {} is on track but not in the roster", slot);
                None
            }
        })
        .filter(move |(_, _, driver)| match player_class_id {
            Some(class_id) => driver.car_class_id == class_id,
            None => true,
        })
}

fn live_rank<'a>(snapshot: &TelemetrySnapshot, roster: &'a DriverRoster, player_class_id: Option<i32>) -> Vec<RankedDriver<'a>> {
    if snapshot.class_position.is_empty() || snapshot.lap.is_empty() || snapshot.lap_dist_pct.is_empty() {
        return vec![];
    }

    let mut by_distance: Vec<(f64, usize, i32, &'a DriverInfo)> = active_drivers(snapshot, roster, player_class_id)
        .filter_map(|(slot, class_position, driver)| {
            let lap = snapshot.lap(slot)?;
            let lap_dist_pct = snapshot.lap_dist_pct(slot)?;
            Some((lap as f64 + lap_dist_pct, slot, class_position, driver))
        })
        .collect();

    // Stable, so cars at an identical distance keep slot order.
    by_distance.sort_by(|a, b| b.0.total_cmp(&a.0));

    by_distance.into_iter().enumerate()
        .map(|(idx, (_, slot, official_position, driver))| RankedDriver {
            slot,
            rank: i32::try_from(idx + 1).unwrap_or(i32::MAX),
            official_position,
            driver,
        })
        .collect()
}

fn official_rank<'a>(snapshot: &TelemetrySnapshot, roster: &'a DriverRoster, player_class_id: Option<i32>) -> Vec<RankedDriver<'a>> {
    let mut ranked: Vec<RankedDriver<'a>> = active_drivers(snapshot, roster, player_class_id)
        .map(|(slot, class_position, driver)| RankedDriver {
            slot,
            rank: class_position,
            official_position: class_position,
            driver,
        })
        .collect();

    ranked.sort_by_key(|driver| driver.rank);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(classes: &[i32]) -> DriverRoster {
        DriverRoster::new(classes.iter().enumerate()
            .map(|(idx, &car_class_id)| DriverInfo {
                car_idx: idx as i32,
                user_name: format!("Driver {}", idx),
                car_number: format!("{}", idx + 10),
                car_class_id,
            })
            .collect())
    }

    fn slots(ranked: &[RankedDriver]) -> Vec<(usize, i32)> {
        ranked.iter().map(|driver| (driver.slot, driver.rank)).collect()
    }

    #[test]
    fn live_rank_orders_by_distance_covered() {
        let snapshot = TelemetrySnapshot {
            class_position: vec![1, 2, 3, 4],
            lap: vec![5, 6, 5, 5],
            lap_dist_pct: vec![0.9, 0.1, 0.95, 0.2],
            ..Default::default()
        };
        let roster = roster(&[1, 1, 1, 1]);

        let ranked = RankingStrategy::LiveRank.rank(&snapshot, &roster, None);

        assert_eq!(slots(&ranked), vec![(1, 1), (2, 2), (0, 3), (3, 4)]);
        assert_eq!(ranked[0].official_position, 2);
    }

    #[test]
    fn ranking_outlives_the_snapshot() {
        let roster = roster(&[1, 1]);

        let (live, official) = {
            let snapshot = TelemetrySnapshot {
                class_position: vec![2, 1],
                lap: vec![4, 4],
                lap_dist_pct: vec![0.5, 0.25],
                ..Default::default()
            };
            (
                RankingStrategy::LiveRank.rank(&snapshot, &roster, Some(1)),
                RankingStrategy::OfficialRank.rank(&snapshot, &roster, Some(1)),
            )
        };

        assert_eq!(slots(&live), vec![(0, 1), (1, 2)]);
        assert_eq!(slots(&official), vec![(1, 1), (0, 2)]);
        assert_eq!(live[1].driver.user_name, "Driver 1");
    }

    #[test]
    fn live_rank_treats_bad_lap_fraction_as_zero() {
        let snapshot = TelemetrySnapshot {
            class_position: vec![1, 2],
            lap: vec![3, 3],
            lap_dist_pct: vec![-1.0, 0.4],
            ..Default::default()
        };
        let roster = roster(&[1, 1]);

        let ranked = RankingStrategy::LiveRank.rank(&snapshot, &roster, None);

        assert_eq!(slots(&ranked), vec![(1, 1), (0, 2)]);
    }

    #[test]
    fn live_rank_needs_lap_arrays() {
        let snapshot = TelemetrySnapshot {
            class_position: vec![1, 2],
            ..Default::default()
        };

        assert!(RankingStrategy::LiveRank.rank(&snapshot, &roster(&[1, 1]), None).is_empty());
    }

    #[test]
    fn official_rank_uses_class_position() {
        let snapshot = TelemetrySnapshot {
            class_position: vec![3, 0, 1, 2],
            ..Default::default()
        };
        let roster = roster(&[1, 1, 1, 1]);

        let ranked = RankingStrategy::OfficialRank.rank(&snapshot, &roster, None);

        assert_eq!(slots(&ranked), vec![(2, 1), (3, 2), (0, 3)]);
    }

    #[test]
    fn drops_cars_without_roster_entry_or_of_another_class() {
        let snapshot = TelemetrySnapshot {
            class_position: vec![1, 2, 3, 4],
            ..Default::default()
        };
        let mut roster = roster(&[5, 7, 5]);
        roster.drivers.remove(2);

        let ranked = RankingStrategy::OfficialRank.rank(&snapshot, &roster, Some(5));
        assert_eq!(slots(&ranked), vec![(0, 1)]);

        let unfiltered = RankingStrategy::OfficialRank.rank(&snapshot, &roster, None);
        assert_eq!(slots(&unfiltered), vec![(0, 1), (1, 2)]);
    }
}
