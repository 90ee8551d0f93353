use std::collections::{BTreeMap, HashMap};

use crate::divisions::DivisionResolver;
use crate::standings::ranking::RankedDriver;

/// Ranked drivers partitioned by division, each partition sorted by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionGroups<'a> {
    groups: BTreeMap<String, Vec<RankedDriver<'a>>>,
    division_by_slot: HashMap<usize, String>,
}

impl<'a> DivisionGroups<'a> {
    pub fn group(ranked: &[RankedDriver<'a>], divisions: &dyn DivisionResolver) -> DivisionGroups<'a> {
        let mut groups: BTreeMap<String, Vec<RankedDriver<'a>>> = BTreeMap::new();
        let mut division_by_slot = HashMap::with_capacity(ranked.len());
        for driver in ranked {
            let division = divisions.division_of(&driver.driver.user_name).into_owned();
            division_by_slot.insert(driver.slot, division.clone());
            groups.entry(division).or_default().push(*driver);
        }

        for members in groups.values_mut() {
            members.sort_by_key(|driver| driver.rank);
        }

        DivisionGroups { groups, division_by_slot }
    }

    /// Slot to 1-based rank within its division, for every grouped car.
    pub fn division_ranks(&self) -> HashMap<usize, usize> {
        self.groups.values()
            .flat_map(|members| members.iter().enumerate().map(|(idx, driver)| (driver.slot, idx + 1)))
            .collect()
    }

    /// The division a car was grouped into, with every member of it in rank order.
    pub fn division_of(&self, slot: usize) -> Option<(&str, &[RankedDriver<'a>])> {
        let division = self.division_by_slot.get(&slot)?;
        let members = self.groups.get(division)?;
        Some((division.as_str(), members.as_slice()))
    }

    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divisions::{ DivisionMap, DEFAULT_DIVISION };
    use crate::iracing::DriverInfo;

    fn drivers(names: &[&str]) -> Vec<DriverInfo> {
        names.iter().enumerate()
            .map(|(idx, name)| DriverInfo {
                car_idx: idx as i32,
                user_name: name.to_string(),
                car_number: idx.to_string(),
                car_class_id: 1,
            })
            .collect()
    }

    #[test]
    fn ranks_within_each_division() {
        let drivers = drivers(&["A", "B", "C", "D", "E"]);
        // Deliberately out of rank order.
        let ranked: Vec<RankedDriver> = [(4, 5), (0, 1), (2, 3), (1, 2), (3, 4)].iter()
            .map(|&(slot, rank)| RankedDriver { slot, rank, official_position: rank, driver: &drivers[slot] })
            .collect();
        let divisions: DivisionMap = [("A", "Pro"), ("C", "Pro"), ("B", "Am")].into_iter().collect();

        let groups = DivisionGroups::group(&ranked, &divisions);

        let ranks = groups.division_ranks();
        assert_eq!(ranks[&0], 1);
        assert_eq!(ranks[&2], 2);
        assert_eq!(ranks[&1], 1);
        assert_eq!(ranks[&3], 1);
        assert_eq!(ranks[&4], 2);

        let (division, members) = groups.division_of(4).unwrap();
        assert_eq!(division, DEFAULT_DIVISION);
        assert_eq!(members.iter().map(|driver| driver.slot).collect::<Vec<_>>(), vec![3, 4]);

        assert_eq!(groups.divisions().collect::<Vec<_>>(), vec!["Am", DEFAULT_DIVISION, "Pro"]);
        assert!(groups.division_of(9).is_none());
        assert!(!ranks.contains_key(&9));
    }
}
