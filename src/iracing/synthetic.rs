//! A made-up race for running the overlay without a simulator.
//!
//! Cars lap at slightly different paces so the order, the gaps and the odd
//! lapped car change over time. The last car races in a second class and the
//! car in slot 2 drops its connection for a few seconds every minute.

use std::pin::Pin;
use std::time::Duration;

use async_std::stream::{ self, Stream, StreamExt };

use crate::iracing::data_collector::{ DataHeader, IracingValue, Update };

const NAMES: [&str; 8] = [
    "Ana Costa", "Ben Hale", "Chloe Park", "Dev Rao",
    "Erik Lund", "Fay Moss", "Gus Ortiz", "Hana Ito",
];

const MAIN_CLASS: i32 = 4029;
const OTHER_CLASS: i32 = 4030;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSession {
    cars: usize,
    period: Duration,
    player_slot: i32,
}

impl SyntheticSession {
    pub fn new(cars: usize, period: Duration) -> SyntheticSession {
        SyntheticSession { cars: cars.max(1), period, player_slot: 0 }
    }

    fn driver_name(slot: usize) -> String {
        match NAMES.get(slot) {
            Some(name) => name.to_string(),
            None => format!("Driver {}", slot + 1),
        }
    }

    fn car_class(&self, slot: usize) -> i32 {
        if self.cars > 2 && slot + 1 == self.cars { OTHER_CLASS } else { MAIN_CLASS }
    }

    fn lap_time(slot: usize) -> f64 {
        88.0 + slot as f64 * 0.65
    }

    pub fn headers(&self) -> Vec<DataHeader> {
        vec![
            DataHeader::new("SessionNum", "Session number", ""),
            DataHeader::new("PlayerCarIdx", "Players carIdx", ""),
            DataHeader::new("CarIdxLap", "Laps started by car index", ""),
            DataHeader::new("CarIdxLapDistPct", "Percentage distance around lap by car index", "%"),
            DataHeader::new("CarIdxClassPosition", "Cars class position in race by car index", ""),
            DataHeader::new("CarIdxEstTime", "Estimated time to reach current location on track", "s"),
        ]
    }

    pub fn session_info(&self) -> String {
        let mut yaml = String::from("WeekendInfo:\n TrackName: synthetic ring\n TrackConfigName:\nDriverInfo:\n");
        yaml.push_str(&format!(" DriverCarIdx: {}\n Drivers:\n", self.player_slot));
        for slot in 0..self.cars {
            yaml.push_str(&format!(
                "  - CarIdx: {}\n    UserName: {}\n    CarNumber: \"{}\"\n    CarClassID: {}\n",
                slot, Self::driver_name(slot), slot + 1, self.car_class(slot)));
        }
        yaml.push_str("SessionInfo:\n Sessions:\n  - SessionNum: 0\n    SessionType: Race\n    ResultsPositions:\n");
        for slot in 0..self.cars {
            yaml.push_str(&format!("     - CarIdx: {}\n       FastestTime: {:.4}\n", slot, Self::lap_time(slot)));
        }
        yaml
    }

    /// Telemetry after `tick` periods, positional against [`SyntheticSession::headers`].
    pub fn frame(&self, tick: u64) -> Vec<IracingValue> {
        let elapsed = self.period.as_secs_f64() * tick as f64;

        let distances: Vec<f64> = (0..self.cars)
            .map(|slot| (elapsed / Self::lap_time(slot) - slot as f64 * 0.01).max(0.0))
            .collect();

        let mut class_position = vec![0; self.cars];
        for class_id in [MAIN_CLASS, OTHER_CLASS] {
            let mut in_class: Vec<usize> = (0..self.cars).filter(|&slot| self.car_class(slot) == class_id).collect();
            in_class.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
            for (idx, slot) in in_class.into_iter().enumerate() {
                class_position[slot] = idx as i32 + 1;
            }
        }

        let disconnected = self.cars > 3 && (elapsed % 60.0) > 50.0;
        let lap = distances.iter().map(|distance| distance.floor() as i32).collect();
        let lap_dist_pct: Vec<f32> = distances.iter().map(|distance| distance.fract() as f32).collect();
        let est_time = lap_dist_pct.iter().enumerate()
            .map(|(slot, &pct)| {
                if disconnected && slot == 2 { 0.0 } else { pct * Self::lap_time(slot) as f32 }
            })
            .collect();

        vec![
            IracingValue::Int(0),
            IracingValue::Int(self.player_slot),
            IracingValue::IntVector(lap),
            IracingValue::FloatVector(lap_dist_pct),
            IracingValue::IntVector(class_position),
            IracingValue::FloatVector(est_time),
        ]
    }

    /// Headers and session info up front, then one telemetry frame per period.
    pub fn into_stream(self) -> Pin<Box<dyn Stream<Item = Update> + Send>> {
        let preamble = stream::from_iter(vec![
            Update::Headers(self.headers()),
            Update::SessionInfo(self.session_info()),
        ]);

        let mut tick = 0;
        let frames = stream::interval(self.period).map(move |()| {
            tick += 1;
            Update::Telemetry(self.frame(tick))
        });

        Box::pin(preamble.chain(frames))
    }
}
