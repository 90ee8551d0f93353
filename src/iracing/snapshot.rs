use crate::iracing::TelemetrySnapshot;
use crate::iracing::data_collector::{ find_header, DataHeader, IracingValue };

fn extract_value<T>(telemetry: &[IracingValue], header: Option<usize>, extractor: impl Fn(&IracingValue) -> T) -> T {
    match header.and_then(|idx| telemetry.get(idx)) {
        Some(value) => extractor(value),
        None => extractor(&IracingValue::Unknown),
    }
}

fn int_vector(value: &IracingValue) -> Vec<i32> {
    match value {
        IracingValue::IntVector(values) => values.clone(),
        _ => vec![],
    }
}

fn float_vector(value: &IracingValue) -> Vec<f32> {
    match value {
        IracingValue::FloatVector(values) => values.clone(),
        _ => vec![],
    }
}

fn int(value: &IracingValue) -> Option<i32> {
    match value {
        IracingValue::Int(value) => Some(*value),
        _ => None,
    }
}

/// Where the standings variables live in one header table.
///
/// Anything the table lacks, or any value of an unexpected type, reads as
/// absent rather than failing the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotLayout {
    class_position: Option<usize>,
    lap: Option<usize>,
    lap_dist_pct: Option<usize>,
    est_time: Option<usize>,
    player_car_idx: Option<usize>,
    session_num: Option<usize>,
}

impl SnapshotLayout {
    pub fn new(headers: &[DataHeader]) -> SnapshotLayout {
        let layout = SnapshotLayout {
            class_position: find_header(headers, "CarIdxClassPosition"),
            lap: find_header(headers, "CarIdxLap"),
            lap_dist_pct: find_header(headers, "CarIdxLapDistPct"),
            est_time: find_header(headers, "CarIdxEstTime"),
            player_car_idx: find_header(headers, "PlayerCarIdx"),
            session_num: find_header(headers, "SessionNum"),
        };
        if layout.class_position.is_none() {
            warn!("Telemetry has no CarIdxClassPosition; standings will stay empty");
        }
        layout
    }

    pub fn snapshot(&self, telemetry: &[IracingValue]) -> TelemetrySnapshot {
        TelemetrySnapshot {
            class_position: extract_value(telemetry, self.class_position, int_vector),
            lap: extract_value(telemetry, self.lap, int_vector),
            lap_dist_pct: extract_value(telemetry, self.lap_dist_pct, float_vector),
            est_time: extract_value(telemetry, self.est_time, float_vector),
            player_slot: extract_value(telemetry, self.player_car_idx, int),
            session_num: extract_value(telemetry, self.session_num, int),
        }
    }
}
