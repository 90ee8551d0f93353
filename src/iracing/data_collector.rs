//! Raw frames as the simulator exposes them: a header table describing each
//! telemetry variable, positional values for every tick, and the session info
//! YAML document whenever it changes.

#[derive(Debug, Clone, PartialEq)]
pub enum IracingValue {
    Double(f64),
    DoubleVector(Vec<f64>),
    Int(i32),
    IntVector(Vec<i32>),
    Float(f32),
    FloatVector(Vec<f32>),
    Bool(bool),
    BoolVector(Vec<bool>),

    Unknown
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataHeader {
    pub name: String,
    pub description: String,
    pub unit: String,
}

impl DataHeader {
    pub fn new(name: &str, description: &str, unit: &str) -> DataHeader {
        DataHeader {
            name: name.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Position of the variable called `name` in a header table.
pub fn find_header(headers: &[DataHeader], name: &str) -> Option<usize> {
    headers.iter().enumerate()
        .find(|(_, header)| header.name == name)
        .map(|(idx, _)| idx)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A new header table; values of later telemetry frames are positional against it.
    Headers(Vec<DataHeader>),
    Telemetry(Vec<IracingValue>),
    SessionInfo(String),
}
