//! Driver name to division lookup, backed by the league's JSON division file.
//!
//! The file is a flat object mapping a driver's display name to a division
//! label, e.g. `{ "Alice Example": "Pro", "Bob Example": "Am" }`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::DivisionFileError;

/// Label of every driver the division file does not mention.
pub const DEFAULT_DIVISION: &str = "Default";

pub trait DivisionResolver {
    fn division_of(&self, driver_name: &str) -> Cow<'_, str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionMap {
    divisions: BTreeMap<String, String>,
}

impl DivisionMap {
    pub fn new() -> DivisionMap {
        DivisionMap::default()
    }

    /// Loads a division file. A file that does not exist yet is an empty map.
    pub fn load(path: &Path) -> Result<DivisionMap, DivisionFileError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("Division file {} not found, every driver is in {}", path.display(), DEFAULT_DIVISION);
                return Ok(DivisionMap::new());
            }
            Err(source) => return Err(DivisionFileError::Io { path: path.to_path_buf(), source }),
        };

        let divisions = serde_json::from_str(&contents)
            .map_err(|source| DivisionFileError::Json { path: path.to_path_buf(), source })?;
        let map = DivisionMap { divisions };
        info!("Loaded {} driver divisions from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn save(&self, path: &Path) -> Result<(), DivisionFileError> {
        let contents = serde_json::to_string_pretty(&self.divisions)
            .map_err(|source| DivisionFileError::Json { path: path.to_path_buf(), source })?;
        fs::write(path, contents)
            .map_err(|source| DivisionFileError::Io { path: path.to_path_buf(), source })
    }

    /// Assigns a driver to a division. Assigning [`DEFAULT_DIVISION`] forgets the driver.
    pub fn set_division(&mut self, driver_name: &str, division: &str) {
        if division == DEFAULT_DIVISION {
            self.divisions.remove(driver_name);
        } else {
            self.divisions.insert(driver_name.to_string(), division.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}

impl DivisionResolver for DivisionMap {
    fn division_of(&self, driver_name: &str) -> Cow<'_, str> {
        match self.divisions.get(driver_name) {
            Some(division) => Cow::Borrowed(division.as_str()),
            None => Cow::Borrowed(DEFAULT_DIVISION),
        }
    }
}

impl<N: Into<String>, D: Into<String>> FromIterator<(N, D)> for DivisionMap {
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> DivisionMap {
        DivisionMap {
            divisions: iter.into_iter()
                .map(|(name, division)| (name.into(), division.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_drivers_resolve_to_default() {
        let map: DivisionMap = [("Alice Example", "Pro")].into_iter().collect();

        assert_eq!(map.division_of("Alice Example"), "Pro");
        assert_eq!(map.division_of("Nobody"), DEFAULT_DIVISION);
    }

    #[test]
    fn assigning_default_removes_the_driver() {
        let mut map = DivisionMap::new();
        map.set_division("Alice Example", "Am");
        assert_eq!(map.len(), 1);

        map.set_division("Alice Example", DEFAULT_DIVISION);
        assert!(map.is_empty());
        assert_eq!(map.division_of("Alice Example"), DEFAULT_DIVISION);
    }

    #[test]
    fn saves_and_loads_division_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league_divisions.json");

        let mut map = DivisionMap::new();
        map.set_division("Alice Example", "ProAm");
        map.set_division("Bob Example", "Rookie");
        map.save(&path).unwrap();

        assert_eq!(DivisionMap::load(&path).unwrap(), map);
    }

    #[test]
    fn missing_file_is_an_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = DivisionMap::load(&dir.path().join("absent.json")).unwrap();

        assert!(map.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league_divisions.json");
        fs::write(&path, "[\"not\", \"an\", \"object\"]").unwrap();

        assert!(matches!(DivisionMap::load(&path), Err(DivisionFileError::Json { .. })));
    }
}
