use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: i64,
    pub name: String,
}

/// Cached champion directory (`name_id_dict.json`), in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub version: Option<String>,
    entries: Vec<RosterEntry>,
}

#[derive(Serialize, Deserialize)]
struct RosterFile {
    #[serde(rename = "type", default = "champion_kind")]
    kind: String,
    #[serde(default)]
    version: Option<String>,
    data: Map<String, Value>,
}

fn champion_kind() -> String {
    "champion".to_string()
}

impl Roster {
    pub fn new(version: Option<String>, entries: Vec<RosterEntry>) -> Self {
        Roster { version, entries }
    }

    /// `Ok(None)` when the cache file does not exist.
    pub fn load(path: &Path) -> Result<Option<Roster>> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn from_json(json: &str) -> Result<Roster> {
        let file: RosterFile = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(file.data.len());
        for (key, value) in file.data {
            match serde_json::from_value::<RosterEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping roster entry {}: {}", key, e),
            }
        }
        Ok(Roster {
            version: file.version,
            entries,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let data = self
            .entries
            .iter()
            .map(|e| Ok((e.id.to_string(), serde_json::to_value(e)?)))
            .collect::<Result<Map<String, Value>>>()?;
        let file = RosterFile {
            kind: champion_kind(),
            version: self.version.clone(),
            data,
        };
        Ok(crate::store::to_pretty_json(&file)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| Error::io(path, e))
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Id of the champion named exactly `name`, 0 when absent.
    pub fn id_of(&self, name: &str) -> i64 {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.id)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
pub(crate) fn sample() -> Roster {
    Roster::from_json(
        r#"{
            "type": "champion",
            "version": "8.24.1",
            "data": {
                "1": {"id": 1, "name": "Annie"},
                "59": {"id": 59, "name": "Jarvan IV"},
                "103": {"id": 103, "name": "Ahri"},
                "84": {"id": 84, "name": "Akali"},
                "421": {"id": 421, "name": "Rek'Sai"}
            }
        }"#,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_file_order() {
        let roster = sample();
        let names: Vec<_> = roster.names().collect();
        assert_eq!(names, ["Annie", "Jarvan IV", "Ahri", "Akali", "Rek'Sai"]);
        assert_eq!(roster.version.as_deref(), Some("8.24.1"));
    }

    #[test]
    fn id_lookup() {
        let roster = sample();
        assert_eq!(roster.id_of("Ahri"), 103);
        assert_eq!(roster.id_of("ahri"), 0);
        assert_eq!(roster.id_of("Zed"), 0);
    }

    #[test]
    fn bad_entries_are_skipped() {
        let roster = Roster::from_json(
            r#"{"data": {"1": {"id": 1, "name": "Annie"}, "2": {"name": "NoId"}}}"#,
        )
        .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.version, None);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Roster::load(&dir.path().join("name_id_dict.json")).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name_id_dict.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Roster::load(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name_id_dict.json");
        let roster = sample();
        roster.save(&path).unwrap();
        assert_eq!(Roster::load(&path).unwrap(), Some(roster));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["type"], "champion");
        assert_eq!(raw["data"]["103"]["name"], "Ahri");
    }
}
