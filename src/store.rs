use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::quotes::EntityResult;

/// Pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The export file: one JSON object keyed by champion name.
pub struct QuoteStore {
    path: PathBuf,
    include_ids: bool,
}

impl QuoteStore {
    pub fn new(path: impl Into<PathBuf>, include_ids: bool) -> Self {
        QuoteStore {
            path: path.into(),
            include_ids,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate to `{}`. Called once at the start of a batch.
    pub fn reset(&self) -> Result<()> {
        self.write(&Map::new())
    }

    /// Read-modify-write: add or replace one champion, leaving the other keys
    /// and their order alone.
    pub fn merge(&self, result: &EntityResult) -> Result<()> {
        let mut all = self.read()?;
        all.insert(
            result.entity.name.clone(),
            result.to_value(self.include_ids)?,
        );
        self.write(&all)?;
        info!(
            "Saved {} quotes for {} to {}",
            result.quotes.quote_count(),
            result.entity.name,
            self.path.display()
        );
        Ok(())
    }

    /// Current contents. A missing or unreadable-as-JSON file counts as empty.
    pub fn read(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!("{} is not a JSON object, starting over", self.path.display());
                Ok(Map::new())
            }
        }
    }

    fn write(&self, all: &Map<String, Value>) -> Result<()> {
        let json = to_pretty_json(all)?;
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))
    }
}
