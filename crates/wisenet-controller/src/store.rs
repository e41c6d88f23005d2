//! Path metadata store
//!
//! A durable, line-oriented table keyed by (source, destination), read by the
//! external aggregation-rate setter. One record per line:
//!
//! ```text
//! source:destination:[hop, hop, ...]:weakestNodeId:weakestBattery
//! 1.0.1:1.0.2:[1.0.1, 1.0.3, 1.0.6, 1.0.2]:1.0.3:252
//! ```
//!
//! Bootstrap seeds the table with key-only placeholder rows
//! (`source:destination`) so the consumer can tell cold start from a missing
//! pair. Upsert replaces the single line matching the key and leaves every
//! other line byte-for-byte in its original position; the rewrite goes
//! through a temporary file in the same directory and an atomic rename, so a
//! concurrent reader never observes a half-written table.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use wisenet_protocol::NodeId;
use wisenet_routing::ChosenPath;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// One complete row of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    /// Flow source
    pub source: NodeId,

    /// Flow destination
    pub destination: NodeId,

    /// Chosen path, source to destination inclusive
    pub hops: Vec<NodeId>,

    /// Node with the lowest battery on the path
    pub weakest_node: NodeId,

    /// That node's battery level (0-255)
    pub weakest_battery: u8,
}

impl PathRecord {
    /// Build a record from a selection result
    pub fn from_chosen(source: NodeId, destination: NodeId, chosen: &ChosenPath) -> Self {
        PathRecord {
            source,
            destination,
            hops: chosen.hops.clone(),
            weakest_node: chosen.weakest_node,
            weakest_battery: chosen.weakest_battery,
        }
    }

    /// Parse a table line.
    ///
    /// Key-only placeholder rows yield `Ok(None)`: the key exists but no path
    /// has been computed for it yet.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let fields: Vec<&str> = line.split(':').collect();
        match fields.len() {
            2 => Ok(None), // placeholder row
            5 => {
                let source = parse_id(fields[0], line)?;
                let destination = parse_id(fields[1], line)?;
                let hops = fields[2]
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(", ")
                    .filter(|s| !s.is_empty())
                    .map(|s| parse_id(s, line))
                    .collect::<Result<Vec<_>>>()?;
                let weakest_node = parse_id(fields[3], line)?;
                let weakest_battery = fields[4]
                    .parse::<u8>()
                    .map_err(|_| StoreError::MalformedRecord(line.to_string()))?;

                Ok(Some(PathRecord {
                    source,
                    destination,
                    hops,
                    weakest_node,
                    weakest_battery,
                }))
            }
            _ => Err(StoreError::MalformedRecord(line.to_string())),
        }
    }
}

impl fmt::Display for PathRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hops: Vec<String> = self.hops.iter().map(|id| id.to_string()).collect();
        write!(
            f,
            "{}:{}:[{}]:{}:{}",
            self.source,
            self.destination,
            hops.join(", "),
            self.weakest_node,
            self.weakest_battery
        )
    }
}

fn parse_id(field: &str, line: &str) -> Result<NodeId> {
    NodeId::from_str(field).map_err(|_| StoreError::MalformedRecord(line.to_string()))
}

/// Check whether a raw line belongs to the (source, destination) key
fn key_matches(line: &str, source: &NodeId, destination: &NodeId) -> bool {
    let mut fields = line.split(':');
    let src = fields.next();
    let dst = fields.next();
    src == Some(source.to_string().as_str()) && dst == Some(destination.to_string().as_str())
}

/// The persisted path-metadata table
#[derive(Debug, Clone)]
pub struct PathStore {
    path: PathBuf,
}

impl PathStore {
    /// Open a store at the given file location (the file itself may not
    /// exist yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PathStore { path: path.into() }
    }

    /// Location of the table file
    pub fn file(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the record for its (source, destination) key.
    ///
    /// The matching line (placeholder included) is rewritten in place; all
    /// other lines keep their bytes and their order. Without a match the
    /// record is appended.
    pub fn upsert(&self, record: &PathRecord) -> Result<()> {
        let mut lines = self.read_lines()?;
        let rendered = record.to_string();

        match lines
            .iter_mut()
            .find(|line| key_matches(line, &record.source, &record.destination))
        {
            Some(line) => *line = rendered,
            None => lines.push(rendered),
        }

        self.rewrite(&lines)?;
        debug!(
            source = %record.source,
            destination = %record.destination,
            battery = record.weakest_battery,
            "path metadata stored"
        );
        Ok(())
    }

    /// Exact-key lookup. Placeholder rows and absent keys both read as
    /// `None`.
    pub fn lookup(&self, source: &NodeId, destination: &NodeId) -> Result<Option<PathRecord>> {
        for line in self.read_lines()? {
            if key_matches(&line, source, destination) {
                return PathRecord::parse(&line);
            }
        }
        Ok(None)
    }

    /// Boot-time reset: truncate the table and seed one key-only placeholder
    /// row per pair, the cold-start signal for the aggregation consumer.
    pub fn bootstrap<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a NodeId, &'a NodeId)>,
    ) -> Result<()> {
        let lines: Vec<String> = pairs
            .into_iter()
            .map(|(source, destination)| format!("{}:{}", source, destination))
            .collect();
        self.rewrite(&lines)
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn rewrite(&self, lines: &[String]) -> Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;

        for line in lines {
            writeln!(tmp, "{}", line)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn node(id: &str) -> NodeId {
        id.parse().unwrap()
    }

    fn record(src: &str, dst: &str, hops: &[&str], weakest: &str, battery: u8) -> PathRecord {
        PathRecord {
            source: node(src),
            destination: node(dst),
            hops: hops.iter().map(|h| node(h)).collect(),
            weakest_node: node(weakest),
            weakest_battery: battery,
        }
    }

    fn store_in(dir: &TempDir) -> PathStore {
        PathStore::new(dir.path().join("paths.txt"))
    }

    #[test]
    fn test_record_line_format() {
        let rec = record(
            "1.0.1",
            "1.0.2",
            &["1.0.1", "1.0.3", "1.0.6", "1.0.2"],
            "1.0.3",
            252,
        );
        assert_eq!(
            rec.to_string(),
            "1.0.1:1.0.2:[1.0.1, 1.0.3, 1.0.6, 1.0.2]:1.0.3:252"
        );
    }

    #[test]
    fn test_record_parse_roundtrip() {
        let rec = record("1.0.1", "1.0.2", &["1.0.1", "1.0.5", "1.0.2"], "1.0.5", 17);
        let parsed = PathRecord::parse(&rec.to_string()).unwrap().unwrap();
        assert_eq!(parsed, rec);
    }

    #[test]
    fn test_parse_placeholder_and_garbage() {
        assert!(PathRecord::parse("1.0.1:1.0.2").unwrap().is_none());
        assert!(PathRecord::parse("not a record").is_err());
        assert!(PathRecord::parse("1.0.1:1.0.2:[]:1.0.1:999").is_err());
    }

    #[test]
    fn test_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let rec = record("1.0.1", "1.0.4", &["1.0.1", "1.0.2", "1.0.4"], "1.0.2", 90);

        store.upsert(&rec).unwrap();

        let read = store.lookup(&node("1.0.1"), &node("1.0.4")).unwrap();
        assert_eq!(read, Some(rec));
    }

    #[test]
    fn test_upsert_is_idempotent_per_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let other_before = record("1.0.9", "1.0.8", &["1.0.9", "1.0.8"], "1.0.8", 3);
        let first = record("1.0.1", "1.0.4", &["1.0.1", "1.0.2", "1.0.4"], "1.0.2", 90);
        let other_after = record("1.0.7", "1.0.6", &["1.0.7", "1.0.6"], "1.0.6", 44);
        store.upsert(&other_before).unwrap();
        store.upsert(&first).unwrap();
        store.upsert(&other_after).unwrap();

        // Same key, new path data: the one line is replaced in place.
        let second = record("1.0.1", "1.0.4", &["1.0.1", "1.0.3", "1.0.4"], "1.0.3", 12);
        store.upsert(&second).unwrap();

        let contents = std::fs::read_to_string(store.file()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                other_before.to_string().as_str(),
                second.to_string().as_str(),
                other_after.to_string().as_str(),
            ]
        );
    }

    #[test]
    fn test_upsert_replaces_placeholder_row() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let a = node("1.0.1");
        let b = node("1.0.2");
        store.bootstrap([(&a, &b), (&b, &a)]).unwrap();

        assert_eq!(store.lookup(&a, &b).unwrap(), None);

        let rec = record("1.0.1", "1.0.2", &["1.0.1", "1.0.2"], "1.0.2", 100);
        store.upsert(&rec).unwrap();

        let contents = std::fs::read_to_string(store.file()).unwrap();
        assert_eq!(
            contents.lines().collect::<Vec<_>>(),
            vec![rec.to_string().as_str(), "1.0.2:1.0.1"]
        );
        assert_eq!(store.lookup(&a, &b).unwrap(), Some(rec));
    }

    #[test]
    fn test_bootstrap_truncates_previous_table() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let rec = record("1.0.1", "1.0.4", &["1.0.1", "1.0.4"], "1.0.4", 1);
        store.upsert(&rec).unwrap();

        let a = node("1.0.5");
        let b = node("1.0.6");
        store.bootstrap([(&a, &b)]).unwrap();

        let contents = std::fs::read_to_string(store.file()).unwrap();
        assert_eq!(contents, "1.0.5:1.0.6\n");
    }

    #[test]
    fn test_lookup_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.lookup(&node("1.0.1"), &node("1.0.2")).unwrap(), None);
    }
}
