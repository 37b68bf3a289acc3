//! Append-only log of focus targets
//!
//! Stored as `targets.csv` with a `Date,Time,Target` header. Every
//! operation opens the file, does its work and closes it again; nothing
//! holds a handle between calls.

use super::files::{ensure_tomato_dir, targets_file};
use super::parser::{parse_entry, RecordReader};
use super::serializer::{serialize_entry, serialize_header, HEADER, TERMINATOR};
use crate::domain::TargetEntry;
use crate::error::{LogError, ResourceError, ValidationError};
use chrono::{Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Handle to the target log file
#[derive(Debug, Clone)]
pub struct TargetLog {
    path: PathBuf,
}

impl TargetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target log inside a data directory
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(targets_file(dir))
    }

    /// Target log in the resolved data directory, creating the directory if needed
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = ensure_tomato_dir()?;
        Ok(Self::in_dir(&dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header if it is missing or empty
    pub fn ensure_initialized(&self) -> Result<(), ResourceError> {
        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(ResourceError::io(&self.path, "inspect", e)),
        };

        if !needs_header {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ResourceError::io(parent, "create directory", e))?;
        }

        self.write_record(&serialize_header(), "initialize")?;
        tracing::info!(path = %self.path.display(), "initialized target log");
        Ok(())
    }

    /// Append a target stamped with the current local time
    pub fn append(&self, text: &str) -> Result<TargetEntry, LogError> {
        self.append_at(text, Local::now().naive_local())
    }

    /// Append a target stamped with `at`
    pub fn append_at(&self, text: &str, at: NaiveDateTime) -> Result<TargetEntry, LogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTarget.into());
        }

        self.ensure_initialized()?;

        let entry = TargetEntry::new(at, text);
        self.write_record(&serialize_entry(&entry), "append to")?;

        tracing::debug!(path = %self.path.display(), target = %entry.text, "target appended");
        Ok(entry)
    }

    /// Write one complete record and sync it. A failed write is rolled back
    /// so the file never ends in a partial row.
    fn write_record(&self, record: &str, action: &'static str) -> Result<(), ResourceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ResourceError::io(&self.path, action, e))?;

        let original_len = file
            .metadata()
            .map_err(|e| ResourceError::io(&self.path, action, e))?
            .len();

        // A last row without a terminator must not swallow the new record
        let mut line = String::with_capacity(record.len() + TERMINATOR.len());
        if original_len > 0
            && !ends_with_newline(&mut file).map_err(|e| ResourceError::io(&self.path, action, e))?
        {
            line.push_str(TERMINATOR);
        }
        line.push_str(record);

        let written = file
            .write_all(line.as_bytes())
            .and_then(|_| file.sync_all());

        if let Err(e) = written {
            if let Err(rollback) = file.set_len(original_len) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %rollback,
                    "could not roll back partial write to target log"
                );
            }
            return Err(ResourceError::io(&self.path, action, e));
        }

        Ok(())
    }

    /// Last appended target, if any
    pub fn most_recent(&self) -> Result<Option<TargetEntry>, ResourceError> {
        let mut last = None;
        for entry in self.search("") {
            last = Some(entry?);
        }
        Ok(last)
    }

    /// Lazily scan for targets containing `query`, ignoring case.
    /// Each call starts a fresh scan of the file.
    pub fn search(&self, query: &str) -> TargetSearch {
        TargetSearch {
            path: self.path.clone(),
            query: query.to_string(),
            state: ScanState::Pending,
        }
    }

    /// All targets in storage order
    pub fn entries(&self) -> Result<Vec<TargetEntry>, ResourceError> {
        self.search("").collect()
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

enum ScanState {
    Pending,
    Reading {
        records: RecordReader<BufReader<File>>,
        header_seen: bool,
    },
    Done,
}

/// Iterator over matching targets in chronological order.
/// The file is opened on the first pull and closed once exhausted or dropped.
pub struct TargetSearch {
    path: PathBuf,
    query: String,
    state: ScanState,
}

impl TargetSearch {
    fn open(&self) -> Result<Option<RecordReader<BufReader<File>>>, ResourceError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(RecordReader::new(BufReader::new(file)))),
            // Not initialized yet means no targets
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResourceError::io(&self.path, "open", e)),
        }
    }
}

impl Iterator for TargetSearch {
    type Item = Result<TargetEntry, ResourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                ScanState::Pending => match self.open() {
                    Ok(Some(records)) => {
                        self.state = ScanState::Reading {
                            records,
                            header_seen: false,
                        };
                    }
                    Ok(None) => {
                        self.state = ScanState::Done;
                        return None;
                    }
                    Err(e) => {
                        self.state = ScanState::Done;
                        return Some(Err(e));
                    }
                },
                ScanState::Reading { records, header_seen } => {
                    let next = records.next();
                    let line = records.record_line();

                    let fields = match next {
                        Some(Ok(fields)) => fields,
                        Some(Err(e)) => {
                            let err = ResourceError::io(&self.path, "read", e);
                            self.state = ScanState::Done;
                            return Some(Err(err));
                        }
                        None => {
                            self.state = ScanState::Done;
                            return None;
                        }
                    };

                    if !*header_seen {
                        *header_seen = true;
                        if fields != HEADER {
                            tracing::warn!(path = %self.path.display(), "unexpected header in target log");
                        }
                        continue;
                    }

                    match parse_entry(&fields) {
                        Ok(entry) if entry.matches(&self.query) => return Some(Ok(entry)),
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(path = %self.path.display(), line, error = %e, "skipping malformed target");
                        }
                    }
                }
                ScanState::Done => return None,
            }
        }
    }
}
