//! Struct archiving functionality
//!
//! Status reports are archived as csv files in the session's archive
//! directory, one row per cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    writer: Writer<File>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Cannot write the record: {0}")]
    WriteError(csv::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let mut session_path = session.arch_root.clone();
        session_path.push(path);

        Self::from_file_path(session_path)
    }

    /// Create a new archiver writing to the given file, creating any missing
    /// parent directories. An existing file is truncated.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(ArchiveError::FileError)?;

        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self { writer })
    }

    /// Serialise a record into the archive.
    ///
    /// The record must be flat (no nested structs or sequences), the header
    /// row is taken from the first record's field names.
    pub fn serialise<T: Serialize>(&mut self, record: &T) -> Result<(), ArchiveError> {
        self.writer.serialize(record).map_err(ArchiveError::WriteError)?;
        self.writer.flush().map_err(|e| ArchiveError::WriteError(e.into()))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        tripped: bool
    }

    #[test]
    fn test_archive_rows() {
        let mut path = std::env::temp_dir();
        path.push(format!("drive_archive_test_{}", std::process::id()));
        path.push("rows.csv");

        let mut arch = Archiver::from_file_path(&path).unwrap();
        arch.serialise(&Row { time_s: 0.0, tripped: false }).unwrap();
        arch.serialise(&Row { time_s: 0.02, tripped: true }).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "time_s,tripped\n0.0,false\n0.02,true\n");

        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }
}
