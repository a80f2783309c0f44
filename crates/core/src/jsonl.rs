// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) file utilities.
//!
//! Provides durable storage for ordered JSON-serializable records, one
//! record per line. Rewrites go through a temporary sibling file that is
//! fsynced and renamed over the target, so readers see either the old
//! content or the new content, never a torn file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Reads all records from a JSONL file.
///
/// Skips empty lines. Returns `None` if the file doesn't exist.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line)?;
        records.push(record);
    }

    Ok(Some(records))
}

/// Writes all records to a JSONL file, atomically replacing existing content.
pub fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp_path = temp_path(path);

    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("records"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
