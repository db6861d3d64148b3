//! Transcript persistence for successful LLM calls.
//!
//! Each call becomes its own pretty-printed JSON file named after the UTC
//! second it was written in. Files are never rotated or cleaned up, and two
//! calls in the same second write the same file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::constants::{TRANSCRIPT_PREFIX, TRANSCRIPT_TIMESTAMP_FORMAT};

/// One persisted prompt/response pair.
#[derive(Debug, Serialize)]
pub struct TranscriptRecord<'a> {
    pub prompt: &'a str,
    pub response: &'a Value,
}

/// Writes transcripts into a directory.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the transcript written at `at`.
    pub fn path_for(&self, at: DateTime<Utc>) -> PathBuf {
        let stamp = at.format(TRANSCRIPT_TIMESTAMP_FORMAT);
        self.dir.join(format!("{TRANSCRIPT_PREFIX}{stamp}.json"))
    }

    /// Writes a transcript stamped with the current time.
    pub fn write(&self, prompt: &str, response: &Value) -> Result<PathBuf> {
        self.write_at(prompt, response, Utc::now())
    }

    pub fn write_at(&self, prompt: &str, response: &Value, at: DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create transcript directory {:?}", self.dir))?;
        let path = self.path_for(at);
        let json = serde_json::to_string_pretty(&TranscriptRecord { prompt, response })?;
        fs::write(&path, json).with_context(|| format!("Failed to write transcript {:?}", path))?;
        Ok(path)
    }
}
