//! Ledger of ingestion runs, one row per source per run.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Source;
use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    Running,
    /// Every page fetched; the run may advance the incremental watermark.
    Complete,
    /// At least one page failed or the run was cut short.
    Incomplete,
    Failed,
}

impl SyncRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncRunStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "complete" => Ok(Self::Complete),
            "incomplete" => Ok(Self::Incomplete),
            "failed" => Ok(Self::Failed),
            other => Err(ModelError::unknown("sync status", other)),
        }
    }
}

/// Counters recorded when a run finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRunOutcome {
    pub finished_at: DateTime<Utc>,
    pub pages: u32,
    pub failed_pages: u32,
    pub fetched: u64,
    pub normalized: u64,
    pub rejected: u64,
    pub upserted: u64,
    pub status: SyncRunStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRun {
    pub id: i64,
    pub source: Source,
    pub started_at: DateTime<Utc>,
    pub since: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pages: u32,
    pub failed_pages: u32,
    pub fetched: u64,
    pub normalized: u64,
    pub rejected: u64,
    pub upserted: u64,
    pub status: SyncRunStatus,
    pub error: Option<String>,
}
