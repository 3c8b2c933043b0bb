// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for diagrams.
//!
//! A store holds whole diagram records keyed by id: every save replaces the full record, there
//! are no partial writes. `MemoryStore` backs tests and the demo server; `JsonFolderStore`
//! keeps one JSON file per diagram.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::{Diagram, DiagramId, IdError};

pub mod json_folder;
pub mod memory;
pub mod record;

pub use json_folder::{JsonFolderStore, WriteDurability};
pub use memory::MemoryStore;
pub use record::{bones_from_records, BoneRecord, DiagramRecord, RecordError};

pub trait DiagramStore {
    fn get(&self, id: &DiagramId) -> Result<Option<Diagram>, StoreError>;

    /// Inserts or replaces the record for `diagram.id()`.
    fn put(&mut self, diagram: &Diagram) -> Result<(), StoreError>;

    /// Returns whether a record was removed.
    fn delete(&mut self, id: &DiagramId) -> Result<bool, StoreError>;

    /// All records, ordered by creation time and then id.
    fn list(&self) -> Result<Vec<Diagram>, StoreError>;
}

impl<S: DiagramStore + ?Sized> DiagramStore for Box<S> {
    fn get(&self, id: &DiagramId) -> Result<Option<Diagram>, StoreError> {
        (**self).get(id)
    }

    fn put(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        (**self).put(diagram)
    }

    fn delete(&mut self, id: &DiagramId) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<Diagram>, StoreError> {
        (**self).list()
    }
}

pub(crate) fn sort_by_creation(diagrams: &mut [Diagram]) {
    diagrams.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        path: PathBuf,
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidRecord {
        path: PathBuf,
        reason: String,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn from_record(path: PathBuf, err: RecordError) -> Self {
        match err {
            RecordError::InvalidId { field, value, source } => Self::InvalidId {
                path,
                field,
                value,
                source,
            },
            RecordError::InvalidStatus(source) => Self::InvalidRecord {
                path,
                reason: source.to_string(),
            },
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "json error at {}: {source}", path.display())
            }
            Self::InvalidId { path, field, value, source } => write!(
                f,
                "invalid {field} {value:?} in {}: {source}",
                path.display()
            ),
            Self::InvalidRecord { path, reason } => {
                write!(f, "invalid record {}: {reason}", path.display())
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink {}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidRecord { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}
