// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::record::DiagramRecord;
use super::{sort_by_creation, DiagramStore, StoreError};
use crate::model::{Diagram, DiagramId};

const DIAGRAMS_DIR: &str = "diagrams";
const TMP_PREFIX: &str = ".fishbone.tmp.";

/// One pretty-printed JSON file per diagram at `<root>/diagrams/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFolderStore {
    root: PathBuf,
    durability: WriteDurability,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Also syncs the written file and its directory where the platform allows it.
    Durable,
}

impl JsonFolderStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::BestEffort,
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn diagrams_dir(&self) -> PathBuf {
        self.root.join(DIAGRAMS_DIR)
    }

    pub fn diagram_path(&self, id: &DiagramId) -> PathBuf {
        self.diagrams_dir().join(format!("{id}.json"))
    }

    fn load(&self, path: &Path, id: Option<&DiagramId>) -> Result<Option<Diagram>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let record: DiagramRecord =
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let diagram = record
            .into_diagram()
            .map_err(|err| StoreError::from_record(path.to_path_buf(), err))?;

        if let Some(id) = id {
            if diagram.id() != id {
                return Err(StoreError::InvalidRecord {
                    path: path.to_path_buf(),
                    reason: format!("record id {:?} does not match file name", diagram.id().as_str()),
                });
            }
        }
        Ok(Some(diagram))
    }
}

impl DiagramStore for JsonFolderStore {
    fn get(&self, id: &DiagramId) -> Result<Option<Diagram>, StoreError> {
        self.load(&self.diagram_path(id), Some(id))
    }

    fn put(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        let path = self.diagram_path(diagram.id());
        let record = DiagramRecord::from(diagram);
        let json = serde_json::to_string_pretty(&record).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        create_dir_safe(&self.root, DIAGRAMS_DIR)?;
        write_atomic(&path, format!("{json}\n").as_bytes(), self.durability)?;
        tracing::debug!(diagram_id = %diagram.id(), path = %path.display(), "diagram saved");
        Ok(())
    }

    fn delete(&mut self, id: &DiagramId) -> Result<bool, StoreError> {
        let path = self.diagram_path(id);
        match fs::symlink_metadata(&path) {
            Ok(md) if md.file_type().is_symlink() => {
                return Err(StoreError::SymlinkRefused { path });
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => return Err(StoreError::Io { path, source }),
        }

        fs::remove_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(diagram_id = %id, "diagram deleted");
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Diagram>, StoreError> {
        let dir = self.diagrams_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut diagrams = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Ok(id) = DiagramId::new(stem) else {
                tracing::warn!(path = %path.display(), "skipping file with invalid diagram id");
                continue;
            };
            match self.load(&path, Some(&id)) {
                Ok(Some(diagram)) => diagrams.push(diagram),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable diagram record"
                    );
                }
            }
        }

        sort_by_creation(&mut diagrams);
        Ok(diagrams)
    }
}

fn create_dir_safe(root: &Path, name: &str) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let dir = root.join(name);
    match fs::symlink_metadata(&dir) {
        Ok(md) => {
            if md.file_type().is_symlink() {
                return Err(StoreError::SymlinkRefused { path: dir });
            }
            if !md.is_dir() {
                return Err(StoreError::Io {
                    path: dir,
                    source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                });
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(&dir).map_err(|source| StoreError::Io { path: dir, source })
        }
        Err(source) => Err(StoreError::Io { path: dir, source }),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Replaces `path` with `contents` via a sibling temp file, so readers see either the old or
/// the new record, never a torn one.
fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        "{TMP_PREFIX}{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
