// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{SystemTime, UNIX_EPOCH};

use super::bone::Bones;
use super::ids::{DiagramId, UserId};

/// Milliseconds since the unix epoch, the resolution used for diagram timestamps.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Attributes of the synthetic effect node (the problem being analyzed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    label: String,
    info: Option<String>,
    meta: Option<String>,
}

impl Effect {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            info: None,
            meta: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn set_info(&mut self, info: Option<String>) {
        self.info = info;
    }

    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    pub fn set_meta(&mut self, meta: Option<String>) {
        self.meta = meta;
    }
}

/// The aggregate root: an effect plus the cause tree attached to its spine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    id: DiagramId,
    name: String,
    creator: String,
    creator_id: UserId,
    effect: Effect,
    roots: Bones,
    created_at: u64,
    updated_at: u64,
}

impl Diagram {
    /// A new diagram with no bones; `created_at` and `updated_at` are both `now`.
    pub fn new(
        id: DiagramId,
        name: impl Into<String>,
        creator: impl Into<String>,
        creator_id: UserId,
        effect: Effect,
        now: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            creator: creator.into(),
            creator_id,
            effect,
            roots: Bones::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &DiagramId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Display identity of the author (not the owning principal; see [`Diagram::creator_id`]).
    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut Effect {
        &mut self.effect
    }

    pub fn roots(&self) -> &Bones {
        &self.roots
    }

    /// Swaps in a new root array and returns the previous one.
    pub fn replace_roots(&mut self, roots: Bones) -> Bones {
        std::mem::replace(&mut self.roots, roots)
    }

    pub fn with_roots(mut self, roots: impl Into<Bones>) -> Self {
        self.roots = roots.into();
        self
    }

    pub fn bone_count(&self) -> usize {
        self.roots.tree_len()
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Records a successful mutation at `now`; timestamps never move backwards.
    pub fn touch(&mut self, now: u64) {
        self.updated_at = self.updated_at.max(now);
    }

    pub(crate) fn set_timestamps(&mut self, created_at: u64, updated_at: u64) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}
