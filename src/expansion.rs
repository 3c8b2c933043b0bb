// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Which nodes show all of their children instead of the truncated budget.
//!
//! Keys are encoded paths, so they are only meaningful for one tree shape. After a mutation
//! that renumbers siblings, [`ExpansionState::reconcile`] moves keys to the nodes' new paths
//! and drops keys whose node no longer exists.

use std::collections::BTreeSet;

use crate::model::{remap_after_delete, BonePath};
use crate::ops::Change;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.expanded.iter().map(String::as_str)
    }

    /// Removes `path` if present, else adds it. Returns whether it is now expanded.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            return false;
        }
        self.expanded.insert(path.to_owned());
        true
    }

    /// Copy of this state with `path` toggled.
    pub fn toggled(&self, path: &str) -> Self {
        let mut next = self.clone();
        next.toggle(path);
        next
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// Rewrites keys so they keep naming the same nodes after `change`.
    pub fn reconcile(&mut self, change: &Change) {
        match change {
            Change::Inserted { .. } | Change::EffectUpdated => {}
            Change::Updated { path, children_replaced } => {
                if *children_replaced {
                    self.retain_paths(|key| (!key.is_descendant_of(path)).then(|| key.clone()));
                }
            }
            Change::Deleted { path } => {
                self.retain_paths(|key| remap_after_delete(key, path));
            }
        }
    }

    fn retain_paths(&mut self, mut remap: impl FnMut(&BonePath) -> Option<BonePath>) {
        self.expanded = std::mem::take(&mut self.expanded)
            .into_iter()
            .filter_map(|key| {
                let path = BonePath::parse(&key).ok()?;
                remap(&path).map(|path| path.encode())
            })
            .collect();
    }
}

impl FromIterator<String> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_owned).collect()
    }
}

/// Functional form of [`ExpansionState::toggle`].
pub fn toggle_expansion(state: &ExpansionState, path: &str) -> ExpansionState {
    state.toggled(path)
}
