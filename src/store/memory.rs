// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::{sort_by_creation, DiagramStore, StoreError};
use crate::model::{Diagram, DiagramId};

/// In-process store. Diagrams share their bone trees with the stored copy, so a put costs
/// one map insert regardless of tree size.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    diagrams: BTreeMap<DiagramId, Diagram>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagrams(diagrams: impl IntoIterator<Item = Diagram>) -> Self {
        Self {
            diagrams: diagrams
                .into_iter()
                .map(|diagram| (diagram.id().clone(), diagram))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

impl DiagramStore for MemoryStore {
    fn get(&self, id: &DiagramId) -> Result<Option<Diagram>, StoreError> {
        Ok(self.diagrams.get(id).cloned())
    }

    fn put(&mut self, diagram: &Diagram) -> Result<(), StoreError> {
        self.diagrams.insert(diagram.id().clone(), diagram.clone());
        Ok(())
    }

    fn delete(&mut self, id: &DiagramId) -> Result<bool, StoreError> {
        Ok(self.diagrams.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<Diagram>, StoreError> {
        let mut diagrams = self.diagrams.values().cloned().collect::<Vec<_>>();
        sort_by_creation(&mut diagrams);
        Ok(diagrams)
    }
}
