// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive editing of one diagram.
//!
//! A session owns the in-memory diagram plus its view state (expansion, selection, theme). It
//! routes clicks on layout primitives back into tree edits and persists whole records through
//! a [`DiagramStore`]. Edits only ever touch the in-memory copy; [`DiagramSession::save`] is the
//! single point where storage is written.

use std::fmt;

use crate::auth::{ensure_owner, AccessError, Principal};
use crate::expansion::ExpansionState;
use crate::layout::{compute_layout, Canvas, FishboneLayout, HitTarget, Theme};
use crate::model::{
    decode_path, now_millis, remap_after_delete, Bone, BonePath, Diagram, DiagramId, Effect,
    NodePath,
};
use crate::ops::{apply_op, locate_at, ApplyError, Change, Op};
use crate::store::{DiagramStore, StoreError};

/// Quick-add labels for top-level categories (the classic "6M"-style set).
pub const COMMON_CATEGORIES: [&str; 6] =
    ["People", "Process", "Technology", "Environment", "Materials", "Methods"];

#[derive(Debug)]
pub enum SessionError {
    NotFound { diagram_id: DiagramId },
    Access(AccessError),
    /// The edit was rejected; the diagram is unchanged.
    Apply(ApplyError),
    /// The diagram could not be saved; the in-memory copy is kept and stays dirty.
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { diagram_id } => write!(f, "diagram not found: {diagram_id}"),
            Self::Access(err) => err.fmt(f),
            Self::Apply(err) => err.fmt(f),
            Self::Store(err) => write!(f, "could not save diagram: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Access(err) => Some(err),
            Self::Apply(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<AccessError> for SessionError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}

impl From<ApplyError> for SessionError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// What a click on a hit target resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clicked<'a> {
    /// An expand indicator was toggled; `expanded` is the new state.
    Toggled { expanded: bool },
    Bone(&'a Bone),
    Effect(&'a Effect),
}

#[derive(Debug, Clone)]
pub struct DiagramSession {
    diagram: Diagram,
    principal: Principal,
    theme: Theme,
    expansion: ExpansionState,
    selected: Option<NodePath>,
    dirty: bool,
}

impl DiagramSession {
    /// Loads `id` for `principal`. Anyone may open a diagram for viewing; edits are owner-only.
    pub fn open<S: DiagramStore + ?Sized>(
        store: &S,
        id: &DiagramId,
        principal: Principal,
    ) -> Result<Self, SessionError> {
        let Some(diagram) = store.get(id)? else {
            return Err(SessionError::NotFound {
                diagram_id: id.clone(),
            });
        };
        tracing::debug!(diagram_id = %id, user_id = %principal.user_id(), "session opened");
        Ok(Self::from_diagram(diagram, principal))
    }

    pub fn from_diagram(diagram: Diagram, principal: Principal) -> Self {
        Self {
            diagram,
            principal,
            theme: Theme::default(),
            expansion: ExpansionState::new(),
            selected: None,
            dirty: false,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn can_edit(&self) -> bool {
        self.principal.owns(&self.diagram)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selected(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn layout(&self, canvas: Canvas) -> FishboneLayout {
        let selected = self.selected.as_ref().map(NodePath::encode);
        compute_layout(
            &self.diagram,
            canvas,
            self.theme,
            &self.expansion,
            selected.as_deref(),
        )
    }

    /// Handles a click on a primitive carrying `target`.
    ///
    /// Expand toggles are allowed for any viewer but must name an existing bone. Other targets
    /// select the node for editing, which requires ownership.
    pub fn click(&mut self, target: &HitTarget) -> Result<Clicked<'_>, SessionError> {
        if target.is_expand_toggle {
            let path = BonePath::parse(&target.path).map_err(ApplyError::from)?;
            locate_at(self.diagram.roots(), &path).map_err(ApplyError::from)?;
            let expanded = self.expansion.toggle(&path.encode());
            return Ok(Clicked::Toggled { expanded });
        }

        ensure_owner(&self.diagram, &self.principal)?;
        let path = decode_path(&target.path).map_err(ApplyError::from)?;
        let clicked = match &path {
            NodePath::Effect => Clicked::Effect(self.diagram.effect()),
            NodePath::Bone(bone_path) => {
                Clicked::Bone(locate_at(self.diagram.roots(), bone_path).map_err(ApplyError::from)?)
            }
        };
        self.selected = Some(path);
        Ok(clicked)
    }

    pub fn apply(&mut self, op: Op) -> Result<Change, SessionError> {
        self.apply_with_clock(op, now_millis())
    }

    /// [`DiagramSession::apply`] with an explicit timestamp for `updatedAt`.
    pub fn apply_with_clock(&mut self, op: Op, now: u64) -> Result<Change, SessionError> {
        ensure_owner(&self.diagram, &self.principal)?;
        let change = apply_op(&mut self.diagram, &op, now).inspect_err(|err| {
            tracing::debug!(diagram_id = %self.diagram.id(), error = %err, "edit rejected");
        })?;

        self.expansion.reconcile(&change);
        self.reconcile_selection(&change);
        self.dirty = true;
        tracing::debug!(diagram_id = %self.diagram.id(), ?change, "edit applied");
        Ok(change)
    }

    /// Appends a top-level category under the effect.
    pub fn add_category(&mut self, label: &str) -> Result<Change, SessionError> {
        self.apply(Op::InsertBone {
            parent: NodePath::Effect.encode(),
            bone: Bone::new(label),
        })
    }

    /// Writes the whole diagram if it has unsaved edits.
    ///
    /// On failure nothing in memory changes, so a later call retries the same record.
    pub fn save<S: DiagramStore + ?Sized>(&mut self, store: &mut S) -> Result<(), SessionError> {
        if !self.dirty {
            return Ok(());
        }
        if let Err(err) = store.put(&self.diagram) {
            tracing::warn!(diagram_id = %self.diagram.id(), error = %err, "save failed");
            return Err(err.into());
        }
        self.dirty = false;
        tracing::info!(
            diagram_id = %self.diagram.id(),
            bones = self.diagram.bone_count(),
            "diagram saved"
        );
        Ok(())
    }

    fn reconcile_selection(&mut self, change: &Change) {
        let Some(NodePath::Bone(selected)) = &self.selected else {
            return;
        };
        let next = match change {
            Change::Inserted { .. } | Change::EffectUpdated => return,
            Change::Deleted { path } => remap_after_delete(selected, path),
            Change::Updated { path, children_replaced } => {
                if *children_replaced && selected.is_descendant_of(path) {
                    None
                } else {
                    return;
                }
            }
        };
        self.selected = next.map(NodePath::Bone);
    }
}

#[cfg(test)]
mod tests;
