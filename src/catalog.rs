// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram management over a [`DiagramStore`]: create, browse, edit and delete whole diagrams,
//! plus path-addressed bone edits applied server-side.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::auth::{ensure_owner, AccessError, Principal};
use crate::model::validate::{
    limit_optional, require_text, validate_tree, CREATOR_MAX, DIAGRAM_NAME_MAX, EFFECT_INFO_MAX,
    EFFECT_LABEL_MAX, EFFECT_META_MAX,
};
use crate::model::{now_millis, Bones, ContentError, Diagram, DiagramId, Effect, UserId};
use crate::ops::{apply_op, ApplyError, Change, Op};
use crate::store::{DiagramStore, StoreError};

pub const DEFAULT_PAGE_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDiagram {
    pub name: String,
    pub creator: String,
    pub effect_label: String,
    pub effect_info: Option<String>,
    pub effect_meta: Option<String>,
    pub roots: Bones,
}

/// Partial update of a diagram's flat fields and, optionally, its whole bone tree.
///
/// `None` keeps the current value; an empty `effect_info`/`effect_meta` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramPatch {
    pub name: Option<String>,
    pub creator: Option<String>,
    pub effect_label: Option<String>,
    pub effect_info: Option<String>,
    pub effect_meta: Option<String>,
    pub roots: Option<Bones>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_diagrams: usize,
    pub total_bones: usize,
    pub creator_stats: BTreeMap<String, usize>,
    pub average_bones_per_diagram: usize,
}

#[derive(Debug)]
pub enum CatalogError {
    NotFound { diagram_id: DiagramId },
    Access(AccessError),
    Content(ContentError),
    Apply(ApplyError),
    Store(StoreError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { diagram_id } => write!(f, "diagram {diagram_id} not found"),
            Self::Access(err) => err.fmt(f),
            Self::Content(err) => err.fmt(f),
            Self::Apply(err) => err.fmt(f),
            Self::Store(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Access(err) => Some(err),
            Self::Content(err) => Some(err),
            Self::Apply(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<AccessError> for CatalogError {
    fn from(err: AccessError) -> Self {
        Self::Access(err)
    }
}

impl From<ContentError> for CatalogError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

impl From<ApplyError> for CatalogError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn validate_flat_fields(diagram: &Diagram) -> Result<(), ContentError> {
    require_text("name", diagram.name(), DIAGRAM_NAME_MAX)?;
    require_text("creator", diagram.creator(), CREATOR_MAX)?;
    let effect = diagram.effect();
    require_text("effectLabel", effect.label(), EFFECT_LABEL_MAX)?;
    limit_optional("effectInfo", effect.info(), EFFECT_INFO_MAX)?;
    limit_optional("effectMeta", effect.meta(), EFFECT_META_MAX)
}

fn matches_search(diagram: &Diagram, needle: &str) -> bool {
    [diagram.name(), diagram.creator(), diagram.effect().label()]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[derive(Debug, Clone)]
pub struct Catalog<S> {
    store: S,
}

impl<S: DiagramStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&mut self, new: NewDiagram, principal: &Principal) -> Result<Diagram, CatalogError> {
        let mut effect = Effect::new(new.effect_label);
        effect.set_info(new.effect_info.as_deref().and_then(non_empty));
        effect.set_meta(new.effect_meta.as_deref().and_then(non_empty));

        let diagram = Diagram::new(
            DiagramId::generate(),
            new.name,
            new.creator,
            principal.user_id().clone(),
            effect,
            now_millis(),
        )
        .with_roots(new.roots);
        validate_flat_fields(&diagram)?;
        validate_tree(diagram.roots())?;

        self.store.put(&diagram)?;
        tracing::info!(
            diagram_id = %diagram.id(),
            user_id = %principal.user_id(),
            name = diagram.name(),
            "diagram created"
        );
        Ok(diagram)
    }

    /// Every diagram, or only `owner`'s, in creation order.
    pub fn list_all(&self, owner: Option<&UserId>) -> Result<Vec<Diagram>, CatalogError> {
        let mut diagrams = self.store.list()?;
        if let Some(owner) = owner {
            diagrams.retain(|diagram| diagram.creator_id() == owner);
        }
        Ok(diagrams)
    }

    /// One page of [`Catalog::list_all`], optionally narrowed by a case-insensitive search over
    /// name, creator and effect label. A page or limit of 0 counts as 1.
    pub fn list(
        &self,
        query: &ListQuery,
        owner: Option<&UserId>,
    ) -> Result<Page<Diagram>, CatalogError> {
        let mut diagrams = self.list_all(owner)?;
        if let Some(search) = query.search.as_deref().filter(|search| !search.is_empty()) {
            let needle = search.to_lowercase();
            diagrams.retain(|diagram| matches_search(diagram, &needle));
        }

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let total = diagrams.len();
        let data = diagrams
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(Page {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        })
    }

    pub fn get(&self, id: &DiagramId, principal: &Principal) -> Result<Diagram, CatalogError> {
        let diagram = self.load(id)?;
        ensure_owner(&diagram, principal)?;
        Ok(diagram)
    }

    pub fn update(
        &mut self,
        id: &DiagramId,
        principal: &Principal,
        patch: DiagramPatch,
    ) -> Result<Diagram, CatalogError> {
        let mut diagram = self.get(id, principal)?;

        if let Some(name) = patch.name {
            diagram.set_name(name);
        }
        if let Some(creator) = patch.creator {
            diagram.set_creator(creator);
        }
        let effect = diagram.effect_mut();
        if let Some(label) = patch.effect_label {
            effect.set_label(label);
        }
        if let Some(info) = patch.effect_info {
            effect.set_info(non_empty(&info));
        }
        if let Some(meta) = patch.effect_meta {
            effect.set_meta(non_empty(&meta));
        }
        validate_flat_fields(&diagram)?;
        if let Some(roots) = patch.roots {
            validate_tree(&roots)?;
            diagram.replace_roots(roots);
        }
        diagram.touch(now_millis());

        self.store.put(&diagram)?;
        tracing::info!(diagram_id = %id, "diagram updated");
        Ok(diagram)
    }

    pub fn delete(&mut self, id: &DiagramId, principal: &Principal) -> Result<(), CatalogError> {
        let diagram = self.get(id, principal)?;
        if !self.store.delete(id)? {
            return Err(CatalogError::NotFound {
                diagram_id: id.clone(),
            });
        }
        tracing::info!(diagram_id = %id, name = diagram.name(), "diagram deleted");
        Ok(())
    }

    /// Loads, applies `op` and stores the whole record again.
    pub fn apply(
        &mut self,
        id: &DiagramId,
        principal: &Principal,
        op: &Op,
    ) -> Result<(Diagram, Change), CatalogError> {
        let mut diagram = self.get(id, principal)?;
        let change = apply_op(&mut diagram, op, now_millis())?;
        self.store.put(&diagram)?;
        tracing::debug!(diagram_id = %id, ?change, "bone edit stored");
        Ok((diagram, change))
    }

    pub fn stats(&self) -> Result<Stats, CatalogError> {
        let diagrams = self.store.list()?;
        let total_diagrams = diagrams.len();
        let total_bones = diagrams.iter().map(Diagram::bone_count).sum::<usize>();

        let mut creator_stats = BTreeMap::new();
        for diagram in &diagrams {
            *creator_stats.entry(diagram.creator().to_owned()).or_insert(0) += 1;
        }

        let average_bones_per_diagram = if total_diagrams == 0 {
            0
        } else {
            (total_bones as f64 / total_diagrams as f64).round() as usize
        };

        Ok(Stats {
            total_diagrams,
            total_bones,
            creator_stats,
            average_bones_per_diagram,
        })
    }

    fn load(&self, id: &DiagramId) -> Result<Diagram, CatalogError> {
        self.store.get(id)?.ok_or_else(|| {
            tracing::warn!(diagram_id = %id, "diagram not found");
            CatalogError::NotFound {
                diagram_id: id.clone(),
            }
        })
    }
}
