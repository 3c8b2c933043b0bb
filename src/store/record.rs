// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON record format for diagrams.
//!
//! The same shapes are used on disk and on the wire: camelCase keys, optional fields omitted
//! when unset, timestamps as unix milliseconds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{
    Bone, BoneStatus, Bones, Diagram, DiagramId, Effect, IdError, ParseBoneStatusError, UserId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecord {
    pub id: String,
    pub name: String,
    pub creator: String,
    pub creator_id: String,
    pub effect_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_meta: Option<String>,
    #[serde(default)]
    pub roots: Vec<BoneRecord>,
    #[serde(default)]
    pub created_at: u64,
    /// Falls back to `created_at` when absent.
    #[serde(default)]
    pub updated_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneRecord {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoneRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidStatus(ParseBoneStatusError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { field, value, source } => {
                write!(f, "invalid {field} {value:?}: {source}")
            }
            Self::InvalidStatus(source) => source.fmt(f),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidStatus(source) => Some(source),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl BoneRecord {
    pub fn into_bone(self) -> Result<Bone, RecordError> {
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<BoneStatus>().map_err(RecordError::InvalidStatus)?),
        };
        let children = self
            .children
            .into_iter()
            .map(Self::into_bone)
            .collect::<Result<Vec<_>, _>>()?;

        let mut bone = Bone::new(self.label).with_children(children);
        bone.set_info(non_empty(self.info));
        bone.set_metadata(non_empty(self.metadata));
        bone.set_status(status);
        Ok(bone)
    }

    pub fn from_bones(bones: &Bones) -> Vec<Self> {
        bones.iter().map(Self::from).collect()
    }
}

impl From<&Bone> for BoneRecord {
    fn from(bone: &Bone) -> Self {
        Self {
            label: bone.label().to_owned(),
            info: bone.info().map(str::to_owned),
            metadata: bone.metadata().map(str::to_owned),
            status: bone.status().map(|status| status.as_str().to_owned()),
            children: Self::from_bones(bone.children()),
        }
    }
}

pub fn bones_from_records(records: Vec<BoneRecord>) -> Result<Bones, RecordError> {
    records
        .into_iter()
        .map(BoneRecord::into_bone)
        .collect::<Result<Vec<_>, _>>()
        .map(Bones::from)
}

impl DiagramRecord {
    /// Rebuilds the diagram. Ids are checked; bone content is taken as stored.
    pub fn into_diagram(self) -> Result<Diagram, RecordError> {
        let id = DiagramId::new(self.id.as_str()).map_err(|source| RecordError::InvalidId {
            field: "id",
            value: self.id.clone(),
            source,
        })?;
        let creator_id =
            UserId::new(self.creator_id.as_str()).map_err(|source| RecordError::InvalidId {
                field: "creatorId",
                value: self.creator_id.clone(),
                source,
            })?;

        let mut effect = Effect::new(self.effect_label);
        effect.set_info(non_empty(self.effect_info));
        effect.set_meta(non_empty(self.effect_meta));

        let roots = bones_from_records(self.roots)?;
        let mut diagram =
            Diagram::new(id, self.name, self.creator, creator_id, effect, self.created_at)
                .with_roots(roots);
        diagram.set_timestamps(self.created_at, self.updated_at.max(self.created_at));
        Ok(diagram)
    }
}

impl From<&Diagram> for DiagramRecord {
    fn from(diagram: &Diagram) -> Self {
        let effect = diagram.effect();
        Self {
            id: diagram.id().to_string(),
            name: diagram.name().to_owned(),
            creator: diagram.creator().to_owned(),
            creator_id: diagram.creator_id().to_string(),
            effect_label: effect.label().to_owned(),
            effect_info: effect.info().map(str::to_owned),
            effect_meta: effect.meta().map(str::to_owned),
            roots: BoneRecord::from_bones(diagram.roots()),
            created_at: diagram.created_at(),
            updated_at: diagram.updated_at(),
        }
    }
}
