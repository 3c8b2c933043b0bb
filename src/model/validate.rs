// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Field bounds for bones and diagram attributes.
//!
//! Lengths are counted in characters. Required fields are checked after trimming whitespace.

use std::fmt;

use super::bone::{Bone, Bones};

pub const BONE_LABEL_MAX: usize = 100;
pub const BONE_INFO_MAX: usize = 500;
pub const BONE_METADATA_MAX: usize = 200;
/// Deepest level a bone may sit at; top-level bones are level 1.
///
/// Each level costs two nesting steps in the stored JSON, which must stay well below the
/// reader's recursion limit of 128.
pub const BONE_DEPTH_MAX: usize = 32;

pub const DIAGRAM_NAME_MAX: usize = 100;
pub const CREATOR_MAX: usize = 50;
pub const EFFECT_LABEL_MAX: usize = 100;
pub const EFFECT_INFO_MAX: usize = 500;
pub const EFFECT_META_MAX: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize, len: usize },
    TooDeep { max: usize, depth: usize },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, len } => {
                write!(f, "{field} must be at most {max} characters (got {len})")
            }
            Self::TooDeep { max, depth } => {
                write!(f, "bones may be nested at most {max} levels deep (got {depth})")
            }
        }
    }
}

impl std::error::Error for ContentError {}

pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentError::Empty { field });
    }
    limit_text(field, trimmed, max)
}

pub fn limit_text(field: &'static str, value: &str, max: usize) -> Result<(), ContentError> {
    let len = value.chars().count();
    if len > max {
        return Err(ContentError::TooLong { field, max, len });
    }
    Ok(())
}

pub fn limit_optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ContentError> {
    value.map_or(Ok(()), |value| limit_text(field, value, max))
}

/// Checks a single bone's own fields (not its children).
pub fn validate_bone(bone: &Bone) -> Result<(), ContentError> {
    require_text("label", bone.label(), BONE_LABEL_MAX)?;
    limit_optional("info", bone.info(), BONE_INFO_MAX)?;
    limit_optional("metadata", bone.metadata(), BONE_METADATA_MAX)
}

/// Checks every bone of every subtree in `bones`, taken as the top-level array.
pub fn validate_tree(bones: &Bones) -> Result<(), ContentError> {
    validate_level(bones, 1)
}

/// Checks `bone` and its descendants as if it sat at `depth`.
pub fn validate_subtree(bone: &Bone, depth: usize) -> Result<(), ContentError> {
    if depth > BONE_DEPTH_MAX {
        return Err(ContentError::TooDeep { max: BONE_DEPTH_MAX, depth });
    }
    validate_bone(bone)?;
    validate_level(bone.children(), depth + 1)
}

fn validate_level(bones: &Bones, depth: usize) -> Result<(), ContentError> {
    bones.iter().try_for_each(|bone| validate_subtree(bone, depth))
}
