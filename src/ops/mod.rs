// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Path-addressed tree mutation.
//!
//! The free functions (`locate`, `update`, `insert_child`, `delete`) are pure: they take a root
//! array and return a new one, leaving the input untouched and sharing every subtree that is
//! not on the route to the edit point. [`apply_op`] packages them for a whole [`Diagram`]:
//! content is validated first, and the diagram is only modified when the edit succeeds.

use std::fmt;

use crate::model::validate::{
    limit_optional, require_text, validate_bone, validate_subtree, ContentError,
    EFFECT_INFO_MAX, EFFECT_LABEL_MAX, EFFECT_META_MAX,
};
use crate::model::{decode_path, Bone, BonePath, BoneStatus, Bones, Diagram, NodePath, PathError};

mod tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    InvalidPath(PathError),
    /// `index` does not exist in the sibling array at `level` (0 = roots).
    OutOfRange { level: usize, index: usize, len: usize },
    /// The path continues below a bone that has no children.
    NoChildren { level: usize, index: usize },
    EffectIsNotABone,
    EffectDeletion,
}

impl TreeError {
    /// Whether the path simply does not name an existing bone.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath(_) | Self::OutOfRange { .. } | Self::NoChildren { .. }
        )
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath(err) => write!(f, "invalid path: {err}"),
            Self::OutOfRange { level, index, len } => {
                write!(f, "no bone at index {index} on level {level} (level has {len})")
            }
            Self::NoChildren { level, index } => {
                write!(f, "bone at index {index} on level {level} has no children")
            }
            Self::EffectIsNotABone => f.write_str("the effect node is not a bone"),
            Self::EffectDeletion => f.write_str("the effect node cannot be deleted"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPath(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PathError> for TreeError {
    fn from(err: PathError) -> Self {
        Self::InvalidPath(err)
    }
}

fn decode_bone_path(path: &str) -> Result<BonePath, TreeError> {
    match decode_path(path)? {
        NodePath::Bone(path) => Ok(path),
        NodePath::Effect => Err(TreeError::EffectIsNotABone),
    }
}

/// The bone at `path`.
pub fn locate<'a>(roots: &'a Bones, path: &str) -> Result<&'a Bone, TreeError> {
    locate_at(roots, &decode_bone_path(path)?)
}

pub fn locate_at<'a>(roots: &'a Bones, path: &BonePath) -> Result<&'a Bone, TreeError> {
    tree::walk(roots, path).map(|bone| &**bone)
}

/// Replaces the bone at `path` wholesale, children included.
pub fn update(roots: &Bones, path: &str, bone: Bone) -> Result<Bones, TreeError> {
    update_at(roots, &decode_bone_path(path)?, bone)
}

pub fn update_at(roots: &Bones, path: &BonePath, bone: Bone) -> Result<Bones, TreeError> {
    tree::path_copy(roots, path.indices(), 0, |siblings, index| {
        tree::replace_node(siblings, index, bone)
    })
}

/// Appends `child` to the children of the node at `path`; `effect` appends a new root bone.
pub fn insert_child(roots: &Bones, path: &str, child: Bone) -> Result<Bones, TreeError> {
    insert_child_at(roots, &decode_path(path)?, child)
}

pub fn insert_child_at(roots: &Bones, parent: &NodePath, child: Bone) -> Result<Bones, TreeError> {
    match parent {
        NodePath::Effect => Ok(roots.with_pushed(std::sync::Arc::new(child))),
        NodePath::Bone(path) => tree::path_copy(roots, path.indices(), 0, |siblings, index| {
            tree::append_child(siblings, index, child)
        }),
    }
}

/// Removes the bone at `path` together with its whole subtree.
pub fn delete(roots: &Bones, path: &str) -> Result<Bones, TreeError> {
    match decode_path(path)? {
        NodePath::Effect => Err(TreeError::EffectDeletion),
        NodePath::Bone(path) => delete_at(roots, &path),
    }
}

pub fn delete_at(roots: &Bones, path: &BonePath) -> Result<Bones, TreeError> {
    tree::path_copy(roots, path.indices(), 0, tree::remove_node)
}

/// Field edits for a bone, as submitted by an edit form. Children are carried over.
///
/// `None` keeps the current value. For `info` and `metadata` an empty string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonePatch {
    pub label: Option<String>,
    pub info: Option<String>,
    pub metadata: Option<String>,
    pub status: Option<Option<BoneStatus>>,
}

impl BonePatch {
    fn apply_to(&self, bone: &mut Bone) {
        if let Some(label) = &self.label {
            bone.set_label(label.clone());
        }
        if let Some(info) = &self.info {
            bone.set_info(non_empty(info));
        }
        if let Some(metadata) = &self.metadata {
            bone.set_metadata(non_empty(metadata));
        }
        if let Some(status) = self.status {
            bone.set_status(status);
        }
    }
}

/// Field edits for the effect node; same conventions as [`BonePatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectPatch {
    pub label: Option<String>,
    pub info: Option<String>,
    pub meta: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Append `bone` under `parent` (`effect` adds a top-level category).
    InsertBone { parent: String, bone: Bone },
    /// Replace the bone at `path` wholesale.
    UpdateBone { path: String, bone: Bone },
    PatchBone { path: String, patch: BonePatch },
    DeleteBone { path: String },
    UpdateEffect { patch: EffectPatch },
}

/// What an applied op did, in terms of paths into the *new* tree (or, for deletions, the
/// removed node's former path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Inserted { path: BonePath },
    Updated { path: BonePath, children_replaced: bool },
    Deleted { path: BonePath },
    EffectUpdated,
}

impl Change {
    /// Whether existing bones may now be reachable under different paths.
    pub fn renumbers(&self) -> bool {
        match self {
            Self::Deleted { .. } => true,
            Self::Updated { children_replaced, .. } => *children_replaced,
            Self::Inserted { .. } | Self::EffectUpdated => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Tree(TreeError),
    Content(ContentError),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "cannot apply edit: {err}"),
            Self::Content(err) => write!(f, "invalid content: {err}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Content(err) => Some(err),
        }
    }
}

impl From<TreeError> for ApplyError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<PathError> for ApplyError {
    fn from(err: PathError) -> Self {
        Self::Tree(TreeError::InvalidPath(err))
    }
}

impl From<ContentError> for ApplyError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

/// Applies `op` to `diagram` and refreshes its `updated_at` to `now`.
///
/// On error the diagram is left exactly as it was.
pub fn apply_op(diagram: &mut Diagram, op: &Op, now: u64) -> Result<Change, ApplyError> {
    let (roots, change) = match op {
        Op::InsertBone { parent, bone } => {
            let parent = decode_path(parent)?;
            let depth = match &parent {
                NodePath::Effect => 1,
                NodePath::Bone(parent) => parent.depth() + 1,
            };
            validate_subtree(bone, depth)?;
            let roots = insert_child_at(diagram.roots(), &parent, bone.clone())?;
            let path = match &parent {
                NodePath::Effect => BonePath::root(roots.len() - 1),
                NodePath::Bone(parent) => {
                    let siblings = locate_at(&roots, parent)?.children().len();
                    parent.child(siblings - 1)
                }
            };
            (roots, Change::Inserted { path })
        }
        Op::UpdateBone { path, bone } => {
            let path = decode_bone_path(path)?;
            validate_subtree(bone, path.depth())?;
            let existing = locate_at(diagram.roots(), &path)?;
            let children_replaced = !Bones::ptr_eq(existing.children(), bone.children())
                && existing.children() != bone.children();
            let roots = update_at(diagram.roots(), &path, bone.clone())?;
            (roots, Change::Updated { path, children_replaced })
        }
        Op::PatchBone { path, patch } => {
            let path = decode_bone_path(path)?;
            let mut bone = locate_at(diagram.roots(), &path)?.clone();
            patch.apply_to(&mut bone);
            validate_bone(&bone)?;
            let roots = update_at(diagram.roots(), &path, bone)?;
            (roots, Change::Updated { path, children_replaced: false })
        }
        Op::DeleteBone { path } => {
            let path = match decode_path(path)? {
                NodePath::Effect => return Err(TreeError::EffectDeletion.into()),
                NodePath::Bone(path) => path,
            };
            let roots = delete_at(diagram.roots(), &path)?;
            (roots, Change::Deleted { path })
        }
        Op::UpdateEffect { patch } => {
            let mut effect = diagram.effect().clone();
            if let Some(label) = &patch.label {
                effect.set_label(label.clone());
            }
            if let Some(info) = &patch.info {
                effect.set_info(non_empty(info));
            }
            if let Some(meta) = &patch.meta {
                effect.set_meta(non_empty(meta));
            }
            require_text("effectLabel", effect.label(), EFFECT_LABEL_MAX)?;
            limit_optional("effectInfo", effect.info(), EFFECT_INFO_MAX)?;
            limit_optional("effectMeta", effect.meta(), EFFECT_META_MAX)?;

            *diagram.effect_mut() = effect;
            diagram.touch(now);
            return Ok(Change::EffectUpdated);
        }
    };

    diagram.replace_roots(roots);
    diagram.touch(now);
    Ok(change)
}

#[cfg(test)]
mod tests;
