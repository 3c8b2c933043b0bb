// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistent-tree walking and path copying.
//!
//! Every edit rebuilds only the sibling arrays on the route from the root to the edit point;
//! all other arrays and nodes are shared with the input tree.

use std::sync::Arc;

use crate::model::{Bone, BonePath, Bones, PathError};

use super::TreeError;

fn child_at(siblings: &Bones, level: usize, index: usize) -> Result<&Arc<Bone>, TreeError> {
    siblings.get(index).ok_or(TreeError::OutOfRange {
        level,
        index,
        len: siblings.len(),
    })
}

pub(super) fn walk<'a>(roots: &'a Bones, path: &BonePath) -> Result<&'a Arc<Bone>, TreeError> {
    let Some((&target, ancestors)) = path.indices().split_last() else {
        return Err(TreeError::InvalidPath(PathError::NoIndices));
    };

    let mut siblings = roots;
    for (level, &index) in ancestors.iter().enumerate() {
        let node = child_at(siblings, level, index)?;
        if node.children().is_empty() {
            return Err(TreeError::NoChildren { level, index });
        }
        siblings = node.children();
    }

    child_at(siblings, ancestors.len(), target)
}

/// Rebuilds `siblings` so that `edit` is applied to the array holding the node addressed by
/// `indices`, copying each ancestor on the way back up.
///
/// `edit` receives that array and the node's index within it; the index is in bounds.
pub(super) fn path_copy<F>(
    siblings: &Bones,
    indices: &[usize],
    level: usize,
    edit: F,
) -> Result<Bones, TreeError>
where
    F: FnOnce(&Bones, usize) -> Bones,
{
    let Some((&index, rest)) = indices.split_first() else {
        return Err(TreeError::InvalidPath(PathError::NoIndices));
    };

    let node = child_at(siblings, level, index)?;
    if rest.is_empty() {
        return Ok(edit(siblings, index));
    }
    if node.children().is_empty() {
        return Err(TreeError::NoChildren { level, index });
    }

    let children = path_copy(node.children(), rest, level + 1, edit)?;
    let mut parent = Bone::clone(node);
    parent.set_children(children);
    Ok(siblings.with_replaced(index, Arc::new(parent)))
}

pub(super) fn replace_node(siblings: &Bones, index: usize, bone: Bone) -> Bones {
    siblings.with_replaced(index, Arc::new(bone))
}

pub(super) fn append_child(siblings: &Bones, index: usize, child: Bone) -> Bones {
    let mut target = Bone::clone(&siblings[index]);
    let children = target.children().with_pushed(Arc::new(child));
    target.set_children(children);
    siblings.with_replaced(index, Arc::new(target))
}

pub(super) fn remove_node(siblings: &Bones, index: usize) -> Bones {
    siblings.without(index)
}
