// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

/// Review status of a cause; absence means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoneStatus {
    Resolved,
    Issue,
    Pending,
}

impl BoneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Issue => "issue",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for BoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoneStatus {
    type Err = ParseBoneStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resolved" => Ok(Self::Resolved),
            "issue" => Ok(Self::Issue),
            "pending" => Ok(Self::Pending),
            other => Err(ParseBoneStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBoneStatusError {
    value: String,
}

impl fmt::Display for ParseBoneStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown bone status {:?} (expected resolved, issue or pending)",
            self.value
        )
    }
}

impl std::error::Error for ParseBoneStatusError {}

/// A node in the cause tree.
///
/// A bone has no stored id: its identity is its position (see [`crate::model::path`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bone {
    label: String,
    info: Option<String>,
    metadata: Option<String>,
    status: Option<BoneStatus>,
    children: Bones,
}

impl Bone {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            info: None,
            metadata: None,
            status: None,
            children: Bones::default(),
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn with_status(mut self, status: BoneStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_children(mut self, children: impl Into<Bones>) -> Self {
        self.children = children.into();
        self
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

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn set_metadata(&mut self, metadata: Option<String>) {
        self.metadata = metadata;
    }

    pub fn status(&self) -> Option<BoneStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: Option<BoneStatus>) {
        self.status = status;
    }

    pub fn children(&self) -> &Bones {
        &self.children
    }

    pub fn set_children(&mut self, children: Bones) {
        self.children = children;
    }

    /// Number of bones in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.tree_len()
    }
}

/// An ordered, immutable sibling array.
///
/// Cloning is a reference-count bump. Edits produce a new array that shares every untouched
/// element (`Arc<Bone>`) with the original, which is what lets the tree mutator path-copy
/// instead of deep-copying, and lets callers detect unchanged subtrees with [`Bones::ptr_eq`].
#[derive(Clone, PartialEq, Eq)]
pub struct Bones(Arc<[Arc<Bone>]>);

impl Bones {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_shared(bones: Vec<Arc<Bone>>) -> Self {
        Self(Arc::from(bones))
    }

    /// Whether both arrays are the very same allocation (not merely equal).
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Bone> + ExactSizeIterator + '_ {
        self.0.iter().map(|bone| bone.as_ref())
    }

    /// Total number of bones in all subtrees of this array.
    pub fn tree_len(&self) -> usize {
        self.iter().map(Bone::subtree_len).sum()
    }

    /// Copy of this array with the element at `index` swapped for `bone`.
    ///
    /// Callers guarantee `index < self.len()`.
    pub(crate) fn with_replaced(&self, index: usize, bone: Arc<Bone>) -> Self {
        let mut next = self.0.to_vec();
        next[index] = bone;
        Self::from_shared(next)
    }

    pub(crate) fn with_pushed(&self, bone: Arc<Bone>) -> Self {
        let mut next = Vec::with_capacity(self.0.len() + 1);
        next.extend(self.0.iter().cloned());
        next.push(bone);
        Self::from_shared(next)
    }

    /// Callers guarantee `index < self.len()`.
    pub(crate) fn without(&self, index: usize) -> Self {
        let next = self
            .0
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != index)
            .map(|(_, bone)| bone.clone())
            .collect();
        Self::from_shared(next)
    }
}

impl Default for Bones {
    fn default() -> Self {
        Self::from_shared(Vec::new())
    }
}

impl Deref for Bones {
    type Target = [Arc<Bone>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Bones {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl From<Vec<Bone>> for Bones {
    fn from(bones: Vec<Bone>) -> Self {
        bones.into_iter().collect()
    }
}

impl<const N: usize> From<[Bone; N]> for Bones {
    fn from(bones: [Bone; N]) -> Self {
        bones.into_iter().collect()
    }
}

impl FromIterator<Bone> for Bones {
    fn from_iter<I: IntoIterator<Item = Bone>>(iter: I) -> Self {
        Self::from_shared(iter.into_iter().map(Arc::new).collect())
    }
}
