// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Positional node addresses.
//!
//! A bone is named by the sibling indices leading to it from the diagram's root array,
//! encoded as `bone-i0-i1-…-ik`. The synthetic effect node is named by the reserved token
//! `effect`. Paths are recomputed from the live tree on every layout pass, so a path is only
//! meaningful for the tree snapshot it was produced from.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// Reserved token addressing the effect node.
pub const EFFECT_TOKEN: &str = "effect";

const BONE_PREFIX: &str = "bone";
const SEPARATOR: char = '-';

/// Non-empty sequence of zero-based sibling indices from the root array down to a bone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BonePath {
    indices: SmallVec<[usize; 4]>,
}

impl BonePath {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Result<Self, PathError> {
        let indices = indices.into_iter().collect::<SmallVec<[usize; 4]>>();
        if indices.is_empty() {
            return Err(PathError::NoIndices);
        }
        Ok(Self { indices })
    }

    /// Path of the `index`-th top-level bone.
    pub fn root(index: usize) -> Self {
        let mut indices = SmallVec::new();
        indices.push(index);
        Self { indices }
    }

    /// Decodes a bone path; the effect token is rejected.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        match decode_path(input)? {
            NodePath::Bone(path) => Ok(path),
            NodePath::Effect => Err(PathError::EffectToken),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of indices; top-level bones have depth 1.
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    pub fn last(&self) -> usize {
        // Non-empty by construction.
        self.indices[self.indices.len() - 1]
    }

    pub fn parent(&self) -> Option<Self> {
        if self.indices.len() <= 1 {
            return None;
        }
        let indices = self.indices[..self.indices.len() - 1].iter().copied().collect();
        Some(Self { indices })
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// True if `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.indices.len() > ancestor.indices.len()
            && self.indices[..ancestor.indices.len()] == ancestor.indices[..]
    }

    pub fn encode(&self) -> String {
        encode_path(&self.indices)
    }
}

impl fmt::Display for BonePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_encoded(f, &self.indices)
    }
}

impl FromStr for BonePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Address of any node a client can point at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    Effect,
    Bone(BonePath),
}

impl NodePath {
    pub fn is_effect(&self) -> bool {
        matches!(self, Self::Effect)
    }

    pub fn as_bone(&self) -> Option<&BonePath> {
        match self {
            Self::Effect => None,
            Self::Bone(path) => Some(path),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Effect => EFFECT_TOKEN.to_owned(),
            Self::Bone(path) => path.encode(),
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effect => f.write_str(EFFECT_TOKEN),
            Self::Bone(path) => fmt::Display::fmt(path, f),
        }
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_path(s)
    }
}

impl From<BonePath> for NodePath {
    fn from(path: BonePath) -> Self {
        Self::Bone(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    Empty,
    MissingPrefix,
    NoIndices,
    EffectToken,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("path must not be empty"),
            Self::MissingPrefix => write!(f, "path must be '{EFFECT_TOKEN}' or start with '{BONE_PREFIX}-'"),
            Self::NoIndices => f.write_str("path does not contain any sibling index"),
            Self::EffectToken => write!(f, "'{EFFECT_TOKEN}' does not address a bone"),
        }
    }
}

impl std::error::Error for PathError {}

/// Encodes sibling indices as `bone-i0-i1-…`.
///
/// An empty slice encodes to `bone`, which [`decode_path`] rejects.
pub fn encode_path(indices: &[usize]) -> String {
    let mut out = String::with_capacity(BONE_PREFIX.len() + indices.len() * 3);
    out.push_str(BONE_PREFIX);
    let mut buf = itoa::Buffer::new();
    for index in indices {
        out.push(SEPARATOR);
        out.push_str(buf.format(*index));
    }
    out
}

fn write_encoded(f: &mut fmt::Formatter<'_>, indices: &[usize]) -> fmt::Result {
    f.write_str(BONE_PREFIX)?;
    let mut buf = itoa::Buffer::new();
    for index in indices {
        write!(f, "{SEPARATOR}{}", buf.format(*index))?;
    }
    Ok(())
}

/// Decodes `effect` or `bone-i0-…`.
///
/// Segments after the prefix that are not non-negative integers are skipped, so
/// `bone-0-x-2` decodes to `[0, 2]`. A path left with no index at all is an addressing failure.
pub fn decode_path(input: &str) -> Result<NodePath, PathError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PathError::Empty);
    }
    if input == EFFECT_TOKEN {
        return Ok(NodePath::Effect);
    }

    let mut segments = input.split(SEPARATOR);
    if segments.next() != Some(BONE_PREFIX) {
        return Err(PathError::MissingPrefix);
    }

    let indices = segments
        .filter_map(|segment| segment.parse::<usize>().ok())
        .collect::<SmallVec<[usize; 4]>>();
    if indices.is_empty() {
        return Err(PathError::NoIndices);
    }

    Ok(NodePath::Bone(BonePath { indices }))
}

/// Where `path` points once the bone at `deleted` has been removed.
///
/// Returns `None` when `path` named the deleted bone or one of its descendants. Later siblings
/// of the deleted bone (and everything below them) move up by one index.
pub fn remap_after_delete(path: &BonePath, deleted: &BonePath) -> Option<BonePath> {
    if path == deleted || path.is_descendant_of(deleted) {
        return None;
    }

    let level = deleted.depth() - 1;
    let removed = deleted.last();
    let shares_parent = path.depth() > level && path.indices[..level] == deleted.indices[..level];
    if !shares_parent || path.indices[level] < removed {
        return Some(path.clone());
    }

    let mut indices = path.indices.clone();
    indices[level] -= 1;
    Some(BonePath { indices })
}
