// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram owns an effect and a strict tree of bones; bones are addressed by position.

pub mod bone;
pub mod diagram;
pub mod fixtures;
pub mod ids;
pub mod path;
pub mod validate;

pub use bone::{Bone, BoneStatus, Bones, ParseBoneStatusError};
pub use diagram::{now_millis, Diagram, Effect};
pub use ids::{DiagramId, Id, IdError, UserId};
pub use path::{
    decode_path, encode_path, remap_after_delete, BonePath, NodePath, PathError, EFFECT_TOKEN,
};
pub use validate::ContentError;
