// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caller identity and the ownership rule.
//!
//! Authentication happens upstream; this crate only receives the resulting principal.

use std::fmt;

use crate::model::{Diagram, DiagramId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    email: String,
    name: String,
}

impl Principal {
    pub fn new(user_id: UserId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            name: name.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owns(&self, diagram: &Diagram) -> bool {
        diagram.creator_id() == &self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    NotOwner {
        diagram_id: DiagramId,
        user_id: UserId,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwner { diagram_id, user_id } => {
                write!(f, "user {user_id} does not own diagram {diagram_id}")
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Passes iff `principal` created `diagram`.
pub fn ensure_owner(diagram: &Diagram, principal: &Principal) -> Result<(), AccessError> {
    if principal.owns(diagram) {
        return Ok(());
    }
    Err(AccessError::NotOwner {
        diagram_id: diagram.id().clone(),
        user_id: principal.user_id().clone(),
    })
}
