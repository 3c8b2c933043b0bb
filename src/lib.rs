// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fishbone: Ishikawa root-cause diagrams.
//!
//! The core is a path-addressed bone tree (`model`, `ops`), a deterministic layout engine that
//! turns it into drawing primitives (`layout`), and the view state tying both together
//! (`expansion`, `session`). Storage, ownership checks and the HTTP API sit around it.

pub mod auth;
pub mod catalog;
pub mod expansion;
pub mod http;
pub mod layout;
pub mod model;
pub mod ops;
pub mod render;
pub mod session;
pub mod store;
