// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for fishbone diagrams.
//!
//! This module turns a diagram into positioned, hit-testable drawing primitives under the
//! fixed spine/rib/sub-rib grammar.

pub mod fishbone;
pub mod theme;

pub use fishbone::{
    compute_layout, root_fraction, Canvas, FishboneLayout, HitTarget, LabelBox, Point, Primitive,
    TextAnchor, DETAIL_BUDGET, SUB_CAUSE_BUDGET,
};
pub use theme::{Color, Ink, Palette, Theme, ThemeError};
