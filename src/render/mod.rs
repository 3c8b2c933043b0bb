// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering for fishbone diagrams.
//!
//! `svg` turns a computed layout into a standalone document; `outline` prints the bone tree
//! with the path of every node, which is what the CLI shows and what edit requests address.

pub mod outline;
pub mod svg;
mod text;

pub use outline::{render_outline_unicode, render_outline_unicode_with_options};
pub use svg::render_svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Append each node's `info` text.
    pub show_info: bool,
    /// Truncate labels (and info) to this many characters.
    pub max_label_len: Option<usize>,
}

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '└';
pub const UNICODE_BOX_TEE_RIGHT: char = '├';
