// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{encode_path, Bone, Bones, Diagram, EFFECT_TOKEN};

use super::text::truncate_with_ellipsis;
use super::{
    RenderOptions, UNICODE_BOX_BOTTOM_LEFT, UNICODE_BOX_HORIZONTAL, UNICODE_BOX_TEE_RIGHT,
    UNICODE_BOX_VERTICAL,
};

/// Indented tree of every bone with its path, e.g. `├─ bone-0-1  Understaffed [issue]`.
pub fn render_outline_unicode(diagram: &Diagram) -> String {
    render_outline_unicode_with_options(diagram, RenderOptions::default())
}

pub fn render_outline_unicode_with_options(diagram: &Diagram, options: RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(EFFECT_TOKEN);
    out.push_str("  ");
    out.push_str(&label(diagram.effect().label(), options));
    if options.show_info {
        if let Some(info) = diagram.effect().info() {
            push_info(&mut out, info, options);
        }
    }
    out.push('\n');

    let mut indices = Vec::new();
    let mut prefix = String::new();
    write_level(&mut out, diagram.roots(), &mut indices, &mut prefix, options);
    out
}

fn label(text: &str, options: RenderOptions) -> String {
    match options.max_label_len {
        Some(max) => truncate_with_ellipsis(text, max).into_owned(),
        None => text.to_owned(),
    }
}

fn push_info(out: &mut String, info: &str, options: RenderOptions) {
    out.push_str("  (");
    out.push_str(&label(info, options));
    out.push(')');
}

fn write_level(
    out: &mut String,
    bones: &Bones,
    indices: &mut Vec<usize>,
    prefix: &mut String,
    options: RenderOptions,
) {
    let len = bones.len();
    for (index, bone) in bones.iter().enumerate() {
        let last = index + 1 == len;
        indices.push(index);

        out.push_str(prefix);
        out.push(if last { UNICODE_BOX_BOTTOM_LEFT } else { UNICODE_BOX_TEE_RIGHT });
        out.push(UNICODE_BOX_HORIZONTAL);
        out.push(' ');
        write_bone(out, bone, &encode_path(indices), options);

        let restore = prefix.len();
        prefix.push(if last { ' ' } else { UNICODE_BOX_VERTICAL });
        prefix.push_str("  ");
        write_level(out, bone.children(), indices, prefix, options);
        prefix.truncate(restore);

        indices.pop();
    }
}

fn write_bone(out: &mut String, bone: &Bone, path: &str, options: RenderOptions) {
    out.push_str(path);
    out.push_str("  ");
    out.push_str(&label(bone.label(), options));
    if let Some(status) = bone.status() {
        out.push_str(" [");
        out.push_str(status.as_str());
        out.push(']');
    }
    if options.show_info {
        if let Some(info) = bone.info() {
            push_info(out, info, options);
        }
    }
    out.push('\n');
}
