// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if text_len(text) <= max_len {
        return Cow::Borrowed(text);
    }

    if max_len == 1 {
        return Cow::Borrowed("…");
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    Cow::Owned(out)
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Escapes text for use in XML character data and attribute values.
pub(crate) fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        let mut buf = itoa::Buffer::new();
        return buf.format(rounded as i64).to_owned();
    }
    rounded.to_string()
}
