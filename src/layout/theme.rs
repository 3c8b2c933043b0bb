// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::model::BoneStatus;

/// An opaque 24-bit RGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Self = Self::rgb(0xffffff);

    pub const fn rgb(rgb: u32) -> Self {
        Self(rgb & 0xff_ffff)
    }

    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.channels();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeError::Unknown {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    Unknown { value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { value } => write!(f, "unknown theme {value:?} (expected light or dark)"),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Stroke and text colors for one bone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub stroke: Color,
    pub text: Color,
}

/// Theme-dependent colors. Depth tables are indexed by bone depth (0 = root), clamped to the
/// deepest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub spine: Color,
    by_depth: [Ink; 3],
    resolved_text: Color,
    issue_text: Color,
    pending_text: Color,
}

pub const SELECTED: Color = Color::rgb(0x2563eb);
pub const LABEL_BOX_FILL: Color = Color::rgb(0xf8fafc);
pub const LABEL_BOX_FILL_SELECTED: Color = Color::rgb(0xdbeafe);
pub const LABEL_BOX_STROKE: Color = Color::rgb(0x374151);

pub const EFFECT_STROKE: Color = Color::rgb(0xd97706);
pub const EFFECT_FILL_CENTER: Color = Color::rgb(0xfef3c7);
pub const EFFECT_FILL_EDGE: Color = Color::rgb(0xf59e0b);
pub const EFFECT_TEXT: Color = Color::rgb(0x92400e);

pub const INDICATOR_RING: Color = Color::rgb(0xe5e7eb);
pub const INDICATOR_EXPANDED: Color = Color::rgb(0xef4444);
pub const INDICATOR_COLLAPSED_ROOT: Color = Color::rgb(0x3b82f6);
pub const INDICATOR_COLLAPSED_SUB: Color = Color::rgb(0x10b981);

const RESOLVED: Color = Color::rgb(0x059669);
const ISSUE: Color = Color::rgb(0xdc2626);
const PENDING: Color = Color::rgb(0xd97706);

static LIGHT: Palette = Palette {
    background: Color::rgb(0xffffff),
    spine: Color::rgb(0x1e40af),
    by_depth: [
        Ink { stroke: Color::rgb(0x1f2937), text: Color::rgb(0x1f2937) },
        Ink { stroke: Color::rgb(0x4b5563), text: Color::rgb(0x374151) },
        Ink { stroke: Color::rgb(0x6b7280), text: Color::rgb(0x4b5563) },
    ],
    resolved_text: Color::rgb(0x065f46),
    issue_text: Color::rgb(0x991b1b),
    pending_text: Color::rgb(0x92400e),
};

static DARK: Palette = Palette {
    background: Color::rgb(0x111827),
    spine: Color::rgb(0xe5e7eb),
    by_depth: [
        Ink { stroke: Color::rgb(0xe5e7eb), text: Color::rgb(0xf9fafb) },
        Ink { stroke: Color::rgb(0xd1d5db), text: Color::rgb(0xe5e7eb) },
        Ink { stroke: Color::rgb(0x9ca3af), text: Color::rgb(0xd1d5db) },
    ],
    resolved_text: Color::rgb(0x10b981),
    issue_text: Color::rgb(0xef4444),
    pending_text: Color::rgb(0xf59e0b),
};

impl Palette {
    /// Colors for a bone at `depth`: status overrides the depth default, selection overrides both.
    pub fn bone_ink(&self, depth: usize, status: Option<BoneStatus>, selected: bool) -> Ink {
        if selected {
            return Ink { stroke: SELECTED, text: SELECTED };
        }
        match status {
            Some(BoneStatus::Resolved) => Ink { stroke: RESOLVED, text: self.resolved_text },
            Some(BoneStatus::Issue) => Ink { stroke: ISSUE, text: self.issue_text },
            Some(BoneStatus::Pending) => Ink { stroke: PENDING, text: self.pending_text },
            None => self.by_depth[depth.min(self.by_depth.len() - 1)],
        }
    }
}
