// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic benchmark diagrams (no RNG).

use fishbone::model::fixtures::demo_diagram;
use fishbone::model::{Bone, BoneStatus, Bones, Diagram, DiagramId, Effect, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Demo,
    Wide,
    Deep,
    LongLabels,
}

impl Case {
    pub const ALL: [Case; 4] = [Case::Demo, Case::Wide, Case::Deep, Case::LongLabels];

    pub fn id(self) -> &'static str {
        match self {
            Case::Demo => "demo",
            Case::Wide => "wide",
            Case::Deep => "deep",
            Case::LongLabels => "long_labels",
        }
    }
}

fn status(idx: usize) -> Option<BoneStatus> {
    match idx % 4 {
        0 => Some(BoneStatus::Issue),
        1 => Some(BoneStatus::Resolved),
        _ => None,
    }
}

fn label(prefix: &str, idx: usize, long: bool) -> String {
    if long {
        format!("{prefix} {idx:03} with a deliberately verbose description of the suspected cause")
    } else {
        format!("{prefix} {idx:03}")
    }
}

/// `breadth` bones per level, `depth` levels deep.
fn grid(breadth: usize, depth: usize, long: bool, prefix: &str) -> Bones {
    (0..breadth)
        .map(|idx| {
            let mut bone = Bone::new(label(prefix, idx, long));
            bone.set_status(status(idx));
            if depth > 1 {
                bone = bone.with_children(grid(breadth, depth - 1, long, &format!("{prefix}.{idx}")));
            }
            bone
        })
        .collect()
}

fn synthetic(name: &str, roots: Bones) -> Diagram {
    Diagram::new(
        DiagramId::new(format!("bench-{name}")).expect("diagram id"),
        name,
        "Bench",
        UserId::new("bench").expect("user id"),
        Effect::new("Benchmark effect"),
        1,
    )
    .with_roots(roots)
}

pub fn fixture(case: Case) -> Diagram {
    match case {
        Case::Demo => demo_diagram(1),
        Case::Wide => synthetic(case.id(), grid(8, 3, false, "Cause")),
        Case::Deep => synthetic(case.id(), grid(3, 6, false, "Cause")),
        Case::LongLabels => synthetic(case.id(), grid(6, 3, true, "Cause")),
    }
}

/// Encoded paths of every bone, parents before children.
pub fn all_paths(roots: &Bones) -> Vec<String> {
    fn walk(bones: &Bones, prefix: &str, out: &mut Vec<String>) {
        for (idx, bone) in bones.iter().enumerate() {
            let path = format!("{prefix}-{idx}");
            out.push(path.clone());
            walk(bone.children(), &path, out);
        }
    }

    let mut out = Vec::new();
    walk(roots, "bone", &mut out);
    out
}
