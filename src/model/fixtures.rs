// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::bone::{Bone, BoneStatus, Bones};
use super::diagram::{Diagram, Effect};
use super::ids::{DiagramId, UserId};

/// Id of the diagram returned by [`demo_diagram`].
pub const DEMO_DIAGRAM_ID: &str = "demo-late-deliveries";

/// Owner of the demo diagram.
pub const DEMO_USER_ID: &str = "demo";

/// A populated diagram exercising every layout level: roots with few and many causes,
/// sub-causes with nested detail, and all three statuses.
pub fn demo_diagram(now: u64) -> Diagram {
    let roots = Bones::from([
        Bone::new("People").with_children([
            Bone::new("No training").with_status(BoneStatus::Issue).with_children([
                Bone::new("Onboarding skipped"),
                Bone::new("No refresher course"),
            ]),
            Bone::new("Understaffed night shift"),
            Bone::new("High turnover").with_status(BoneStatus::Pending),
        ]),
        Bone::new("Process").with_children([
            Bone::new("Manual order entry").with_children([
                Bone::new("Typos in addresses"),
                Bone::new("Duplicate orders"),
                Bone::new("Missing SKUs"),
                Bone::new("Wrong quantities"),
            ]),
            Bone::new("No picking priority"),
            Bone::new("Batching once per day"),
            Bone::new("Approval bottleneck").with_status(BoneStatus::Resolved),
            Bone::new("Unclear handoff"),
            Bone::new("Returns mixed with outbound"),
        ]),
        Bone::new("Technology").with_children([
            Bone::new("WMS outages").with_info("Two outages per week on average"),
            Bone::new("Label printer jams"),
        ]),
        Bone::new("Environment").with_children([Bone::new("Peak season weather")]),
        Bone::new("Materials")
            .with_metadata("supplier:acme")
            .with_children([Bone::new("Packaging shortage").with_status(BoneStatus::Issue)]),
    ]);

    let mut effect = Effect::new("Orders ship late");
    effect.set_info(Some("Share of orders leaving the warehouse after their promised date".to_owned()));

    Diagram::new(
        DiagramId::new(DEMO_DIAGRAM_ID).expect("demo diagram id is valid"),
        "Late deliveries",
        "Demo User",
        UserId::new(DEMO_USER_ID).expect("demo user id is valid"),
        effect,
        now,
    )
    .with_roots(roots)
}

#[cfg(test)]
pub(crate) fn diagram_with_roots(roots: impl Into<Bones>) -> Diagram {
    Diagram::new(
        DiagramId::new("d1").expect("diagram id"),
        "Test",
        "tester@example.com",
        UserId::new("u1").expect("user id"),
        Effect::new("Effect"),
        1_000,
    )
    .with_roots(roots)
}
