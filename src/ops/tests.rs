// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rstest::{fixture, rstest};

use crate::model::fixtures::{demo_diagram, diagram_with_roots};
use crate::model::validate::BONE_DEPTH_MAX;
use crate::model::{Bone, BonePath, BoneStatus, Bones, ContentError, NodePath, PathError};

use super::{
    apply_op, delete, delete_at, insert_child, locate, locate_at, update, update_at, ApplyError,
    BonePatch, Change, EffectPatch, Op, TreeError,
};

#[fixture]
fn roots() -> Bones {
    demo_diagram(0).roots().clone()
}

fn all_paths(roots: &Bones) -> Vec<BonePath> {
    fn walk(bones: &Bones, prefix: Option<&BonePath>, out: &mut Vec<BonePath>) {
        for (index, bone) in bones.iter().enumerate() {
            let path = match prefix {
                Some(parent) => parent.child(index),
                None => BonePath::root(index),
            };
            walk(bone.children(), Some(&path), out);
            out.push(path);
        }
    }

    let mut out = Vec::new();
    walk(roots, None, &mut out);
    out
}

/// Asserts that every node outside the route to `path` is the same allocation in both trees.
fn assert_shares_off_path(before: &Bones, after: &Bones, path: &BonePath) {
    let mut before = before;
    let mut after = after;
    for (level, &index) in path.indices().iter().enumerate() {
        for sibling in 0..before.len().min(after.len()) {
            if sibling == index {
                continue;
            }
            if level + 1 == path.depth() && sibling > index {
                // Siblings after a deleted node shift left and are compared below.
                continue;
            }
            assert!(
                Arc::ptr_eq(&before[sibling], &after[sibling]),
                "sibling {sibling} at level {level} was copied"
            );
        }
        if level + 1 == path.depth() || index >= after.len() {
            break;
        }
        before = before[index].children();
        after = after[index].children();
    }
}

#[rstest]
fn locate_follows_indices(roots: Bones) {
    assert_eq!(locate(&roots, "bone-0").expect("root").label(), "People");
    assert_eq!(
        locate(&roots, "bone-1-0-3").expect("nested").label(),
        "Wrong quantities"
    );
    assert_eq!(
        locate(&roots, "bone-0-x-1").expect("malformed segment skipped").label(),
        "Understaffed night shift"
    );
}

#[rstest]
#[case("bone-9", TreeError::OutOfRange { level: 0, index: 9, len: 5 })]
#[case("bone-0-3", TreeError::OutOfRange { level: 1, index: 3, len: 3 })]
#[case("bone-0-1-0", TreeError::NoChildren { level: 1, index: 1 })]
#[case("bone", TreeError::InvalidPath(PathError::NoIndices))]
#[case("node-1", TreeError::InvalidPath(PathError::MissingPrefix))]
#[case("effect", TreeError::EffectIsNotABone)]
fn locate_reports_addressing_failures(
    roots: Bones,
    #[case] path: &str,
    #[case] expected: TreeError,
) {
    assert_eq!(locate(&roots, path), Err(expected));
}

#[test]
fn not_found_covers_addressing_but_not_structural_errors() {
    assert!(TreeError::OutOfRange { level: 0, index: 1, len: 0 }.is_not_found());
    assert!(TreeError::NoChildren { level: 0, index: 0 }.is_not_found());
    assert!(TreeError::InvalidPath(PathError::Empty).is_not_found());
    assert!(!TreeError::EffectDeletion.is_not_found());
    assert!(!TreeError::EffectIsNotABone.is_not_found());
}

#[rstest]
fn update_then_locate_returns_the_new_bone_everywhere(roots: Bones) {
    for path in all_paths(&roots) {
        let replacement = Bone::new("Replacement").with_status(BoneStatus::Resolved);
        let next = update_at(&roots, &path, replacement.clone()).expect("update");

        assert_eq!(locate_at(&next, &path), Ok(&replacement), "path {path}");
        let replaced = locate_at(&roots, &path).expect("old").subtree_len();
        assert_eq!(next.tree_len(), roots.tree_len() - replaced + 1);
        assert_shares_off_path(&roots, &next, &path);
    }
}

#[rstest]
fn update_does_not_touch_the_input(roots: Bones) {
    let snapshot = roots.clone();
    let next = update(&roots, "bone-1-0", Bone::new("Changed")).expect("update");

    assert_eq!(roots, snapshot);
    assert!(Bones::ptr_eq(&roots, &snapshot));
    assert_eq!(locate(&roots, "bone-1-0").expect("old").label(), "Manual order entry");
    assert_eq!(locate(&next, "bone-1-0").expect("new").label(), "Changed");
    assert!(locate(&next, "bone-1-0").expect("new").children().is_empty());
}

#[rstest]
fn update_shares_subtrees_below_other_branches(roots: Bones) {
    let next = update(&roots, "bone-1-0-2", Bone::new("Missing barcodes")).expect("update");

    for root in [0, 2, 3, 4] {
        assert!(Arc::ptr_eq(&roots[root], &next[root]));
    }
    assert!(!Arc::ptr_eq(&roots[1], &next[1]));
    for sibling in 1..6 {
        assert!(Arc::ptr_eq(&roots[1].children()[sibling], &next[1].children()[sibling]));
    }
    let before = roots[1].children()[0].children();
    let after = next[1].children()[0].children();
    for sibling in [0, 1, 3] {
        assert!(Arc::ptr_eq(&before[sibling], &after[sibling]));
    }
}

#[rstest]
fn delete_removes_exactly_the_subtree(roots: Bones) {
    for path in all_paths(&roots) {
        let removed = locate_at(&roots, &path).expect("existing").subtree_len();
        let next = delete_at(&roots, &path).expect("delete");

        assert_eq!(next.tree_len(), roots.tree_len() - removed, "path {path}");
        assert_shares_off_path(&roots, &next, &path);

        // The path now names the former next sibling, or nothing.
        let mut following = path.indices().to_vec();
        let last = following.len() - 1;
        following[last] += 1;
        let following = BonePath::new(following).expect("non-empty");
        match locate_at(&roots, &following) {
            Ok(sibling) => assert_eq!(locate_at(&next, &path), Ok(sibling)),
            Err(_) => assert!(locate_at(&next, &path).expect_err("gone").is_not_found()),
        }
    }
}

#[rstest]
fn deleting_the_last_sibling_makes_its_descendants_unreachable(roots: Bones) {
    // "Manual order entry" is the first child; move it to the end so deletion leaves no successor.
    let process = locate(&roots, "bone-1").expect("process").clone();
    let mut reordered = process.children().iter().cloned().collect::<Vec<_>>();
    reordered.rotate_left(1);
    let roots = update(&roots, "bone-1", process.with_children(reordered)).expect("reorder");
    assert_eq!(locate(&roots, "bone-1-5").expect("moved").children().len(), 4);

    let next = delete(&roots, "bone-1-5").expect("delete");
    for path in ["bone-1-5", "bone-1-5-0", "bone-1-5-3"] {
        assert!(locate(&next, path).expect_err(path).is_not_found());
    }
    assert_eq!(locate(&next, "bone-1").expect("parent").children().len(), 5);
}

#[rstest]
fn delete_rejects_effect_and_leaves_tree_alone(roots: Bones) {
    let snapshot = roots.clone();
    assert_eq!(delete(&roots, "effect"), Err(TreeError::EffectDeletion));
    assert!(Bones::ptr_eq(&roots, &snapshot));
}

#[rstest]
fn insert_under_effect_appends_a_root(roots: Bones) {
    let child = Bone::new("Measurement").with_children([Bone::new("Scale drift")]);
    let next = insert_child(&roots, "effect", child.clone()).expect("insert");

    assert_eq!(next.len(), roots.len() + 1);
    assert_eq!(&*next[roots.len()], &child);
    for (index, root) in roots.iter().enumerate() {
        assert!(std::ptr::eq(root, &*next[index]));
    }
}

#[rstest]
fn insert_under_bone_appends_to_its_children(roots: Bones) {
    let next = insert_child(&roots, "bone-2-1", Bone::new("Ribbon runs out")).expect("insert");

    let parent = locate(&next, "bone-2-1").expect("parent");
    assert_eq!(parent.label(), "Label printer jams");
    assert_eq!(parent.children().len(), 1);
    assert_eq!(locate(&next, "bone-2-1-0").expect("child").label(), "Ribbon runs out");
    assert!(Arc::ptr_eq(&roots[2].children()[0], &next[2].children()[0]));
    assert!(roots[2].children()[1].children().is_empty());
}

#[rstest]
fn insert_into_missing_parent_fails(roots: Bones) {
    assert_eq!(
        insert_child(&roots, "bone-7", Bone::new("Orphan")),
        Err(TreeError::OutOfRange { level: 0, index: 7, len: 5 })
    );
}

#[test]
fn insert_then_delete_child_round_trip() {
    let roots = Bones::from([Bone::new("People")]);

    let inserted = insert_child(&roots, "bone-0", Bone::new("No training")).expect("insert");
    let children = inserted[0].children().iter().collect::<Vec<_>>();
    assert_eq!(children, vec![&Bone::new("No training")]);

    let deleted = delete(&inserted, "bone-0-0").expect("delete");
    assert!(deleted[0].children().is_empty());
    assert_eq!(deleted[0].label(), "People");
}

#[test]
fn locate_beyond_roots_is_not_found_and_effect_delete_is_rejected() {
    let roots = Bones::from([Bone::new("People"), Bone::new("Process")]);

    let err = locate(&roots, "bone-5").expect_err("not found");
    assert!(err.is_not_found());

    let before = roots.clone();
    assert_eq!(delete(&roots, "effect"), Err(TreeError::EffectDeletion));
    assert_eq!(roots, before);
}

#[test]
fn apply_insert_reports_new_path_and_touches_diagram() {
    let mut diagram = diagram_with_roots([Bone::new("People")]);

    let change = apply_op(
        &mut diagram,
        &Op::InsertBone {
            parent: "effect".to_owned(),
            bone: Bone::new("Process"),
        },
        2_000,
    )
    .expect("insert root");
    assert_eq!(change, Change::Inserted { path: BonePath::root(1) });
    assert!(!change.renumbers());

    let change = apply_op(
        &mut diagram,
        &Op::InsertBone {
            parent: "bone-1".to_owned(),
            bone: Bone::new("No checklist"),
        },
        3_000,
    )
    .expect("insert child");
    assert_eq!(change, Change::Inserted { path: BonePath::root(1).child(0) });
    assert_eq!(diagram.updated_at(), 3_000);
    assert_eq!(diagram.created_at(), 1_000);
    assert_eq!(diagram.bone_count(), 3);
}

#[test]
fn apply_rejects_invalid_content_without_mutation() {
    let mut diagram = diagram_with_roots([Bone::new("People")]);
    let before = diagram.clone();

    let err = apply_op(
        &mut diagram,
        &Op::InsertBone {
            parent: "effect".to_owned(),
            bone: Bone::new("Process").with_children([Bone::new("  ")]),
        },
        2_000,
    )
    .expect_err("nested empty label");
    assert_eq!(err, ApplyError::Content(ContentError::Empty { field: "label" }));

    let err = apply_op(
        &mut diagram,
        &Op::PatchBone {
            path: "bone-0".to_owned(),
            patch: BonePatch {
                info: Some("i".repeat(501)),
                ..BonePatch::default()
            },
        },
        2_000,
    )
    .expect_err("info too long");
    assert!(matches!(err, ApplyError::Content(ContentError::TooLong { field: "info", .. })));

    let err = apply_op(
        &mut diagram,
        &Op::UpdateEffect {
            patch: EffectPatch {
                label: Some(String::new()),
                ..EffectPatch::default()
            },
        },
        2_000,
    )
    .expect_err("empty effect label");
    assert_eq!(err, ApplyError::Content(ContentError::Empty { field: "effectLabel" }));

    assert_eq!(diagram, before);
}

#[test]
fn apply_rejects_addressing_failures_without_mutation() {
    let mut diagram = diagram_with_roots([Bone::new("People")]);
    let before = diagram.clone();

    for op in [
        Op::DeleteBone { path: "effect".to_owned() },
        Op::DeleteBone { path: "bone-3".to_owned() },
        Op::UpdateBone { path: "effect".to_owned(), bone: Bone::new("Effect") },
        Op::PatchBone { path: "garbage".to_owned(), patch: BonePatch::default() },
        Op::InsertBone { parent: "bone-0-0".to_owned(), bone: Bone::new("Deep") },
    ] {
        let err = apply_op(&mut diagram, &op, 2_000).expect_err("rejected");
        assert!(matches!(err, ApplyError::Tree(_)), "{op:?}");
    }
    assert_eq!(diagram, before);
}

#[test]
fn patch_keeps_children_and_clears_empty_fields() {
    let mut diagram = diagram_with_roots([Bone::new("People")
        .with_info("Staffing")
        .with_metadata("hr")
        .with_status(BoneStatus::Issue)
        .with_children([Bone::new("No training")])]);
    let children = diagram.roots()[0].children().clone();

    let change = apply_op(
        &mut diagram,
        &Op::PatchBone {
            path: "bone-0".to_owned(),
            patch: BonePatch {
                label: Some("Staff".to_owned()),
                info: Some(String::new()),
                metadata: None,
                status: Some(None),
            },
        },
        2_000,
    )
    .expect("patch");
    assert_eq!(change, Change::Updated { path: BonePath::root(0), children_replaced: false });

    let bone = &diagram.roots()[0];
    assert_eq!(bone.label(), "Staff");
    assert_eq!(bone.info(), None);
    assert_eq!(bone.metadata(), Some("hr"));
    assert_eq!(bone.status(), None);
    assert!(Bones::ptr_eq(bone.children(), &children));
}

#[test]
fn wholesale_update_reports_replaced_children() {
    let mut diagram =
        diagram_with_roots([Bone::new("People").with_children([Bone::new("No training")])]);

    let keep = diagram.roots()[0].children().clone();
    let change = apply_op(
        &mut diagram,
        &Op::UpdateBone {
            path: "bone-0".to_owned(),
            bone: Bone::new("Staff").with_children(keep),
        },
        2_000,
    )
    .expect("same children");
    assert_eq!(change, Change::Updated { path: BonePath::root(0), children_replaced: false });

    let change = apply_op(
        &mut diagram,
        &Op::UpdateBone { path: "bone-0".to_owned(), bone: Bone::new("Staff") },
        3_000,
    )
    .expect("children dropped");
    assert_eq!(change, Change::Updated { path: BonePath::root(0), children_replaced: true });
    assert!(change.renumbers());
}

#[test]
fn apply_delete_and_effect_update() {
    let mut diagram = diagram_with_roots([Bone::new("People"), Bone::new("Process")]);

    let change = apply_op(&mut diagram, &Op::DeleteBone { path: "bone-0".to_owned() }, 2_000)
        .expect("delete");
    assert_eq!(change, Change::Deleted { path: BonePath::root(0) });
    assert_eq!(diagram.roots()[0].label(), "Process");

    let change = apply_op(
        &mut diagram,
        &Op::UpdateEffect {
            patch: EffectPatch {
                label: Some("Orders ship late".to_owned()),
                info: None,
                meta: Some("q3".to_owned()),
            },
        },
        3_000,
    )
    .expect("effect");
    assert_eq!(change, Change::EffectUpdated);
    assert_eq!(diagram.effect().label(), "Orders ship late");
    assert_eq!(diagram.effect().meta(), Some("q3"));
    assert_eq!(diagram.updated_at(), 3_000);
}

#[test]
fn node_path_round_trips_through_typed_insert() {
    let roots = Bones::new();
    let next = super::insert_child_at(&roots, &NodePath::Effect, Bone::new("People"))
        .expect("insert");
    assert_eq!(next.len(), 1);
    assert!(roots.is_empty());
}

fn deepest_path(depth: usize) -> String {
    let mut path = "bone".to_owned();
    for _ in 0..depth {
        path.push_str("-0");
    }
    path
}

#[test]
fn apply_bounds_nesting_depth_without_mutation() {
    let mut diagram = diagram_with_roots(Bones::new());
    apply_op(
        &mut diagram,
        &Op::InsertBone { parent: "effect".to_owned(), bone: Bone::new("level 1") },
        2_000,
    )
    .expect("root");
    for depth in 1..BONE_DEPTH_MAX {
        apply_op(
            &mut diagram,
            &Op::InsertBone {
                parent: deepest_path(depth),
                bone: Bone::new(format!("level {}", depth + 1)),
            },
            2_000,
        )
        .expect("within bound");
    }
    assert!(locate(diagram.roots(), &deepest_path(BONE_DEPTH_MAX)).is_ok());
    let before = diagram.clone();

    let too_deep = ContentError::TooDeep { max: BONE_DEPTH_MAX, depth: BONE_DEPTH_MAX + 1 };
    let err = apply_op(
        &mut diagram,
        &Op::InsertBone { parent: deepest_path(BONE_DEPTH_MAX), bone: Bone::new("one more") },
        3_000,
    )
    .expect_err("past the bound");
    assert_eq!(err, ApplyError::Content(too_deep.clone()));

    let err = apply_op(
        &mut diagram,
        &Op::UpdateBone {
            path: deepest_path(BONE_DEPTH_MAX - 1),
            bone: Bone::new("grafted")
                .with_children([Bone::new("child").with_children([Bone::new("grandchild")])]),
        },
        3_000,
    )
    .expect_err("grafted subtree past the bound");
    assert_eq!(err, ApplyError::Content(too_deep));

    assert_eq!(diagram, before);
}
