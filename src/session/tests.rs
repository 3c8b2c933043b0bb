// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;

use rstest::{fixture, rstest};

use super::{Clicked, DiagramSession, SessionError, COMMON_CATEGORIES};
use crate::auth::Principal;
use crate::layout::{Canvas, HitTarget, Primitive};
use crate::model::fixtures::{demo_diagram, DEMO_USER_ID};
use crate::model::{encode_path, Bone, BonePath, Diagram, DiagramId, NodePath, UserId};
use crate::ops::{ApplyError, BonePatch, Change, Op, TreeError};
use crate::store::{DiagramStore, MemoryStore, StoreError};

fn principal(id: &str) -> Principal {
    Principal::new(UserId::new(id).expect("user id"), format!("{id}@example.com"), id)
}

fn path(indices: &[usize]) -> BonePath {
    BonePath::new(indices.iter().copied()).expect("path")
}

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::with_diagrams([demo_diagram(1_000)])
}

#[fixture]
fn owner(store: MemoryStore) -> (MemoryStore, DiagramSession) {
    let id = DiagramId::new("demo-late-deliveries").expect("id");
    let session = DiagramSession::open(&store, &id, principal(DEMO_USER_ID)).expect("open");
    (store, session)
}

struct FailingStore;

impl DiagramStore for FailingStore {
    fn get(&self, _id: &DiagramId) -> Result<Option<Diagram>, StoreError> {
        Ok(None)
    }

    fn put(&mut self, _diagram: &Diagram) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("diagrams/demo.json"),
            source: io::Error::other("disk full"),
        })
    }

    fn delete(&mut self, _id: &DiagramId) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn list(&self) -> Result<Vec<Diagram>, StoreError> {
        Ok(Vec::new())
    }
}

#[rstest]
fn open_reports_missing_diagrams(store: MemoryStore) {
    let id = DiagramId::new("missing").expect("id");
    let err = DiagramSession::open(&store, &id, principal("u1")).expect_err("missing");
    assert!(matches!(err, SessionError::NotFound { .. }));
}

#[rstest]
fn owner_can_edit_and_others_can_only_view(store: MemoryStore) {
    let id = DiagramId::new("demo-late-deliveries").expect("id");
    let mut viewer = DiagramSession::open(&store, &id, principal("someone-else")).expect("open");
    assert!(!viewer.can_edit());

    let toggled = viewer.click(&HitTarget::expand_toggle("bone-1")).expect("toggle");
    assert_eq!(toggled, Clicked::Toggled { expanded: true });

    let err = viewer.click(&HitTarget::node("bone-0")).expect_err("not owner");
    assert!(matches!(err, SessionError::Access(_)));
    assert!(viewer.selected().is_none());

    let err = viewer.add_category("Methods").expect_err("not owner");
    assert!(matches!(err, SessionError::Access(_)));
    assert!(!viewer.is_dirty());
}

#[rstest]
fn clicking_a_node_selects_it(owner: (MemoryStore, DiagramSession)) {
    let (_, mut session) = owner;

    let clicked = session.click(&HitTarget::node("bone-0-0")).expect("click");
    assert!(matches!(clicked, Clicked::Bone(bone) if bone.label() == "No training"));
    assert_eq!(session.selected(), Some(&NodePath::Bone(path(&[0, 0]))));

    let clicked = session.click(&HitTarget::node("effect")).expect("click");
    assert!(matches!(clicked, Clicked::Effect(effect) if effect.label() == "Orders ship late"));
    assert_eq!(session.selected(), Some(&NodePath::Effect));
}

#[rstest]
fn clicking_a_stale_path_is_not_found_and_keeps_the_selection(
    owner: (MemoryStore, DiagramSession),
) {
    let (_, mut session) = owner;
    session.click(&HitTarget::node("bone-2")).expect("click");

    let err = session.click(&HitTarget::node("bone-9")).expect_err("stale");
    assert!(matches!(
        err,
        SessionError::Apply(ApplyError::Tree(ref tree)) if tree.is_not_found()
    ));
    assert_eq!(session.selected(), Some(&NodePath::Bone(path(&[2]))));
}

#[rstest]
fn clicks_on_layout_targets_round_trip(owner: (MemoryStore, DiagramSession)) {
    let (_, mut session) = owner;
    let layout = session.layout(Canvas::default());
    let target = layout
        .primitives()
        .iter()
        .find_map(|primitive| match primitive {
            Primitive::ExpandIndicator { target, .. } => Some(target.clone()),
            _ => None,
        })
        .expect("demo diagram has a truncated level");

    session.click(&target).expect("toggle");
    assert!(session.expansion().contains(&target.path));
    let expanded = session.layout(Canvas::default());
    assert!(expanded.primitives().len() > layout.primitives().len());
}

#[rstest]
fn apply_marks_dirty_and_save_writes_one_record(owner: (MemoryStore, DiagramSession)) {
    let (mut store, mut session) = owner;
    assert!(!session.is_dirty());

    let change = session.add_category(COMMON_CATEGORIES[5]).expect("add");
    assert_eq!(change, Change::Inserted { path: path(&[5]) });
    assert!(session.is_dirty());
    assert_eq!(session.diagram().roots()[5].label(), "Methods");

    session.save(&mut store).expect("save");
    assert!(!session.is_dirty());
    let stored = store.get(session.diagram().id()).expect("get").expect("present");
    assert_eq!(&stored, session.diagram());
}

#[rstest]
fn invalid_edits_leave_the_session_clean(owner: (MemoryStore, DiagramSession)) {
    let (_, mut session) = owner;
    let before = session.diagram().clone();

    let err = session
        .apply(Op::InsertBone {
            parent: "bone-0".to_owned(),
            bone: Bone::new("  "),
        })
        .expect_err("empty label");
    assert!(matches!(err, SessionError::Apply(ApplyError::Content(_))));

    let err = session
        .apply(Op::DeleteBone {
            path: "effect".to_owned(),
        })
        .expect_err("effect");
    assert!(matches!(
        err,
        SessionError::Apply(ApplyError::Tree(TreeError::EffectDeletion))
    ));

    assert_eq!(session.diagram(), &before);
    assert!(!session.is_dirty());
}

#[rstest]
fn failed_save_keeps_edits_and_stays_dirty(owner: (MemoryStore, DiagramSession)) {
    let (mut store, mut session) = owner;
    session
        .apply_with_clock(
            Op::PatchBone {
                path: "bone-0".to_owned(),
                patch: BonePatch {
                    label: Some("Staff".to_owned()),
                    ..BonePatch::default()
                },
            },
            5_000,
        )
        .expect("patch");

    let err = session.save(&mut FailingStore).expect_err("disk full");
    assert!(matches!(err, SessionError::Store(_)));
    assert!(session.is_dirty());
    assert_eq!(session.diagram().roots()[0].label(), "Staff");
    assert_eq!(session.diagram().updated_at(), 5_000);

    session.save(&mut store).expect("retry");
    assert!(!session.is_dirty());
}

#[rstest]
fn delete_renumbers_selection_and_expansion(owner: (MemoryStore, DiagramSession)) {
    let (_, mut session) = owner;
    session.click(&HitTarget::expand_toggle("bone-1")).expect("toggle");
    session.click(&HitTarget::expand_toggle("bone-0-0")).expect("toggle");
    session.click(&HitTarget::node("bone-2-1")).expect("select");

    session
        .apply(Op::DeleteBone {
            path: "bone-0".to_owned(),
        })
        .expect("delete");

    assert_eq!(session.selected(), Some(&NodePath::Bone(path(&[1, 1]))));
    assert_eq!(session.expansion().iter().collect::<Vec<_>>(), vec!["bone-0"]);
    let selected = match session.selected() {
        Some(NodePath::Bone(selected)) => encode_path(selected.indices()),
        _ => String::new(),
    };
    let clicked = session.click(&HitTarget::node(selected)).expect("still valid");
    assert!(matches!(clicked, Clicked::Bone(bone) if bone.label() == "Label printer jams"));
}

#[rstest]
fn deleting_the_selected_node_clears_the_selection(owner: (MemoryStore, DiagramSession)) {
    let (_, mut session) = owner;
    session.click(&HitTarget::node("bone-1-0")).expect("select");

    session
        .apply(Op::DeleteBone {
            path: "bone-1".to_owned(),
        })
        .expect("delete");
    assert!(session.selected().is_none());
}

#[rstest]
#[case::stale("bone-9")]
#[case::below_a_leaf("bone-0-0-0-0")]
#[case::garbage("garbage")]
#[case::effect("effect")]
fn toggling_a_missing_node_is_not_found(store: MemoryStore, #[case] raw: &str) {
    let id = DiagramId::new("demo-late-deliveries").expect("id");
    let mut viewer = DiagramSession::open(&store, &id, principal("someone-else")).expect("open");

    let err = viewer.click(&HitTarget::expand_toggle(raw)).expect_err("missing");
    assert!(matches!(
        err,
        SessionError::Apply(ApplyError::Tree(ref tree)) if tree.is_not_found()
    ));
    assert!(viewer.expansion().is_empty());
}
