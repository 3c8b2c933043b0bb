// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::f64::consts::FRAC_PI_4;

use serde::Serialize;

use crate::expansion::ExpansionState;
use crate::model::{encode_path, Bone, Diagram, EFFECT_TOKEN};

use super::theme::{
    self, Color, Palette, Theme, EFFECT_FILL_CENTER, EFFECT_FILL_EDGE, EFFECT_STROKE, EFFECT_TEXT,
    INDICATOR_COLLAPSED_ROOT, INDICATOR_COLLAPSED_SUB, INDICATOR_EXPANDED, INDICATOR_RING,
    LABEL_BOX_FILL, LABEL_BOX_FILL_SELECTED, LABEL_BOX_STROKE,
};

const SPINE_LEFT: f64 = 80.0;
const SPINE_RIGHT_INSET: f64 = 200.0;
const SPINE_STROKE: f64 = 10.0;

const EFFECT_OFFSET: f64 = 90.0;
const EFFECT_RADIUS: f64 = 55.0;
const EFFECT_STROKE_WIDTH: f64 = 4.0;
const EFFECT_FONT: f64 = 16.0;

const RIB_MIN: f64 = 160.0;
const RIB_MAX: f64 = 200.0;
const RIB_WIDTH_RATIO: f64 = 0.18;
const RIB_STROKE: f64 = 4.0;
const RIB_JOINT: f64 = 6.0;

const ROOT_FONT: f64 = 16.0;
const ROOT_LABEL_PADDING: f64 = 20.0;
const ROOT_LABEL_MIN_WIDTH: f64 = 140.0;
const GLYPH_WIDTH_RATIO: f64 = 0.7;

/// Children drawn per level when the parent is not expanded.
pub const SUB_CAUSE_BUDGET: usize = 4;
pub const DETAIL_BUDGET: usize = 3;

const SUB_RATIO_START: f64 = 0.2;
const SUB_RATIO_SPAN: f64 = 0.6;
const SUB_TICK: f64 = 70.0;
const SUB_STROKE: f64 = 3.0;
const SUB_LABEL_GAP: f64 = 10.0;
const SUB_FONT: f64 = 14.0;

const DETAIL_OFFSET_X: f64 = 20.0;
const DETAIL_SPACING: f64 = 25.0;
const DETAIL_STROKE: f64 = 2.0;
const DETAIL_OPACITY: f64 = 0.8;
const DETAIL_LABEL_OPACITY: f64 = 0.9;
const DETAIL_FONT: f64 = 11.0;

const ROOT_INDICATOR_DISTANCE: f64 = 30.0;
const ROOT_INDICATOR_RADIUS: f64 = 10.0;
const ROOT_INDICATOR_RING: f64 = 12.0;
const ROOT_INDICATOR_FONT: f64 = 11.0;
const SUB_INDICATOR_RADIUS: f64 = 10.0;
const SUB_INDICATOR_FONT: f64 = 9.0;
const SUB_INDICATOR_ROW: f64 = 12.0;
const SUB_INDICATOR_GAP: f64 = 15.0;

const EXPANDED_GLYPH: &str = "\u{2212}";

/// Target drawing surface in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1000.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn along(self, angle: f64, distance: f64) -> Self {
        Self::new(self.x + angle.cos() * distance, self.y + angle.sin() * distance)
    }

    fn lerp(self, to: Self, ratio: f64) -> Self {
        Self::new(self.x + (to.x - self.x) * ratio, self.y + (to.y - self.y) * ratio)
    }
}

/// Identifies the node a primitive stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitTarget {
    /// `effect` or an encoded bone path.
    pub path: String,
    /// Clicking toggles expansion of `path` instead of selecting it.
    pub is_expand_toggle: bool,
}

impl HitTarget {
    pub fn node(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_expand_toggle: false }
    }

    pub fn expand_toggle(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_expand_toggle: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Rounded rectangle drawn behind a root label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBox {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Primitive {
    Spine {
        from: Point,
        to: Point,
        color: Color,
        stroke_width: f64,
        arrow_head: bool,
    },
    EffectCircle {
        center: Point,
        radius: f64,
        stroke: Color,
        stroke_width: f64,
        fill_center: Color,
        fill_edge: Color,
        target: HitTarget,
    },
    Rib {
        from: Point,
        to: Point,
        color: Color,
        stroke_width: f64,
        joint_radius: f64,
        target: HitTarget,
    },
    SubRib {
        from: Point,
        to: Point,
        /// 1 for sub-causes, 2 for their details.
        depth: usize,
        color: Color,
        stroke_width: f64,
        opacity: f64,
        target: HitTarget,
    },
    Label {
        text: String,
        position: Point,
        anchor: TextAnchor,
        font_size: f64,
        font_weight: u16,
        color: Color,
        opacity: f64,
        label_box: Option<LabelBox>,
        target: HitTarget,
    },
    ExpandIndicator {
        center: Point,
        radius: f64,
        /// Outer halo radius, drawn for root-level indicators only.
        ring_radius: Option<f64>,
        ring_color: Color,
        fill: Color,
        text: String,
        font_size: f64,
        hidden_count: usize,
        expanded: bool,
        target: HitTarget,
    },
}

impl Primitive {
    pub fn target(&self) -> Option<&HitTarget> {
        match self {
            Self::Spine { .. } => None,
            Self::EffectCircle { target, .. }
            | Self::Rib { target, .. }
            | Self::SubRib { target, .. }
            | Self::Label { target, .. }
            | Self::ExpandIndicator { target, .. } => Some(target),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spine { .. } => "spine",
            Self::EffectCircle { .. } => "effectCircle",
            Self::Rib { .. } => "rib",
            Self::SubRib { .. } => "subRib",
            Self::Label { .. } => "label",
            Self::ExpandIndicator { .. } => "expandIndicator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishboneLayout {
    canvas: Canvas,
    theme: Theme,
    background: Color,
    primitives: Vec<Primitive>,
}

impl FishboneLayout {
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Primitives tagged with `path`, in drawing order.
    pub fn primitives_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.primitives
            .iter()
            .filter(move |primitive| primitive.target().is_some_and(|target| target.path == path))
    }

    pub fn count(&self, kind: &str) -> usize {
        self.primitives.iter().filter(|primitive| primitive.kind() == kind).count()
    }
}

/// Fraction of the spine length at which root `index` of `count` attaches.
pub fn root_fraction(index: usize, count: usize) -> f64 {
    match count {
        0 | 1 => 0.5,
        2 => [0.3, 0.7][index.min(1)],
        3 => [0.25, 0.5, 0.75][index.min(2)],
        _ => {
            let (padding, usable) = if count <= 5 { (0.15, 0.7) } else { (0.1, 0.8) };
            padding + usable * index as f64 / (count - 1) as f64
        }
    }
}

fn rib_length(canvas: Canvas) -> f64 {
    (canvas.width * RIB_WIDTH_RATIO).clamp(RIB_MIN, RIB_MAX)
}

fn rib_angle(index: usize) -> f64 {
    if index % 2 == 0 {
        -FRAC_PI_4
    } else {
        FRAC_PI_4
    }
}

fn text_units(text: &str) -> f64 {
    text.chars().count() as f64
}

fn visible_children(len: usize, budget: usize, expanded: bool) -> usize {
    if expanded {
        len
    } else {
        len.min(budget)
    }
}

fn indicator_text(len: usize, visible: usize, expanded: bool) -> String {
    if expanded {
        EXPANDED_GLYPH.to_owned()
    } else {
        format!("+{}", len - visible)
    }
}

struct LayoutPass<'a> {
    palette: &'static Palette,
    expanded: &'a ExpansionState,
    selected: Option<&'a str>,
    rib_length: f64,
    out: Vec<Primitive>,
}

impl LayoutPass<'_> {
    fn is_selected(&self, path: &str) -> bool {
        self.selected == Some(path)
    }

    fn root(&mut self, bone: &Bone, index: usize, anchor: Point) {
        let path = encode_path(&[index]);
        let angle = rib_angle(index);
        let end = anchor.along(angle, self.rib_length);
        let selected = self.is_selected(&path);
        let ink = self.palette.bone_ink(0, bone.status(), selected);

        self.out.push(Primitive::Rib {
            from: anchor,
            to: end,
            color: ink.stroke,
            stroke_width: RIB_STROKE,
            joint_radius: RIB_JOINT,
            target: HitTarget::node(&path),
        });

        let units = text_units(bone.label());
        let position = end.along(angle, f64::max(20.0, 15.0 + units * 0.4));
        let width = f64::max(
            units * ROOT_FONT * GLYPH_WIDTH_RATIO + ROOT_LABEL_PADDING * 2.0,
            ROOT_LABEL_MIN_WIDTH,
        );
        let height = ROOT_FONT + ROOT_LABEL_PADDING;
        self.out.push(Primitive::Label {
            text: bone.label().to_owned(),
            position,
            anchor: TextAnchor::Middle,
            font_size: ROOT_FONT,
            font_weight: 700,
            color: ink.text,
            opacity: 1.0,
            label_box: Some(LabelBox {
                origin: Point::new(position.x - width / 2.0, position.y - height / 2.0),
                width,
                height,
                fill: if selected { LABEL_BOX_FILL_SELECTED } else { LABEL_BOX_FILL },
                stroke: if selected { theme::SELECTED } else { LABEL_BOX_STROKE },
            }),
            target: HitTarget::node(&path),
        });

        let children = bone.children();
        let expanded = self.expanded.contains(&path);
        let visible = visible_children(children.len(), SUB_CAUSE_BUDGET, expanded);
        let main_up = angle < 0.0;
        let step = SUB_RATIO_SPAN / visible.saturating_sub(1).max(1) as f64;
        for (idx, child) in children.iter().take(visible).enumerate() {
            let ratio = SUB_RATIO_START + idx as f64 * step;
            let up = main_up == (idx % 2 == 0);
            self.sub_cause(child, &[index, idx], anchor.lerp(end, ratio), up);
        }

        if children.len() > SUB_CAUSE_BUDGET {
            self.out.push(Primitive::ExpandIndicator {
                center: end.along(angle, ROOT_INDICATOR_DISTANCE),
                radius: ROOT_INDICATOR_RADIUS,
                ring_radius: Some(ROOT_INDICATOR_RING),
                ring_color: INDICATOR_RING,
                fill: if expanded { INDICATOR_EXPANDED } else { INDICATOR_COLLAPSED_ROOT },
                text: indicator_text(children.len(), visible, expanded),
                font_size: ROOT_INDICATOR_FONT,
                hidden_count: children.len() - visible,
                expanded,
                target: HitTarget::expand_toggle(path),
            });
        }
    }

    /// A depth-1 bone: a horizontal tick leaving the rib at `origin`, pointing right when `up`.
    fn sub_cause(&mut self, bone: &Bone, indices: &[usize], origin: Point, up: bool) {
        let path = encode_path(indices);
        let ink = self.palette.bone_ink(1, bone.status(), self.is_selected(&path));
        let side = if up { 1.0 } else { -1.0 };
        let anchor = if up { TextAnchor::Start } else { TextAnchor::End };
        let end = Point::new(origin.x + side * SUB_TICK, origin.y);

        self.out.push(Primitive::SubRib {
            from: origin,
            to: end,
            depth: 1,
            color: ink.stroke,
            stroke_width: SUB_STROKE,
            opacity: 1.0,
            target: HitTarget::node(&path),
        });
        self.out.push(Primitive::Label {
            text: bone.label().to_owned(),
            position: Point::new(end.x + side * SUB_LABEL_GAP, end.y),
            anchor,
            font_size: SUB_FONT,
            font_weight: 600,
            color: ink.text,
            opacity: 1.0,
            label_box: None,
            target: HitTarget::node(&path),
        });

        let details = bone.children();
        let expanded = self.expanded.contains(&path);
        let visible = visible_children(details.len(), DETAIL_BUDGET, expanded);
        let center = visible.saturating_sub(1) as f64 / 2.0;
        for (idx, detail) in details.iter().take(visible).enumerate() {
            let mut detail_indices = indices.to_vec();
            detail_indices.push(idx);
            let detail_path = encode_path(&detail_indices);
            let ink = self.palette.bone_ink(2, detail.status(), self.is_selected(&detail_path));
            let text_at = Point::new(
                end.x + side * DETAIL_OFFSET_X,
                end.y + (idx as f64 - center) * DETAIL_SPACING,
            );

            self.out.push(Primitive::SubRib {
                from: end,
                to: Point::new(text_at.x - side * 3.0, text_at.y),
                depth: 2,
                color: ink.stroke,
                stroke_width: DETAIL_STROKE,
                opacity: DETAIL_OPACITY,
                target: HitTarget::node(&detail_path),
            });
            self.out.push(Primitive::Label {
                text: detail.label().to_owned(),
                position: text_at,
                anchor,
                font_size: DETAIL_FONT,
                font_weight: 500,
                color: ink.text,
                opacity: DETAIL_LABEL_OPACITY,
                label_box: None,
                target: HitTarget::node(detail_path),
            });
        }

        if details.len() > DETAIL_BUDGET {
            self.out.push(Primitive::ExpandIndicator {
                center: Point::new(
                    end.x + side * DETAIL_OFFSET_X,
                    end.y + visible as f64 * SUB_INDICATOR_ROW + SUB_INDICATOR_GAP,
                ),
                radius: SUB_INDICATOR_RADIUS,
                ring_radius: None,
                ring_color: Color::WHITE,
                fill: if expanded { INDICATOR_EXPANDED } else { INDICATOR_COLLAPSED_SUB },
                text: indicator_text(details.len(), visible, expanded),
                font_size: SUB_INDICATOR_FONT,
                hidden_count: details.len() - visible,
                expanded,
                target: HitTarget::expand_toggle(path),
            });
        }
    }
}

/// Lays out `diagram` on `canvas`.
///
/// Pure: the result depends only on the arguments. Bones deeper than two levels below a root
/// are not drawn. `expanded` lifts the per-level child budget for the paths it contains;
/// `selected` highlights the node with that path.
pub fn compute_layout(
    diagram: &Diagram,
    canvas: Canvas,
    theme: Theme,
    expanded: &ExpansionState,
    selected: Option<&str>,
) -> FishboneLayout {
    let palette = theme.palette();
    let y0 = canvas.height / 2.0;
    let x0 = SPINE_LEFT;
    let x1 = canvas.width - SPINE_RIGHT_INSET;
    let effect_center = Point::new(x1 + EFFECT_OFFSET, y0);

    let mut pass = LayoutPass {
        palette,
        expanded,
        selected,
        rib_length: rib_length(canvas),
        out: Vec::with_capacity(4 + diagram.roots().len() * 8),
    };

    pass.out.push(Primitive::Spine {
        from: Point::new(x0, y0),
        to: Point::new(x1, y0),
        color: palette.spine,
        stroke_width: SPINE_STROKE,
        arrow_head: false,
    });
    pass.out.push(Primitive::Spine {
        from: Point::new(x1, y0),
        to: Point::new(effect_center.x - EFFECT_RADIUS, y0),
        color: palette.spine,
        stroke_width: SPINE_STROKE,
        arrow_head: true,
    });

    let count = diagram.roots().len();
    for (index, bone) in diagram.roots().iter().enumerate() {
        let anchor = Point::new(x0 + (x1 - x0) * root_fraction(index, count), y0);
        pass.root(bone, index, anchor);
    }

    pass.out.push(Primitive::EffectCircle {
        center: effect_center,
        radius: EFFECT_RADIUS,
        stroke: EFFECT_STROKE,
        stroke_width: EFFECT_STROKE_WIDTH,
        fill_center: EFFECT_FILL_CENTER,
        fill_edge: EFFECT_FILL_EDGE,
        target: HitTarget::node(EFFECT_TOKEN),
    });
    pass.out.push(Primitive::Label {
        text: diagram.effect().label().to_owned(),
        position: effect_center,
        anchor: TextAnchor::Middle,
        font_size: EFFECT_FONT,
        font_weight: 700,
        color: EFFECT_TEXT,
        opacity: 1.0,
        label_box: None,
        target: HitTarget::node(EFFECT_TOKEN),
    });

    FishboneLayout {
        canvas,
        theme,
        background: palette.background,
        primitives: pass.out,
    }
}
