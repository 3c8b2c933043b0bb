// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Fishbone-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Fishbone and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Standalone SVG export of a computed layout.
//!
//! Hit-testable elements carry `data-path`; expand indicators additionally carry
//! `data-expand-toggle="true"`.

use crate::layout::{Color, FishboneLayout, HitTarget, Point, Primitive};

use super::text::{escape_xml, format_number as num};

const ARROW_ID: &str = "spine-arrow";
const EFFECT_GRADIENT_ID: &str = "effect-gradient";

struct Svg {
    out: String,
}

impl Svg {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn attr(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape_xml(value));
        self.out.push('"');
    }

    fn num_attr(&mut self, name: &str, value: f64) {
        self.attr(name, &num(value));
    }

    fn color_attr(&mut self, name: &str, color: Color) {
        self.attr(name, &color.to_string());
    }

    fn target(&mut self, target: &HitTarget) {
        self.attr("data-path", &target.path);
        if target.is_expand_toggle {
            self.attr("data-expand-toggle", "true");
        }
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.push("<line");
        self.num_attr("x1", from.x);
        self.num_attr("y1", from.y);
        self.num_attr("x2", to.x);
        self.num_attr("y2", to.y);
        self.color_attr("stroke", color);
        self.num_attr("stroke-width", width);
        self.attr("stroke-linecap", "round");
    }

    fn circle(&mut self, center: Point, radius: f64) {
        self.push("<circle");
        self.num_attr("cx", center.x);
        self.num_attr("cy", center.y);
        self.num_attr("r", radius);
    }

    fn primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Spine { from, to, color, stroke_width, arrow_head } => {
                self.line(*from, *to, *color, *stroke_width);
                if *arrow_head {
                    self.attr("marker-end", &format!("url(#{ARROW_ID})"));
                }
                self.push("/>\n");
            }
            Primitive::EffectCircle { center, radius, stroke, stroke_width, target, .. } => {
                self.circle(*center, *radius);
                self.attr("fill", &format!("url(#{EFFECT_GRADIENT_ID})"));
                self.color_attr("stroke", *stroke);
                self.num_attr("stroke-width", *stroke_width);
                self.target(target);
                self.push("/>\n");
            }
            Primitive::Rib { from, to, color, stroke_width, joint_radius, target } => {
                self.push("<g");
                self.target(target);
                self.push(">");
                self.line(*from, *to, *color, *stroke_width);
                self.push("/>");
                self.circle(*from, *joint_radius);
                self.color_attr("fill", *color);
                self.push("/></g>\n");
            }
            Primitive::SubRib { from, to, color, stroke_width, opacity, target, .. } => {
                self.line(*from, *to, *color, *stroke_width);
                if *opacity < 1.0 {
                    self.num_attr("opacity", *opacity);
                }
                self.target(target);
                self.push("/>\n");
            }
            Primitive::Label {
                text,
                position,
                anchor,
                font_size,
                font_weight,
                color,
                opacity,
                label_box,
                target,
            } => {
                if let Some(label_box) = label_box {
                    self.push("<rect");
                    self.num_attr("x", label_box.origin.x);
                    self.num_attr("y", label_box.origin.y);
                    self.num_attr("width", label_box.width);
                    self.num_attr("height", label_box.height);
                    self.attr("rx", "4");
                    self.color_attr("fill", label_box.fill);
                    self.color_attr("stroke", label_box.stroke);
                    self.attr("stroke-width", "2");
                    self.target(target);
                    self.push("/>\n");
                }
                self.push("<text");
                self.num_attr("x", position.x);
                self.num_attr("y", position.y);
                self.num_attr("font-size", *font_size);
                self.attr("font-weight", itoa::Buffer::new().format(*font_weight));
                self.color_attr("fill", *color);
                self.attr("text-anchor", anchor.as_str());
                self.attr("dominant-baseline", "middle");
                if *opacity < 1.0 {
                    self.num_attr("opacity", *opacity);
                }
                self.target(target);
                self.push(">");
                self.push(&escape_xml(text));
                self.push("</text>\n");
            }
            Primitive::ExpandIndicator {
                center,
                radius,
                ring_radius,
                ring_color,
                fill,
                text,
                font_size,
                target,
                ..
            } => {
                self.push("<g");
                self.target(target);
                self.push(">");
                if let Some(ring_radius) = ring_radius {
                    self.circle(*center, *ring_radius);
                    self.color_attr("fill", Color::WHITE);
                    self.color_attr("stroke", *ring_color);
                    self.attr("stroke-width", "2");
                    self.push("/>");
                }
                self.circle(*center, *radius);
                self.color_attr("fill", *fill);
                self.color_attr("stroke", Color::WHITE);
                self.attr("stroke-width", "2");
                self.push("/><text");
                self.num_attr("x", center.x);
                self.num_attr("y", center.y + 1.0);
                self.num_attr("font-size", *font_size);
                self.attr("font-weight", "bold");
                self.color_attr("fill", Color::WHITE);
                self.attr("text-anchor", "middle");
                self.attr("dominant-baseline", "middle");
                self.push(">");
                self.push(&escape_xml(text));
                self.push("</text></g>\n");
            }
        }
    }

    fn defs(&mut self, layout: &FishboneLayout) {
        let spine = layout.theme().palette().spine;
        self.push("<defs>\n<marker");
        self.attr("id", ARROW_ID);
        self.attr("markerWidth", "24");
        self.attr("markerHeight", "16");
        self.attr("refX", "22");
        self.attr("refY", "8");
        self.attr("orient", "auto");
        self.attr("markerUnits", "strokeWidth");
        self.push("><polygon");
        self.attr("points", "0 0, 24 8, 0 16");
        self.color_attr("fill", spine);
        self.push("/></marker>\n");

        let gradient = layout.primitives().iter().find_map(|primitive| match primitive {
            Primitive::EffectCircle { fill_center, fill_edge, .. } => Some((*fill_center, *fill_edge)),
            _ => None,
        });
        if let Some((center, edge)) = gradient {
            self.push("<radialGradient");
            self.attr("id", EFFECT_GRADIENT_ID);
            self.attr("cx", "30%");
            self.attr("cy", "30%");
            self.push("><stop");
            self.attr("offset", "0%");
            self.color_attr("stop-color", center);
            self.push("/><stop");
            self.attr("offset", "100%");
            self.color_attr("stop-color", edge);
            self.push("/></radialGradient>\n");
        }
        self.push("</defs>\n");
    }
}

/// Renders `layout` as a standalone SVG document sized to its canvas.
pub fn render_svg(layout: &FishboneLayout) -> String {
    let canvas = layout.canvas();
    let mut svg = Svg {
        out: String::with_capacity(256 + layout.primitives().len() * 160),
    };

    svg.push("<svg");
    svg.attr("xmlns", "http://www.w3.org/2000/svg");
    svg.num_attr("width", canvas.width);
    svg.num_attr("height", canvas.height);
    svg.attr(
        "viewBox",
        &format!("0 0 {} {}", num(canvas.width), num(canvas.height)),
    );
    svg.attr("font-family", "Arial, sans-serif");
    svg.push(">\n");
    svg.defs(layout);

    svg.push("<rect");
    svg.attr("width", "100%");
    svg.attr("height", "100%");
    svg.color_attr("fill", layout.background());
    svg.push("/>\n");

    for primitive in layout.primitives() {
        svg.primitive(primitive);
    }

    svg.push("</svg>\n");
    svg.out
}
