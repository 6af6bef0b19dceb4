use glam::{DVec2, dvec2};

use super::font::{DEFAULT_FONT_SIZE, FontDescriptor};
use super::text::{DEFAULT_TEXT_COLOR, font_attributes, read_font, text_bounds, text_content};
use super::{Attrs, Primitive, svg_num};
use crate::geometry::{BoundingBox, rotate_point90};
use crate::identity::new_uuid;
use crate::log::debug;
use crate::tree::{Element, Node};

const OWNED: &[&str] = &[
    "x",
    "y",
    "z",
    "rotation",
    "uuid",
    "font",
    "text_from",
    "Halignment",
    "Valignment",
    "text_width",
    "frame",
    "keep_visual_rotation",
    // legacy <input> and attribute forms
    "size",
    "text",
    "color",
    "tagg",
    "rotate",
];

/// Children managed by [`DynamicTextPart`]; any others are kept after them
const OWNED_CHILDREN: &[&str] = &["text", "info_name", "color"];

/// Where the text of a dynamic text comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSource {
    #[default]
    UserText,
    ElementInfo,
    CompositeText,
}

impl TextSource {
    fn from_name(name: &str) -> Self {
        match name {
            "ElementInfo" => TextSource::ElementInfo,
            "CompositeText" => TextSource::CompositeText,
            _ => TextSource::UserText,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TextSource::UserText => "UserText",
            TextSource::ElementInfo => "ElementInfo",
            TextSource::CompositeText => "CompositeText",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    fn from_name(name: &str) -> Self {
        match name {
            "AlignHCenter" => HAlign::Center,
            "AlignRight" => HAlign::Right,
            _ => HAlign::Left,
        }
    }

    fn name(self) -> &'static str {
        match self {
            HAlign::Left => "AlignLeft",
            HAlign::Center => "AlignHCenter",
            HAlign::Right => "AlignRight",
        }
    }

    fn text_anchor(self) -> &'static str {
        match self {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VAlign {
    fn from_name(name: &str) -> Self {
        match name {
            "AlignVCenter" => VAlign::Center,
            "AlignBottom" => VAlign::Bottom,
            _ => VAlign::Top,
        }
    }

    fn name(self) -> &'static str {
        match self {
            VAlign::Top => "AlignTop",
            VAlign::Center => "AlignVCenter",
            VAlign::Bottom => "AlignBottom",
        }
    }
}

/// Text that may be bound to an element information field.
///
/// Also reads the legacy `<input>` tag, which is written back as
/// `<dynamic_text>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicTextPart {
    /// Top-left corner of the text box
    pub pos: DVec2,
    pub z: f64,
    pub rotation: f64,
    pub uuid: String,
    pub font: FontDescriptor,
    pub text: String,
    pub source: TextSource,
    /// Information field shown when `source` is [`TextSource::ElementInfo`]
    pub info_name: Option<String>,
    pub color: String,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Fixed width, `None` for automatic
    pub text_width: Option<f64>,
    pub frame: bool,
    pub keep_visual_rotation: bool,
    /// Read from a legacy `<input>` tag
    pub upgraded: bool,
}

/// The node's uuid, or a fresh one when it is missing or blank
fn read_uuid(node: &Element) -> String {
    node.attr("uuid")
        .filter(|uuid| !uuid.trim().is_empty())
        .map_or_else(new_uuid, str::to_string)
}

fn child_text(node: &Element, name: &str) -> Option<String> {
    node.child(name).map(Element::text)
}

impl DynamicTextPart {
    pub fn from_node(node: &Element) -> Self {
        if node.name == "input" {
            return Self::from_input(node);
        }
        let get = |key| node.attr_f64(key).unwrap_or(0.0);
        Self {
            pos: dvec2(get("x"), get("y")),
            z: get("z"),
            rotation: get("rotation"),
            uuid: read_uuid(node),
            font: read_font(node),
            text: child_text(node, "text")
                .or_else(|| node.attr("text").map(str::to_string))
                .unwrap_or_default(),
            source: TextSource::from_name(node.attr("text_from").unwrap_or_default()),
            info_name: child_text(node, "info_name"),
            color: child_text(node, "color")
                .or_else(|| node.attr("color").map(str::to_string))
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            halign: HAlign::from_name(node.attr("Halignment").unwrap_or_default()),
            valign: VAlign::from_name(node.attr("Valignment").unwrap_or_default()),
            text_width: node.attr_f64("text_width").filter(|w| *w > 0.0),
            frame: node.attr_bool("frame").unwrap_or(false),
            keep_visual_rotation: node.attr_bool("keep_visual_rotation").unwrap_or(true),
            upgraded: false,
        }
    }

    /// Legacy `<input x y size text tagg rotate/>`
    fn from_input(node: &Element) -> Self {
        let get = |key| node.attr_f64(key).unwrap_or(0.0);
        let tagg = node.attr("tagg").unwrap_or_default();
        let bound = !tagg.is_empty() && tagg != "none";
        debug!(tagg, "upgrading legacy input to dynamic_text");
        Self {
            pos: dvec2(get("x"), get("y")),
            z: get("z"),
            rotation: get("rotation"),
            uuid: read_uuid(node),
            font: FontDescriptor::legacy(node.attr_f64("size").unwrap_or(DEFAULT_FONT_SIZE)),
            text: node.attr("text").unwrap_or_default().to_string(),
            source: if bound {
                TextSource::ElementInfo
            } else {
                TextSource::UserText
            },
            info_name: bound.then(|| tagg.to_string()),
            color: DEFAULT_TEXT_COLOR.to_string(),
            halign: HAlign::Left,
            valign: VAlign::Top,
            text_width: None,
            frame: false,
            keep_visual_rotation: true,
            upgraded: true,
        }
    }

    pub fn size(&self) -> f64 {
        self.font.point_size
    }

    /// Replace the text, info name and color children, keeping foreign ones
    fn write_children(&self, node: &mut Element) {
        let foreign: Vec<Node> = std::mem::take(&mut node.children)
            .into_iter()
            .filter(|child| match child {
                Node::Element(e) => !OWNED_CHILDREN.contains(&e.name.as_str()),
                Node::Text(_) => false,
            })
            .collect();

        let mut text = Element::new("text");
        text.set_text(self.text.as_str());
        node.push_child(text);
        if self.source == TextSource::ElementInfo {
            if let Some(info_name) = &self.info_name {
                node.push_child(Element::new("info_name").with_text(info_name.as_str()));
            }
        }
        node.push_child(Element::new("color").with_text(self.color.as_str()));
        node.children.extend(foreign);
    }
}

impl Primitive for DynamicTextPart {
    fn tag(&self) -> &'static str {
        "dynamic_text"
    }

    fn flip(&mut self) {
        self.pos.y = -self.pos.y;
    }

    fn mirror(&mut self) {
        self.pos.x = -self.pos.x;
    }

    fn rotate90(&mut self) {
        self.pos = rotate_point90(self.pos);
        self.rotation = (self.rotation + 90.0).rem_euclid(360.0);
    }

    fn scale(&mut self, fx: f64, fy: f64) {
        self.pos *= dvec2(fx, fy);
        self.font.point_size *= fx.min(fy);
        if let Some(width) = &mut self.text_width {
            *width *= fx;
        }
    }

    fn extend_bounds(&self, bounds: &mut BoundingBox) {
        text_bounds(self.pos, &self.text, self.size(), bounds);
    }

    fn write(&self, node: &mut Element, decimals: usize) {
        let mut attrs = Attrs::new(decimals);
        attrs
            .num("x", self.pos.x)
            .num("y", self.pos.y)
            .int("z", self.z)
            .int("rotation", self.rotation)
            .text("uuid", self.uuid.as_str())
            .text("font", self.font.to_string())
            .text("text_from", self.source.name())
            .text("Halignment", self.halign.name())
            .text("Valignment", self.valign.name());
        match self.text_width {
            Some(width) => attrs.num("text_width", width),
            None => attrs.text("text_width", "-1"),
        };
        attrs
            .text("frame", if self.frame { "true" } else { "false" })
            .text(
                "keep_visual_rotation",
                if self.keep_visual_rotation { "true" } else { "false" },
            );
        attrs.apply(node, self.tag(), OWNED);
        self.write_children(node);
    }

    fn to_svg(&self, decimals: usize) -> Element {
        // Baseline offset of the first line inside the text box
        let size = self.size();
        let offset = dvec2(size / 8.0 + 4.05 - 0.5, 7.0 / 5.0 * size + 26.0 / 5.0 - 0.5);
        let anchor = self.pos + offset;
        let mut transform = format!(
            "translate({}, {})",
            svg_num(anchor.x, 1),
            svg_num(anchor.y, 1)
        );
        if self.rotation != 0.0 {
            transform.push_str(&format!(
                " rotate({} {} {})",
                svg_num(self.rotation, 0),
                svg_num(-offset.x, 1),
                svg_num(-offset.y, 1)
            ));
        }
        let mut svg = Element::new("text").with_attr("transform", transform);
        if self.halign != HAlign::Left {
            svg.set_attr("text-anchor", self.halign.text_anchor());
        }
        let svg = font_attributes(svg, &self.font, &self.color, decimals);
        text_content(svg, &self.text, size)
    }
}
