// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use float_cmp::ApproxEqUlps;
use svgshape_types::{Color, LengthListParser, PaintFallback, Transform, TransformListParser};

use crate::names::AId;
use crate::tree::Diagnostics;
use crate::units::{self, Axis, Viewport};

/// A fill rule.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}

impl FillRule {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "nonzero" => Some(FillRule::NonZero),
            "evenodd" => Some(FillRule::EvenOdd),
            _ => None,
        }
    }
}

/// A line cap.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

impl LineCap {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

/// A line join.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

impl LineJoin {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "miter" => Some(LineJoin::Miter),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// A cascaded `fill` or `stroke` value.
///
/// Gradient references are resolved only after the whole document was parsed.
#[derive(Clone, PartialEq, Debug)]
pub enum PaintValue {
    /// No paint.
    None,
    /// A solid color.
    Solid(Color),
    /// A `url(#id)` reference.
    GradientRef {
        /// Referenced element id.
        id: String,
        /// A color to use when the reference cannot be resolved.
        ///
        /// `None` means no paint.
        fallback: Option<Color>,
    },
}

/// The stroke dash array can have at most this many entries.
pub const MAX_DASHES: usize = 8;

/// An inheritable style state.
///
/// The attribute stack copies the parent frame on every push,
/// so a child can never alter the state of its ancestors or siblings.
#[derive(Clone, PartialEq, Debug)]
pub struct AttributeFrame {
    /// `fill` value.
    pub fill: PaintValue,
    /// `fill-opacity` value in the 0..1 range.
    pub fill_opacity: f64,
    /// `fill-rule` value.
    pub fill_rule: FillRule,
    /// `stroke` value.
    pub stroke: PaintValue,
    /// `stroke-width` in user units.
    pub stroke_width: f64,
    /// `stroke-opacity` value in the 0..1 range.
    pub stroke_opacity: f64,
    /// `stroke-linecap` value.
    pub linecap: LineCap,
    /// `stroke-linejoin` value.
    pub linejoin: LineJoin,
    /// `stroke-miterlimit` value. Never negative.
    pub miterlimit: f64,
    /// `stroke-dasharray` in user units.
    ///
    /// Empty when not set, set to `none` or when all dashes are zero.
    pub dasharray: Vec<f64>,
    /// `stroke-dashoffset` in user units.
    pub dashoffset: f64,
    /// `opacity` value in the 0..1 range.
    pub opacity: f64,
    /// `color` value. Used by `currentColor`.
    pub color: Color,
    /// Font size in pixels. Used by `em` and `ex` units.
    pub font_size: f64,
    /// Element id. Not inherited.
    pub id: Option<String>,
    /// Accumulated transform, from the element's user space to the document space.
    pub transform: Transform,
    /// Cleared by `display="none"` on the element or any of its ancestors.
    pub display: bool,
    /// `visibility` value.
    pub visibility: bool,
    /// `stop-color` value. Not inherited.
    pub stop_color: Color,
    /// `stop-opacity` value. Not inherited.
    pub stop_opacity: f64,
    /// `offset` value of a gradient stop. Not inherited.
    pub offset: f64,
}

impl AttributeFrame {
    /// Creates a root frame.
    pub fn new(font_size: f64) -> Self {
        AttributeFrame {
            fill: PaintValue::Solid(Color::black()),
            fill_opacity: 1.0,
            fill_rule: FillRule::default(),
            stroke: PaintValue::None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            linecap: LineCap::default(),
            linejoin: LineJoin::default(),
            miterlimit: 4.0,
            dasharray: Vec::new(),
            dashoffset: 0.0,
            opacity: 1.0,
            color: Color::black(),
            font_size,
            id: None,
            transform: Transform::default(),
            display: true,
            visibility: true,
            stop_color: Color::black(),
            stop_opacity: 1.0,
            offset: 0.0,
        }
    }

    /// Checks that an element with this frame should be rendered.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.display && self.visibility
    }

    /// Resets properties that are not inherited.
    pub(crate) fn reset_non_inherited(&mut self) {
        self.id = None;
        self.stop_color = Color::black();
        self.stop_opacity = 1.0;
        self.offset = 0.0;
    }
}

impl Default for AttributeFrame {
    fn default() -> Self {
        AttributeFrame::new(12.0)
    }
}

/// Values required to convert lengths while applying attributes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Context {
    pub dpi: f64,
    pub viewport: Viewport,
    pub parent_font_size: f64,
}

/// Properties that other values of the same element depend on.
///
/// `em`/`ex` lengths use `font-size` and `currentColor` uses `color`.
const BASE_PROPERTIES: &[AId] = &[AId::FontSize, AId::Color];

/// Applies all presentation attributes of an element.
///
/// Plain attributes are applied first, the `style` attribute afterwards,
/// so its declarations take precedence. `font-size` and `color` are resolved
/// before anything else, regardless of their position.
pub(crate) fn apply_attributes(
    frame: &mut AttributeFrame,
    attrs: &[(&str, &str)],
    ctx: &Context,
    diag: &mut Diagnostics,
) {
    let style = attrs
        .iter()
        .rev()
        .find(|(name, _)| AId::from_str(name) == Some(AId::Style))
        .map(|(_, value)| *value);
    let declarations = style.map(split_style).unwrap_or_default();

    for &base in BASE_PROPERTIES {
        for &(name, value) in attrs.iter().chain(declarations.iter()) {
            if AId::from_str(name) == Some(base) {
                apply_attribute(frame, base, value, ctx, diag);
            }
        }
    }

    for &(name, value) in attrs {
        match AId::from_str(name) {
            Some(aid) if BASE_PROPERTIES.contains(&aid) => {}
            Some(aid) if aid.is_presentation() => apply_attribute(frame, aid, value, ctx, diag),
            Some(_) => {}
            None => {
                log::debug!("Attribute '{}' is not supported. Skipped.", name);
                diag.unknown_attributes += 1;
            }
        }
    }

    for &(name, value) in &declarations {
        match AId::from_str(name) {
            Some(aid) if BASE_PROPERTIES.contains(&aid) => {}
            Some(aid) if aid.is_style_property() => apply_attribute(frame, aid, value, ctx, diag),
            _ => {
                log::debug!("Style property '{}' is not supported. Skipped.", name);
                diag.unknown_attributes += 1;
            }
        }
    }
}

/// Splits a `style` attribute into `name: value` declarations.
fn split_style(style: &str) -> Vec<(&str, &str)> {
    let mut declarations = Vec::new();
    for declaration in style.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }

        match declaration.split_once(':') {
            Some((name, value)) => declarations.push((name.trim(), value.trim())),
            None => log::warn!("Invalid style declaration: '{}'.", declaration),
        }
    }

    declarations
}

/// Applies a single presentation attribute to the frame.
pub(crate) fn apply_attribute(
    frame: &mut AttributeFrame,
    aid: AId,
    value: &str,
    ctx: &Context,
    diag: &mut Diagnostics,
) {
    let value = value.trim();
    match aid {
        AId::Fill => {
            if let Some(paint) = convert_paint(frame, aid, value, diag) {
                frame.fill = paint;
            }
        }
        AId::Stroke => {
            if let Some(paint) = convert_paint(frame, aid, value, diag) {
                frame.stroke = paint;
            }
        }
        AId::FillOpacity => frame.fill_opacity = units::parse_opacity(value, diag),
        AId::StrokeOpacity => frame.stroke_opacity = units::parse_opacity(value, diag),
        AId::Opacity => frame.opacity = units::parse_opacity(value, diag),
        AId::StopOpacity => frame.stop_opacity = units::parse_opacity(value, diag),
        AId::Offset => frame.offset = units::parse_opacity(value, diag),
        AId::FillRule => {
            if let Some(v) = parse_keyword(aid, value, FillRule::parse) {
                frame.fill_rule = v;
            }
        }
        AId::StrokeLinecap => {
            if let Some(v) = parse_keyword(aid, value, LineCap::parse) {
                frame.linecap = v;
            }
        }
        AId::StrokeLinejoin => {
            if let Some(v) = parse_keyword(aid, value, LineJoin::parse) {
                frame.linejoin = v;
            }
        }
        AId::StrokeWidth => {
            if value != "inherit" {
                frame.stroke_width = convert_user_length(frame, value, ctx, diag);
            }
        }
        AId::StrokeDashoffset => {
            if value != "inherit" {
                frame.dashoffset = convert_user_length(frame, value, ctx, diag);
            }
        }
        AId::StrokeMiterlimit => {
            if value != "inherit" {
                frame.miterlimit = units::parse_number_lossy(value, diag).max(0.0);
            }
        }
        AId::StrokeDasharray => {
            if value != "inherit" {
                frame.dasharray = convert_dasharray(frame, value, ctx, diag);
            }
        }
        AId::Color => {
            if value != "inherit" {
                frame.color = units::parse_color_lossy(value, diag);
            }
        }
        AId::StopColor => {
            frame.stop_color = match value {
                "currentColor" => frame.color,
                _ => units::parse_color_lossy(value, diag),
            };
        }
        AId::FontSize => {
            if value != "inherit" {
                frame.font_size = units::convert_font_size(value, ctx.parent_font_size, ctx.dpi, diag);
            }
        }
        AId::Display => {
            if value == "none" {
                frame.display = false;
            }
        }
        AId::Visibility => match value {
            "visible" => frame.visibility = true,
            "hidden" | "collapse" => frame.visibility = false,
            _ => {}
        },
        AId::Id => frame.id = Some(value.to_string()),
        AId::Transform => frame.transform = frame.transform.pre_concat(&parse_transform(value)),
        _ => {}
    }
}

fn parse_keyword<T>(aid: AId, value: &str, f: fn(&str) -> Option<T>) -> Option<T> {
    if value == "inherit" {
        return None;
    }

    let v = f(value);
    if v.is_none() {
        log::warn!("Invalid '{}' value: '{}'.", aid, value);
    }

    v
}

fn convert_paint(
    frame: &AttributeFrame,
    aid: AId,
    value: &str,
    diag: &mut Diagnostics,
) -> Option<PaintValue> {
    let paint = match svgshape_types::Paint::from_str(value) {
        Ok(v) => v,
        Err(e) => {
            let color = units::fallback_color(value);
            log::warn!(
                "Failed to parse {} value: '{}' cause {}. Fallback to {}.",
                aid,
                value,
                e,
                color
            );
            diag.invalid_colors += 1;
            return Some(PaintValue::Solid(color));
        }
    };

    match paint {
        svgshape_types::Paint::None => Some(PaintValue::None),
        // Already inherited by the stack.
        svgshape_types::Paint::Inherit => None,
        svgshape_types::Paint::CurrentColor => Some(PaintValue::Solid(frame.color)),
        svgshape_types::Paint::Color(c) => Some(PaintValue::Solid(c)),
        svgshape_types::Paint::FuncIRI(link, fallback) => {
            let fallback = match fallback {
                Some(PaintFallback::CurrentColor) => Some(frame.color),
                Some(PaintFallback::Color(c)) => Some(c),
                Some(PaintFallback::None) | None => None,
            };

            Some(PaintValue::GradientRef {
                id: link.to_string(),
                fallback,
            })
        }
    }
}

fn convert_user_length(
    frame: &AttributeFrame,
    value: &str,
    ctx: &Context,
    diag: &mut Diagnostics,
) -> f64 {
    let length = units::parse_length_lossy(value, diag);
    units::convert_length(
        length,
        0.0,
        ctx.viewport.length(Axis::Diagonal),
        ctx.dpi,
        frame.font_size,
    )
}

// Prepare the 'stroke-dasharray' according to:
// https://www.w3.org/TR/SVG11/painting.html#StrokeDasharrayProperty
fn convert_dasharray(
    frame: &AttributeFrame,
    value: &str,
    ctx: &Context,
    diag: &mut Diagnostics,
) -> Vec<f64> {
    if value.starts_with("none") {
        return Vec::new();
    }

    let mut list = Vec::new();
    for length in LengthListParser::from(value) {
        let length = match length {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to parse 'stroke-dasharray' value: '{}' cause {}.", value, e);
                diag.invalid_numbers += 1;
                break;
            }
        };

        if list.len() == MAX_DASHES {
            break;
        }

        let len = ctx.viewport.length(Axis::Diagonal);
        let n = units::convert_length(length, 0.0, len, ctx.dpi, frame.font_size);
        list.push(n.abs());
    }

    // `If the sum of the values is zero, then the stroke is rendered
    // as if a value of none were specified.`
    let sum: f64 = list.iter().sum();
    if sum.approx_eq_ulps(&0.0, 4) {
        return Vec::new();
    }

    list
}

/// Parses a transform list.
///
/// On error, the functions parsed so far are kept.
pub(crate) fn parse_transform(value: &str) -> Transform {
    let mut ts = Transform::default();
    for token in TransformListParser::from(value) {
        match token {
            Ok(token) => ts = ts.pre_concat(&token.to_transform()),
            Err(e) => {
                log::warn!("Failed to parse a transform from '{}' cause {}.", value, e);
                break;
            }
        }
    }

    ts
}
