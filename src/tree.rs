// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::Deref;

use svgshape_types::{AspectRatio, Color, Length, Transform, ViewBox};

use crate::geom::PathSink;
use crate::paint_server::{GradientDefinition, GradientRegistry};
use crate::shapes::Geometry;
use crate::style::AttributeFrame;
use crate::{converter, Error, Options};

/// A gradient coordinate system.
///
/// `units` in the SVG.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl Default for Units {
    fn default() -> Self {
        Units::ObjectBoundingBox
    }
}

/// A spread method.
///
/// `spreadMethod` attribute in the SVG.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

impl Default for SpreadMethod {
    fn default() -> Self {
        SpreadMethod::Pad
    }
}

/// Gradient's stop element.
///
/// `stop` element in the SVG.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stop {
    /// Gradient stop offset in the 0..1 range.
    ///
    /// `offset` in the SVG.
    pub offset: f64,

    /// Gradient stop color.
    ///
    /// `stop-color` in the SVG.
    pub color: Color,

    /// Gradient stop opacity in the 0..1 range.
    ///
    /// `stop-opacity` in the SVG.
    pub opacity: f64,
}

/// A generic gradient.
#[derive(Clone, PartialEq, Debug)]
pub struct BaseGradient {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    pub id: String,

    /// Coordinate system units the gradient was defined in.
    ///
    /// `gradientUnits` in the SVG.
    pub units: Units,

    /// Maps gradient space to the document space.
    ///
    /// Combines the shape transform, the bounding box mapping of
    /// `objectBoundingBox` gradients and `gradientTransform`.
    pub transform: Transform,

    /// Gradient spreading method.
    ///
    /// `spreadMethod` in the SVG.
    pub spread_method: SpreadMethod,

    /// A list of `stop` elements.
    ///
    /// Always contains at least two stops. The paint opacity is already applied.
    pub stops: Vec<Stop>,
}

/// A linear gradient.
///
/// `linearGradient` element in the SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct LinearGradient {
    /// Base gradient data.
    pub base: BaseGradient,

    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Deref for LinearGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// A radial gradient.
///
/// `radialGradient` element in the SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct RadialGradient {
    /// Base gradient data.
    pub base: BaseGradient,

    pub cx: f64,
    pub cy: f64,
    /// Always positive.
    pub r: f64,
    pub fx: f64,
    pub fy: f64,
}

impl Deref for RadialGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// A resolved paint.
#[derive(Clone, PartialEq, Debug)]
pub enum Paint {
    /// A solid color with an opacity in the 0..1 range.
    #[allow(missing_docs)]
    Color { color: Color, opacity: f64 },
    /// A linear gradient.
    LinearGradient(LinearGradient),
    /// A radial gradient.
    RadialGradient(RadialGradient),
}

/// Counters of the problems that were recovered during parsing.
///
/// None of them affect the parsing result.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Diagnostics {
    /// Tags that were skipped because of a missing `>` or a missing quote.
    pub malformed_tags: usize,
    /// Unsupported elements.
    pub unknown_elements: usize,
    /// Unsupported attributes and style properties.
    pub unknown_attributes: usize,
    /// Paint references to missing gradients.
    pub unresolved_references: usize,
    /// Numbers, lengths and path data that failed to parse.
    pub invalid_numbers: usize,
    /// Colors and paints that failed to parse.
    pub invalid_colors: usize,
    /// End tags without a matching start tag.
    pub unbalanced_end_tags: usize,
    /// Elements nested deeper than [`Options::max_depth`].
    pub stack_overflows: usize,
    /// Shape elements that produced no shape.
    pub skipped_shapes: usize,
    /// The root element has a percent size, but no `viewBox` to resolve it against.
    pub relative_root_size: bool,
}

/// A resolved shape.
#[derive(Clone, PartialEq, Debug)]
pub struct Shape {
    /// Element's ID.
    pub id: Option<String>,

    /// The cascaded style of the element.
    ///
    /// `fill` and `stroke` in it are unresolved. Use [`Shape::fill`] and [`Shape::stroke`].
    pub attributes: AttributeFrame,

    /// Shape geometry in the element's user space.
    pub geometry: Geometry,

    /// Fill paint. `None` means no fill.
    pub fill: Option<Paint>,

    /// Stroke paint. `None` means no stroke.
    pub stroke: Option<Paint>,
}

impl Shape {
    /// Checks that the shape should be rendered.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.attributes.is_visible()
    }

    /// Returns the transform from the element's user space to the document space.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.attributes.transform
    }

    /// Feeds the untransformed geometry into a sink.
    pub fn replay<S: PathSink + ?Sized>(&self, sink: &mut S) {
        self.geometry.replay(sink)
    }

    /// Returns the geometry bounding box in the element's user space.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        self.geometry.bounding_box()
    }

    /// Returns the geometry bounding box in the document space.
    ///
    /// The stroke is not taken into account.
    pub fn device_bounding_box(&self) -> Option<kurbo::Rect> {
        let mut path = kurbo::BezPath::new();
        self.replay(&mut path);
        if path.segments().next().is_none() {
            return None;
        }

        let ts = self.transform();
        path.apply_affine(kurbo::Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f]));
        Some(kurbo::Shape::bounding_box(&path))
    }
}

/// A parsed document.
#[derive(Clone, Debug)]
pub struct Document {
    /// `width` of the root element. Defaults to `100%`.
    pub width: Length,

    /// `height` of the root element. Defaults to `100%`.
    pub height: Length,

    /// `viewBox` of the root element.
    pub view_box: Option<ViewBox>,

    /// `preserveAspectRatio` of the root element.
    pub aspect: AspectRatio,

    /// DPI used for units conversion.
    pub dpi: f64,

    /// Shapes in the document order.
    pub shapes: Vec<Shape>,

    /// Text of the root `title` element.
    pub title: Option<String>,

    /// Recovered problems.
    pub diagnostics: Diagnostics,

    pub(crate) size: (f64, f64),
    pub(crate) gradients: GradientRegistry,
}

impl Document {
    /// Parses a `Document` from a string.
    pub fn from_str(text: &str, opt: &Options) -> Result<Self, Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        converter::convert_doc(text, opt)
    }

    /// Parses a `Document` from raw data.
    ///
    /// The data must be UTF-8 encoded.
    pub fn from_data(data: &[u8], opt: &Options) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
        Self::from_str(text, opt)
    }

    /// Returns the document size in pixels.
    ///
    /// A percent size without a `viewBox` resolves to zero.
    #[inline]
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Returns the transform that maps the `viewBox` onto the document size.
    ///
    /// Returns an identity transform when there is no `viewBox`.
    pub fn view_transform(&self) -> Transform {
        match self.view_box {
            Some(vb) => view_box_to_transform(vb, self.aspect, self.size),
            None => Transform::default(),
        }
    }

    /// Returns all gradient definitions in the document order.
    pub fn gradients(&self) -> &[GradientDefinition] {
        self.gradients.definitions()
    }

    /// Returns a gradient definition by its ID.
    pub fn gradient(&self, id: &str) -> Option<&GradientDefinition> {
        self.gradients.get(id)
    }
}

/// Converts `viewBox` to `Transform`.
pub fn view_box_to_transform(view_box: ViewBox, aspect: AspectRatio, size: (f64, f64)) -> Transform {
    use svgshape_types::Align;

    let vr = view_box;

    let sx = size.0 / vr.w;
    let sy = size.1 / vr.h;

    let (sx, sy) = if aspect.align == Align::None {
        (sx, sy)
    } else {
        let s = if aspect.slice {
            sx.max(sy)
        } else {
            sx.min(sy)
        };

        (s, s)
    };

    let x = -vr.x * sx;
    let y = -vr.y * sy;
    let w = size.0 - vr.w * sx;
    let h = size.1 - vr.h * sy;

    let (tx, ty) = aligned_pos(aspect.align, x, y, w, h);
    Transform::new(sx, 0.0, 0.0, sy, tx, ty)
}

/// Returns object aligned position.
fn aligned_pos(align: svgshape_types::Align, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
    use svgshape_types::Align;

    match align {
        Align::None => (x, y),
        Align::XMinYMin => (x, y),
        Align::XMidYMin => (x + w / 2.0, y),
        Align::XMaxYMin => (x + w, y),
        Align::XMinYMid => (x, y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w, y + h / 2.0),
        Align::XMinYMax => (x, y + h),
        Align::XMidYMax => (x + w / 2.0, y + h),
        Align::XMaxYMax => (x + w, y + h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn meet_and_slice() {
        let vb = ViewBox::new(0.0, 0.0, 10.0, 20.0);

        let ts = view_box_to_transform(vb, AspectRatio::from_str("xMidYMid meet").unwrap(), (100.0, 100.0));
        assert_eq!(ts, Transform::new(5.0, 0.0, 0.0, 5.0, 25.0, 0.0));

        let ts = view_box_to_transform(vb, AspectRatio::from_str("xMinYMax slice").unwrap(), (100.0, 100.0));
        assert_eq!(ts, Transform::new(10.0, 0.0, 0.0, 10.0, 0.0, -100.0));

        let ts = view_box_to_transform(vb, AspectRatio::from_str("none").unwrap(), (100.0, 100.0));
        assert_eq!(ts, Transform::new(10.0, 0.0, 0.0, 5.0, 0.0, 0.0));
    }

    #[test]
    fn offset_view_box() {
        let vb = ViewBox::new(10.0, 10.0, 50.0, 50.0);
        let ts = view_box_to_transform(vb, AspectRatio::default(), (100.0, 100.0));
        assert_eq!(ts, Transform::new(2.0, 0.0, 0.0, 2.0, -20.0, -20.0));
    }
}
