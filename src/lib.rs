// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgshape` is a small, forgiving parser for a subset of [SVG].

It reads a document in a single pass and produces a flat list of resolved shapes.
Every shape carries its geometry, its fully cascaded style, a document-space transform
and resolved fill and stroke paints. There is no document tree to walk afterwards.

## Features

- Basic shapes: `rect`, `circle`, `ellipse`, `line`, `polyline`, `polygon` and `path`
- Presentation attributes and the `style` attribute, inherited through `g` and `svg`
- Nested transforms are folded into a single transform per shape
- Relative length units (`mm`, `em`, `%`, etc.) are converted into user units
- Linear and radial gradients, including `href` stop inheritance and forward references
- `viewBox` and `preserveAspectRatio` of the root element
- Malformed input never fails the parsing. Recoverable problems are counted
  in [`Diagnostics`] and logged via the `log` crate

## Limitations

- No CSS stylesheets, text, images, `use`, clipping, masking, markers or filters
- Only the predefined XML entities are decoded
- Only [static](http://www.w3.org/TR/SVG11/feature#SVG-static) SVG features

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

mod cascade;
mod converter;
mod error;
mod geom;
mod names;
mod options;
mod paint_server;
mod shapes;
mod style;
mod tokenizer;
mod tree;
mod units;

pub use svgshape_types::{
    Align, AspectRatio, Color, Length, LengthUnit, PathSegment, Transform, ViewBox,
};

pub use crate::error::Error;
pub use crate::geom::{replay, PathSink};
pub use crate::options::Options;
pub use crate::paint_server::{GradientDefinition, GradientKind, MAX_HREF_HOPS};
pub use crate::shapes::Geometry;
pub use crate::style::{AttributeFrame, FillRule, LineCap, LineJoin, PaintValue, MAX_DASHES};
pub use crate::tokenizer::{tokenize, TagHandler};
pub use crate::tree::{
    view_box_to_transform, BaseGradient, Diagnostics, Document, LinearGradient, Paint,
    RadialGradient, Shape, SpreadMethod, Stop, Units,
};

trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}
