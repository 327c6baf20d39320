/*!
*svgshape-types* is a collection of parsers for SVG attribute values.

It is the lowest layer of `svgshape`: every parser here works on a borrowed
string, never allocates for the data it returns and reports problems through
[`Error`]. Deciding what to do with an invalid value (ignore it, substitute a
default, count it) is up to the caller.

## Supported types

- `<number>` and `<list-of-numbers>`
- `<length>` and `<list-of-lengths>`
- `<color>`: `#rgb`, `#rrggbb`, `rgb()` with integer or percent channels, named colors
- `<paint>`: `none`, `inherit`, `currentColor`, `<color>`, `url(#id) [fallback]`
- same-document references: `#id` and `url(#id)`
- `<transform-list>`: `matrix`, `translate`, `scale`, `rotate`, `skewX`, `skewY`
- path data, including implicit commands and packed arc flags
- `<list-of-points>`
- `viewBox` and `preserveAspectRatio`

## Safety

- The library should not panic on any input.
- The library forbids unsafe code.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

mod aspect_ratio;
mod color;
#[rustfmt::skip] mod colors;
mod error;
mod funciri;
mod length;
mod number;
mod paint;
mod path;
mod points;
mod stream;
mod transform;
mod viewbox;

pub use crate::aspect_ratio::*;
pub use crate::color::*;
pub use crate::error::*;
pub use crate::funciri::*;
pub use crate::length::*;
pub use crate::number::*;
pub use crate::paint::*;
pub use crate::path::*;
pub use crate::points::*;
pub use crate::stream::{ByteExt, Stream};
pub use crate::transform::*;
pub use crate::viewbox::*;
