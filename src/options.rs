// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Processing options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f64,

    /// A default font size.
    ///
    /// Will be used when no `font-size` attribute is set in the SVG.
    /// Affects `em` and `ex` units.
    ///
    /// Default: 12
    pub font_size: f64,

    /// The maximum number of elements a document may have.
    ///
    /// Parsing fails with [`Error::ElementsLimitReached`](crate::Error::ElementsLimitReached)
    /// when the limit is exceeded. `None` disables the check.
    ///
    /// Default: 1_000_000
    pub max_elements: Option<usize>,

    /// The maximum nesting depth of the attribute stack.
    ///
    /// Elements nested deeper are ignored, but their children are still scanned.
    ///
    /// Default: 128
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            dpi: 96.0,
            font_size: 12.0,
            max_elements: Some(1_000_000),
            max_depth: 128,
        }
    }
}
