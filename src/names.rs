// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

/// Supported element names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum EId {
    Circle,
    Defs,
    Ellipse,
    G,
    Line,
    LinearGradient,
    Path,
    Polygon,
    Polyline,
    RadialGradient,
    Rect,
    Stop,
    Svg,
    Title,
}

impl EId {
    pub fn from_str(text: &str) -> Option<EId> {
        let id = match text {
            "circle" => EId::Circle,
            "defs" => EId::Defs,
            "ellipse" => EId::Ellipse,
            "g" => EId::G,
            "line" => EId::Line,
            "linearGradient" => EId::LinearGradient,
            "path" => EId::Path,
            "polygon" => EId::Polygon,
            "polyline" => EId::Polyline,
            "radialGradient" => EId::RadialGradient,
            "rect" => EId::Rect,
            "stop" => EId::Stop,
            "svg" => EId::Svg,
            "title" => EId::Title,
            _ => return None,
        };

        Some(id)
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, EId::LinearGradient | EId::RadialGradient)
    }
}

/// Supported attribute names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum AId {
    Color,
    Cx,
    Cy,
    D,
    Display,
    Fill,
    FillOpacity,
    FillRule,
    FontSize,
    Fx,
    Fy,
    GradientTransform,
    GradientUnits,
    Height,
    Href,
    Id,
    Offset,
    Opacity,
    Points,
    PreserveAspectRatio,
    R,
    Rx,
    Ry,
    SpreadMethod,
    StopColor,
    StopOpacity,
    Stroke,
    StrokeDasharray,
    StrokeDashoffset,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeMiterlimit,
    StrokeOpacity,
    StrokeWidth,
    Style,
    Transform,
    ViewBox,
    Visibility,
    Width,
    X,
    X1,
    X2,
    Y,
    Y1,
    Y2,
}

impl AId {
    pub fn from_str(text: &str) -> Option<AId> {
        let id = match text {
            "color" => AId::Color,
            "cx" => AId::Cx,
            "cy" => AId::Cy,
            "d" => AId::D,
            "display" => AId::Display,
            "fill" => AId::Fill,
            "fill-opacity" => AId::FillOpacity,
            "fill-rule" => AId::FillRule,
            "font-size" => AId::FontSize,
            "fx" => AId::Fx,
            "fy" => AId::Fy,
            "gradientTransform" => AId::GradientTransform,
            "gradientUnits" => AId::GradientUnits,
            "height" => AId::Height,
            "href" | "xlink:href" => AId::Href,
            "id" => AId::Id,
            "offset" => AId::Offset,
            "opacity" => AId::Opacity,
            "points" => AId::Points,
            "preserveAspectRatio" => AId::PreserveAspectRatio,
            "r" => AId::R,
            "rx" => AId::Rx,
            "ry" => AId::Ry,
            "spreadMethod" => AId::SpreadMethod,
            "stop-color" => AId::StopColor,
            "stop-opacity" => AId::StopOpacity,
            "stroke" => AId::Stroke,
            "stroke-dasharray" => AId::StrokeDasharray,
            "stroke-dashoffset" => AId::StrokeDashoffset,
            "stroke-linecap" => AId::StrokeLinecap,
            "stroke-linejoin" => AId::StrokeLinejoin,
            "stroke-miterlimit" => AId::StrokeMiterlimit,
            "stroke-opacity" => AId::StrokeOpacity,
            "stroke-width" => AId::StrokeWidth,
            "style" => AId::Style,
            "transform" => AId::Transform,
            "viewBox" => AId::ViewBox,
            "visibility" => AId::Visibility,
            "width" => AId::Width,
            "x" => AId::X,
            "x1" => AId::X1,
            "x2" => AId::X2,
            "y" => AId::Y,
            "y1" => AId::Y1,
            "y2" => AId::Y2,
            _ => return None,
        };

        Some(id)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            AId::Color => "color",
            AId::Cx => "cx",
            AId::Cy => "cy",
            AId::D => "d",
            AId::Display => "display",
            AId::Fill => "fill",
            AId::FillOpacity => "fill-opacity",
            AId::FillRule => "fill-rule",
            AId::FontSize => "font-size",
            AId::Fx => "fx",
            AId::Fy => "fy",
            AId::GradientTransform => "gradientTransform",
            AId::GradientUnits => "gradientUnits",
            AId::Height => "height",
            AId::Href => "href",
            AId::Id => "id",
            AId::Offset => "offset",
            AId::Opacity => "opacity",
            AId::Points => "points",
            AId::PreserveAspectRatio => "preserveAspectRatio",
            AId::R => "r",
            AId::Rx => "rx",
            AId::Ry => "ry",
            AId::SpreadMethod => "spreadMethod",
            AId::StopColor => "stop-color",
            AId::StopOpacity => "stop-opacity",
            AId::Stroke => "stroke",
            AId::StrokeDasharray => "stroke-dasharray",
            AId::StrokeDashoffset => "stroke-dashoffset",
            AId::StrokeLinecap => "stroke-linecap",
            AId::StrokeLinejoin => "stroke-linejoin",
            AId::StrokeMiterlimit => "stroke-miterlimit",
            AId::StrokeOpacity => "stroke-opacity",
            AId::StrokeWidth => "stroke-width",
            AId::Style => "style",
            AId::Transform => "transform",
            AId::ViewBox => "viewBox",
            AId::Visibility => "visibility",
            AId::Width => "width",
            AId::X => "x",
            AId::X1 => "x1",
            AId::X2 => "x2",
            AId::Y => "y",
            AId::Y1 => "y1",
            AId::Y2 => "y2",
        }
    }

    /// Attributes handled by the cascade.
    pub fn is_presentation(&self) -> bool {
        self.is_style_property() || matches!(self, AId::Id | AId::Offset | AId::Transform)
    }

    /// Properties accepted inside the `style` attribute.
    pub fn is_style_property(&self) -> bool {
        matches!(
            self,
            AId::Color
                | AId::Display
                | AId::Fill
                | AId::FillOpacity
                | AId::FillRule
                | AId::FontSize
                | AId::Opacity
                | AId::StopColor
                | AId::StopOpacity
                | AId::Stroke
                | AId::StrokeDasharray
                | AId::StrokeDashoffset
                | AId::StrokeLinecap
                | AId::StrokeLinejoin
                | AId::StrokeMiterlimit
                | AId::StrokeOpacity
                | AId::StrokeWidth
                | AId::Visibility
        )
    }
}

impl fmt::Display for AId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Returns the value of the first attribute with the specified name.
pub(crate) fn find_attribute<'a>(attrs: &[(&str, &'a str)], aid: AId) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(name, _)| AId::from_str(name) == Some(aid))
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_properties() {
        assert!(AId::Fill.is_style_property());
        assert!(AId::FontSize.is_style_property());
        assert!(!AId::Id.is_style_property());
        assert!(!AId::Offset.is_style_property());
        assert!(!AId::Transform.is_style_property());
        assert!(AId::Transform.is_presentation());
        assert!(!AId::Width.is_presentation());
    }

    #[test]
    fn attribute_names_round_trip() {
        for name in ["fill", "stroke-dasharray", "gradientTransform", "viewBox", "y2"] {
            let aid = AId::from_str(name).unwrap();
            assert_eq!(aid.to_str(), name);
        }
    }

    #[test]
    fn xlink_href() {
        assert_eq!(AId::from_str("xlink:href"), Some(AId::Href));
        assert_eq!(AId::from_str("href"), Some(AId::Href));
    }

    #[test]
    fn find_by_alias() {
        let attrs = [("id", "a"), ("xlink:href", "#b"), ("href", "#c")];
        assert_eq!(find_attribute(&attrs, AId::Href), Some("#b"));
        assert_eq!(find_attribute(&attrs, AId::X), None);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(EId::from_str("lineargradient"), None);
        assert_eq!(EId::from_str("RECT"), None);
        assert_eq!(AId::from_str("viewbox"), None);
    }
}
