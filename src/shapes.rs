// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgshape_types::{Length, PathParser, PathSegment, PointsParser};

use crate::geom::{self, IsValidLength, PathSink};
use crate::names::{find_attribute, AId, EId};
use crate::tree::Diagnostics;
use crate::units::{self, Axis, Resolver};

/// Shape geometry in the element's user space.
#[derive(Clone, PartialEq, Debug)]
pub enum Geometry {
    /// Path segments as written in the `d` attribute.
    Path(Vec<PathSegment>),
    /// A rectangle with resolved corner radii.
    #[allow(missing_docs)]
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        ry: f64,
    },
    /// An ellipse. Circles are stored as ellipses with equal radii.
    #[allow(missing_docs)]
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    /// A single line.
    #[allow(missing_docs)]
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// A `polyline` or a closed `polygon`.
    #[allow(missing_docs)]
    Polyline { points: Vec<(f64, f64)>, closed: bool },
}

impl Geometry {
    /// Returns a short geometry name.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Path(_) => "path",
            Geometry::Rect { .. } => "rect",
            Geometry::Ellipse { .. } => "ellipse",
            Geometry::Line { .. } => "line",
            Geometry::Polyline { closed: false, .. } => "polyline",
            Geometry::Polyline { closed: true, .. } => "polygon",
        }
    }

    /// Feeds the geometry into a sink.
    ///
    /// Primitive shapes use the sink's `add_*` methods.
    pub fn replay<S: PathSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Geometry::Path(ref segments) => geom::replay(segments, sink),
            Geometry::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => sink.add_rect(*x, *y, *width, *height, *rx, *ry),
            Geometry::Ellipse { cx, cy, rx, ry } => sink.add_ellipse(*cx, *cy, *rx, *ry),
            Geometry::Line { x1, y1, x2, y2 } => {
                sink.move_to(*x1, *y1);
                sink.line_to(*x2, *y2);
            }
            Geometry::Polyline { ref points, closed } => sink.add_polygon(points, *closed),
        }
    }

    /// Converts the geometry into absolute path segments.
    pub fn to_segments(&self) -> Vec<PathSegment> {
        match self {
            Geometry::Path(ref segments) => segments.clone(),
            Geometry::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => rect_to_segments(*x, *y, *width, *height, *rx, *ry),
            Geometry::Ellipse { cx, cy, rx, ry } => {
                let (cx, cy, rx, ry) = (*cx, *cy, *rx, *ry);
                let arc = |x, y| arc_segment(rx, ry, x, y);
                vec![
                    PathSegment::MoveTo { abs: true, x: cx + rx, y: cy },
                    arc(cx, cy + ry),
                    arc(cx - rx, cy),
                    arc(cx, cy - ry),
                    arc(cx + rx, cy),
                    PathSegment::ClosePath { abs: true },
                ]
            }
            Geometry::Line { x1, y1, x2, y2 } => vec![
                PathSegment::MoveTo { abs: true, x: *x1, y: *y1 },
                PathSegment::LineTo { abs: true, x: *x2, y: *y2 },
            ],
            Geometry::Polyline { ref points, closed } => {
                let mut segments = Vec::with_capacity(points.len() + 1);
                for (i, &(x, y)) in points.iter().enumerate() {
                    if i == 0 {
                        segments.push(PathSegment::MoveTo { abs: true, x, y });
                    } else {
                        segments.push(PathSegment::LineTo { abs: true, x, y });
                    }
                }

                if *closed {
                    segments.push(PathSegment::ClosePath { abs: true });
                }

                segments
            }
        }
    }

    /// Returns the tight bounding box in the element's user space.
    ///
    /// Returns `None` for geometry without any drawing segments.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        let mut path = kurbo::BezPath::new();
        self.replay(&mut path);
        if path.segments().next().is_none() {
            return None;
        }

        Some(kurbo::Shape::bounding_box(&path))
    }
}

fn arc_segment(rx: f64, ry: f64, x: f64, y: f64) -> PathSegment {
    PathSegment::EllipticalArc {
        abs: true,
        rx,
        ry,
        x_axis_rotation: 0.0,
        large_arc: false,
        sweep: true,
        x,
        y,
    }
}

fn rect_to_segments(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) -> Vec<PathSegment> {
    if rx == 0.0 || ry == 0.0 {
        return vec![
            PathSegment::MoveTo { abs: true, x, y },
            PathSegment::HorizontalLineTo { abs: true, x: x + w },
            PathSegment::VerticalLineTo { abs: true, y: y + h },
            PathSegment::HorizontalLineTo { abs: true, x },
            PathSegment::ClosePath { abs: true },
        ];
    }

    vec![
        PathSegment::MoveTo { abs: true, x: x + rx, y },
        PathSegment::HorizontalLineTo { abs: true, x: x + w - rx },
        arc_segment(rx, ry, x + w, y + ry),
        PathSegment::VerticalLineTo { abs: true, y: y + h - ry },
        arc_segment(rx, ry, x + w - rx, y + h),
        PathSegment::HorizontalLineTo { abs: true, x: x + rx },
        arc_segment(rx, ry, x, y + h - ry),
        PathSegment::VerticalLineTo { abs: true, y: y + ry },
        arc_segment(rx, ry, x + rx, y),
        PathSegment::ClosePath { abs: true },
    ]
}

/// Builds the geometry of a shape element.
///
/// Returns `None` and counts a skipped shape when the element cannot be rendered.
pub(crate) fn convert(
    eid: EId,
    attrs: &[(&str, &str)],
    resolver: &Resolver,
    diag: &mut Diagnostics,
) -> Option<Geometry> {
    let mut conv = ShapeConverter {
        attrs,
        resolver,
        diag,
    };

    let geometry = match eid {
        EId::Rect => conv.convert_rect(),
        EId::Circle => conv.convert_circle(),
        EId::Ellipse => conv.convert_ellipse(),
        EId::Line => Some(conv.convert_line()),
        EId::Polyline => conv.convert_points(false),
        EId::Polygon => conv.convert_points(true),
        EId::Path => conv.convert_path(),
        _ => return None,
    };

    if geometry.is_none() {
        conv.diag.skipped_shapes += 1;
    }

    geometry
}

struct ShapeConverter<'a, 'b> {
    attrs: &'a [(&'a str, &'a str)],
    resolver: &'a Resolver,
    diag: &'b mut Diagnostics,
}

impl ShapeConverter<'_, '_> {
    fn element_id(&self) -> &str {
        find_attribute(self.attrs, AId::Id).unwrap_or_default()
    }

    fn length(&mut self, aid: AId) -> Option<Length> {
        let value = find_attribute(self.attrs, aid)?;
        Some(units::parse_length_lossy(value, self.diag))
    }

    fn coordinate(&mut self, aid: AId, axis: Axis) -> f64 {
        let length = self.length(aid).unwrap_or_default();
        self.resolver.coordinate(length, axis)
    }

    fn size(&mut self, aid: AId, axis: Axis) -> f64 {
        let length = self.length(aid).unwrap_or_default();
        self.resolver.size(length, axis)
    }

    fn convert_rect(&mut self) -> Option<Geometry> {
        // 'width' and 'height' attributes must be positive and non-zero.
        let width = self.size(AId::Width, Axis::X);
        let height = self.size(AId::Height, Axis::Y);
        if !width.is_valid_length() {
            log::warn!("Rect '{}' has an invalid 'width' value. Skipped.", self.element_id());
            return None;
        }
        if !height.is_valid_length() {
            log::warn!("Rect '{}' has an invalid 'height' value. Skipped.", self.element_id());
            return None;
        }

        let x = self.coordinate(AId::X, Axis::X);
        let y = self.coordinate(AId::Y, Axis::Y);

        let (mut rx, mut ry) = self.resolve_rx_ry();

        // Clamp rx/ry to the half of the width/height.
        //
        // Should be done only after resolving.
        if rx > width / 2.0 {
            rx = width / 2.0;
        }
        if ry > height / 2.0 {
            ry = height / 2.0;
        }

        Some(Geometry::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        })
    }

    fn resolve_rx_ry(&mut self) -> (f64, f64) {
        let mut rx_opt = self.length(AId::Rx);
        let mut ry_opt = self.length(AId::Ry);

        // Remove negative values first.
        if let Some(v) = rx_opt {
            if v.number.is_sign_negative() {
                rx_opt = None;
            }
        }
        if let Some(v) = ry_opt {
            if v.number.is_sign_negative() {
                ry_opt = None;
            }
        }

        // Resolve.
        let r = self.resolver;
        match (rx_opt, ry_opt) {
            (None, None) => (0.0, 0.0),
            (Some(rx), None) => {
                let rx = r.size(rx, Axis::X);
                (rx, rx)
            }
            (None, Some(ry)) => {
                let ry = r.size(ry, Axis::Y);
                (ry, ry)
            }
            (Some(rx), Some(ry)) => (r.size(rx, Axis::X), r.size(ry, Axis::Y)),
        }
    }

    fn convert_circle(&mut self) -> Option<Geometry> {
        let cx = self.coordinate(AId::Cx, Axis::X);
        let cy = self.coordinate(AId::Cy, Axis::Y);
        let r = self.size(AId::R, Axis::Diagonal);

        if !r.is_valid_length() {
            log::warn!("Circle '{}' has an invalid 'r' value. Skipped.", self.element_id());
            return None;
        }

        Some(Geometry::Ellipse { cx, cy, rx: r, ry: r })
    }

    fn convert_ellipse(&mut self) -> Option<Geometry> {
        let cx = self.coordinate(AId::Cx, Axis::X);
        let cy = self.coordinate(AId::Cy, Axis::Y);
        let rx = self.size(AId::Rx, Axis::X);
        let ry = self.size(AId::Ry, Axis::Y);

        if !rx.is_valid_length() {
            log::warn!("Ellipse '{}' has an invalid 'rx' value. Skipped.", self.element_id());
            return None;
        }

        if !ry.is_valid_length() {
            log::warn!("Ellipse '{}' has an invalid 'ry' value. Skipped.", self.element_id());
            return None;
        }

        Some(Geometry::Ellipse { cx, cy, rx, ry })
    }

    fn convert_line(&mut self) -> Geometry {
        Geometry::Line {
            x1: self.coordinate(AId::X1, Axis::X),
            y1: self.coordinate(AId::Y1, Axis::Y),
            x2: self.coordinate(AId::X2, Axis::X),
            y2: self.coordinate(AId::Y2, Axis::Y),
        }
    }

    fn convert_points(&mut self, closed: bool) -> Option<Geometry> {
        let name = if closed { "Polygon" } else { "Polyline" };
        let text = match find_attribute(self.attrs, AId::Points) {
            Some(text) => text,
            None => {
                log::warn!("{} '{}' has no 'points' attribute. Skipped.", name, self.element_id());
                return None;
            }
        };

        let points: Vec<_> = PointsParser::from(text).collect();

        // 'polyline' and 'polygon' elements must contain at least 2 points.
        if points.len() < 2 {
            log::warn!("{} '{}' has less than 2 points. Skipped.", name, self.element_id());
            return None;
        }

        Some(Geometry::Polyline { points, closed })
    }

    fn convert_path(&mut self) -> Option<Geometry> {
        let value = find_attribute(self.attrs, AId::D).unwrap_or_default();
        let mut segments = Vec::new();
        for segment in PathParser::from(value) {
            match segment {
                Ok(v) => segments.push(v),
                Err(e) => {
                    log::warn!(
                        "Path '{}' has an invalid 'd' value cause {}. Only {} segments are kept.",
                        self.element_id(),
                        e,
                        segments.len()
                    );
                    self.diag.invalid_numbers += 1;
                    break;
                }
            }
        }

        if segments.is_empty() {
            log::warn!("Path '{}' has no segments. Skipped.", self.element_id());
            return None;
        }

        Some(Geometry::Path(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Viewport;

    fn resolver() -> Resolver {
        Resolver {
            dpi: 96.0,
            viewport: Viewport::new(0.0, 0.0, 200.0, 100.0),
            font_size: 12.0,
        }
    }

    fn conv(eid: EId, attrs: &[(&str, &str)]) -> (Option<Geometry>, Diagnostics) {
        let mut diag = Diagnostics::default();
        let geometry = convert(eid, attrs, &resolver(), &mut diag);
        (geometry, diag)
    }

    #[test]
    fn rect_missing_ry_copies_rx() {
        let (g, _) = conv(EId::Rect, &[("width", "40"), ("height", "20"), ("rx", "5")]);
        assert_eq!(g, Some(Geometry::Rect { x: 0.0, y: 0.0, width: 40.0, height: 20.0, rx: 5.0, ry: 5.0 }));
    }

    #[test]
    fn rect_radii_are_clamped() {
        let (g, _) = conv(EId::Rect, &[("width", "40"), ("height", "20"), ("rx", "30")]);
        assert_eq!(g, Some(Geometry::Rect { x: 0.0, y: 0.0, width: 40.0, height: 20.0, rx: 20.0, ry: 10.0 }));
    }

    #[test]
    fn rect_negative_radius_is_ignored() {
        let (g, _) = conv(EId::Rect, &[("width", "40"), ("height", "20"), ("rx", "-3"), ("ry", "4")]);
        assert_eq!(g, Some(Geometry::Rect { x: 0.0, y: 0.0, width: 40.0, height: 20.0, rx: 4.0, ry: 4.0 }));
    }

    #[test]
    fn rect_percent() {
        let (g, _) = conv(EId::Rect, &[("x", "10%"), ("width", "50%"), ("height", "50%")]);
        assert_eq!(g, Some(Geometry::Rect { x: 20.0, y: 0.0, width: 100.0, height: 50.0, rx: 0.0, ry: 0.0 }));
    }

    #[test]
    fn zero_sized_shapes_are_skipped() {
        let (g, diag) = conv(EId::Rect, &[("width", "0"), ("height", "20")]);
        assert_eq!(g, None);
        assert_eq!(diag.skipped_shapes, 1);

        assert_eq!(conv(EId::Circle, &[("r", "0")]).0, None);
        assert_eq!(conv(EId::Circle, &[]).0, None);
        assert_eq!(conv(EId::Ellipse, &[("rx", "5"), ("ry", "-1")]).0, None);
    }

    #[test]
    fn circle() {
        let (g, _) = conv(EId::Circle, &[("cx", "5"), ("cy", "6"), ("r", "7")]);
        assert_eq!(g, Some(Geometry::Ellipse { cx: 5.0, cy: 6.0, rx: 7.0, ry: 7.0 }));
    }

    #[test]
    fn polyline_needs_two_points() {
        assert_eq!(conv(EId::Polyline, &[("points", "10 20")]).0, None);
        let (g, _) = conv(EId::Polygon, &[("points", "0,0 10,0 10,10 5")]);
        assert_eq!(g, Some(Geometry::Polyline {
            points: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
            closed: true,
        }));
    }

    #[test]
    fn path_keeps_valid_prefix() {
        let (g, diag) = conv(EId::Path, &[("d", "M 10 20 L 30 40 L 50 x")]);
        assert_eq!(g, Some(Geometry::Path(vec![
            PathSegment::MoveTo { abs: true, x: 10.0, y: 20.0 },
            PathSegment::LineTo { abs: true, x: 30.0, y: 40.0 },
        ])));
        assert_eq!(diag.invalid_numbers, 1);
    }

    #[test]
    fn empty_path_is_skipped() {
        let (g, diag) = conv(EId::Path, &[("d", "L 10 20")]);
        assert_eq!(g, None);
        assert_eq!(diag.skipped_shapes, 1);
    }

    #[test]
    fn rect_segments() {
        let g = Geometry::Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0, rx: 0.0, ry: 0.0 };
        assert_eq!(g.to_segments(), vec![
            PathSegment::MoveTo { abs: true, x: 1.0, y: 2.0 },
            PathSegment::HorizontalLineTo { abs: true, x: 4.0 },
            PathSegment::VerticalLineTo { abs: true, y: 6.0 },
            PathSegment::HorizontalLineTo { abs: true, x: 1.0 },
            PathSegment::ClosePath { abs: true },
        ]);
    }

    #[test]
    fn bounding_boxes() {
        let g = Geometry::Ellipse { cx: 10.0, cy: 10.0, rx: 5.0, ry: 2.0 };
        let bbox = g.bounding_box().unwrap();
        assert!((bbox.x0 - 5.0).abs() < 1e-6 && (bbox.x1 - 15.0).abs() < 1e-6);
        assert!((bbox.y0 - 8.0).abs() < 1e-6 && (bbox.y1 - 12.0).abs() < 1e-6);

        let g = Geometry::Path(vec![PathSegment::MoveTo { abs: true, x: 1.0, y: 1.0 }]);
        assert_eq!(g.bounding_box(), None);
    }
}
