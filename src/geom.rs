// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use float_cmp::ApproxEqUlps;
use svgshape_types::PathSegment;

/// Checks that the current number is > 0.
pub(crate) trait IsValidLength {
    /// Checks that the current number is > 0.
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f64 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0 && self.is_finite()
    }
}

/// A consumer of shape geometry.
///
/// Only the segment-level methods are required. Arcs and primitive shapes
/// are converted into them by default, but a sink with native support
/// for them can override the corresponding methods.
pub trait PathSink {
    /// Starts a new subpath.
    fn move_to(&mut self, x: f64, y: f64);

    /// Adds a straight line.
    fn line_to(&mut self, x: f64, y: f64);

    /// Adds a quadratic curve.
    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);

    /// Adds a cubic curve.
    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);

    /// Closes the current subpath.
    fn close(&mut self);

    /// Adds an SVG elliptical arc starting at `from`.
    ///
    /// By default, the arc is approximated with cubic curves.
    /// A zero radius produces a line.
    #[allow(clippy::too_many_arguments)]
    fn arc_to(
        &mut self,
        from: (f64, f64),
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) {
        let svg_arc = kurbo::SvgArc {
            from: kurbo::Point::new(from.0, from.1),
            to: kurbo::Point::new(x, y),
            radii: kurbo::Vec2::new(rx, ry),
            x_rotation: x_axis_rotation.to_radians(),
            large_arc,
            sweep,
        };

        match kurbo::Arc::from_svg_arc(&svg_arc) {
            Some(arc) => {
                arc.to_cubic_beziers(0.1, |p1, p2, p| {
                    self.cubic_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y);
                });
            }
            None => {
                self.line_to(x, y);
            }
        }
    }

    /// Adds a closed rectangle, optionally with rounded corners.
    ///
    /// Radii are expected to be already clamped to the half of the size.
    #[allow(clippy::too_many_arguments)]
    fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) {
        // Conversion according to https://www.w3.org/TR/SVG11/shapes.html#RectElement
        if rx.approx_eq_ulps(&0.0, 4) || ry.approx_eq_ulps(&0.0, 4) {
            self.move_to(x, y);
            self.line_to(x + width, y);
            self.line_to(x + width, y + height);
            self.line_to(x, y + height);
            self.close();
            return;
        }

        self.move_to(x + rx, y);

        self.line_to(x + width - rx, y);
        self.arc_to((x + width - rx, y), rx, ry, 0.0, false, true, x + width, y + ry);

        self.line_to(x + width, y + height - ry);
        self.arc_to((x + width, y + height - ry), rx, ry, 0.0, false, true, x + width - rx, y + height);

        self.line_to(x + rx, y + height);
        self.arc_to((x + rx, y + height), rx, ry, 0.0, false, true, x, y + height - ry);

        self.line_to(x, y + ry);
        self.arc_to((x, y + ry), rx, ry, 0.0, false, true, x + rx, y);

        self.close();
    }

    /// Adds a closed ellipse.
    fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.move_to(cx + rx, cy);
        self.arc_to((cx + rx, cy), rx, ry, 0.0, false, true, cx, cy + ry);
        self.arc_to((cx, cy + ry), rx, ry, 0.0, false, true, cx - rx, cy);
        self.arc_to((cx - rx, cy), rx, ry, 0.0, false, true, cx, cy - ry);
        self.arc_to((cx, cy - ry), rx, ry, 0.0, false, true, cx + rx, cy);
        self.close();
    }

    /// Adds a polyline, closing it when `closed` is set.
    fn add_polygon(&mut self, points: &[(f64, f64)], closed: bool) {
        let mut iter = points.iter();
        let (x, y) = match iter.next() {
            Some(p) => *p,
            None => return,
        };

        self.move_to(x, y);
        for &(x, y) in iter {
            self.line_to(x, y);
        }

        if closed {
            self.close();
        }
    }
}

/// Feeds path segments into a sink.
///
/// Relative coordinates, horizontal and vertical lines and smooth curves
/// are resolved here, so the sink receives only absolute coordinates.
pub fn replay<S: PathSink + ?Sized>(segments: &[PathSegment], sink: &mut S) {
    let mut replayer = Replayer {
        pos: (0.0, 0.0),
        start: (0.0, 0.0),
        prev_cubic: None,
        prev_quad: None,
        need_move: true,
    };

    for segment in segments {
        replayer.push(*segment, sink);
    }
}

struct Replayer {
    pos: (f64, f64),
    start: (f64, f64),
    // The second control point of the previous C/S segment.
    prev_cubic: Option<(f64, f64)>,
    // The control point of the previous Q/T segment.
    prev_quad: Option<(f64, f64)>,
    need_move: bool,
}

impl Replayer {
    fn push<S: PathSink + ?Sized>(&mut self, segment: PathSegment, sink: &mut S) {
        let mut prev_cubic = None;
        let mut prev_quad = None;

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                sink.move_to(p.0, p.1);
                self.pos = p;
                self.start = p;
                self.need_move = false;
            }
            PathSegment::LineTo { abs, x, y } => {
                self.ensure_move(sink);
                let p = self.resolve(abs, x, y);
                sink.line_to(p.0, p.1);
                self.pos = p;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                self.ensure_move(sink);
                let x = if abs { x } else { self.pos.0 + x };
                sink.line_to(x, self.pos.1);
                self.pos.0 = x;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                self.ensure_move(sink);
                let y = if abs { y } else { self.pos.1 + y };
                sink.line_to(self.pos.0, y);
                self.pos.1 = y;
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                self.ensure_move(sink);
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                sink.cubic_to(c1.0, c1.1, c2.0, c2.1, p.0, p.1);
                prev_cubic = Some(c2);
                self.pos = p;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                self.ensure_move(sink);
                let c1 = self.reflect(self.prev_cubic);
                let c2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                sink.cubic_to(c1.0, c1.1, c2.0, c2.1, p.0, p.1);
                prev_cubic = Some(c2);
                self.pos = p;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                self.ensure_move(sink);
                let c = self.resolve(abs, x1, y1);
                let p = self.resolve(abs, x, y);
                sink.quad_to(c.0, c.1, p.0, p.1);
                prev_quad = Some(c);
                self.pos = p;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                self.ensure_move(sink);
                let c = self.reflect(self.prev_quad);
                let p = self.resolve(abs, x, y);
                sink.quad_to(c.0, c.1, p.0, p.1);
                prev_quad = Some(c);
                self.pos = p;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                self.ensure_move(sink);
                let p = self.resolve(abs, x, y);
                sink.arc_to(self.pos, rx, ry, x_axis_rotation, large_arc, sweep, p.0, p.1);
                self.pos = p;
            }
            PathSegment::ClosePath { .. } => {
                if !self.need_move {
                    sink.close();
                }

                self.pos = self.start;
                self.need_move = true;
            }
        }

        self.prev_cubic = prev_cubic;
        self.prev_quad = prev_quad;
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> (f64, f64) {
        if abs {
            (x, y)
        } else {
            (self.pos.0 + x, self.pos.1 + y)
        }
    }

    // Reflects a control point across the current point.
    // Without a previous control point, the current point is used.
    fn reflect(&self, prev: Option<(f64, f64)>) -> (f64, f64) {
        match prev {
            Some((x, y)) => (self.pos.0 * 2.0 - x, self.pos.1 * 2.0 - y),
            None => self.pos,
        }
    }

    fn ensure_move<S: PathSink + ?Sized>(&mut self, sink: &mut S) {
        if self.need_move {
            sink.move_to(self.start.0, self.start.1);
            self.need_move = false;
        }
    }
}

impl PathSink for kurbo::BezPath {
    fn move_to(&mut self, x: f64, y: f64) {
        kurbo::BezPath::move_to(self, (x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        kurbo::BezPath::line_to(self, (x, y));
    }

    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        kurbo::BezPath::quad_to(self, (x1, y1), (x, y));
    }

    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        kurbo::BezPath::curve_to(self, (x1, y1), (x2, y2), (x, y));
    }

    fn close(&mut self) {
        self.close_path();
    }
}

impl PathSink for tiny_skia_path::PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        tiny_skia_path::PathBuilder::move_to(self, x as f32, y as f32);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        tiny_skia_path::PathBuilder::line_to(self, x as f32, y as f32);
    }

    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        tiny_skia_path::PathBuilder::quad_to(self, x1 as f32, y1 as f32, x as f32, y as f32);
    }

    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        tiny_skia_path::PathBuilder::cubic_to(
            self, x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
        );
    }

    fn close(&mut self) {
        tiny_skia_path::PathBuilder::close(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::ParamCurve;
    use svgshape_types::PathParser;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl PathSink for Recorder {
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("M {} {}", x, y));
        }

        fn line_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("L {} {}", x, y));
        }

        fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
            self.0.push(format!("Q {} {} {} {}", x1, y1, x, y));
        }

        fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
            self.0.push(format!("C {} {} {} {} {} {}", x1, y1, x2, y2, x, y));
        }

        fn close(&mut self) {
            self.0.push("Z".to_string());
        }
    }

    fn replay_str(text: &str) -> Vec<String> {
        let segments: Vec<_> = PathParser::from(text).map(|s| s.unwrap()).collect();
        let mut rec = Recorder::default();
        replay(&segments, &mut rec);
        rec.0
    }

    #[test]
    fn relative_coordinates() {
        assert_eq!(replay_str("m 10 20 l 5 5 h 10 v -5"),
                   vec!["M 10 20", "L 15 25", "L 25 25", "L 25 20"]);
    }

    #[test]
    fn smooth_cubic_reflects_previous_control_point() {
        assert_eq!(replay_str("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0"),
                   vec!["M 0 0", "C 0 10 10 10 10 0", "C 10 -10 20 -10 20 0"]);
    }

    #[test]
    fn smooth_cubic_after_smooth_cubic() {
        assert_eq!(replay_str("M 0 0 S 10 10 10 0 s 10 -10 10 0"),
                   vec!["M 0 0", "C 0 0 10 10 10 0", "C 10 -10 20 -10 20 0"]);
    }

    #[test]
    fn smooth_cubic_after_line_uses_current_point() {
        assert_eq!(replay_str("M 0 0 L 10 0 S 20 10 20 0"),
                   vec!["M 0 0", "L 10 0", "C 10 0 20 10 20 0"]);
    }

    #[test]
    fn smooth_quad_chain() {
        assert_eq!(replay_str("M 0 0 Q 5 10 10 0 T 20 0 T 30 0"),
                   vec!["M 0 0", "Q 5 10 10 0", "Q 15 -10 20 0", "Q 25 10 30 0"]);
    }

    #[test]
    fn smooth_quad_after_cubic_uses_current_point() {
        assert_eq!(replay_str("M 0 0 C 0 10 10 10 10 0 T 20 0"),
                   vec!["M 0 0", "C 0 10 10 10 10 0", "Q 10 0 20 0"]);
    }

    #[test]
    fn close_resets_current_point() {
        assert_eq!(replay_str("M 10 10 l 10 0 z l 0 10 m 5 5 l 1 1"),
                   vec!["M 10 10", "L 20 10", "Z", "M 10 10", "L 10 20", "M 15 25", "L 16 26"]);
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        assert_eq!(replay_str("M 0 0 A 0 0 0 0 1 10 10"), vec!["M 0 0", "L 10 10"]);
    }

    #[test]
    fn arc_ends_at_target() {
        let mut path = kurbo::BezPath::new();
        replay(&PathParser::from("M 0 0 a 10 10 0 0 1 20 0").map(|s| s.unwrap()).collect::<Vec<_>>(),
               &mut path);
        let end = path.segments().last().unwrap().end();
        assert!((end.x - 20.0).abs() < 1e-9 && end.y.abs() < 1e-9);
    }

    #[test]
    fn polygon() {
        let mut rec = Recorder::default();
        rec.add_polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], true);
        assert_eq!(rec.0, vec!["M 0 0", "L 10 0", "L 10 10", "Z"]);
    }

    #[test]
    fn sharp_rect() {
        let mut rec = Recorder::default();
        rec.add_rect(1.0, 2.0, 3.0, 4.0, 0.0, 0.0);
        assert_eq!(rec.0, vec!["M 1 2", "L 4 2", "L 4 6", "L 1 6", "Z"]);
    }

    #[test]
    fn rounded_rect_into_tiny_skia() {
        let mut builder = tiny_skia_path::PathBuilder::new();
        builder.add_rect(0.0, 0.0, 20.0, 10.0, 5.0, 5.0);
        let path = builder.finish().unwrap();
        let bounds = path.bounds();
        assert!((bounds.width() - 20.0).abs() < 1e-3);
        assert!((bounds.height() - 10.0).abs() < 1e-3);
    }
}
