// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use svgshape_types::{Color, Length, LengthUnit as Unit, Transform, IRI};

use crate::geom::IsValidLength;
use crate::names::{find_attribute, AId, EId};
use crate::style::{self, PaintValue};
use crate::tree::{
    BaseGradient, Diagnostics, LinearGradient, Paint, RadialGradient, SpreadMethod, Stop, Units,
};
use crate::units::{Axis, Resolver, Viewport};
use crate::OptionLog;

/// The maximum length of an `href` chain.
pub const MAX_HREF_HOPS: usize = 32;

/// Gradient geometry, as written in the document.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GradientKind {
    Linear {
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
    },
    Radial {
        cx: Length,
        cy: Length,
        r: Length,
        /// Defaults to `cx`.
        fx: Option<Length>,
        /// Defaults to `cy`.
        fy: Option<Length>,
    },
}

/// A `linearGradient` or `radialGradient` element.
#[derive(Clone, PartialEq, Debug)]
pub struct GradientDefinition {
    /// Element's ID.
    pub id: String,
    /// Gradient geometry.
    pub kind: GradientKind,
    /// `gradientUnits` value.
    pub units: Units,
    /// `spreadMethod` value.
    pub spread_method: SpreadMethod,
    /// `gradientTransform` value.
    pub transform: Transform,
    /// Own stops, sorted by offset.
    pub stops: Vec<Stop>,
    /// ID of a gradient to borrow stops from, when there are no own stops.
    pub href: Option<String>,
    /// Font size at the gradient element.
    pub(crate) font_size: f64,
}

impl GradientDefinition {
    /// Inserts a stop after all stops with a smaller or equal offset.
    pub fn add_stop(&mut self, stop: Stop) {
        let idx = self
            .stops
            .iter()
            .position(|s| s.offset > stop.offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(idx, stop);
    }
}

/// Parses a gradient element. Stops are added later.
pub(crate) fn convert_definition(
    eid: EId,
    attrs: &[(&str, &str)],
    font_size: f64,
    diag: &mut Diagnostics,
) -> Option<GradientDefinition> {
    let id = find_attribute(attrs, AId::Id)
        .filter(|id| !id.is_empty())
        .log_none(|| log::warn!("A gradient without an ID. Skipped."))?;

    let mut length = |aid: AId, def: Length| match find_attribute(attrs, aid) {
        Some(value) => crate::units::parse_length_lossy(value, diag),
        None => def,
    };

    let half = Length::new(50.0, Unit::Percent);
    let kind = match eid {
        EId::LinearGradient => GradientKind::Linear {
            x1: length(AId::X1, Length::zero()),
            y1: length(AId::Y1, Length::zero()),
            x2: length(AId::X2, Length::new(100.0, Unit::Percent)),
            y2: length(AId::Y2, Length::zero()),
        },
        EId::RadialGradient => GradientKind::Radial {
            cx: length(AId::Cx, half),
            cy: length(AId::Cy, half),
            r: length(AId::R, half),
            fx: find_attribute(attrs, AId::Fx).map(|_| length(AId::Fx, half)),
            fy: find_attribute(attrs, AId::Fy).map(|_| length(AId::Fy, half)),
        },
        _ => return None,
    };

    let units = match find_attribute(attrs, AId::GradientUnits) {
        Some("userSpaceOnUse") => Units::UserSpaceOnUse,
        Some("objectBoundingBox") | None => Units::ObjectBoundingBox,
        Some(value) => {
            log::warn!("Invalid 'gradientUnits' value: '{}'.", value);
            Units::default()
        }
    };

    let spread_method = match find_attribute(attrs, AId::SpreadMethod) {
        Some("pad") | None => SpreadMethod::Pad,
        Some("reflect") => SpreadMethod::Reflect,
        Some("repeat") => SpreadMethod::Repeat,
        Some(value) => {
            log::warn!("Invalid 'spreadMethod' value: '{}'.", value);
            SpreadMethod::default()
        }
    };

    let transform = find_attribute(attrs, AId::GradientTransform)
        .map(style::parse_transform)
        .unwrap_or_default();

    let href = find_attribute(attrs, AId::Href).and_then(|value| match IRI::from_str(value) {
        Ok(link) => Some(link.0.to_string()),
        Err(_) => {
            log::warn!("Invalid gradient reference: '{}'.", value);
            None
        }
    });

    Some(GradientDefinition {
        id: id.to_string(),
        kind,
        units,
        spread_method,
        transform,
        stops: Vec::new(),
        href,
        font_size,
    })
}

/// An ID-keyed gradient store. Keeps the document order.
#[derive(Clone, Default, Debug)]
pub(crate) struct GradientRegistry {
    definitions: Vec<GradientDefinition>,
    index: HashMap<String, usize>,
}

impl GradientRegistry {
    /// Adds a gradient. The first gradient with a specific ID wins.
    pub fn insert(&mut self, def: GradientDefinition) -> bool {
        if self.index.contains_key(&def.id) {
            log::warn!("Duplicated gradient ID '{}'. Skipped.", def.id);
            return false;
        }

        self.index.insert(def.id.clone(), self.definitions.len());
        self.definitions.push(def);
        true
    }

    pub fn get(&self, id: &str) -> Option<&GradientDefinition> {
        self.index.get(id).map(|idx| &self.definitions[*idx])
    }

    pub fn definitions(&self) -> &[GradientDefinition] {
        &self.definitions
    }

    /// Returns the stops of a gradient, following `href` links
    /// while the gradient has no own stops.
    ///
    /// Returns an empty list when the chain is broken or longer than [`MAX_HREF_HOPS`].
    /// A link to an unknown element is counted as an unresolved reference.
    pub fn resolve_stops<'a>(
        &'a self,
        def: &'a GradientDefinition,
        diag: &mut Diagnostics,
    ) -> &'a [Stop] {
        let mut def = def;
        for _ in 0..MAX_HREF_HOPS {
            if !def.stops.is_empty() {
                return &def.stops;
            }

            let link = match def.href {
                Some(ref link) => link,
                None => return &[],
            };

            def = match self.get(link) {
                Some(v) => v,
                None => {
                    log::warn!("Gradient '{}' references an unknown element '{}'.", def.id, link);
                    diag.unresolved_references += 1;
                    return &[];
                }
            };
        }

        log::warn!("Gradient '{}' has a too long or a recursive 'href' chain.", def.id);
        &[]
    }
}

/// Values required to resolve a shape paint.
pub(crate) struct PaintContext<'a> {
    pub registry: &'a GradientRegistry,
    pub dpi: f64,
    pub viewport: Viewport,
    /// The shape bounding box in its user space.
    pub bbox: Option<kurbo::Rect>,
    pub transform: Transform,
}

/// Resolves a cascaded paint into a shape paint.
pub(crate) fn resolve_paint(
    value: &PaintValue,
    opacity: f64,
    ctx: &PaintContext,
    diag: &mut Diagnostics,
) -> Option<Paint> {
    match value {
        PaintValue::None => None,
        PaintValue::Solid(color) => Some(Paint::Color {
            color: *color,
            opacity,
        }),
        PaintValue::GradientRef { id, fallback } => {
            let from_fallback = || fallback.map(|color| Paint::Color { color, opacity });

            let def = match ctx.registry.get(id) {
                Some(def) => def,
                None => {
                    log::warn!("Paint server '{}' is not found.", id);
                    diag.unresolved_references += 1;
                    return from_fallback();
                }
            };

            let stops = ctx.registry.resolve_stops(def, diag);
            match stops {
                [] => return None,
                [stop] => {
                    return Some(Paint::Color {
                        color: stop.color,
                        opacity: stop.opacity * opacity,
                    });
                }
                _ => {}
            }

            let bbox_ts = match def.units {
                Units::UserSpaceOnUse => Transform::default(),
                Units::ObjectBoundingBox => {
                    // We can use a paint server with ObjectBoundingBox units
                    // for painting only when the shape itself has a bbox.
                    //
                    // See SVG spec 7.11 for details.
                    match ctx.bbox.filter(|r| r.width().is_valid_length() && r.height().is_valid_length()) {
                        Some(r) => Transform::new(r.width(), 0.0, 0.0, r.height(), r.x0, r.y0),
                        None => {
                            log::warn!("Gradient '{}' cannot be used on a shape without a bbox.", id);
                            return from_fallback();
                        }
                    }
                }
            };

            Some(convert_gradient(def, stops, bbox_ts, opacity, ctx))
        }
    }
}

fn convert_gradient(
    def: &GradientDefinition,
    stops: &[Stop],
    bbox_ts: Transform,
    opacity: f64,
    ctx: &PaintContext,
) -> Paint {
    let resolver = Resolver {
        dpi: ctx.dpi,
        viewport: match def.units {
            Units::UserSpaceOnUse => ctx.viewport,
            Units::ObjectBoundingBox => Viewport::new(0.0, 0.0, 1.0, 1.0),
        },
        font_size: def.font_size,
    };

    let base = BaseGradient {
        id: def.id.clone(),
        units: def.units,
        transform: ctx.transform.pre_concat(&bbox_ts).pre_concat(&def.transform),
        spread_method: def.spread_method,
        stops: stops
            .iter()
            .map(|s| Stop {
                opacity: s.opacity * opacity,
                ..*s
            })
            .collect(),
    };

    match def.kind {
        GradientKind::Linear { x1, y1, x2, y2 } => Paint::LinearGradient(LinearGradient {
            x1: resolver.coordinate(x1, Axis::X),
            y1: resolver.coordinate(y1, Axis::Y),
            x2: resolver.coordinate(x2, Axis::X),
            y2: resolver.coordinate(y2, Axis::Y),
            base,
        }),
        GradientKind::Radial { cx, cy, r, fx, fy } => {
            let r = resolver.size(r, Axis::Diagonal);

            // 'A value of zero will cause the area to be painted as a single color
            // using the color and opacity of the last gradient stop.'
            //
            // https://www.w3.org/TR/SVG11/pservers.html#RadialGradientElementRAttribute
            if !r.is_valid_length() {
                let stop = base.stops[base.stops.len() - 1];
                return Paint::Color {
                    color: stop.color,
                    opacity: stop.opacity,
                };
            }

            let cx = resolver.coordinate(cx, Axis::X);
            let cy = resolver.coordinate(cy, Axis::Y);
            Paint::RadialGradient(RadialGradient {
                cx,
                cy,
                r,
                fx: fx.map_or(cx, |fx| resolver.coordinate(fx, Axis::X)),
                fy: fy.map_or(cy, |fy| resolver.coordinate(fy, Axis::Y)),
                base,
            })
        }
    }
}

/// Creates a stop from the cascaded style of a `stop` element.
pub(crate) fn convert_stop(offset: f64, color: Color, opacity: f64) -> Stop {
    Stop {
        offset: offset.max(0.0).min(1.0),
        color,
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(id: &str, href: Option<&str>, stops: &[f64]) -> GradientDefinition {
        let mut diag = Diagnostics::default();
        let mut attrs = vec![("id", id)];
        if let Some(href) = href {
            attrs.push(("href", href));
        }

        let mut def = convert_definition(EId::LinearGradient, &attrs, 12.0, &mut diag).unwrap();
        for offset in stops {
            def.add_stop(convert_stop(*offset, Color::black(), 1.0));
        }

        def
    }

    fn offsets(stops: &[Stop]) -> Vec<f64> {
        stops.iter().map(|s| s.offset).collect()
    }

    #[test]
    fn stops_are_sorted_on_insert() {
        let def = linear("a", None, &[0.5, 0.2, 0.5, 1.0, 0.0]);
        assert_eq!(offsets(&def.stops), vec![0.0, 0.2, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn linear_defaults() {
        let def = linear("a", None, &[]);
        assert_eq!(def.kind, GradientKind::Linear {
            x1: Length::zero(),
            y1: Length::zero(),
            x2: Length::new(100.0, Unit::Percent),
            y2: Length::zero(),
        });
        assert_eq!(def.units, Units::ObjectBoundingBox);
        assert_eq!(def.spread_method, SpreadMethod::Pad);
    }

    #[test]
    fn gradient_without_id_is_skipped() {
        let mut diag = Diagnostics::default();
        assert!(convert_definition(EId::RadialGradient, &[("r", "5")], 12.0, &mut diag).is_none());
    }

    #[test]
    fn first_id_wins() {
        let mut registry = GradientRegistry::default();
        assert!(registry.insert(linear("a", None, &[0.1])));
        assert!(!registry.insert(linear("a", None, &[0.9])));
        assert_eq!(offsets(&registry.get("a").unwrap().stops), vec![0.1]);
    }

    #[test]
    fn href_chain() {
        let mut registry = GradientRegistry::default();
        registry.insert(linear("a", Some("#b"), &[]));
        registry.insert(linear("b", Some("#c"), &[]));
        registry.insert(linear("c", None, &[0.0, 1.0]));
        let a = registry.get("a").unwrap();
        let mut diag = Diagnostics::default();
        assert_eq!(offsets(registry.resolve_stops(a, &mut diag)), vec![0.0, 1.0]);
        assert_eq!(diag.unresolved_references, 0);
    }

    #[test]
    fn broken_href_is_counted() {
        let mut registry = GradientRegistry::default();
        registry.insert(linear("a", Some("#b"), &[]));
        registry.insert(linear("b", Some("#nope"), &[]));
        let mut diag = Diagnostics::default();
        assert!(registry.resolve_stops(registry.get("a").unwrap(), &mut diag).is_empty());
        assert_eq!(diag.unresolved_references, 1);
    }

    #[test]
    fn recursive_href() {
        let mut registry = GradientRegistry::default();
        registry.insert(linear("a", Some("#a"), &[]));
        registry.insert(linear("b", Some("#c"), &[]));
        registry.insert(linear("c", Some("#b"), &[]));
        let mut diag = Diagnostics::default();
        assert!(registry.resolve_stops(registry.get("a").unwrap(), &mut diag).is_empty());
        assert!(registry.resolve_stops(registry.get("b").unwrap(), &mut diag).is_empty());
        assert_eq!(diag.unresolved_references, 0);
    }

    #[test]
    fn own_stops_take_precedence() {
        let mut registry = GradientRegistry::default();
        registry.insert(linear("a", Some("#b"), &[0.3]));
        registry.insert(linear("b", None, &[0.0, 1.0]));
        let mut diag = Diagnostics::default();
        let stops = registry.resolve_stops(registry.get("a").unwrap(), &mut diag);
        assert_eq!(offsets(stops), vec![0.3]);
    }

    #[test]
    fn object_bbox_transform() {
        let mut registry = GradientRegistry::default();
        registry.insert(linear("a", None, &[0.0, 1.0]));
        let ctx = PaintContext {
            registry: &registry,
            dpi: 96.0,
            viewport: Viewport::new(0.0, 0.0, 100.0, 100.0),
            bbox: Some(kurbo::Rect::new(10.0, 20.0, 30.0, 60.0)),
            transform: Transform::from_translate(5.0, 0.0),
        };

        let value = PaintValue::GradientRef { id: "a".to_string(), fallback: None };
        let mut diag = Diagnostics::default();
        match resolve_paint(&value, 0.5, &ctx, &mut diag) {
            Some(Paint::LinearGradient(lg)) => {
                assert_eq!((lg.x1, lg.y1, lg.x2, lg.y2), (0.0, 0.0, 1.0, 0.0));
                assert_eq!(lg.transform, Transform::new(20.0, 0.0, 0.0, 40.0, 15.0, 20.0));
                assert_eq!(lg.stops[1].opacity, 0.5);
            }
            v => panic!("unexpected paint: {:?}", v),
        }
    }

    #[test]
    fn missing_reference_uses_fallback() {
        let registry = GradientRegistry::default();
        let ctx = PaintContext {
            registry: &registry,
            dpi: 96.0,
            viewport: Viewport::new(0.0, 0.0, 100.0, 100.0),
            bbox: None,
            transform: Transform::default(),
        };

        let mut diag = Diagnostics::default();
        let value = PaintValue::GradientRef { id: "x".to_string(), fallback: Some(Color::white()) };
        assert_eq!(resolve_paint(&value, 1.0, &ctx, &mut diag),
                   Some(Paint::Color { color: Color::white(), opacity: 1.0 }));
        let value = PaintValue::GradientRef { id: "x".to_string(), fallback: None };
        assert_eq!(resolve_paint(&value, 1.0, &ctx, &mut diag), None);
        assert_eq!(diag.unresolved_references, 2);
    }
}
