// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::ops::ControlFlow;
use std::str::FromStr;

use svgshape_types::{AspectRatio, Length, LengthUnit as Unit, ViewBox};

use crate::cascade::AttributeStack;
use crate::geom::IsValidLength;
use crate::names::{find_attribute, AId, EId};
use crate::paint_server::{self, GradientDefinition, GradientRegistry, PaintContext};
use crate::shapes::{self, Geometry};
use crate::style::{self, AttributeFrame};
use crate::tokenizer::{self, TagHandler};
use crate::tree::{Diagnostics, Document, Shape};
use crate::units::{self, Resolver, Viewport};
use crate::{Error, Options};

/// Parses a document in a single pass.
pub(crate) fn convert_doc(text: &str, opt: &Options) -> Result<Document, Error> {
    let mut state = State::new(opt);
    let malformed = tokenizer::tokenize(text, &mut state);
    state.diag.malformed_tags += malformed;

    if let Some(e) = state.error {
        return Err(e);
    }

    if !state.open.is_empty() {
        log::warn!("{} elements were not closed.", state.open.len());
    }

    Ok(state.finish())
}

/// Root element properties.
#[derive(Clone, Copy, Debug)]
struct Root {
    width: Length,
    height: Length,
    view_box: Option<ViewBox>,
    aspect: AspectRatio,
    size: (f64, f64),
}

/// A shape that was closed, but has no resolved paint yet.
struct Draft {
    attributes: AttributeFrame,
    geometry: Geometry,
}

enum ElementKind {
    Group,
    Defs,
    Shape(Option<Geometry>),
    Gradient(Option<GradientDefinition>),
    Stop,
    Title { is_root: bool },
    Unknown,
}

struct OpenElement<'a> {
    name: &'a str,
    kind: ElementKind,
}

/// A parsing session.
///
/// Owns all mutable state, so independent documents can be parsed in parallel.
struct State<'a> {
    opt: Options,
    stack: AttributeStack,
    registry: GradientRegistry,
    drafts: Vec<Draft>,
    diag: Diagnostics,
    root: Option<Root>,
    /// Percent values are resolved against it.
    viewport: Viewport,
    open: Vec<OpenElement<'a>>,
    defs_depth: usize,
    title: Option<String>,
    elements_count: usize,
    error: Option<Error>,
}

impl<'a> TagHandler<'a> for State<'a> {
    fn start_element(&mut self, name: &'a str, attrs: &[(&'a str, &'a str)]) -> ControlFlow<()> {
        self.elements_count += 1;
        if let Some(max) = self.opt.max_elements {
            if self.elements_count > max {
                self.error = Some(Error::ElementsLimitReached);
                return ControlFlow::Break(());
            }
        }

        let kind = if attrs.iter().any(|(_, value)| value.contains('&')) {
            let decoded: Vec<_> = attrs.iter().map(|&(n, v)| (n, unescape(v))).collect();
            let attrs: Vec<_> = decoded.iter().map(|(n, v)| (*n, v.as_ref())).collect();
            self.convert_element(name, &attrs)
        } else {
            self.convert_element(name, attrs)
        };
        self.open.push(OpenElement { name, kind });
        ControlFlow::Continue(())
    }

    fn end_element(&mut self, name: &'a str) {
        let idx = match self.open.iter().rposition(|e| e.name == name) {
            Some(idx) => idx,
            None => {
                log::warn!("Unexpected end tag: '</{}>'. Skipped.", name);
                self.diag.unbalanced_end_tags += 1;
                return;
            }
        };

        while self.open.len() > idx + 1 {
            if let Some(e) = self.open.pop() {
                log::warn!("Element '{}' was not closed. Skipped.", e.name);
                self.diag.unbalanced_end_tags += 1;
                self.discard_element(e);
            }
        }

        if let Some(e) = self.open.pop() {
            self.close_element(e);
        }
    }

    fn content(&mut self, text: &'a str) {
        if let Some(OpenElement {
            kind: ElementKind::Title { is_root: true },
            ..
        }) = self.open.last()
        {
            self.title
                .get_or_insert_with(String::new)
                .push_str(&unescape(text));
        }
    }
}

impl<'a> State<'a> {
    fn new(opt: &Options) -> Self {
        State {
            opt: opt.clone(),
            stack: AttributeStack::new(AttributeFrame::new(opt.font_size), opt.max_depth),
            registry: GradientRegistry::default(),
            drafts: Vec::new(),
            diag: Diagnostics::default(),
            root: None,
            viewport: Viewport::new(0.0, 0.0, 0.0, 0.0),
            open: Vec::new(),
            defs_depth: 0,
            title: None,
            elements_count: 0,
            error: None,
        }
    }

    fn convert_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> ElementKind {
        let pushed = self.stack.push();
        if !pushed {
            log::warn!(
                "Element '{}' is nested too deep ({} levels). Skipped.",
                name,
                self.stack.depth()
            );
            self.diag.stack_overflows += 1;
            return ElementKind::Unknown;
        }

        let eid = match EId::from_str(name) {
            Some(eid) => eid,
            None => {
                log::debug!("Element '{}' is not supported. Skipped.", name);
                self.diag.unknown_elements += 1;
                return ElementKind::Unknown;
            }
        };

        let is_root = eid == EId::Svg && self.root.is_none();
        if is_root {
            self.convert_root(attrs);
        }

        let ctx = style::Context {
            dpi: self.opt.dpi,
            viewport: self.viewport,
            parent_font_size: self.stack.parent().font_size,
        };
        style::apply_attributes(self.stack.top_mut(), attrs, &ctx, &mut self.diag);

        match eid {
            EId::Svg | EId::G => ElementKind::Group,
            EId::Defs => {
                self.defs_depth += 1;
                ElementKind::Defs
            }
            _ if eid.is_gradient() => {
                let font_size = self.stack.top().font_size;
                let def = paint_server::convert_definition(eid, attrs, font_size, &mut self.diag);
                ElementKind::Gradient(def)
            }
            EId::Stop => ElementKind::Stop,
            EId::Title => ElementKind::Title {
                is_root: self.open.len() == 1 && self.root.is_some(),
            },
            _ => {
                let resolver = Resolver {
                    dpi: self.opt.dpi,
                    viewport: self.viewport,
                    font_size: self.stack.top().font_size,
                };

                ElementKind::Shape(shapes::convert(eid, attrs, &resolver, &mut self.diag))
            }
        }
    }

    fn convert_root(&mut self, attrs: &[(&str, &str)]) {
        let mut length = |aid: AId| match find_attribute(attrs, aid) {
            Some(value) => units::parse_length_lossy(value, &mut self.diag),
            None => Length::new(100.0, Unit::Percent),
        };

        let width = length(AId::Width);
        let height = length(AId::Height);

        let view_box = find_attribute(attrs, AId::ViewBox).and_then(|value| {
            match ViewBox::from_str(value) {
                Ok(vb) => Some(vb),
                Err(e) => {
                    log::warn!("Failed to parse a viewBox from '{}' cause {}.", value, e);
                    self.diag.invalid_numbers += 1;
                    None
                }
            }
        });

        let aspect = find_attribute(attrs, AId::PreserveAspectRatio)
            .and_then(|value| match AspectRatio::from_str(value) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("Failed to parse 'preserveAspectRatio' from '{}' cause {}.", value, e);
                    None
                }
            })
            .unwrap_or_default();

        let size = (
            self.resolve_root_size(width, view_box.map(|vb| vb.w)),
            self.resolve_root_size(height, view_box.map(|vb| vb.h)),
        );

        self.viewport = match view_box {
            Some(vb) => Viewport::new(vb.x, vb.y, vb.w, vb.h),
            None => Viewport::new(0.0, 0.0, size.0, size.1),
        };

        self.root = Some(Root {
            width,
            height,
            view_box,
            aspect,
            size,
        });
    }

    fn resolve_root_size(&mut self, length: Length, view_box_len: Option<f64>) -> f64 {
        if length.unit != Unit::Percent {
            return units::convert_length(length, 0.0, 0.0, self.opt.dpi, self.opt.font_size);
        }

        match view_box_len {
            Some(len) => len * length.number / 100.0,
            None => {
                if !self.diag.relative_root_size {
                    log::warn!("The root element has a relative size and no viewBox. Fallback to zero.");
                }

                self.diag.relative_root_size = true;
                0.0
            }
        }
    }

    fn close_element(&mut self, e: OpenElement) {
        match e.kind {
            ElementKind::Shape(Some(geometry)) => {
                if self.defs_depth == 0 {
                    self.drafts.push(Draft {
                        attributes: self.stack.top().clone(),
                        geometry,
                    });
                }
            }
            ElementKind::Gradient(Some(def)) => {
                self.registry.insert(def);
            }
            ElementKind::Stop => {
                let frame = self.stack.top();
                let stop = paint_server::convert_stop(frame.offset, frame.stop_color, frame.stop_opacity);
                match self.open.last_mut() {
                    Some(OpenElement {
                        kind: ElementKind::Gradient(Some(def)),
                        ..
                    }) => def.add_stop(stop),
                    Some(OpenElement {
                        kind: ElementKind::Gradient(None),
                        ..
                    }) => {}
                    _ => log::warn!("A 'stop' element outside of a gradient. Skipped."),
                }
            }
            ElementKind::Defs => self.defs_depth -= 1,
            _ => {}
        }

        self.stack.pop();
    }

    fn discard_element(&mut self, e: OpenElement) {
        if let ElementKind::Defs = e.kind {
            self.defs_depth -= 1;
        }

        self.stack.pop();
    }

    fn finish(self) -> Document {
        let mut diag = self.diag;
        let root = self.root.unwrap_or_else(|| {
            log::warn!("The document has no root 'svg' element.");
            diag.relative_root_size = true;
            Root {
                width: Length::new(100.0, Unit::Percent),
                height: Length::new(100.0, Unit::Percent),
                view_box: None,
                aspect: AspectRatio::default(),
                size: (0.0, 0.0),
            }
        });

        let mut shapes = Vec::with_capacity(self.drafts.len());
        for draft in self.drafts {
            shapes.push(resolve_shape(draft, &self.registry, &self.opt, self.viewport, &mut diag));
        }

        Document {
            width: root.width,
            height: root.height,
            view_box: root.view_box,
            aspect: root.aspect,
            dpi: self.opt.dpi,
            shapes,
            title: self.title,
            diagnostics: diag,
            size: root.size,
            gradients: self.registry,
        }
    }
}

fn resolve_shape(
    draft: Draft,
    registry: &GradientRegistry,
    opt: &Options,
    viewport: Viewport,
    diag: &mut Diagnostics,
) -> Shape {
    let attrs = draft.attributes;
    let needs_bbox = [&attrs.fill, &attrs.stroke]
        .iter()
        .any(|p| matches!(p, style::PaintValue::GradientRef { .. }));

    let ctx = PaintContext {
        registry,
        dpi: opt.dpi,
        viewport,
        bbox: if needs_bbox { draft.geometry.bounding_box() } else { None },
        transform: attrs.transform,
    };

    let fill = paint_server::resolve_paint(&attrs.fill, attrs.fill_opacity, &ctx, diag);
    let stroke = if attrs.stroke_width.is_valid_length() {
        paint_server::resolve_paint(&attrs.stroke, attrs.stroke_opacity, &ctx, diag)
    } else {
        None
    };

    Shape {
        id: attrs.id.clone(),
        attributes: attrs,
        geometry: draft.geometry,
        fill,
        stroke,
    }
}

/// Decodes the predefined and numeric character references.
///
/// Unknown references are kept as is.
fn unescape(text: &str) -> Cow<str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest
            .find(';')
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = match name.strip_prefix("#x") {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
