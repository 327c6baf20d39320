use svgshape::{Color, Document, Options, Paint, SpreadMethod, Transform, Units};

fn parse(text: &str) -> Document {
    Document::from_str(text, &Options::default()).unwrap()
}

#[test]
fn missing_gradient() {
    let doc = parse("<svg><rect width='10' height='10' fill='url(#missing)'/></svg>");
    assert_eq!(doc.shapes[0].fill, None);
    assert_eq!(doc.diagnostics.unresolved_references, 1);
}

#[test]
fn missing_gradient_with_fallback() {
    let doc = parse("<svg><rect width='10' height='10' fill='url(#missing) red'/></svg>");
    assert_eq!(
        doc.shapes[0].fill,
        Some(Paint::Color {
            color: Color::new_rgb(255, 0, 0),
            opacity: 1.0
        })
    );
    assert_eq!(doc.diagnostics.unresolved_references, 1);
}

#[test]
fn gradient_with_a_broken_href() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='a' href='#nope'/>
        <rect width='10' height='10' fill='url(#a)'/>
    </svg>
    ",
    );
    assert_eq!(doc.shapes[0].fill, None);
    assert_eq!(doc.diagnostics.unresolved_references, 1);
}

#[test]
fn escaped_reference() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='a&amp;b'><stop offset='0'/><stop offset='1'/></linearGradient>
        <rect width='10' height='10' fill='url(#a&amp;b)'/>
    </svg>
    ",
    );
    match doc.shapes[0].fill {
        Some(Paint::LinearGradient(ref lg)) => assert_eq!(lg.id, "a&b"),
        ref v => panic!("unexpected paint: {:?}", v),
    }
    assert_eq!(doc.diagnostics.unresolved_references, 0);
}

#[test]
fn forward_reference() {
    let doc = parse(
        "
    <svg>
        <rect width='100' height='50' fill='url(#lg)'/>
        <linearGradient id='lg'>
            <stop offset='0' stop-color='red'/>
            <stop offset='1' stop-color='blue'/>
        </linearGradient>
    </svg>
    ",
    );

    match doc.shapes[0].fill {
        Some(Paint::LinearGradient(ref lg)) => {
            assert_eq!(lg.id, "lg");
            assert_eq!(lg.units, Units::ObjectBoundingBox);
            assert_eq!(lg.spread_method, SpreadMethod::Pad);
            assert_eq!((lg.x1, lg.y1, lg.x2, lg.y2), (0.0, 0.0, 1.0, 0.0));
            assert_eq!(lg.transform, Transform::new(100.0, 0.0, 0.0, 50.0, 0.0, 0.0));
            assert_eq!(lg.stops.len(), 2);
            assert_eq!(lg.stops[0].color, Color::new_rgb(255, 0, 0));
            assert_eq!(lg.stops[1].color, Color::new_rgb(0, 0, 255));
        }
        ref v => panic!("unexpected paint: {:?}", v),
    }
    assert_eq!(doc.diagnostics.unresolved_references, 0);
}

#[test]
fn href_borrows_stops() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='base'>
            <stop offset='0'/>
            <stop offset='50%' stop-color='lime'/>
            <stop offset='1' stop-color='white'/>
        </linearGradient>
        <radialGradient id='derived' xlink:href='#base' r='0.25'/>
        <rect width='10' height='10' fill='url(#derived)'/>
    </svg>
    ",
    );

    match doc.shapes[0].fill {
        Some(Paint::RadialGradient(ref rg)) => {
            let offsets: Vec<_> = rg.stops.iter().map(|s| s.offset).collect();
            assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
            assert_eq!((rg.cx, rg.cy, rg.r), (0.5, 0.5, 0.25));
            assert_eq!((rg.fx, rg.fy), (0.5, 0.5));
        }
        ref v => panic!("unexpected paint: {:?}", v),
    }

    // Own stops are not altered.
    assert!(doc.gradient("derived").unwrap().stops.is_empty());
}

#[test]
fn self_reference() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='A' href='#A'/>
        <rect width='10' height='10' fill='url(#A)' stroke='url(#A) green'/>
    </svg>
    ",
    );

    assert!(doc.gradient("A").unwrap().stops.is_empty());
    assert_eq!(doc.shapes[0].fill, None);
    assert_eq!(doc.shapes[0].stroke, None);
}

#[test]
fn single_stop_is_a_color() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='lg'><stop offset='0.3' stop-color='red' stop-opacity='0.5'/></linearGradient>
        <rect width='10' height='10' fill='url(#lg)' fill-opacity='0.5'/>
    </svg>
    ",
    );

    assert_eq!(
        doc.shapes[0].fill,
        Some(Paint::Color {
            color: Color::new_rgb(255, 0, 0),
            opacity: 0.25
        })
    );
}

#[test]
fn stops_are_sorted() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='lg'>
            <stop offset='0.8'/>
            <stop offset='20%'/>
            <stop offset='2'/>
            <stop offset='-1'/>
        </linearGradient>
    </svg>
    ",
    );

    let offsets: Vec<_> = doc.gradient("lg").unwrap().stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.2, 0.8, 1.0]);
}

#[test]
fn stop_style() {
    let doc = parse(
        "
    <svg color='blue'>
        <linearGradient id='lg'>
            <stop offset='0' style='stop-color: currentColor; stop-opacity: 40%'/>
            <stop offset='1' stop-color='rgb(1, 2'/>
        </linearGradient>
    </svg>
    ",
    );

    let stops = &doc.gradient("lg").unwrap().stops;
    assert_eq!(stops[0].color, Color::new_rgb(0, 0, 255));
    assert_eq!(stops[0].opacity, 0.4);
    assert_eq!(stops[1].color, Color::gray());
}

#[test]
fn user_space_gradient() {
    let doc = parse(
        "
    <svg viewBox='0 0 200 100'>
        <linearGradient id='lg' gradientUnits='userSpaceOnUse' x1='10%' x2='190'
                        spreadMethod='reflect' gradientTransform='scale(2)'>
            <stop offset='0'/>
            <stop offset='1'/>
        </linearGradient>
        <g transform='translate(5 5)'>
            <rect width='10' height='10' fill='url(#lg)'/>
        </g>
    </svg>
    ",
    );

    match doc.shapes[0].fill {
        Some(Paint::LinearGradient(ref lg)) => {
            assert_eq!((lg.x1, lg.x2), (20.0, 190.0));
            assert_eq!(lg.spread_method, SpreadMethod::Reflect);
            assert_eq!(lg.transform, Transform::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0));
        }
        ref v => panic!("unexpected paint: {:?}", v),
    }
}

#[test]
fn object_units_on_an_empty_bbox() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='lg'><stop offset='0'/><stop offset='1'/></linearGradient>
        <line x2='10' stroke='url(#lg)'/>
        <line x2='10' stroke='url(#lg) red'/>
    </svg>
    ",
    );

    assert_eq!(doc.shapes[0].stroke, None);
    assert_eq!(
        doc.shapes[1].stroke,
        Some(Paint::Color {
            color: Color::new_rgb(255, 0, 0),
            opacity: 1.0
        })
    );
}

#[test]
fn zero_radius() {
    let doc = parse(
        "
    <svg>
        <radialGradient id='rg' r='0'>
            <stop offset='0' stop-color='red'/>
            <stop offset='1' stop-color='blue' stop-opacity='0.5'/>
        </radialGradient>
        <rect width='10' height='10' fill='url(#rg)'/>
    </svg>
    ",
    );

    assert_eq!(
        doc.shapes[0].fill,
        Some(Paint::Color {
            color: Color::new_rgb(0, 0, 255),
            opacity: 0.5
        })
    );
}

#[test]
fn duplicated_ids() {
    let doc = parse(
        "
    <svg>
        <linearGradient id='lg' x1='0.1'><stop offset='0'/><stop offset='1'/></linearGradient>
        <linearGradient id='lg' x1='0.9'><stop offset='0'/><stop offset='1'/></linearGradient>
    </svg>
    ",
    );

    assert_eq!(doc.gradients().len(), 1);
}

#[test]
fn gradient_in_defs() {
    let doc = parse(
        "
    <svg>
        <defs>
            <radialGradient id='rg'><stop offset='0'/><stop offset='1'/></radialGradient>
        </defs>
        <circle cx='10' cy='10' r='10' fill='url(#rg)'/>
    </svg>
    ",
    );

    assert_eq!(doc.shapes.len(), 1);
    match doc.shapes[0].fill {
        Some(Paint::RadialGradient(ref rg)) => {
            let ts = rg.transform;
            assert!((ts.a - 20.0).abs() < 1e-6 && (ts.d - 20.0).abs() < 1e-6);
            assert!(ts.e.abs() < 1e-6 && ts.f.abs() < 1e-6);
        }
        ref v => panic!("unexpected paint: {:?}", v),
    }
}
