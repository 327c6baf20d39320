// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{self, Read, Write};
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
svgshape extracts resolved shapes from an SVG document.

USAGE:
  svgshape [OPTIONS] <in-svg>   # from file
  svgshape [OPTIONS] -          # from stdin

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information

  --dpi DPI                         Sets the resolution
                                    [default: 96] [possible values: 10..4000 (inclusive)]
  --font-size SIZE                  Sets the default font size that will be
                                    used when no 'font-size' is present
                                    [default: 12] [possible values: 1..192 (inclusive)]
  --max-elements NUM                Sets the maximum number of elements in a document
                                    [default: 1000000] [possible values: 0 disables the limit]
  --bbox                            Prints the document-space bounding box of each shape
  --diagnostics                     Prints the recovered parsing problems
  --quiet                           Disables warnings

ARGS:
  <in-svg>                          Input file
";

#[derive(Debug)]
struct Args {
    dpi: u32,
    font_size: u32,
    max_elements: Option<usize>,
    bbox: bool,
    diagnostics: bool,
    quiet: bool,
    input: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        font_size: input
            .opt_value_from_fn("--font-size", parse_font_size)?
            .unwrap_or(12),
        max_elements: input
            .opt_value_from_fn("--max-elements", parse_max_elements)?
            .unwrap_or(Some(1_000_000)),
        bbox: input.contains("--bbox"),
        diagnostics: input.contains("--diagnostics"),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 && n <= 192 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_max_elements(s: &str) -> Result<Option<usize>, String> {
    let n: usize = s.parse().map_err(|_| "invalid number")?;
    Ok(if n == 0 { None } else { Some(n) })
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let data = if args.input == "-" {
        load_stdin()?
    } else {
        std::fs::read(&args.input).map_err(|e| e.to_string())?
    };

    let opt = svgshape::Options {
        dpi: args.dpi as f64,
        font_size: args.font_size as f64,
        max_elements: args.max_elements,
        ..svgshape::Options::default()
    };

    let doc = svgshape::Document::from_data(&data, &opt).map_err(|e| e.to_string())?;

    let mut out = String::new();
    let (width, height) = doc.size();
    out.push_str(&format!("size: {}x{}\n", width, height));
    if let Some(ref title) = doc.title {
        out.push_str(&format!("title: {}\n", title));
    }

    for (idx, shape) in doc.shapes.iter().enumerate() {
        out.push_str(&format!(
            "{} {} id={} fill={} stroke={}",
            idx,
            shape.geometry.kind(),
            shape.id.as_deref().unwrap_or("-"),
            paint_to_string(shape.fill.as_ref()),
            paint_to_string(shape.stroke.as_ref()),
        ));

        if !shape.is_visible() {
            out.push_str(" hidden");
        }

        if args.bbox {
            match shape.device_bounding_box() {
                Some(r) => out.push_str(&format!(
                    " bbox={},{},{},{}",
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height()
                )),
                None => out.push_str(" bbox=-"),
            }
        }

        out.push('\n');
    }

    if args.diagnostics {
        out.push_str(&format!("{:#?}\n", doc.diagnostics));
    }

    io::stdout()
        .write_all(out.as_bytes())
        .map_err(|_| "failed to write to the stdout".to_string())?;

    Ok(())
}

fn paint_to_string(paint: Option<&svgshape::Paint>) -> String {
    match paint {
        None => "none".to_string(),
        Some(svgshape::Paint::Color { color, opacity }) => {
            if *opacity < 1.0 {
                format!("{}@{}", color, opacity)
            } else {
                color.to_string()
            }
        }
        Some(svgshape::Paint::LinearGradient(ref lg)) => {
            format!("linear({}, {} stops)", lg.id, lg.stops.len())
        }
        Some(svgshape::Paint::RadialGradient(ref rg)) => {
            format!("radial({}, {} stops)", rg.id, rg.stops.len())
        }
    }
}

fn load_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();

    handle
        .read_to_end(&mut buf)
        .map_err(|_| "failed to read from stdin".to_string())?;

    Ok(buf)
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
