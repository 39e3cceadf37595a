// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate tilebrot;

use clap::{App, Arg, ArgMatches};
use image::{ColorType, Pixel};
use num::Complex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use tilebrot::{Color, Gradient, Mode, RenderConfig, RenderParams};

/// Given a string and a separator, returns the two values
/// separated by the separator.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_positive(
    s: &str,
    isnotanumber_err: &str,
    isnotpositive_err: &str,
) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        Ok(_) => Err(isnotpositive_err.to_string()),
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const SCALE: &str = "scale";
const MODE: &str = "mode";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const OFFSET: &str = "offset";
const DENSITY: &str = "density";
const GRID: &str = "grid";
const GRADIENT: &str = "gradient";
const TIMEOUT: &str = "timeout";

fn args<'a>() -> ArgMatches<'a> {
    App::new("tilebrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Tiled Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file (default: renders/, named after the render settings)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1000x800")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image, before scaling"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .takes_value(true)
                .default_value("0.5")
                .validator(|s| {
                    validate_positive(&s, "Could not parse scale", "Scale must be positive")
                })
                .help("Multiplies both the image size and the zoom"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .default_value("mandelbrot")
                .validator(|s| Mode::from_str(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("mandelbrot or julia"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| match usize::from_str(&s) {
                    Ok(0) => Err("Iteration count must be at least 1".to_string()),
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse iteration count".to_string()),
                })
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("350")
                .validator(|s| {
                    validate_positive(&s, "Could not parse zoom", "Zoom must be positive")
                })
                .help("Pixels per unit of the complex plane, before scaling"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .long(OFFSET)
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.75,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse offset"))
                .help("Pan center (mandelbrot) or the constant c (julia), as re,im"),
        )
        .arg(
            Arg::with_name(DENSITY)
                .long(DENSITY)
                .short("d")
                .takes_value(true)
                .default_value("15")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse color density",
                        "Color density must be positive",
                    )
                })
                .help("Gradient entries per unit of smoothed iteration"),
        )
        .arg(
            Arg::with_name(GRID)
                .long(GRID)
                .short("g")
                .takes_value(true)
                .default_value("2x2")
                .validator(|s| {
                    if s == "auto" {
                        Ok(())
                    } else {
                        validate_pair::<usize>(&s, 'x', "Grid must be ROWSxCOLS or auto")
                    }
                })
                .help("Tile grid as ROWSxCOLS, or auto for one row per CPU"),
        )
        .arg(
            Arg::with_name(GRADIENT)
                .long(GRADIENT)
                .short("G")
                .takes_value(true)
                .help("Image whose top row of pixels is the color gradient"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .long(TIMEOUT)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_positive(&s, "Could not parse timeout", "Timeout must be positive")
                })
                .help("Give up if the tiles are not finished after this many seconds"),
        )
        .get_matches()
}

/// HH:MM:SS.mmm
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

fn title(mode: Mode) -> &'static str {
    match mode {
        Mode::Mandelbrot => "Mandelbrot",
        Mode::Julia => "Julia",
    }
}

const RENDERS: &str = "renders";

/// Zoom and scale are always written with a decimal point.
fn default_file_name(params: &RenderParams, scale: f64) -> String {
    format!(
        "{} Set Render - MAX_ITER = {}, ZOOM = {:?}, OFFSET = ({}, {}), \
         COLOUR_DENSITY = {}, SCALE = {:?}.png",
        title(params.mode),
        params.max_iterations,
        params.zoom,
        params.offset.re,
        params.offset.im,
        params.color_density,
        scale
    )
}

/// Unnamed renders are collected under `renders/`.
fn default_output(params: &RenderParams, scale: f64) -> PathBuf {
    Path::new(RENDERS).join(default_file_name(params, scale))
}

/// The gradient is the first row of the image, left to right.
fn load_gradient(path: &Path) -> Result<Gradient, failure::Error> {
    let image = image::open(path)?.to_rgb();
    let colors = (0..image.width())
        .map(|x| {
            let rgb = image.get_pixel(x, 0).channels();
            Color(rgb[0], rgb[1], rgb[2])
        })
        .collect();
    Ok(Gradient::new(colors)?)
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, failure::Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("missing value for --{}", name))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let scale = f64::from_str(value(matches, SCALE)?)?;
    let (width, height): (usize, usize) = parse_pair(value(matches, SIZE)?, 'x')
        .ok_or_else(|| format_err!("Could not parse output image size"))?;
    let width = ((width as f64) * scale).round() as usize;
    let height = ((height as f64) * scale).round() as usize;

    let params = RenderParams::new(
        Mode::from_str(value(matches, MODE)?)?,
        usize::from_str(value(matches, ITERATIONS)?)?,
        f64::from_str(value(matches, ZOOM)?)? * scale,
        f64::from_str(value(matches, DENSITY)?)?,
        parse_complex(value(matches, OFFSET)?)
            .ok_or_else(|| format_err!("Could not parse offset"))?,
    )?;

    let (rows, cols) = match value(matches, GRID)? {
        "auto" => (num_cpus::get().min(height.max(1)), 1),
        grid => parse_pair(grid, 'x').ok_or_else(|| format_err!("Could not parse grid"))?,
    };

    let mut config = RenderConfig::new(params, width, height, rows, cols)?;
    if let Some(timeout) = matches.value_of(TIMEOUT) {
        let secs = f64::from_str(timeout)?;
        config = config.with_timeout(Duration::from_millis((secs * 1000.0) as u64));
    }

    let gradient = match matches.value_of(GRADIENT) {
        Some(path) => load_gradient(Path::new(path))?,
        None => Gradient::default_palette(),
    };

    info!("Rendering...");
    let started = Instant::now();
    let canvas = tilebrot::render(&config, &gradient)?;
    info!("Rendering Completed ({})", format_elapsed(started.elapsed()));

    let output = match matches.value_of(OUTPUT) {
        Some(path) => PathBuf::from(path),
        None => {
            fs::create_dir_all(RENDERS)?;
            default_output(&params, scale)
        }
    };

    info!("Saving {}...", output.display());
    let started = Instant::now();
    image::save_buffer(
        &output,
        &canvas.to_rgb_bytes(),
        canvas.width() as u32,
        canvas.height() as u32,
        ColorType::RGB(8),
    )?;
    info!("Saving Completed ({})", format_elapsed(started.elapsed()));
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
