extern crate num;
extern crate rand;
extern crate tilebrot;

use num::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tilebrot::{
    render, render_with, Color, EscapeTimeRenderer, Gradient, Mode, RenderConfig, RenderError,
    RenderParams, Tile, TileBuffer, TileRenderer,
};

fn mandelbrot() -> RenderParams {
    RenderParams::new(Mode::Mandelbrot, 100, 35.0, 15.0, Complex::new(-0.75, 0.0)).unwrap()
}

fn julia() -> RenderParams {
    RenderParams::new(Mode::Julia, 200, 30.0, 4.0, Complex::new(-0.4, 0.6)).unwrap()
}

fn config(
    params: RenderParams,
    width: usize,
    height: usize,
    rows: usize,
    cols: usize,
) -> RenderConfig {
    RenderConfig::new(params, width, height, rows, cols).unwrap()
}

/// Sleeps before rendering, by a per-tile amount.
struct Delayed<'a> {
    inner: EscapeTimeRenderer<'a>,
    cols: usize,
    delays: Vec<Duration>,
}

impl<'a> TileRenderer for Delayed<'a> {
    fn render(&self, tile: &Tile, cancel: &AtomicBool) -> Result<TileBuffer, RenderError> {
        thread::sleep(self.delays[tile.row * self.cols + tile.col]);
        self.inner.render(tile, cancel)
    }
}

/// Never finishes unless told to stop.
struct Stalled;

impl TileRenderer for Stalled {
    fn render(&self, tile: &Tile, cancel: &AtomicBool) -> Result<TileBuffer, RenderError> {
        let started = Instant::now();
        while started.elapsed() < Duration::from_secs(30) {
            if cancel.load(Ordering::Relaxed) {
                return Err(RenderError::Cancelled);
            }
            thread::sleep(Duration::from_millis(2));
        }
        TileBuffer::new(*tile, vec![Color::BLACK; tile.len()])
    }
}

/// Panics at once on tile (0, 0); every other tile waits to be cancelled.
struct PanicsFirst;

impl TileRenderer for PanicsFirst {
    fn render(&self, tile: &Tile, cancel: &AtomicBool) -> Result<TileBuffer, RenderError> {
        if (tile.row, tile.col) == (0, 0) {
            panic!("tile (0, 0) exploded");
        }
        Stalled.render(tile, cancel)
    }
}

/// Fails, or panics, on one tile.
struct Broken {
    row: usize,
    col: usize,
    panic: bool,
}

impl TileRenderer for Broken {
    fn render(&self, tile: &Tile, _: &AtomicBool) -> Result<TileBuffer, RenderError> {
        if (tile.row, tile.col) == (self.row, self.col) {
            if self.panic {
                panic!("tile ({}, {}) exploded", tile.row, tile.col);
            }
            return Err(RenderError::EmptyGradient);
        }
        TileBuffer::new(*tile, vec![Color::BLACK; tile.len()])
    }
}

#[test]
fn tiled_render_matches_single_tile() {
    let gradient = Gradient::default_palette();
    for params in &[mandelbrot(), julia()] {
        let whole = render(&config(*params, 100, 80, 1, 1), &gradient).unwrap();
        for &(rows, cols) in &[(2, 2), (4, 5), (5, 4), (10, 10), (1, 100), (80, 1)] {
            let tiled = render(&config(*params, 100, 80, rows, cols), &gradient).unwrap();
            assert!(whole == tiled, "{:?} grid {}x{} differs", params.mode, rows, cols);
        }
    }
}

#[test]
fn uneven_grids_cover_the_full_resolution() {
    let gradient = Gradient::default_palette();
    let whole = render(&config(mandelbrot(), 101, 79, 1, 1), &gradient).unwrap();
    for &(rows, cols) in &[(3, 7), (4, 6), (79, 2), (6, 101)] {
        let tiled = render(&config(mandelbrot(), 101, 79, rows, cols), &gradient).unwrap();
        assert_eq!(tiled.width(), 101);
        assert_eq!(tiled.height(), 79);
        assert_eq!(tiled.pixels().len(), 101 * 79);
        assert!(whole == tiled, "grid {}x{} differs", rows, cols);
    }
}

#[test]
fn completion_order_does_not_matter() {
    let gradient = Gradient::default_palette();
    let params = julia();
    let config = config(params, 64, 48, 3, 4);
    let baseline = render(&config, &gradient).unwrap().to_rgb_bytes();

    // Reverse order: the first tile is the last to finish.
    let reversed = Delayed {
        inner: EscapeTimeRenderer::new(&params, &gradient),
        cols: 4,
        delays: (0..12).rev().map(|i| Duration::from_millis(i * 5)).collect(),
    };
    assert_eq!(render_with(&config, &reversed).unwrap().to_rgb_bytes(), baseline);

    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let shuffled = Delayed {
            inner: EscapeTimeRenderer::new(&params, &gradient),
            cols: 4,
            delays: (0..12).map(|_| Duration::from_millis(rng.gen_range(0, 40))).collect(),
        };
        assert_eq!(render_with(&config, &shuffled).unwrap().to_rgb_bytes(), baseline);
    }
}

#[test]
fn repeated_renders_are_identical() {
    let gradient = Gradient::default_palette();
    let config = config(mandelbrot(), 100, 80, 4, 4);
    let first = render(&config, &gradient).unwrap().to_rgb_bytes();
    let second = render(&config, &gradient).unwrap().to_rgb_bytes();
    assert_eq!(first, second);
}

#[test]
fn single_color_gradient() {
    let only = Color(200, 100, 50);
    let gradient = Gradient::new(vec![only]).unwrap();
    let canvas = render(&config(mandelbrot(), 100, 80, 2, 2), &gradient).unwrap();

    assert!(canvas
        .pixels()
        .iter()
        .all(|&p| p == Color::BLACK || p == only));
    // Pixel (0, 0) is c = -2.18-1.14i, far outside.
    assert_eq!(canvas.get(0, 0), only);
    // Pixel (76, 40) is c = -0.007, inside the main cardioid.
    assert_eq!(canvas.get(76, 40), Color::BLACK);
}

#[test]
fn julia_interior_is_black() {
    // With c = 0 the filled Julia set is the unit disc.
    let params = RenderParams::new(Mode::Julia, 50, 20.0, 1.0, Complex::new(0.0, 0.0)).unwrap();
    let gradient = Gradient::new(vec![Color(255, 255, 255)]).unwrap();
    let canvas = render(&config(params, 80, 80, 2, 2), &gradient).unwrap();
    assert_eq!(canvas.get(40, 40), Color::BLACK);
    assert_eq!(canvas.get(50, 50), Color::BLACK);
    assert_eq!(canvas.get(0, 0), Color(255, 255, 255));
}

#[test]
fn stalled_tiles_time_out() {
    let config = config(mandelbrot(), 20, 20, 2, 2).with_timeout(Duration::from_millis(50));
    let started = Instant::now();
    match render_with(&config, &Stalled) {
        Err(RenderError::Timeout { outstanding, .. }) => assert_eq!(outstanding, 4),
        other => panic!("expected a timeout, got {:?}", other),
    }
    // The stalled workers were cancelled rather than waited out.
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn a_failed_tile_fails_the_render() {
    let config = config(mandelbrot(), 20, 20, 2, 2);
    let broken = Broken {
        row: 1,
        col: 0,
        panic: false,
    };
    match render_with(&config, &broken) {
        Err(RenderError::WorkerFailed { row, col, reason }) => {
            assert_eq!((row, col), (1, 0));
            assert_eq!(reason, "gradient must contain at least one color");
        }
        other => panic!("expected a worker failure, got {:?}", other),
    }
}

#[test]
fn a_panicking_tile_fails_the_render() {
    let config = config(mandelbrot(), 20, 20, 2, 2);
    let broken = Broken {
        row: 0,
        col: 1,
        panic: true,
    };
    assert_eq!(render_with(&config, &broken), Err(RenderError::WorkerPanicked));
}

#[test]
fn a_panicking_tile_cancels_its_siblings() {
    let config = config(mandelbrot(), 20, 20, 2, 2);
    let started = Instant::now();
    assert_eq!(render_with(&config, &PanicsFirst), Err(RenderError::WorkerPanicked));
    // The other tiles would run for 30 seconds if nobody stopped them.
    assert!(started.elapsed() < Duration::from_secs(10));
}
