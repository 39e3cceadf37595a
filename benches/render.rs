#[macro_use]
extern crate criterion;
extern crate num;
extern crate tilebrot;

use criterion::Criterion;
use num::Complex;
use tilebrot::{render, Gradient, Mode, RenderConfig, RenderParams};

fn tiled(c: &mut Criterion) {
    let gradient = Gradient::default_palette();
    let params =
        RenderParams::new(Mode::Mandelbrot, 500, 70.0, 15.0, Complex::new(-0.75, 0.0)).unwrap();

    let single = RenderConfig::new(params, 200, 160, 1, 1).unwrap();
    c.bench_function("mandelbrot 200x160, 1 tile", move |b| {
        b.iter(|| render(&single, &gradient).unwrap())
    });

    let gradient = Gradient::default_palette();
    let grid = RenderConfig::new(params, 200, 160, 2, 2).unwrap();
    c.bench_function("mandelbrot 200x160, 2x2 tiles", move |b| {
        b.iter(|| render(&grid, &gradient).unwrap())
    });
}

criterion_group!(benches, tiled);
criterion_main!(benches);
