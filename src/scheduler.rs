// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The tile scheduler and aggregator.
//!
//! One scoped thread is spawned per tile.  Each worker sends exactly
//! one message, its finished tile or its error, back over a channel;
//! the aggregator files every finished tile into a slot keyed by its
//! grid position.  Nothing is composited until every slot is full, so
//! the order in which workers finish never shows in the image.
//!
//! Any failure is fatal to the whole render: an error from a worker,
//! a panicking worker, or a deadline that passes with tiles still
//! outstanding.  In each case the remaining workers are told to stop,
//! and the render returns only after all of them have.

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use canvas::Canvas;
use config::RenderConfig;
use error::RenderError;
use gradient::Gradient;
use tiles::{EscapeTimeRenderer, TileBuffer, TileGrid, TileRenderer};

type TileMessage = (usize, usize, Result<TileBuffer, RenderError>);

/// Render the configured fractal with the escape-time kernel.
pub fn render(config: &RenderConfig, gradient: &Gradient) -> Result<Canvas, RenderError> {
    let renderer = EscapeTimeRenderer::new(&config.params, gradient);
    render_with(config, &renderer)
}

/// Render the configured grid with any tile renderer.
pub fn render_with<R: TileRenderer>(
    config: &RenderConfig,
    renderer: &R,
) -> Result<Canvas, RenderError> {
    let grid = TileGrid::from_config(config)?;
    let tiles = grid.tiles();
    let cancel = AtomicBool::new(false);
    let started = Instant::now();

    info!(
        "rendering {}x{} {} as {} tile(s) ({}x{})",
        config.width,
        config.height,
        config.params.mode,
        grid.len(),
        config.rows,
        config.cols
    );

    let outcome = crossbeam::scope(|spawner| {
        let (sender, receiver) = channel::unbounded::<TileMessage>();
        for tile in &tiles {
            let sender = sender.clone();
            let cancel = &cancel;
            spawner.spawn(move |_| {
                debug!("tile ({}, {}) started", tile.row, tile.col);
                // A panic is reported like any other failure, so the
                // aggregator can cancel the remaining tiles at once.
                let result =
                    panic::catch_unwind(AssertUnwindSafe(|| renderer.render(tile, cancel)))
                        .unwrap_or_else(|_| Err(RenderError::WorkerPanicked));
                // The aggregator hangs up once the render has failed.
                let _ = sender.send((tile.row, tile.col, result));
            });
        }
        drop(sender);
        let collected = collect(&grid, &receiver, started, config.timeout);
        if collected.is_err() {
            cancel.store(true, Ordering::Relaxed);
        }
        collected
    });

    let slots = match outcome {
        Ok(collected) => collected?,
        Err(_) => {
            warn!("a tile worker panicked");
            return Err(RenderError::WorkerPanicked);
        }
    };

    let mut canvas = Canvas::new(config.width, config.height);
    for buffer in slots {
        canvas.blit(&buffer);
    }
    info!("render finished in {:?}", started.elapsed());
    Ok(canvas)
}

/// The barrier: wait until every tile is in, then hand them over in
/// row-major grid order.
fn collect(
    grid: &TileGrid,
    receiver: &Receiver<TileMessage>,
    started: Instant,
    timeout: Option<Duration>,
) -> Result<Vec<TileBuffer>, RenderError> {
    let mut slots: Vec<Option<TileBuffer>> = (0..grid.len()).map(|_| None).collect();
    let mut outstanding = grid.len();

    while outstanding > 0 {
        let message = match timeout {
            None => receiver.recv().map_err(|_| RenderError::WorkerPanicked),
            Some(limit) => {
                let remaining = limit
                    .checked_sub(started.elapsed())
                    .unwrap_or_else(|| Duration::from_secs(0));
                receiver.recv_timeout(remaining).map_err(|e| match e {
                    RecvTimeoutError::Timeout => RenderError::Timeout {
                        elapsed: started.elapsed(),
                        outstanding,
                    },
                    RecvTimeoutError::Disconnected => RenderError::WorkerPanicked,
                })
            }
        };

        let (row, col, result) = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("giving up on render: {}", e);
                return Err(e);
            }
        };

        let buffer = match result {
            Ok(buffer) => buffer,
            Err(RenderError::WorkerPanicked) => {
                warn!("tile ({}, {}) panicked", row, col);
                return Err(RenderError::WorkerPanicked);
            }
            Err(e) => {
                warn!("tile ({}, {}) failed: {}", row, col, e);
                return Err(RenderError::WorkerFailed {
                    row,
                    col,
                    reason: e.to_string(),
                });
            }
        };

        let expected = grid.tile(row, col);
        if buffer.pixels().len() != expected.len() {
            return Err(RenderError::TileSizeMismatch {
                row,
                col,
                got: buffer.pixels().len(),
                expected: expected.len(),
            });
        }
        if *buffer.tile() != expected {
            return Err(RenderError::TileMisplaced { row, col });
        }

        let slot = &mut slots[grid.index(row, col)];
        if slot.is_none() {
            outstanding -= 1;
        }
        *slot = Some(buffer);
        debug!("tile ({}, {}) done, {} outstanding", row, col, outstanding);
    }

    Ok(slots.into_iter().filter_map(|slot| slot).collect())
}
