#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelfarm
//!
//! The Mandelbrot set is drawn by taking a point on the complex plane,
//! repeatedly squaring it and adding the original point back in, and
//! measuring how quickly the result heads off to infinity.  That
//! "velocity" is the color of the pixel the point came from.  Every
//! pixel is independent of every other, which makes the picture an
//! ideal job to farm out.
//!
//! This crate farms it out the way a message-passing cluster would.
//! A fixed group of ranks is wired up at startup.  Rank 0, the
//! controller, cuts the image into bands of rows and hands a band to
//! each worker; whenever a worker returns a finished band, the
//! controller writes it into the canvas and hands that worker the next
//! band nobody has seen.  When the bands run out, each worker is told
//! to finish, exactly once.
//!
//! ```no_run
//! use mandelfarm::{launch, Palette, RenderConfig};
//!
//! let config = RenderConfig::with_size(1200, 800).unwrap();
//! let render = launch(&config, 5).unwrap();
//! render.canvas.save("mandelbrot.png", &Palette::default()).unwrap();
//! ```

extern crate crossbeam;
extern crate failure;
extern crate image;
#[macro_use]
extern crate itertools;
extern crate num;
#[macro_use]
extern crate tracing;

#[cfg(test)]
extern crate tempfile;

pub mod canvas;
pub mod config;
pub mod controller;
pub mod errors;
pub mod kernel;
pub mod palette;
pub mod planes;
pub mod process;
pub mod protocol;
pub mod sequential;
pub mod transport;
pub mod worker;

pub use canvas::{Canvas, PixelSink};
pub use config::RenderConfig;
pub use controller::{Controller, ScheduleReport};
pub use errors::RenderError;
pub use kernel::{escape_time, MAX_ITERATIONS};
pub use palette::Palette;
pub use planes::{ComplexPlane, PlaneMapper};
pub use process::{launch, Render, Role};
pub use sequential::render_sequential;
pub use transport::{establish, Communicator, Link, Rank, CONTROLLER};
pub use worker::{Worker, WorkerReport};
