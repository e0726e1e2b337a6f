// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single-threaded renderer.  Same bands, same kernel, same
//! mapping, no scheduler; used as the reference a scheduled render
//! must match pixel for pixel.

use canvas::{Canvas, PixelSink};
use config::RenderConfig;
use worker::compute_band;

/// Renders the whole image on the calling thread.
pub fn render_sequential(config: &RenderConfig) -> Canvas {
    let mut canvas = Canvas::new(config.width(), config.height());
    for row in config.unit_rows() {
        for t in compute_band(config, row) {
            canvas.set_pixel(t.x, t.y, t.color);
        }
    }
    canvas
}
