// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameters of a render.  A `RenderConfig` is validated once,
//! when it is built, and is read-only afterwards; the controller and
//! every worker borrow the same one.

use num::Complex;

use errors::RenderError;
use kernel::MAX_ITERATIONS;
use planes::{ComplexPlane, PlaneMapper};

/// Image dimensions, the window onto the complex plane, the number
/// of rows bundled into one work unit, and the kernel's iteration
/// cap.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    plane: PlaneMapper,
    granularity: usize,
    max_iterations: u32,
}

impl RenderConfig {
    /// Builds and validates a configuration.  The height must be an
    /// exact multiple of the granularity; the scheduler has no policy
    /// for a partial band at the bottom of the image.
    pub fn new(
        width: usize,
        height: usize,
        window: ComplexPlane,
        granularity: usize,
        max_iterations: u32,
    ) -> Result<RenderConfig, RenderError> {
        // Coordinates and row indices travel as u32 on the wire.
        let limit = u32::max_value() as usize;
        if width > limit || height > limit {
            return Err(RenderError::Config(format!(
                "An image of {}x{} is too large to schedule.",
                width, height
            )));
        }

        if granularity == 0 {
            return Err(RenderError::Config(
                "A work unit must contain at least one row.".to_string(),
            ));
        }

        if height % granularity != 0 {
            return Err(RenderError::Config(format!(
                "The image height ({}) is not a multiple of the rows per work unit ({}).",
                height, granularity
            )));
        }

        if max_iterations == 0 {
            return Err(RenderError::Config(
                "The iteration cap must be at least 1.".to_string(),
            ));
        }

        let plane = PlaneMapper::new(width, height, window.0, window.1)?;
        Ok(RenderConfig {
            plane,
            granularity,
            max_iterations,
        })
    }

    /// An image of the given size over the default window, one row
    /// per unit, and the default iteration cap.
    pub fn with_size(width: usize, height: usize) -> Result<RenderConfig, RenderError> {
        RenderConfig::new(width, height, ComplexPlane::default(), 1, MAX_ITERATIONS)
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    /// The pixel-to-point mapping every worker uses.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The left-lower and right-upper corners of the window.
    pub fn window(&self) -> (Complex<f64>, Complex<f64>) {
        let ComplexPlane(leftlower, rightupper) = self.plane.complex_plane;
        (leftlower, rightupper)
    }

    /// Rows per work unit.
    pub fn granularity(&self) -> usize {
        self.granularity
    }

    /// The kernel's iteration cap.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// How many work units cover the image.
    pub fn units(&self) -> usize {
        self.height() / self.granularity
    }

    /// How many (x, y, color) triples one work unit produces.
    pub fn unit_len(&self) -> usize {
        self.width() * self.granularity
    }

    /// The first row of every work unit, in order.
    pub fn unit_rows(&self) -> impl Iterator<Item = usize> {
        (0..self.height()).step_by(self.granularity)
    }

    /// Whether `row` is the first row of some work unit.
    pub fn is_unit_row(&self, row: usize) -> bool {
        row < self.height() && row % self.granularity == 0
    }

    /// Checks that a group of `processes` ranks can carry out this
    /// render: one controller and at least one worker.
    pub fn check_group(&self, processes: usize) -> Result<(), RenderError> {
        if processes < 2 {
            return Err(RenderError::Config(format!(
                "A render needs a controller and at least one worker, not {} process(es).",
                processes
            )));
        }
        Ok(())
    }
}
