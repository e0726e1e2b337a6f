// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Given a point on the complex plane,
//! repeatedly square it and add the original point back in, and
//! count how many rounds it takes for the result to leave the circle
//! of radius two.  That count is the "color index" of the pixel the
//! point came from.

use num::Complex;

/// The default number of rounds after which we give up and declare
/// a point to be inside the Mandelbrot set.
pub const MAX_ITERATIONS: u32 = 256;

/// Returns the number of iterations of `z = z * z + c` (starting
/// with `z = 0`) it takes for `|z|²` to reach 4.0, capped at
/// `max_iterations`.  The first round always runs, so the smallest
/// possible answer is 1; points inside the set return the cap.
///
/// This is a pure function and is safe to call from any number of
/// threads at once.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut count = 0;
    loop {
        z = z * z + c;
        count += 1;
        if z.norm_sqr() >= 4.0 || count >= max_iterations {
            return count;
        }
    }
}
