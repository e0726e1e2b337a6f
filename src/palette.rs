// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps iteration counts to colors.

/// An indexed color table.  Color indices wrap around the end of the
/// table, so with the default 256-entry table a point that never
/// escapes (count 256) lands back on entry 0, which is black.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette(Vec<[u8; 3]>);

impl Palette {
    /// A ramp of `size` colors where entry `i` is `(i, 2.2i, 4.4i)`,
    /// each channel wrapped to a byte.  The wrapping makes the
    /// bands of color near the set's boundary.
    pub fn ramp(size: usize) -> Palette {
        let channel = |i: usize, factor: f64| (((i as f64) * factor) as u64 % 256) as u8;
        Palette(
            (0..size.max(1))
                .map(|i| [channel(i, 1.0), channel(i, 2.2), channel(i, 4.4)])
                .collect(),
        )
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a palette has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The color for an iteration count.
    pub fn color(&self, index: u32) -> [u8; 3] {
        self.0[(index as usize) % self.0.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::ramp(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_starts_black() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 256);
        assert_eq!(palette.color(0), [0, 0, 0]);
    }

    #[test]
    fn ramp_channels_wrap() {
        let palette = Palette::default();
        assert_eq!(palette.color(10), [10, 22, 44]);
        // 100 * 4.4 = 440, which wraps to 184.
        assert_eq!(palette.color(100), [100, 220, 184]);
    }

    #[test]
    fn indices_wrap_around_the_table() {
        let palette = Palette::default();
        assert_eq!(palette.color(256), palette.color(0));
        assert_eq!(palette.color(300), palette.color(44));
    }

    #[test]
    fn empty_ramps_still_have_a_color() {
        let palette = Palette::ramp(0);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.color(12), [0, 0, 0]);
    }
}
