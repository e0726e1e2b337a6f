// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image assembly.  The controller is the only writer; it hands
//! every returned pixel to a `PixelSink`, and the default sink is a
//! `Canvas` of iteration counts that can later be colored and saved.

use image::ColorType;
use std::path::Path;

use errors::RenderError;
use palette::Palette;

const EXTENSIONS: &[&str] = &["png", "ppm", "bmp"];

/// Anything the controller can write pixels into.
pub trait PixelSink {
    /// Record the color index of the pixel at column `x`, row `y`.
    fn set_pixel(&mut self, x: usize, y: usize, color: u32);
}

/// A width × height buffer of iteration counts, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    /// A blank canvas.  Every pixel starts at zero.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The color index at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// All color indices, row by row.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Colors every pixel through `palette`, as packed RGB bytes.
    pub fn to_rgb(&self, palette: &Palette) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|index| palette.color(*index).to_vec())
            .collect()
    }

    /// Colors the canvas and writes it to `path`.  The format follows
    /// the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, palette: &Palette) -> Result<(), RenderError> {
        let path = path.as_ref();
        check_output_path(path)?;
        image::save_buffer(
            path,
            &self.to_rgb(palette),
            self.width as u32,
            self.height as u32,
            ColorType::RGB(8),
        )
        .map_err(|e| RenderError::Output(format!("{}: {}", path.display(), e)))
    }
}

impl PixelSink for Canvas {
    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }
}

/// Checks, before any work is done, that an image can be saved under
/// this name.
pub fn check_output_path(path: &Path) -> Result<(), RenderError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension {
        Some(ref e) if EXTENSIONS.contains(&e.as_str()) => Ok(()),
        _ => Err(RenderError::Output(format!(
            "{}: the file name must end in one of {}",
            path.display(),
            EXTENSIONS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn pixels_land_row_by_row() {
        let mut canvas = Canvas::new(3, 2);
        canvas.set_pixel(2, 1, 7);
        canvas.set_pixel(0, 1, 5);
        assert_eq!(canvas.get(2, 1), 7);
        assert_eq!(canvas.pixels(), &[0, 0, 0, 5, 0, 7]);
    }

    #[test]
    fn coloring_uses_the_palette() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set_pixel(1, 0, 10);
        let rgb = canvas.to_rgb(&Palette::default());
        assert_eq!(rgb, vec![0, 0, 0, 10, 22, 44]);
    }

    #[test]
    fn output_names_need_a_known_extension() {
        assert!(check_output_path(&PathBuf::from("out.png")).is_ok());
        assert!(check_output_path(&PathBuf::from("OUT.PPM")).is_ok());
        assert!(check_output_path(&PathBuf::from("out.gif")).is_err());
        assert!(check_output_path(&PathBuf::from("out")).is_err());
    }

    #[test]
    fn saved_images_decode_at_the_right_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        let mut canvas = Canvas::new(5, 3);
        canvas.set_pixel(4, 2, 256);
        canvas.save(&path, &Palette::default()).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb();
        assert_eq!(decoded.dimensions(), (5, 3));
    }
}
