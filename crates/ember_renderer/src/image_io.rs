//! Writing rendered images to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::renderer::{color_to_rgba, ImageBuffer};

/// Errors that can occur when saving an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cannot save an image with no pixels")]
    EmptyImage,
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Write an image as ASCII PPM (P3), one pixel per line, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> ImageResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Save an image, picking the format from the file extension.
///
/// `.ppm` is written as ASCII P3. Every other extension is handed to the
/// `image` crate (PNG, JPEG, BMP, ...).
pub fn save_image<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> ImageResult<()> {
    let path = path.as_ref();
    if image.is_empty() {
        return Err(ImageError::EmptyImage);
    }

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)?;
        write_ppm(image, BufWriter::new(file))?;
    } else {
        image.to_rgb_image().save(path)?;
    }

    log::info!(
        "Saved {}x{} image to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn checker() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::ONE);
        image.set(1, 1, Color::new(0.25, 0.0, 1.0));
        image
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&checker(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "P3",
                "2 2",
                "255",
                "255 255 255",
                "0 0 0",
                "0 0 0",
                "128 0 255",
            ]
        );
    }

    #[test]
    fn test_save_ppm_file() {
        let path = std::env::temp_dir().join(format!("ember_io_{}.ppm", std::process::id()));
        save_image(&checker(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert_eq!(text.lines().count(), 7);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_png_file() {
        let path = std::env::temp_dir().join(format!("ember_io_{}.png", std::process::id()));
        save_image(&checker(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(loaded.get_pixel(1, 1).0, [128, 0, 255]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let result = save_image(&ImageBuffer::new(0, 0), "never_written.ppm");
        assert!(matches!(result, Err(ImageError::EmptyImage)));
    }

    #[test]
    fn test_unknown_extension_fails_to_encode() {
        let path = std::env::temp_dir().join("ember_io_unknown.notaformat");
        let result = save_image(&checker(), &path);
        assert!(matches!(result, Err(ImageError::Encode(_))));
    }
}
