//! Decode files into [`ImageBuffer`]s and encode composites back to disk.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` |
//! | Encode | `image::DynamicImage::save`, format from extension |
//!
//! Channel counts survive decoding: grey stays 1 channel, grey+alpha 2,
//! RGB 3, RGBA 4. Higher bit depths are reduced to 8 bits per sample.

use super::buffer::{Dimensions, ImageBuffer};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
    #[error("Cannot encode a {0}-channel image (supported: 1-4)")]
    UnsupportedChannels(u32),
}

const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions with a decoder compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Expand CLI inputs into image files.
///
/// Files are kept in the order given. A directory contributes its supported
/// image files (non-recursive), sorted by file name.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, CodecError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_supported(p))
                .collect();
            entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Read image dimensions from the file header without decoding pixels.
pub fn identify(path: &Path) -> Result<Dimensions, CodecError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| CodecError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Dimensions { width, height })
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<ImageBuffer, CodecError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| CodecError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    from_dynamic(img).map_err(|e| CodecError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Convert a decoded image, keeping its channel count.
pub fn from_dynamic(img: DynamicImage) -> crate::error::Result<ImageBuffer> {
    let color = img.color();
    let (width, height) = (img.width(), img.height());
    let (channels, data) = match (color.has_color(), color.has_alpha()) {
        (false, false) => (1, img.into_luma8().into_raw()),
        (false, true) => (2, img.into_luma_alpha8().into_raw()),
        (true, false) => (3, img.into_rgb8().into_raw()),
        (true, true) => (4, img.into_rgba8().into_raw()),
    };
    ImageBuffer::new(height, width, channels, data)
}

/// Convert to an `image` crate image. Only 1-4 channels have a pixel type.
pub fn to_dynamic(buffer: &ImageBuffer) -> Result<DynamicImage, CodecError> {
    let (w, h) = (buffer.width(), buffer.height());
    let data = buffer.as_raw().to_vec();
    let img = match buffer.channels() {
        1 => image::GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        2 => image::GrayAlphaImage::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
        3 => image::RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        other => return Err(CodecError::UnsupportedChannels(other)),
    };
    img.ok_or(CodecError::UnsupportedChannels(buffer.channels()))
}

/// Encode `buffer` to `path`; the format follows the file extension.
///
/// JPEG has no alpha channel, so alpha is dropped for `.jpg`/`.jpeg`.
pub fn save_image(buffer: &ImageBuffer, path: &Path) -> Result<(), CodecError> {
    let mut img = to_dynamic(buffer)?;
    let format = ImageFormat::from_path(path).map_err(|e| CodecError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if format == ImageFormat::Jpeg && img.color().has_alpha() {
        img = if img.color().has_color() {
            DynamicImage::ImageRgb8(img.into_rgb8())
        } else {
            DynamicImage::ImageLuma8(img.into_luma8())
        };
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, format)
        .map_err(|e| CodecError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn gradient(height: u32, width: u32, channels: u32) -> ImageBuffer {
        ImageBuffer::from_fn(height, width, channels, |y, x, c| (y * 16 + x * 4 + c) as u8)
            .unwrap()
    }

    #[test]
    fn supported_extensions_include_common_formats() {
        let exts = supported_input_extensions();
        assert!(exts.contains(&"jpg"));
        assert!(exts.contains(&"png"));
    }

    #[test]
    fn png_preserves_pixels_and_channels() {
        let tmp = TempDir::new().unwrap();
        for channels in 1..=4 {
            let path = tmp.path().join(format!("img-{channels}.png"));
            let img = gradient(5, 7, channels);
            save_image(&img, &path).unwrap();
            assert_eq!(load_image(&path).unwrap(), img);
        }
    }

    #[test]
    fn identify_reads_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        save_image(&gradient(9, 4, 3), &path).unwrap();
        assert_eq!(identify(&path).unwrap(), Dimensions::new(4, 9));
    }

    #[test]
    fn jpeg_drops_alpha() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        save_image(&gradient(8, 8, 4), &path).unwrap();
        assert_eq!(load_image(&path).unwrap().channels(), 3);
    }

    #[test]
    fn save_rejects_five_channels() {
        let tmp = TempDir::new().unwrap();
        let result = save_image(&gradient(2, 2, 5), &tmp.path().join("x.png"));
        assert!(matches!(result, Err(CodecError::UnsupportedChannels(5))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load_image(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn collect_inputs_expands_directories_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("photos");
        fs::create_dir_all(&dir).unwrap();
        save_image(&gradient(2, 2, 3), &dir.join("b.png")).unwrap();
        save_image(&gradient(2, 2, 3), &dir.join("a.png")).unwrap();
        fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let loose = tmp.path().join("z.png");
        save_image(&gradient(2, 2, 3), &loose).unwrap();

        let files = collect_inputs(&[loose.clone(), dir.clone()]).unwrap();
        assert_eq!(files, vec![loose, dir.join("a.png"), dir.join("b.png")]);
    }
}
