use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::error::{MatboardError, MatboardResult};

/// Decoded raster image, premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build from straight-alpha RGBA8 bytes (`width * height * 4`).
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> MatboardResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(rgba.len()) {
            return Err(MatboardError::validation(
                "image buffer must be width*height*4 with width/height > 0",
            ));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> MatboardResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MatboardError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Path-keyed decode cache for photos and material textures.
///
/// Relative sources resolve against `root`; decode and read failures are
/// reported as [`MatboardError::Decode`], never swallowed.
pub struct ImageStore {
    root: PathBuf,
    cache: HashMap<String, Arc<PreparedImage>>,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_or_load(&mut self, source: &str) -> MatboardResult<Arc<PreparedImage>> {
        if let Some(img) = self.cache.get(source) {
            return Ok(Arc::clone(img));
        }

        let path = self.root.join(source);
        let bytes = std::fs::read(&path)
            .map_err(|e| MatboardError::decode(format!("read image '{}': {e}", path.display())))?;
        let img = Arc::new(decode_image(&bytes)?);
        self.cache.insert(source.to_string(), Arc::clone(&img));
        Ok(img)
    }

    /// Drop every cached decode, e.g. after the user replaces a photo.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn decode_image_png_dimensions_and_premul() {
        let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
        let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let prepared = decode_image(&buf).unwrap();
        assert_eq!(prepared.width, 1);
        assert_eq!(prepared.height, 1);
        assert_eq!(
            prepared.rgba8_premul.as_slice(),
            &[
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128u8
            ]
        );
    }

    #[test]
    fn decode_image_garbage_is_an_error() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, MatboardError::Decode(_)));
    }

    #[test]
    fn from_straight_rgba8_checks_shape() {
        assert!(PreparedImage::from_straight_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(PreparedImage::from_straight_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(PreparedImage::from_straight_rgba8(0, 2, vec![]).is_err());
    }

    #[test]
    fn store_reports_missing_file_as_decode_error() {
        let mut store = ImageStore::new(std::env::temp_dir());
        let err = store.get_or_load("matboard-definitely-missing.png").unwrap_err();
        assert!(matches!(err, MatboardError::Decode(_)));
    }
}
