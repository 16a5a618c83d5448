use crate::error::{MatboardError, MatboardResult};

pub use kurbo::{Point, Rect, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Fully opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            ((c * a + 127) / 255) as u8
        }
        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Pure opaque white, the identity of a multiply tint.
    pub fn is_opaque_white(self) -> bool {
        self.r == 255 && self.g == 255 && self.b == 255 && self.a == 255
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Photo orientation derived from pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl Orientation {
    pub fn from_dimensions(width_px: u32, height_px: u32) -> Self {
        match width_px.cmp(&height_px) {
            std::cmp::Ordering::Less => Self::Portrait,
            std::cmp::Ordering::Greater => Self::Landscape,
            std::cmp::Ordering::Equal => Self::Square,
        }
    }
}

/// Caller-owned pixel canvas the compositor draws into.
///
/// Row-major, tightly packed, premultiplied RGBA8. The compositor never
/// resizes it; every render is a full overwrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> MatboardResult<Self> {
        if width == 0 || height == 0 {
            return Err(MatboardError::validation("surface width/height must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| MatboardError::validation("surface size overflows"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Un-premultiply into straight-alpha RGBA8, e.g. for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a == 0 || a == 255 {
                continue;
            }
            px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
            px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
            px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_straight_rgba_premultiplies() {
        let c = Rgba8Premul::from_straight_rgba(100, 50, 200, 128);
        assert_eq!(c.r, ((100u16 * 128 + 127) / 255) as u8);
        assert_eq!(c.g, ((50u16 * 128 + 127) / 255) as u8);
        assert_eq!(c.b, ((200u16 * 128 + 127) / 255) as u8);
        assert_eq!(c.a, 128);
    }

    #[test]
    fn opaque_white_detection() {
        assert!(Rgba8Premul::opaque(255, 255, 255).is_opaque_white());
        assert!(!Rgba8Premul::opaque(255, 254, 255).is_opaque_white());
        assert!(!Rgba8Premul::from_straight_rgba(255, 255, 255, 128).is_opaque_white());
    }

    #[test]
    fn orientation_from_dimensions() {
        assert_eq!(Orientation::from_dimensions(900, 1600), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(1600, 900), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(1000, 1000), Orientation::Square);
    }

    #[test]
    fn surface_rejects_zero_dimensions() {
        assert!(Surface::new(0, 10).is_err());
        assert!(Surface::new(10, 0).is_err());
    }

    #[test]
    fn surface_clear_overwrites_everything() {
        let mut s = Surface::new(2, 2).unwrap();
        s.clear(Rgba8Premul::opaque(10, 20, 30));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(s.pixel(x, y), Rgba8Premul::opaque(10, 20, 30));
            }
        }
    }

    #[test]
    fn straight_rgba_roundtrip_on_opaque() {
        let mut s = Surface::new(1, 1).unwrap();
        s.clear(Rgba8Premul::opaque(7, 8, 9));
        assert_eq!(s.to_straight_rgba8(), vec![7, 8, 9, 255]);
    }
}
