use crate::{
    composite_cpu::{over, pixel_span},
    core::{Rect, Surface},
};

// Decorative finish overlays painted on top of a tiled (and tinted)
// material texture. Both are deterministic: wood jitter comes from a
// SplitMix64 stream keyed by the caller's seed, never a live RNG.

/// Parallel vertical streaks with jittered spacing, shade, and strength.
pub fn wood_streaks(surface: &mut Surface, rect: Rect, seed: u64) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };

    for x in x0..x1 {
        let h = mix64(seed ^ u64::from(x - x0));
        // Roughly one streak per three columns.
        if h % 3 != 0 {
            continue;
        }
        let alpha = 16 + ((h >> 8) & 0x1f) as u8; // 16..=47
        let dark = (h >> 16) & 1 == 0;
        let src = if dark {
            [0, 0, 0, alpha]
        } else {
            [alpha, alpha, alpha, alpha] // premul white at `alpha`
        };
        for y in y0..y1 {
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, src, 1.0));
        }
    }
}

/// Three-stop brushed gradient (light, dark, light) running top to bottom.
pub fn metal_brush(surface: &mut Surface, rect: Rect) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };

    const OVERLAY_ALPHA: u8 = 44;
    let span = (y1 - y0).max(1) as f64;
    for y in y0..y1 {
        let t = (f64::from(y - y0) + 0.5) / span;
        // 0 at the dark middle stop, 1 at the light outer stops.
        let w = ((t - 0.5).abs() * 2.0).clamp(0.0, 1.0);
        let gray = (w * 255.0).round() as u16;
        let c = ((gray * u16::from(OVERLAY_ALPHA) + 127) / 255) as u8;
        let src = [c, c, c, OVERLAY_ALPHA];
        for x in x0..x1 {
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, src, 1.0));
        }
    }
}

/// SplitMix64 mixing function.
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stable 64-bit hash of a seed and a label, for derived jitter streams.
pub(crate) fn stable_hash64(seed: u64, label: &str) -> u64 {
    let mut state = mix64(seed ^ 0x9E37_79B9_7F4A_7C15);
    for chunk in label.as_bytes().chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= u64::from(b) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rgba8Premul;

    fn band() -> (Surface, Rect) {
        let mut s = Surface::new(32, 16).unwrap();
        s.clear(Rgba8Premul::opaque(120, 90, 60));
        (s, Rect::new(0.0, 0.0, 32.0, 16.0))
    }

    #[test]
    fn wood_streaks_are_deterministic() {
        let (mut a, rect) = band();
        let (mut b, _) = band();
        wood_streaks(&mut a, rect, 42);
        wood_streaks(&mut b, rect, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn wood_streaks_vary_with_seed() {
        let (mut a, rect) = band();
        let (mut b, _) = band();
        wood_streaks(&mut a, rect, 1);
        wood_streaks(&mut b, rect, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn wood_streaks_run_full_height() {
        let (mut s, rect) = band();
        let before = s.clone();
        wood_streaks(&mut s, rect, 7);
        for x in 0..32 {
            let touched = s.pixel(x, 0) != before.pixel(x, 0);
            for y in 1..16 {
                assert_eq!(
                    s.pixel(x, y) != before.pixel(x, y),
                    touched,
                    "streak at column {x} must span every row"
                );
            }
        }
    }

    #[test]
    fn metal_brush_is_light_dark_light() {
        let (mut s, rect) = band();
        metal_brush(&mut s, rect);
        let top = s.pixel(0, 0);
        let mid = s.pixel(0, 8);
        let bottom = s.pixel(0, 15);
        assert!(top.r > mid.r, "top stop should be lighter than middle");
        assert!(bottom.r > mid.r, "bottom stop should be lighter than middle");
    }

    #[test]
    fn stable_hash64_distinguishes_labels() {
        assert_ne!(stable_hash64(0, "wood-finish"), stable_hash64(0, "metal"));
        assert_eq!(stable_hash64(5, "x"), stable_hash64(5, "x"));
    }
}
