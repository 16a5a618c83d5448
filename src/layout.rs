use crate::{
    core::Rect,
    error::{MatboardError, MatboardResult},
    model::FrameSpec,
};

/// On-screen pixels per physical inch. A stylized display heuristic, not a
/// DPI-derived scale; thickness and mat width insets both use it.
pub const PX_PER_IN: f64 = 20.0;

/// Fraction of the limiting surface dimension covered by the frame's outer
/// rectangle.
pub const FIT_FRACTION: f64 = 0.8;

/// Solved preview rectangles in surface pixel space.
///
/// `outer` bounds the frame band, `inner` is `outer` inset by the moulding
/// thickness, `photo` is `inner` inset by the mat width (equal to `inner`
/// when the mat is disabled).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PreviewLayout {
    pub outer: Rect,
    pub inner: Rect,
    pub photo: Rect,
}

/// Compute the preview rectangles for `spec` on a `surface_w` x `surface_h`
/// canvas.
///
/// The outer rectangle keeps the spec's physical aspect ratio, scales so
/// its limiting dimension is exactly [`FIT_FRACTION`] of the corresponding
/// surface dimension, and is centered. A frame wider (proportionally) than
/// the surface is width-limited; taller is height-limited; equal ratios
/// take the width-limited branch.
///
/// Degenerate geometry (an inset that collapses the inner or photo
/// rectangle) is rejected before any drawing happens.
pub fn solve(surface_w: u32, surface_h: u32, spec: &FrameSpec) -> MatboardResult<PreviewLayout> {
    if surface_w == 0 || surface_h == 0 {
        return Err(MatboardError::validation("surface width/height must be > 0"));
    }
    spec.validate()?;

    let sw = f64::from(surface_w);
    let sh = f64::from(surface_h);
    let frame_ratio = spec.size.width_in / spec.size.height_in;
    let surface_ratio = sw / sh;

    let (w, h) = if frame_ratio >= surface_ratio {
        let w = sw * FIT_FRACTION;
        (w, w / frame_ratio)
    } else {
        let h = sh * FIT_FRACTION;
        (h * frame_ratio, h)
    };

    let x0 = (sw - w) / 2.0;
    let y0 = (sh - h) / 2.0;
    let outer = Rect::new(x0, y0, x0 + w, y0 + h);

    let inner = inset(outer, spec.thickness_in * PX_PER_IN);
    if inner.width() <= 0.0 || inner.height() <= 0.0 {
        return Err(MatboardError::validation(
            "thickness_in leaves no interior at this surface size",
        ));
    }

    let photo = if spec.border.enabled {
        inset(inner, spec.border.width_in * PX_PER_IN)
    } else {
        inner
    };
    if photo.width() <= 0.0 || photo.height() <= 0.0 {
        return Err(MatboardError::validation(
            "border.width_in leaves no photo region at this surface size",
        ));
    }

    tracing::debug!(?outer, ?inner, ?photo, "solved preview layout");
    Ok(PreviewLayout { outer, inner, photo })
}

/// The rectangle the photo is drawn into, in surface space, under cover
/// scaling: fills `dst` completely, preserves the `src_w`/`src_h` aspect
/// ratio, and overflows `dst` symmetrically on the cropped axis. Drawing
/// clips to `dst`.
pub fn cover_fit(src_w: u32, src_h: u32, dst: Rect) -> MatboardResult<Rect> {
    if src_w == 0 || src_h == 0 {
        return Err(MatboardError::validation("cover_fit source must be > 0 px"));
    }
    if dst.width() <= 0.0 || dst.height() <= 0.0 {
        return Err(MatboardError::validation(
            "cover_fit target must have positive extent",
        ));
    }

    let photo_ratio = f64::from(src_w) / f64::from(src_h);
    let area_ratio = dst.width() / dst.height();

    let (w, h) = if photo_ratio > area_ratio {
        // Relatively wider: match heights, crop left/right.
        let h = dst.height();
        (h * photo_ratio, h)
    } else {
        // Relatively taller (or equal): match widths, crop top/bottom.
        let w = dst.width();
        (w, w / photo_ratio)
    };

    let cx = (dst.x0 + dst.x1) / 2.0;
    let cy = (dst.y0 + dst.y1) / 2.0;
    Ok(Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0))
}

fn inset(r: Rect, d: f64) -> Rect {
    Rect::new(r.x0 + d, r.y0 + d, r.x1 - d, r.y1 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FrameSpecBuilder;
    use crate::core::Rgba8Premul;

    fn spec_8x10() -> FrameSpec {
        FrameSpecBuilder::new("8x10", 8.0, 10.0)
            .thickness_in(0.75)
            .build()
            .unwrap()
    }

    #[test]
    fn outer_rect_is_height_limited_on_square_surface() {
        let layout = solve(400, 400, &spec_8x10()).unwrap();
        assert!((layout.outer.height() - 320.0).abs() < 1e-9);
        assert!((layout.outer.width() - 256.0).abs() < 1e-9);
    }

    #[test]
    fn outer_rect_is_centered() {
        let layout = solve(500, 300, &spec_8x10()).unwrap();
        let left = layout.outer.x0;
        let right = 500.0 - layout.outer.x1;
        let top = layout.outer.y0;
        let bottom = 300.0 - layout.outer.y1;
        assert!((left - right).abs() < 1e-9);
        assert!((top - bottom).abs() < 1e-9);
    }

    #[test]
    fn equal_ratios_take_width_limited_branch() {
        let spec = FrameSpecBuilder::new("sq", 6.0, 6.0)
            .thickness_in(0.5)
            .build()
            .unwrap();
        let layout = solve(200, 200, &spec).unwrap();
        assert!((layout.outer.width() - 160.0).abs() < 1e-9);
        assert!((layout.outer.height() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_thickness_is_rejected() {
        let spec = FrameSpecBuilder::new("8x10", 8.0, 10.0)
            .thickness_in(10.0)
            .build()
            .unwrap();
        let err = solve(400, 400, &spec).unwrap_err();
        assert!(err.to_string().contains("no interior"));
    }

    #[test]
    fn degenerate_border_is_rejected() {
        let spec = FrameSpecBuilder::new("8x10", 8.0, 10.0)
            .thickness_in(0.5)
            .mat_border(8.0, Rgba8Premul::opaque(255, 255, 255))
            .build()
            .unwrap();
        assert!(solve(400, 400, &spec).is_err());
    }

    #[test]
    fn cover_fit_equal_ratios_is_exact() {
        let dst = Rect::new(10.0, 10.0, 110.0, 60.0);
        let draw = cover_fit(200, 100, dst).unwrap();
        assert!((draw.x0 - dst.x0).abs() < 1e-9);
        assert!((draw.y0 - dst.y0).abs() < 1e-9);
        assert!((draw.x1 - dst.x1).abs() < 1e-9);
        assert!((draw.y1 - dst.y1).abs() < 1e-9);
    }

    #[test]
    fn cover_fit_rejects_degenerate_inputs() {
        let dst = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(cover_fit(0, 10, dst).is_err());
        assert!(cover_fit(10, 10, Rect::new(0.0, 0.0, 0.0, 10.0)).is_err());
    }
}
