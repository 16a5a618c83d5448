use crate::{
    assets::PreparedImage,
    core::{Rect, Rgba8Premul, Surface},
    error::MatboardResult,
    layout,
};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with an extra scalar opacity on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Integer pixel bounds of `rect` clipped to the surface; `None` when the
/// clipped span is empty.
pub(crate) fn pixel_span(surface: &Surface, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x0.round().max(0.0) as i64;
    let y0 = rect.y0.round().max(0.0) as i64;
    let x1 = (rect.x1.round() as i64).min(i64::from(surface.width));
    let y1 = (rect.y1.round() as i64).min(i64::from(surface.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Fill `rect` (clipped) with `color` via source-over.
pub fn fill_rect(surface: &mut Surface, rect: Rect, color: Rgba8Premul) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };
    let src = color.to_array();
    for y in y0..y1 {
        for x in x0..x1 {
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, src, 1.0));
        }
    }
}

/// Fill `rect` (clipped) with `texture` as a repeating pattern anchored at
/// the rect's top-left corner. No seam blending.
pub fn fill_rect_tiled(surface: &mut Surface, rect: Rect, texture: &PreparedImage) {
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };
    let anchor_x = rect.x0.round() as i64;
    let anchor_y = rect.y0.round() as i64;
    let tw = i64::from(texture.width);
    let th = i64::from(texture.height);
    for y in y0..y1 {
        let ty = (i64::from(y) - anchor_y).rem_euclid(th) as u32;
        for x in x0..x1 {
            let tx = (i64::from(x) - anchor_x).rem_euclid(tw) as u32;
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, texture.pixel(tx, ty), 1.0));
        }
    }
}

/// Multiply-blend `color` over `rect`. A pure-white tint is the identity
/// and is skipped.
pub fn tint_multiply(surface: &mut Surface, rect: Rect, color: Rgba8Premul) {
    if color.is_opaque_white() {
        return;
    }
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return;
    };
    let tint = color.to_array();
    for y in y0..y1 {
        for x in x0..x1 {
            let dst = surface.pixel(x, y).to_array();
            let out = [
                mul_div255(u16::from(dst[0]), u16::from(tint[0])),
                mul_div255(u16::from(dst[1]), u16::from(tint[1])),
                mul_div255(u16::from(dst[2]), u16::from(tint[2])),
                dst[3],
            ];
            surface.put_pixel(x, y, out);
        }
    }
}

/// Draw `image` into `rect` with cover scaling: fills the rect completely,
/// preserves the image aspect ratio, crops the overflow symmetrically.
/// Sampling is bilinear with edge clamping; drawing clips to `rect`.
pub fn draw_image_cover(
    surface: &mut Surface,
    rect: Rect,
    image: &PreparedImage,
) -> MatboardResult<()> {
    let draw = layout::cover_fit(image.width, image.height, rect)?;
    let Some((x0, y0, x1, y1)) = pixel_span(surface, rect) else {
        return Ok(());
    };

    let sx = f64::from(image.width) / draw.width();
    let sy = f64::from(image.height) / draw.height();
    for y in y0..y1 {
        let v = (f64::from(y) + 0.5 - draw.y0) * sy - 0.5;
        for x in x0..x1 {
            let u = (f64::from(x) + 0.5 - draw.x0) * sx - 0.5;
            let src = sample_bilinear(image, u, v);
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, src, 1.0));
        }
    }
    Ok(())
}

fn sample_bilinear(image: &PreparedImage, u: f64, v: f64) -> PremulRgba8 {
    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);

    let ux = u.floor();
    let vy = v.floor();
    let fx = u - ux;
    let fy = v - vy;

    let x0 = ux as u32;
    let y0 = vy as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(p00[i]) * (1.0 - fx) + f64::from(p10[i]) * fx;
        let bot = f64::from(p01[i]) * (1.0 - fx) + f64::from(p11[i]) * fx;
        out[i] = (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
