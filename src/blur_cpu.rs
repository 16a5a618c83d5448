use crate::error::{MatboardError, MatboardResult};

/// Separable gaussian blur of a single-channel coverage mask.
///
/// Used to soften the frame's drop-shadow silhouette; the shadow only
/// needs coverage, so this works on one `u8` plane instead of RGBA.
pub fn blur_mask(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> MatboardResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| MatboardError::render("blur mask size overflow"))?;
    if src.len() != expected_len {
        return Err(MatboardError::render(
            "blur_mask expects src matching width*height",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Normalized gaussian weights in Q16 fixed point, length `2*radius + 1`,
/// summing to exactly 1<<16 (drift folded into the center tap).
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> MatboardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MatboardError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;

    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as i64;
        weights.push(q as u32);
        acc += q;
    }
    let mid = weights.len() / 2;
    let fixed = (i64::from(weights[mid]) + (65536 - acc)).clamp(0, 65536);
    weights[mid] = fixed as u32;

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..height as i64 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                acc += u64::from(src[row + sx as usize]) * u64::from(kw);
            }
            dst[row + x as usize] = (acc >> 16).min(255) as u8;
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1);
                acc += u64::from(src[(sy * w + x) as usize]) * u64::from(kw);
            }
            dst[(y * w + x) as usize] = (acc >> 16).min(255) as u8;
        }
    }
}
