use crate::{
    assets::{ImageStore, PreparedImage},
    composite_cpu::{self, mul_div255, over},
    core::{Rgba8Premul, Surface},
    error::MatboardResult,
    layout::{self, PreviewLayout},
    model::{FrameSpec, MaterialKind, PhotoAsset},
    texture,
};

/// Soft drop shadow behind the frame band: blurred silhouette, offset
/// down-right.
#[derive(Clone, Copy, Debug)]
pub struct ShadowOpts {
    pub radius_px: u32,
    pub sigma: f32,
    pub dx_px: i32,
    pub dy_px: i32,
    pub alpha: u8,
}

impl Default for ShadowOpts {
    fn default() -> Self {
        Self {
            radius_px: 6,
            sigma: 3.0,
            dx_px: 4,
            dy_px: 4,
            alpha: 90,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderOpts {
    /// Clear color for step 1; `None` clears to transparent.
    pub backdrop: Option<Rgba8Premul>,
    /// `None` disables the drop shadow.
    pub shadow: Option<ShadowOpts>,
    /// Seed for the deterministic wood-finish jitter.
    pub seed: u64,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            backdrop: None,
            shadow: Some(ShadowOpts::default()),
            seed: 0,
        }
    }
}

/// What a completed render did, reported back to the caller instead of
/// being swallowed.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct RenderReport {
    pub generation: u64,
    pub layout: PreviewLayout,
    pub photo_painted: bool,
    /// The material texture failed to load and the band fell back to its
    /// flat tint.
    pub texture_fallback: bool,
}

/// Handle returned by [`RenderSession::begin_frame`]; authorizes exactly
/// one photo commit against the frame it was issued for.
#[derive(Clone, Copy, Debug)]
pub struct PhotoTicket {
    generation: u64,
    layout: PreviewLayout,
    texture_fallback: bool,
}

impl PhotoTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> PreviewLayout {
        self.layout
    }
}

/// Stateful entry point for the preview compositor.
///
/// Each `begin_frame` bumps a generation counter and synchronously paints
/// everything except the photo; the photo is committed later through the
/// returned [`PhotoTicket`]. A ticket from a superseded frame no longer
/// matches the session generation and commits nothing, so a decode that
/// finishes late can never paint over a newer frame.
pub struct RenderSession {
    opts: RenderOpts,
    generation: u64,
}

impl RenderSession {
    pub fn new(opts: RenderOpts) -> Self {
        Self {
            opts,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear the surface and paint shadow, frame band, and mat border.
    ///
    /// Returns the ticket for the photo commit. Validation and layout run
    /// before the first pixel is written, so a degenerate spec leaves the
    /// surface untouched.
    #[tracing::instrument(skip(self, surface, spec, store))]
    pub fn begin_frame(
        &mut self,
        surface: &mut Surface,
        spec: &FrameSpec,
        store: &mut ImageStore,
    ) -> MatboardResult<PhotoTicket> {
        let layout = layout::solve(surface.width, surface.height, spec)?;
        self.generation += 1;

        surface.clear(self.opts.backdrop.unwrap_or_else(Rgba8Premul::transparent));

        if let Some(shadow) = self.opts.shadow {
            paint_shadow(surface, &layout, shadow)?;
        }

        let texture_fallback = paint_band(surface, &layout, spec, store, self.opts.seed);

        if spec.border.enabled {
            composite_cpu::fill_rect(surface, layout.inner, spec.border.color);
        }

        Ok(PhotoTicket {
            generation: self.generation,
            layout,
            texture_fallback,
        })
    }

    /// Commit a decoded photo against `ticket`'s frame.
    ///
    /// Returns `Ok(false)` without touching the surface when the ticket is
    /// stale (a newer `begin_frame` has run since it was issued).
    pub fn commit_photo(
        &self,
        surface: &mut Surface,
        ticket: &PhotoTicket,
        image: &PreparedImage,
    ) -> MatboardResult<bool> {
        if ticket.generation != self.generation {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale photo commit"
            );
            return Ok(false);
        }
        composite_cpu::draw_image_cover(surface, ticket.layout.photo, image)?;
        Ok(true)
    }

    /// One-call render: frame band first, then the photo.
    ///
    /// A photo decode failure is returned as an error after the band has
    /// been painted, so the caller keeps the partial preview and learns
    /// why the photo region is empty.
    #[tracing::instrument(skip_all, fields(photo = %photo.source))]
    pub fn render(
        &mut self,
        surface: &mut Surface,
        photo: &PhotoAsset,
        spec: &FrameSpec,
        store: &mut ImageStore,
    ) -> MatboardResult<RenderReport> {
        let ticket = self.begin_frame(surface, spec, store)?;
        let image = store.get_or_load(&photo.source)?;
        if image.width != photo.width_px || image.height != photo.height_px {
            tracing::debug!(
                expected_w = photo.width_px,
                expected_h = photo.height_px,
                decoded_w = image.width,
                decoded_h = image.height,
                "photo metadata disagrees with decoded dimensions; using decoded"
            );
        }
        let photo_painted = self.commit_photo(surface, &ticket, &image)?;
        Ok(RenderReport {
            generation: ticket.generation,
            layout: ticket.layout,
            photo_painted,
            texture_fallback: ticket.texture_fallback,
        })
    }
}

/// Paint the frame band into `layout.outer`. Returns true when the
/// material texture was requested but failed to load and the band fell
/// back to its flat tint.
fn paint_band(
    surface: &mut Surface,
    layout: &PreviewLayout,
    spec: &FrameSpec,
    store: &mut ImageStore,
    seed: u64,
) -> bool {
    let material = &spec.material;
    let texture = match &material.texture {
        Some(source) => match store.get_or_load(source) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(
                    texture = %source,
                    error = %e,
                    "material texture failed to load, falling back to flat tint"
                );
                composite_cpu::fill_rect(surface, layout.outer, material.color);
                return true;
            }
        },
        None => None,
    };

    match texture {
        Some(img) => {
            composite_cpu::fill_rect_tiled(surface, layout.outer, &img);
            composite_cpu::tint_multiply(surface, layout.outer, material.color);
            match material.kind {
                MaterialKind::Wood => texture::wood_streaks(
                    surface,
                    layout.outer,
                    texture::stable_hash64(seed, "wood-finish"),
                ),
                MaterialKind::Metal => texture::metal_brush(surface, layout.outer),
            }
        }
        None => composite_cpu::fill_rect(surface, layout.outer, material.color),
    }
    false
}

fn paint_shadow(
    surface: &mut Surface,
    layout: &PreviewLayout,
    shadow: ShadowOpts,
) -> MatboardResult<()> {
    let w = surface.width as usize;
    let h = surface.height as usize;

    let mut mask = vec![0u8; w * h];
    if let Some((x0, y0, x1, y1)) = composite_cpu::pixel_span(surface, layout.outer) {
        for y in y0..y1 {
            let row = y as usize * w;
            mask[row + x0 as usize..row + x1 as usize].fill(255);
        }
    }
    let blurred = crate::blur_cpu::blur_mask(
        &mask,
        surface.width,
        surface.height,
        shadow.radius_px,
        shadow.sigma,
    )?;

    for y in 0..surface.height {
        let sy = i64::from(y) - i64::from(shadow.dy_px);
        if sy < 0 || sy >= h as i64 {
            continue;
        }
        for x in 0..surface.width {
            let sx = i64::from(x) - i64::from(shadow.dx_px);
            if sx < 0 || sx >= w as i64 {
                continue;
            }
            let coverage = blurred[sy as usize * w + sx as usize];
            if coverage == 0 {
                continue;
            }
            let sa = mul_div255(u16::from(coverage), u16::from(shadow.alpha));
            if sa == 0 {
                continue;
            }
            let dst = surface.pixel(x, y).to_array();
            surface.put_pixel(x, y, over(dst, [0, 0, 0, sa], 1.0));
        }
    }
    Ok(())
}
