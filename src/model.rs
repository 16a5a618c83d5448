use crate::{
    core::{Orientation, Rgba8Premul},
    error::{MatboardError, MatboardResult},
};

/// Target physical print size plus its storefront display label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    pub width_in: f64,
    pub height_in: f64,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Wood,
    Metal,
}

/// Frame moulding material: category, optional texture image, tint color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    /// Texture image path, resolved against the image store root. When
    /// absent the band is a flat tint fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub color: Rgba8Premul,
}

/// Optional mat border between the frame band and the photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatBorder {
    pub enabled: bool,
    pub width_in: f64,
    pub color: Rgba8Premul,
}

/// Complete frame configuration, a value object with structural equality.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpec {
    pub size: FrameSize,
    pub material: Material,
    pub thickness_in: f64,
    pub border: MatBorder,
}

impl FrameSpec {
    pub fn validate(&self) -> MatboardResult<()> {
        if !self.size.width_in.is_finite() || self.size.width_in <= 0.0 {
            return Err(MatboardError::validation(
                "size.width_in must be finite and > 0",
            ));
        }
        if !self.size.height_in.is_finite() || self.size.height_in <= 0.0 {
            return Err(MatboardError::validation(
                "size.height_in must be finite and > 0",
            ));
        }
        if !self.thickness_in.is_finite() || self.thickness_in <= 0.0 {
            return Err(MatboardError::validation(
                "thickness_in must be finite and > 0",
            ));
        }
        if !self.border.width_in.is_finite() || self.border.width_in < 0.0 {
            return Err(MatboardError::validation(
                "border.width_in must be finite and >= 0",
            ));
        }
        if let Some(texture) = &self.material.texture
            && texture.is_empty()
        {
            return Err(MatboardError::validation(
                "material.texture must be non-empty when present",
            ));
        }
        Ok(())
    }
}

/// User-supplied photo reference. Immutable; a new upload replaces it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoAsset {
    pub source: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl PhotoAsset {
    pub fn new(source: impl Into<String>, width_px: u32, height_px: u32) -> MatboardResult<Self> {
        let source = source.into();
        if source.is_empty() {
            return Err(MatboardError::validation("photo source must be non-empty"));
        }
        if width_px == 0 || height_px == 0 {
            return Err(MatboardError::validation(
                "photo width_px/height_px must be > 0",
            ));
        }
        Ok(Self {
            source,
            width_px,
            height_px,
        })
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_dimensions(self.width_px, self.height_px)
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width_px) / f64::from(self.height_px)
    }
}
