use crate::{
    core::Rgba8Premul,
    error::MatboardResult,
    model::{FrameSize, FrameSpec, MatBorder, Material, MaterialKind},
};

/// Consuming builder for [`FrameSpec`], used by the CLI and tests.
///
/// Defaults: no texture, no mat border, 0.75in thickness, black tint.
pub struct FrameSpecBuilder {
    size: FrameSize,
    kind: MaterialKind,
    texture: Option<String>,
    color: Rgba8Premul,
    thickness_in: f64,
    border: MatBorder,
}

impl FrameSpecBuilder {
    pub fn new(label: impl Into<String>, width_in: f64, height_in: f64) -> Self {
        Self {
            size: FrameSize {
                width_in,
                height_in,
                label: label.into(),
            },
            kind: MaterialKind::Wood,
            texture: None,
            color: Rgba8Premul::opaque(0, 0, 0),
            thickness_in: 0.75,
            border: MatBorder {
                enabled: false,
                width_in: 0.0,
                color: Rgba8Premul::opaque(255, 255, 255),
            },
        }
    }

    pub fn material(mut self, kind: MaterialKind, color: Rgba8Premul) -> Self {
        self.kind = kind;
        self.color = color;
        self
    }

    pub fn texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    pub fn thickness_in(mut self, thickness_in: f64) -> Self {
        self.thickness_in = thickness_in;
        self
    }

    pub fn mat_border(mut self, width_in: f64, color: Rgba8Premul) -> Self {
        self.border = MatBorder {
            enabled: true,
            width_in,
            color,
        };
        self
    }

    pub fn build(self) -> MatboardResult<FrameSpec> {
        let spec = FrameSpec {
            size: self.size,
            material: Material {
                kind: self.kind,
                texture: self.texture,
                color: self.color,
            },
            thickness_in: self.thickness_in,
            border: self.border,
        };
        spec.validate()?;
        Ok(spec)
    }
}
