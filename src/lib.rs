#![forbid(unsafe_code)]

pub mod assets;
pub mod blur_cpu;
pub mod builder;
pub mod composite_cpu;
pub mod core;
pub mod debounce;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod texture;

pub use assets::{ImageStore, PreparedImage, decode_image};
pub use builder::FrameSpecBuilder;
pub use core::{Orientation, Rgba8Premul, Surface};
pub use debounce::Debouncer;
pub use error::{MatboardError, MatboardResult};
pub use layout::{FIT_FRACTION, PX_PER_IN, PreviewLayout};
pub use model::{FrameSize, FrameSpec, MatBorder, Material, MaterialKind, PhotoAsset};
pub use render::{PhotoTicket, RenderOpts, RenderReport, RenderSession, ShadowOpts};
