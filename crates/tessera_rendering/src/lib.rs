//! # TESSERA Rendering
//!
//! CPU draw path for animated keyframe ("alias") models:
//! - Two-keyframe interpolation with motion correction
//! - Precompiled fan/strip command streams, validated before use
//! - Optional PN-triangle tessellation for smoother silhouettes
//! - Per-vertex lighting, shell effects and a planar ground shadow
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ONE ENTITY DRAW                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Keyframes → FrameInterpolator → working positions           │
//! │                                        ↓                     │
//! │  CommandStream → CommandInterpreter ──→ MeshSink             │
//! │                   ↓ (lit, per triangle)      ↑               │
//! │                  Tessellator → PnPatch       │               │
//! │                                              │               │
//! │  working positions → ShadowProjector ────────┘               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - No allocations in the draw loop: scratch is fixed-capacity
//! - No silent overflow: capacity is checked when config is applied
//! - No raw trust of model data: indices are validated, frames clamped

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod entity;
pub mod error;
pub mod interpreter;
pub mod lerp;
pub mod model;
pub mod renderer;
pub mod shading;
pub mod shadow;
pub mod sink;
pub mod stats;
pub mod tessellation;

pub use config::{ConfigHandle, RenderConfig, RenderSettings, TessellationConfig};
pub use entity::{EntityFlags, RenderEntity, SkinSelection};
pub use error::{ConfigError, ConfigResult, ModelError, RenderError, RenderResult};
pub use interpreter::{CommandInterpreter, DrawContext};
pub use lerp::FrameInterpolator;
pub use model::{
    AliasModel, CommandStream, CommandStreamBuilder, CommandVertex, CompressedVertex, Keyframe,
    ModelHeader, PrimitiveRun, RunTopology, Submesh,
};
pub use renderer::AliasRenderer;
pub use shading::{
    resolve_shade_light, ConstantLight, DrawMode, LightSample, LightSampler, LightTables,
    SceneLighting, ShadeLight,
};
pub use shadow::ShadowProjector;
pub use sink::{Batch, MeshSink, RecordingSink, Topology};
pub use stats::DrawStats;
pub use tessellation::{
    PatchTriangle, PnPatch, TessellationScratch, Tessellator, TriangulationPolicy,
};
