//! # Shading
//!
//! Resolves an entity's base light once per draw and turns it into 8-bit
//! vertex colors:
//!
//! ```text
//! sampler / flags ──► ShadeLight ──► lit_rgb(normal) ──► minlight ──► gamma
//!                                └─► flat_rgb()      ──┘
//! ```

mod light;
mod tables;

pub use light::{
    resolve_shade_light, shade_vector, ConstantLight, DrawMode, LightSample, LightSampler,
    SceneLighting, ShadeLight,
};
pub use tables::LightTables;
