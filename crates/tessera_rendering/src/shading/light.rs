//! Shade-light resolution and per-vertex color.

use tessera_shared::constants::{
    GLOW_AMPLITUDE, GLOW_FLOOR, GLOW_FREQUENCY, MINLIGHT_FLOOR, WEAPON_LIGHT_LEVEL_SCALE,
};
use tessera_shared::Vec3;

use super::LightTables;
use crate::entity::{EntityFlags, RenderEntity};

/// Result of sampling world lighting at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// RGB in `[0, 1]` (may exceed 1 for bright spots).
    pub color: Vec3,
    /// Point on the ground below the sample, used for shadows.
    pub spot: Vec3,
}

/// World lighting lookup.
pub trait LightSampler {
    /// Light arriving at `position`.
    fn sample(&self, position: Vec3) -> LightSample;
}

/// A sampler returning one fixed color, with the light spot directly
/// below the queried point at a fixed floor height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantLight {
    /// Returned color.
    pub color: Vec3,
    /// Height of the floor under every point.
    pub floor: f32,
}

impl LightSampler for ConstantLight {
    fn sample(&self, position: Vec3) -> LightSample {
        LightSample {
            color: self.color,
            spot: Vec3::new(position.x, position.y, self.floor),
        }
    }
}

/// Frame-wide lighting state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneLighting {
    /// Scene time in seconds.
    pub time: f32,
    /// Infrared goggles are active.
    pub ir_goggles: bool,
}

/// Which interpreter path a draw takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Flat shell silhouette: one color, no texture, no tessellation.
    ColorOnly,
    /// Per-vertex lighting, texturing and optional tessellation.
    Lit,
}

/// Everything the interpreter needs to color one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeLight {
    /// Base light color.
    pub color: Vec3,
    /// Ground point under the entity.
    pub spot: Vec3,
    /// Unit direction used for per-vertex lighting and shadow projection.
    pub shade_vector: Vec3,
    /// Interpreter path.
    pub mode: DrawMode,
    /// Light level reported for weapon models.
    pub light_level: Option<f32>,
}

impl ShadeLight {
    /// Flat 8-bit color for color-only draws.
    #[inline]
    #[must_use]
    pub fn flat_rgb(&self, tables: &LightTables) -> [u8; 3] {
        tables.map_rgb(scale_to_bytes(self.color, 1.0))
    }

    /// Lit 8-bit color for a vertex with unit `normal`.
    #[inline]
    #[must_use]
    pub fn lit_rgb(&self, normal: Vec3, tables: &LightTables) -> [u8; 3] {
        let intensity = normal.dot(self.shade_vector) + 1.0;
        tables.map_rgb(scale_to_bytes(self.color, intensity))
    }
}

#[inline]
fn scale_to_bytes(color: Vec3, intensity: f32) -> [u8; 3] {
    color
        .to_array()
        .map(|c| ((intensity * c * 255.0) as i32).clamp(0, 255) as u8)
}

/// Unit shading direction for an entity yawed by `yaw` degrees.
#[must_use]
pub fn shade_vector(yaw: f32) -> Vec3 {
    let an = -yaw.to_radians();
    Vec3::new(an.cos(), an.sin(), 1.0).normalize_or_zero()
}

fn shell_color(flags: EntityFlags) -> Vec3 {
    let mut color = Vec3::ZERO;
    if flags.contains(EntityFlags::SHELL_HALF_DAM) {
        color = Vec3::new(0.56, 0.59, 0.45);
    }
    if flags.contains(EntityFlags::SHELL_DOUBLE) {
        color.x = 0.9;
        color.y = 0.7;
    }
    if flags.contains(EntityFlags::SHELL_RED) {
        color.x = 1.0;
    }
    if flags.contains(EntityFlags::SHELL_GREEN) {
        color.y = 1.0;
    }
    if flags.contains(EntityFlags::SHELL_BLUE) {
        color.z = 1.0;
    }
    color
}

/// Works out the base light of `entity` for this frame.
///
/// Precedence: shell color, then fullbright, then the sampler (full white
/// without one). Minimum light, glow, overbright and the infrared override
/// are applied on top, in that order.
#[must_use]
pub fn resolve_shade_light(
    entity: &RenderEntity,
    sampler: Option<&dyn LightSampler>,
    scene: &SceneLighting,
    overbright: f32,
) -> ShadeLight {
    let flags = entity.flags;
    let mut spot = entity.origin;
    let mut light_level = None;

    let mut color = if flags.has_shell() {
        shell_color(flags)
    } else if flags.contains(EntityFlags::FULLBRIGHT) {
        Vec3::ONE
    } else {
        let color = match sampler {
            Some(sampler) => {
                let sample = sampler.sample(entity.origin);
                spot = sample.spot;
                sample.color
            }
            None => Vec3::ONE,
        };
        if flags.contains(EntityFlags::WEAPON_MODEL) {
            light_level = Some(color.max_element() * WEAPON_LIGHT_LEVEL_SCALE);
        }
        color
    };

    if flags.contains(EntityFlags::MINLIGHT) && color.max_element() <= MINLIGHT_FLOOR {
        color = Vec3::splat(MINLIGHT_FLOOR);
    }

    if flags.contains(EntityFlags::GLOW) {
        let pulse = GLOW_AMPLITUDE * (scene.time * GLOW_FREQUENCY).sin();
        for i in 0..3 {
            let floor = color[i] * GLOW_FLOOR;
            color[i] = (color[i] + pulse).max(floor);
        }
    }

    if overbright != 0.0 {
        color = color * overbright;
    }

    if scene.ir_goggles && flags.contains(EntityFlags::IR_VISIBLE) {
        color = Vec3::X;
    }

    ShadeLight {
        color,
        spot,
        shade_vector: shade_vector(entity.angles.y),
        mode: if flags.has_shell() {
            DrawMode::ColorOnly
        } else {
            DrawMode::Lit
        },
        light_level,
    }
}
