//! Per-draw entity description.

use std::ops::{BitOr, BitOrAssign};

use tessera_shared::Vec3;

/// Render flags of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntityFlags(u32);

impl EntityFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Always fully lit.
    pub const FULLBRIGHT: Self = Self(1 << 0);
    /// Never darker than the minimum light.
    pub const MINLIGHT: Self = Self(1 << 1);
    /// Pulses over time (pickups).
    pub const GLOW: Self = Self(1 << 2);
    /// Drawn with the entity alpha.
    pub const TRANSLUCENT: Self = Self(1 << 3);
    /// First-person weapon model.
    pub const WEAPON_MODEL: Self = Self(1 << 4);
    /// Never casts a shadow.
    pub const NO_SHADOW: Self = Self(1 << 5);
    /// Highlighted while infrared goggles are active.
    pub const IR_VISIBLE: Self = Self(1 << 6);
    /// Red shell.
    pub const SHELL_RED: Self = Self(1 << 10);
    /// Green shell.
    pub const SHELL_GREEN: Self = Self(1 << 11);
    /// Blue shell.
    pub const SHELL_BLUE: Self = Self(1 << 12);
    /// Double-damage shell.
    pub const SHELL_DOUBLE: Self = Self(1 << 13);
    /// Half-damage shell.
    pub const SHELL_HALF_DAM: Self = Self(1 << 14);

    /// Every shell flag.
    pub const SHELLS: Self = Self(
        Self::SHELL_RED.0
            | Self::SHELL_GREEN.0
            | Self::SHELL_BLUE.0
            | Self::SHELL_DOUBLE.0
            | Self::SHELL_HALF_DAM.0,
    );

    /// Builds flags from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every flag of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any flag of `other` is set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if any shell effect is active.
    #[inline]
    #[must_use]
    pub const fn has_shell(self) -> bool {
        self.intersects(Self::SHELLS)
    }
}

impl BitOr for EntityFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EntityFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Which skin texture the draw should bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinSelection {
    /// The entity's own texture handle.
    Custom(u32),
    /// Skin index into the model.
    Model(usize),
    /// The model has no usable skin; bind the fallback texture.
    Missing,
}

/// An instance of a model to draw this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntity {
    /// Current keyframe. Out-of-range values are reset to 0.
    pub frame: i32,
    /// Previous keyframe.
    pub old_frame: i32,
    /// Blend toward the previous frame: 0 is all `frame`.
    pub backlerp: f32,
    /// World position.
    pub origin: Vec3,
    /// World position when `old_frame` was current.
    pub old_origin: Vec3,
    /// Pitch, yaw, roll in degrees.
    pub angles: Vec3,
    /// Per-axis scale; zero components count as 1.
    pub scale: Vec3,
    /// Opacity, used with [`EntityFlags::TRANSLUCENT`].
    pub alpha: f32,
    /// Render flags.
    pub flags: EntityFlags,
    /// Bit `i` hides submesh `i`.
    pub hidden_submeshes: u32,
    /// Skin index.
    pub skin_num: usize,
    /// Overriding skin texture handle.
    pub custom_skin: Option<u32>,
}

impl Default for RenderEntity {
    fn default() -> Self {
        Self {
            frame: 0,
            old_frame: 0,
            backlerp: 0.0,
            origin: Vec3::ZERO,
            old_origin: Vec3::ZERO,
            angles: Vec3::ZERO,
            scale: Vec3::ONE,
            alpha: 1.0,
            flags: EntityFlags::NONE,
            hidden_submeshes: 0,
            skin_num: 0,
            custom_skin: None,
        }
    }
}

impl RenderEntity {
    /// An entity at `origin` showing `frame`.
    #[must_use]
    pub fn new(origin: Vec3, frame: i32) -> Self {
        Self {
            frame,
            old_frame: frame,
            origin,
            old_origin: origin,
            ..Self::default()
        }
    }

    /// Scale with zero components replaced by 1.
    #[must_use]
    pub fn effective_scale(&self) -> Vec3 {
        let fix = |s: f32| if s == 0.0 { 1.0 } else { s };
        Vec3::new(fix(self.scale.x), fix(self.scale.y), fix(self.scale.z))
    }

    /// Alpha byte submitted with every vertex.
    #[must_use]
    pub fn alpha_byte(&self) -> u8 {
        let alpha = if self.flags.contains(EntityFlags::TRANSLUCENT) {
            self.alpha
        } else {
            1.0
        };
        (alpha * 255.0).clamp(0.0, 255.0) as u8
    }

    /// True if submesh `index` is hidden.
    #[must_use]
    pub fn is_submesh_hidden(&self, index: usize) -> bool {
        index < 32 && self.hidden_submeshes & (1 << index) != 0
    }

    /// Whether this entity may cast a ground shadow.
    #[must_use]
    pub fn casts_shadow(&self) -> bool {
        !self.flags.intersects(
            EntityFlags::TRANSLUCENT | EntityFlags::WEAPON_MODEL | EntityFlags::NO_SHADOW,
        )
    }

    /// Picks the skin to bind for a model with `num_skins` skins.
    #[must_use]
    pub fn select_skin(&self, num_skins: usize) -> SkinSelection {
        if let Some(handle) = self.custom_skin {
            SkinSelection::Custom(handle)
        } else if self.skin_num < num_skins {
            SkinSelection::Model(self.skin_num)
        } else if num_skins > 0 {
            SkinSelection::Model(0)
        } else {
            SkinSelection::Missing
        }
    }
}
