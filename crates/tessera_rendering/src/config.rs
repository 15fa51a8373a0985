//! # Render Configuration
//!
//! Process-wide settings read by every draw: tessellation, interpolation,
//! shadows and the color remapping tables.
//!
//! ```toml
//! lerp_models = true
//! shadows = false
//! overbright_bits = 0.0
//! gamma = 1.0
//! minlight = 0
//!
//! [tessellation]
//! enabled = true
//! level = 4
//! triangulation = "legacy_fan"
//! ```
//!
//! A configuration is validated and turned into immutable
//! [`RenderSettings`] when applied. Draws hold a snapshot, so a change
//! applied mid-frame only affects the next draw.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tessera_shared::constants::DEFAULT_TESSELLATION_LEVEL;
use tessera_shared::{SCRATCH_INDEX_CAPACITY, SCRATCH_VERTEX_CAPACITY};

use crate::error::{ConfigError, ConfigResult};
use crate::shading::LightTables;
use crate::tessellation::{index_count, sample_count, Tessellator, TriangulationPolicy};

/// Tessellation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Subdivide lit triangles.
    pub enabled: bool,
    /// Subdivision level, at least 1.
    pub level: u32,
    /// Index layout of the sample lattice.
    pub triangulation: TriangulationPolicy,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: DEFAULT_TESSELLATION_LEVEL,
            triangulation: TriangulationPolicy::LegacyFan,
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tessellation settings.
    pub tessellation: TessellationConfig,
    /// Blend between keyframes. When false every draw uses the current
    /// frame only.
    pub lerp_models: bool,
    /// Project ground shadows.
    pub shadows: bool,
    /// Light multiplier applied to every channel; 0 disables it.
    pub overbright_bits: f32,
    /// Display gamma.
    pub gamma: f32,
    /// Minimum light level (0-255); 0 disables the remap.
    pub minlight: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tessellation: TessellationConfig::default(),
            lerp_models: true,
            shadows: false,
            overbright_bits: 0.0,
            gamma: 1.0,
            minlight: 0,
        }
    }
}

impl RenderConfig {
    /// Parses a configuration from TOML text. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration against the fixed scratch capacities.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::LevelTooLow`] for level 0
    /// - [`ConfigError::LevelExceedsScratch`] when one triangle's output
    ///   does not fit the tessellation scratch
    /// - [`ConfigError::InvalidGamma`] / [`ConfigError::InvalidOverbright`]
    pub fn validate(&self) -> ConfigResult<()> {
        let tess = &self.tessellation;
        if tess.level == 0 {
            return Err(ConfigError::LevelTooLow(tess.level));
        }

        let vertices = sample_count(tess.level);
        let indices = index_count(tess.level, tess.triangulation);
        if vertices > SCRATCH_VERTEX_CAPACITY || indices > SCRATCH_INDEX_CAPACITY {
            return Err(ConfigError::LevelExceedsScratch {
                level: tess.level,
                vertices,
                indices,
                vertex_capacity: SCRATCH_VERTEX_CAPACITY,
                index_capacity: SCRATCH_INDEX_CAPACITY,
            });
        }

        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if !self.overbright_bits.is_finite() || self.overbright_bits < 0.0 {
            return Err(ConfigError::InvalidOverbright(self.overbright_bits));
        }

        Ok(())
    }

    /// Validates and builds the immutable settings a draw reads.
    ///
    /// # Errors
    ///
    /// See [`RenderConfig::validate`].
    pub fn build(self) -> ConfigResult<RenderSettings> {
        self.validate()?;
        let tables = LightTables::new(self.gamma, self.minlight);
        let tess = self.tessellation;
        Ok(RenderSettings {
            tessellator: Tessellator::new(tess.enabled, tess.level, tess.triangulation),
            tables,
            config: self,
        })
    }
}

/// Validated configuration plus everything derived from it.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// The source configuration.
    pub config: RenderConfig,
    /// Gamma and minimum-light tables.
    pub tables: LightTables,
    /// Configured tessellator.
    pub tessellator: Tessellator,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
            tables: LightTables::identity(),
            tessellator: Tessellator::new(
                false,
                DEFAULT_TESSELLATION_LEVEL,
                TriangulationPolicy::LegacyFan,
            ),
        }
    }
}

/// Shared handle to the current settings.
///
/// Configuration-change events call [`ConfigHandle::apply`]; each draw
/// takes a [`ConfigHandle::snapshot`] up front and never sees a change
/// until its next call.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    current: Arc<RwLock<Arc<RenderSettings>>>,
}

impl ConfigHandle {
    /// Creates a handle from a configuration.
    ///
    /// # Errors
    ///
    /// See [`RenderConfig::validate`].
    pub fn new(config: RenderConfig) -> ConfigResult<Self> {
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(config.build()?))),
        })
    }

    /// The settings in effect right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RenderSettings> {
        self.current.read().clone()
    }

    /// Replaces the settings. On error the previous settings stay active.
    ///
    /// # Errors
    ///
    /// See [`RenderConfig::validate`].
    pub fn apply(&self, config: RenderConfig) -> ConfigResult<()> {
        let settings = match config.build() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("render config rejected: {}", err);
                return Err(err);
            }
        };
        tracing::debug!(
            "render config applied: tessellation={} level={} {:?}",
            settings.tessellator.is_enabled(),
            settings.tessellator.level(),
            settings.tessellator.policy()
        );
        *self.current.write() = Arc::new(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert!(config.lerp_models);
        assert!(!config.shadows);
        assert!(!config.tessellation.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = RenderConfig::from_toml_str(
            r#"
            shadows = true
            minlight = 16

            [tessellation]
            enabled = true
            level = 3
            triangulation = "lattice_strip"
            "#,
        )
        .unwrap();

        assert!(config.shadows);
        assert!(config.lerp_models);
        assert_eq!(config.minlight, 16);
        assert_eq!(config.tessellation.level, 3);
        assert_eq!(
            config.tessellation.triangulation,
            TriangulationPolicy::LatticeStrip
        );
    }

    #[test]
    fn test_parse_error() {
        let err = RenderConfig::from_toml_str("gamma = \"bright\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderConfig::load("/nonexistent/tessera.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_level_zero_rejected() {
        let mut config = RenderConfig::default();
        config.tessellation.level = 0;
        assert!(matches!(config.validate(), Err(ConfigError::LevelTooLow(0))));
    }

    #[test]
    fn test_level_limit_depends_on_policy() {
        let mut config = RenderConfig::default();
        config.tessellation.enabled = true;

        config.tessellation.level = 21;
        assert!(config.validate().is_ok());
        config.tessellation.level = 22;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LevelExceedsScratch { level: 22, .. })
        ));

        config.tessellation.triangulation = TriangulationPolicy::LatticeStrip;
        config.tessellation.level = 16;
        assert!(config.validate().is_ok());
        config.tessellation.level = 17;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_level_rejected() {
        for policy in ["legacy_fan", "lattice_strip"] {
            for level in [u32::MAX, 3_000_000_000] {
                let text = format!(
                    "[tessellation]\nenabled = true\nlevel = {level}\ntriangulation = \"{policy}\"\n"
                );
                let config = RenderConfig::from_toml_str(&text).unwrap();
                assert_eq!(config.tessellation.level, level);
                assert!(matches!(
                    config.validate(),
                    Err(ConfigError::LevelExceedsScratch { level: l, .. }) if l == level
                ));
            }
        }
    }

    #[test]
    fn test_invalid_gamma_and_overbright() {
        let mut config = RenderConfig {
            gamma: 0.0,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGamma(_))));

        config.gamma = 1.0;
        config.overbright_bits = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOverbright(_))
        ));
    }

    #[test]
    fn test_apply_swaps_between_snapshots() {
        let handle = ConfigHandle::new(RenderConfig::default()).unwrap();
        let before = handle.snapshot();

        let mut config = RenderConfig::default();
        config.tessellation.enabled = true;
        config.tessellation.level = 2;
        handle.apply(config).unwrap();

        assert!(!before.tessellator.is_enabled());
        let after = handle.snapshot();
        assert!(after.tessellator.is_enabled());
        assert_eq!(after.tessellator.level(), 2);
    }

    #[test]
    fn test_rejected_apply_keeps_previous() {
        let handle = ConfigHandle::new(RenderConfig::default()).unwrap();
        let mut config = RenderConfig::default();
        config.tessellation.level = 100;

        assert!(handle.apply(config).is_err());
        assert_eq!(
            handle.snapshot().tessellator.level(),
            DEFAULT_TESSELLATION_LEVEL
        );
    }
}
