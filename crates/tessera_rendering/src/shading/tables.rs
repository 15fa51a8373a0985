//! 8-bit color remapping tables.
//!
//! Built once when a configuration is applied and read-only during draws.

use tessera_shared::constants::LIGHT_TABLE_SIZE;

/// Gamma and minimum-light lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightTables {
    gamma: [u8; LIGHT_TABLE_SIZE],
    minlight: Option<[u8; LIGHT_TABLE_SIZE]>,
}

impl LightTables {
    /// Builds the tables for `gamma` and a minimum light level.
    ///
    /// `minlight == 0` disables the minimum-light remap.
    #[must_use]
    pub fn new(gamma: f32, minlight: u8) -> Self {
        let mut table = [0u8; LIGHT_TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            let level = 255.0 * ((i as f32 + 0.5) / 255.5).powf(gamma) + 0.5;
            *slot = level.clamp(0.0, 255.0) as u8;
        }

        let minlight = (minlight > 0).then(|| {
            let m = u32::from(minlight);
            let mut table = [0u8; LIGHT_TABLE_SIZE];
            for (i, slot) in table.iter_mut().enumerate() {
                *slot = (i as u32 * (255 - m) / 255 + m) as u8;
            }
            table
        });

        Self {
            gamma: table,
            minlight,
        }
    }

    /// Identity tables.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(1.0, 0)
    }

    /// Whether a minimum-light remap is active.
    #[must_use]
    pub fn has_minlight(&self) -> bool {
        self.minlight.is_some()
    }

    /// Maps one channel through minlight (when set), then gamma.
    #[inline]
    #[must_use]
    pub fn map(&self, level: u8) -> u8 {
        let level = self
            .minlight
            .as_ref()
            .map_or(level, |table| table[usize::from(level)]);
        self.gamma[usize::from(level)]
    }

    /// Maps an RGB triple.
    #[inline]
    #[must_use]
    pub fn map_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        rgb.map(|c| self.map(c))
    }
}

impl Default for LightTables {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let tables = LightTables::identity();
        for i in 0..=255u8 {
            assert_eq!(tables.map(i), i);
        }
        assert!(!tables.has_minlight());
    }

    #[test]
    fn test_gamma_brightens_below_one() {
        let tables = LightTables::new(0.5, 0);
        assert_eq!(tables.map(0), 11);
        assert_eq!(tables.map(255), 255);
        assert!(tables.map(64) > 64);
    }

    #[test]
    fn test_gamma_is_monotonic() {
        let tables = LightTables::new(1.7, 0);
        for i in 1..=255u8 {
            assert!(tables.map(i) >= tables.map(i - 1));
        }
    }

    #[test]
    fn test_minlight_floor() {
        let tables = LightTables::new(1.0, 32);
        assert!(tables.has_minlight());
        assert_eq!(tables.map(0), 32);
        assert_eq!(tables.map(255), 255);
        assert!(tables.map(100) >= 32);
    }
}
