use crate::{
    assets::loader::LoadStrategy,
    foundation::core::InterpolationMode,
    foundation::error::DrawResult,
};

/// Environment variable overriding [`DrawerSettings::load_strategy`].
pub const ENV_LOAD_STRATEGY: &str = "IMAGEDRAW_LOAD_STRATEGY";
/// Environment variable overriding [`DrawerSettings::zoom_interpolation`].
pub const ENV_ZOOM_INTERPOLATION: &str = "IMAGEDRAW_ZOOM_INTERPOLATION";

/// Behavior knobs for an [`crate::ImageDrawer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawerSettings {
    /// How cache misses read the image file.
    pub load_strategy: LoadStrategy,
    /// Resampling used by static and rotated draws.
    pub static_interpolation: InterpolationMode,
    /// Resampling used by zoom draws when the caller does not pick one.
    pub zoom_interpolation: InterpolationMode,
}

impl Default for DrawerSettings {
    fn default() -> Self {
        Self {
            load_strategy: LoadStrategy::Memory,
            static_interpolation: InterpolationMode::Bilinear,
            zoom_interpolation: InterpolationMode::HighQualityBicubic,
        }
    }
}

impl DrawerSettings {
    /// Defaults overlaid with `IMAGEDRAW_*` environment variables.
    pub fn from_env() -> DrawResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> DrawResult<Self> {
        if let Some(v) = lookup(ENV_LOAD_STRATEGY).filter(|v| !v.trim().is_empty()) {
            self.load_strategy = LoadStrategy::parse(&v)?;
        }
        if let Some(v) = lookup(ENV_ZOOM_INTERPOLATION).filter(|v| !v.trim().is_empty()) {
            self.zoom_interpolation = InterpolationMode::parse(&v)?;
        }
        Ok(self)
    }
}
