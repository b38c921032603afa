// config.rs - Backdrop configuration, loadable from JSON
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, Result};

pub const DEFAULT_SURFACE_ID: &str = "particle-canvas";
pub const DEFAULT_PARTICLE_COUNT: usize = 500;
pub const DEFAULT_SPREAD: f32 = 50.0;
pub const DEFAULT_ROTATION_STEP: f32 = 0.0005;
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance back from the origin along +Z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            position: [10.0, 10.0, 10.0],
        }
    }
}

/// Everything the scene manager needs to build and drive the backdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Identifier of the drawing surface to bind to
    pub surface_id: String,
    pub particle_count: usize,
    /// Side length of the cube particles are scattered in
    pub spread: f32,
    /// Inclusive [min, max] uniform scale
    pub scale_range: [f32; 2],
    /// Radians added to the group's x and y rotation each tick
    pub rotation_step: f32,
    pub camera: CameraConfig,
    /// Upper bound applied to the device pixel ratio
    pub max_pixel_ratio: f64,
    /// RGBA fill colour; alpha 0 keeps the surface see-through
    pub clear_color: [f64; 4],
    pub particle_color: [f32; 3],
    pub particle_radius: f32,
    pub ambient_light: AmbientLightConfig,
    pub point_light: PointLightConfig,
    /// Fixed RNG seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            spread: DEFAULT_SPREAD,
            scale_range: [0.5, 1.0],
            rotation_step: DEFAULT_ROTATION_STEP,
            camera: CameraConfig::default(),
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            particle_color: [0.0, 0.67, 1.0],
            particle_radius: 0.15,
            ambient_light: AmbientLightConfig::default(),
            point_light: PointLightConfig::default(),
            seed: None,
        }
    }
}

impl BackdropConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading backdrop config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.surface_id.trim().is_empty() {
            return Err(BackdropError::Config("surface_id must not be empty".into()));
        }
        if self.particle_count == 0 {
            return Err(BackdropError::Config("particle_count must be positive".into()));
        }

        let camera = &self.camera;
        let [min_scale, max_scale] = self.scale_range;
        finite("spread", &[self.spread])?;
        finite("scale_range", &self.scale_range)?;
        finite("rotation_step", &[self.rotation_step])?;
        finite("particle_radius", &[self.particle_radius])?;
        finite("particle_color", &self.particle_color)?;
        finite(
            "camera",
            &[camera.fov_degrees, camera.near, camera.far, camera.distance],
        )?;
        finite("ambient_light.color", &self.ambient_light.color)?;
        finite("ambient_light.intensity", &[self.ambient_light.intensity])?;
        finite("point_light.color", &self.point_light.color)?;
        finite("point_light.intensity", &[self.point_light.intensity])?;
        finite("point_light.position", &self.point_light.position)?;
        if !self.max_pixel_ratio.is_finite()
            || self.clear_color.iter().any(|c| !c.is_finite())
        {
            return Err(BackdropError::Config(format!(
                "max_pixel_ratio and clear_color must be finite, got {} and {:?}",
                self.max_pixel_ratio, self.clear_color
            )));
        }

        if self.spread <= 0.0 {
            return Err(BackdropError::Config(format!(
                "spread must be positive, got {}",
                self.spread
            )));
        }
        if min_scale <= 0.0 || min_scale > max_scale {
            return Err(BackdropError::Config(format!(
                "scale_range must satisfy 0 < min <= max, got [{min_scale}, {max_scale}]"
            )));
        }
        if self.particle_radius <= 0.0 {
            return Err(BackdropError::Config(format!(
                "particle_radius must be positive, got {}",
                self.particle_radius
            )));
        }
        if self.max_pixel_ratio <= 0.0 {
            return Err(BackdropError::Config(format!(
                "max_pixel_ratio must be positive, got {}",
                self.max_pixel_ratio
            )));
        }
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(BackdropError::Config(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(BackdropError::Config(format!(
                "camera fov must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        Ok(())
    }
}

/// Values too large for `f32` deserialize as infinity; reject those and NaN
fn finite(name: &str, values: &[f32]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(BackdropError::Config(format!("{name} must be finite, got {bad}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_backdrop() {
        let config = BackdropConfig::default();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.spread, 50.0);
        assert_eq!(config.scale_range, [0.5, 1.0]);
        assert_eq!(config.rotation_step, 0.0005);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.distance, 15.0);
        assert_eq!(config.max_pixel_ratio, 2.0);
        assert_eq!(config.clear_color[3], 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: BackdropConfig =
            serde_json::from_str(r#"{ "particle_count": 42, "camera": { "fov_degrees": 60.0 } }"#)
                .unwrap();
        assert_eq!(config.particle_count, 42);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.distance, 15.0);
        assert_eq!(config.surface_id, DEFAULT_SURFACE_ID);
    }

    #[test]
    fn rejects_zero_particles() {
        let config = BackdropConfig {
            particle_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BackdropError::Config(_))));
    }

    #[test]
    fn rejects_inverted_scale_range() {
        let config = BackdropConfig {
            scale_range: [1.0, 0.5],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_far_plane_before_near_plane() {
        let mut config = BackdropConfig::default();
        config.camera.far = 0.05;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_pixel_ratio_cap() {
        let config = BackdropConfig {
            max_pixel_ratio: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_overflowing_spread() {
        let config: BackdropConfig = serde_json::from_str(r#"{ "spread": 1e39 }"#).unwrap();
        assert!(config.spread.is_infinite());
        assert!(matches!(config.validate(), Err(BackdropError::Config(_))));
    }

    #[test]
    fn rejects_overflowing_scale_bound() {
        let config: BackdropConfig =
            serde_json::from_str(r#"{ "scale_range": [0.5, 1e39] }"#).unwrap();
        assert!(matches!(config.validate(), Err(BackdropError::Config(_))));
    }

    #[test]
    fn rejects_nan_values() {
        let nan_spread = BackdropConfig {
            spread: f32::NAN,
            ..Default::default()
        };
        assert!(nan_spread.validate().is_err());

        let nan_scale = BackdropConfig {
            scale_range: [f32::NAN, 1.0],
            ..Default::default()
        };
        assert!(nan_scale.validate().is_err());

        let mut nan_camera = BackdropConfig::default();
        nan_camera.camera.distance = f32::NAN;
        assert!(nan_camera.validate().is_err());
    }

    #[test]
    fn rejects_infinite_step_radius_and_lights() {
        let step = BackdropConfig {
            rotation_step: f32::INFINITY,
            ..Default::default()
        };
        assert!(step.validate().is_err());

        let radius = BackdropConfig {
            particle_radius: f32::INFINITY,
            ..Default::default()
        };
        assert!(radius.validate().is_err());

        let mut light = BackdropConfig::default();
        light.point_light.intensity = f32::INFINITY;
        assert!(light.validate().is_err());

        let mut far = BackdropConfig::default();
        far.camera.far = f32::INFINITY;
        assert!(far.validate().is_err());
    }

    #[test]
    fn load_rejects_overflowing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdrop.json");
        std::fs::write(&path, r#"{ "spread": 1e39 }"#).unwrap();

        assert!(matches!(
            BackdropConfig::load(&path),
            Err(BackdropError::Config(_))
        ));
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdrop.json");
        std::fs::write(&path, r#"{ "surface_id": "hero", "seed": 7 }"#).unwrap();

        let config = BackdropConfig::load(&path).unwrap();
        assert_eq!(config.surface_id, "hero");
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = BackdropConfig::load("/nonexistent/backdrop.json");
        assert!(matches!(result, Err(BackdropError::Io(_))));
    }
}
