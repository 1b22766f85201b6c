// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Faceplate parameters
//!
//! Defaults describe the V6 heating-control plate: a UK 2-gang faceplate
//! for a 35 mm dry lining box, carrying three magnetic switch mounting
//! plates, three indicator LEDs and three relay modules on the back.
//! All values are millimetres.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "faceplate.toml";

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "FACEPLATE_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceplateParams {
    pub plate: PlateParams,
    pub screws: ScrewParams,
    pub mounting_plate: MountingPlateParams,
    pub led: LedParams,
    pub device: DeviceParams,
    pub tessellation: TessellationParams,
    pub build: BuildOptions,
}

/// The blank the features are cut from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateParams {
    pub width: f64,
    pub height: f64,
    /// Total thickness; the back face is z = 0
    pub thickness: f64,
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            width: 146.0,
            height: 86.0,
            thickness: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrewParams {
    /// Centre to centre, UK 2-gang standard
    pub spacing: f64,
    pub diameter: f64,
    pub countersink_diameter: f64,
    pub countersink_depth: f64,
}

impl Default for ScrewParams {
    fn default() -> Self {
        Self {
            spacing: 120.0,
            diameter: 4.0,
            countersink_diameter: 8.0,
            countersink_depth: 2.0,
        }
    }
}

/// Stadium-shaped magnetic mounting plate, mounted with its length
/// along Y and slid into a pocket from the back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountingPlateParams {
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    /// Half the width for true stadium ends
    pub corner_radius: f64,
    pub count: usize,
    /// Centre to centre along X
    pub pitch: f64,
    /// Y of the pocket centres
    pub row_y: f64,
    /// Skin left between the pocket floor and the front face
    pub front_wall: f64,
    /// XY clearance added to the pocket for slide-in
    pub clearance: f64,
    /// Fillet radius reduction so the rounded ends never meet
    pub fillet_inset: f64,
}

impl Default for MountingPlateParams {
    fn default() -> Self {
        Self {
            length: 47.0,
            width: 16.6,
            thickness: 0.5,
            corner_radius: 8.3,
            count: 3,
            pitch: 40.0,
            row_y: -12.0,
            front_wall: 1.0,
            clearance: 0.2,
            fillet_inset: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedParams {
    pub hole_diameter: f64,
    /// Counter-bore for the LED head on the front face
    pub head_diameter: f64,
    pub recess_depth: f64,
    /// Y of the LED centres, independent of the pocket row
    pub row_y: f64,
}

impl Default for LedParams {
    fn default() -> Self {
        Self {
            hole_diameter: 10.75,
            head_diameter: 11.6,
            recess_depth: 1.0,
            row_y: 30.0,
        }
    }
}

/// Module held in each rear cradle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    /// X extent
    pub width: f64,
    /// Y extent
    pub height: f64,
    /// Z extent, how far the module stands off the back face
    pub depth: f64,
    pub wall_thickness: f64,
    pub lip_height: f64,
    /// How far the retention lips protrude inward
    pub lip_depth: f64,
    /// Added to the module outline; negative for an interference fit
    pub clearance: f64,
    pub shelf_thickness: f64,
    /// Gap between the plate's bottom edge and the cradle
    pub bottom_offset: f64,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            width: 35.0,
            height: 29.0,
            depth: 16.0,
            wall_thickness: 2.0,
            lip_height: 2.0,
            lip_depth: 1.5,
            clearance: -0.75,
            shelf_thickness: 2.0,
            bottom_offset: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationParams {
    /// Facets per full circle for holes and counter-bores
    pub segments: u32,
    /// Facets per quarter round on filleted edges
    pub fillet_segments: u32,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            segments: 48,
            fillet_segments: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Fail the build instead of falling back to sharp corners when a
    /// fillet does not fit
    pub strict_fillets: bool,
    /// Register the reference plates and modules in the document
    pub include_reference: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict_fillets: false,
            include_reference: true,
        }
    }
}

impl FaceplateParams {
    /// Load parameters from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve parameters from, in order: an explicit path,
    /// `$FACEPLATE_CONFIG`, `./faceplate.toml`, built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        match candidate {
            Some(path) => {
                debug!(config = %path.display(), "loading parameters");
                Self::from_file(&path)
            }
            None => {
                debug!("no config file, using default parameters");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize parameters")
    }

    /// Save parameters to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let params = FaceplateParams::default();
        assert_eq!(params.plate.width, 146.0);
        assert_eq!(params.screws.spacing, 120.0);
        assert_eq!(params.mounting_plate.count, 3);
        assert_eq!(params.device.clearance, -0.75);
        assert!(!params.build.strict_fillets);
        assert!(params.build.include_reference);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let params = FaceplateParams::from_toml(
            r#"
            [mounting_plate]
            count = 2
            pitch = 50.0

            [build]
            strict_fillets = true
            "#,
        )
        .unwrap();

        assert_eq!(params.mounting_plate.count, 2);
        assert_eq!(params.mounting_plate.pitch, 50.0);
        assert_eq!(params.mounting_plate.length, 47.0);
        assert!(params.build.strict_fillets);
        assert!(params.build.include_reference);
        assert_eq!(params.plate, PlateParams::default());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(FaceplateParams::from_toml("[plate]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let mut params = FaceplateParams::default();
        params.led.row_y = 25.0;
        params.tessellation.segments = 16;

        let file = NamedTempFile::with_suffix(".toml").unwrap();
        params.save(file.path()).unwrap();

        let loaded = FaceplateParams::load(Some(file.path())).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = FaceplateParams::from_file("/nonexistent/faceplate.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
