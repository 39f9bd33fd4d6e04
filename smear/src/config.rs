//! Configuration for the slide analysis pipeline.
//!
//! All configuration structs are consolidated here. Configs are plain serde
//! types and can be loaded from YAML or JSON files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::BandPalette;
use crate::confidence::AggregationMethod;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] common::SerdeFormatError),

    #[error("marker_radius must be finite and positive, got {0}")]
    MarkerRadius(f32),

    #[error("label_offset must be finite, got ({0}, {1})")]
    LabelOffset(f32, f32),

    #[error("text_scale must be at least 1")]
    TextScale,

    #[error("Mask saving is enabled but no directory is configured")]
    MaskDirectory,
}

// =============================================================================
// Annotation
// =============================================================================

/// Overlay styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Radius of the filled marker drawn on each infected cell, in pixels.
    pub marker_radius: f32,
    /// Offset of the count label from the marker, in the unrotated frame.
    pub label_offset: [f32; 2],
    /// Integer scale of the 5x7 label font.
    pub text_scale: u32,
    pub palette: BandPalette,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            marker_radius: 2.0,
            label_offset: [-7.0, -7.0],
            text_scale: 1,
            palette: BandPalette::default(),
        }
    }
}

impl AnnotationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.marker_radius.is_finite() || self.marker_radius <= 0.0 {
            return Err(ConfigError::MarkerRadius(self.marker_radius));
        }
        let [dx, dy] = self.label_offset;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(ConfigError::LabelOffset(dx, dy));
        }
        if self.text_scale == 0 {
            return Err(ConfigError::TextScale);
        }
        Ok(())
    }
}

// =============================================================================
// Mask saving
// =============================================================================

/// Optional persistence of the segmentation mask next to each analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskSaveConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

impl Default for MaskSaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("masks"),
        }
    }
}

impl MaskSaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.directory.as_os_str().is_empty() {
            return Err(ConfigError::MaskDirectory);
        }
        Ok(())
    }
}

// =============================================================================
// Top level
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub annotation: AnnotationConfig,
    pub aggregation: AggregationMethod,
    pub mask_saving: MaskSaveConfig,
}

impl AnalysisConfig {
    /// Load from a `.yaml`/`.yml`/`.json` file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = common::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annotation.validate()?;
        self.mask_saving.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Color;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.annotation.marker_radius, 2.0);
        assert_eq!(config.annotation.label_offset, [-7.0, -7.0]);
        assert_eq!(config.aggregation, AggregationMethod::Median);
        assert!(!config.mask_saving.enabled);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "aggregation: mean\nmask_saving:\n  enabled: true\n  directory: out/masks\n";
        let config: AnalysisConfig = serde_yml::from_str(yaml).unwrap();

        assert_eq!(config.aggregation, AggregationMethod::Mean);
        assert!(config.mask_saving.enabled);
        assert_eq!(config.mask_saving.directory, PathBuf::from("out/masks"));
        assert_eq!(config.annotation, AnnotationConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.annotation.marker_radius = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::MarkerRadius(_))));

        let mut config = AnalysisConfig::default();
        config.annotation.label_offset = [f32::NAN, 0.0];
        assert!(matches!(config.validate(), Err(ConfigError::LabelOffset(..))));

        let mut config = AnalysisConfig::default();
        config.annotation.text_scale = 0;
        assert!(matches!(config.validate(), Err(ConfigError::TextScale)));

        let mut config = AnalysisConfig::default();
        config.mask_saving = MaskSaveConfig {
            enabled: true,
            directory: PathBuf::new(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::MaskDirectory)));
    }

    #[test]
    fn test_file_roundtrip() {
        let mut config = AnalysisConfig::default();
        config.annotation.palette.colors[5] = Color::BLUE;
        config.annotation.text_scale = 2;

        let path = common::test_utils::test_output_path("smear/analysis_config.yaml");
        common::save_to_file(&config, &path).unwrap();
        let loaded = AnalysisConfig::from_file(&path).unwrap();

        assert_eq!(loaded.annotation.text_scale, 2);
        assert_eq!(loaded.annotation.label_offset, [-7.0, -7.0]);
        assert_eq!(loaded.annotation.palette.colors[5], Color::BLUE);
        for (a, b) in loaded
            .annotation
            .palette
            .colors
            .iter()
            .zip(config.annotation.palette.colors.iter())
        {
            assert!((a.r - b.r).abs() < 1e-6 && (a.g - b.g).abs() < 1e-6 && (a.b - b.b).abs() < 1e-6);
        }
        assert_eq!(loaded.mask_saving, config.mask_saving);
    }
}
