//! Background persistence of segmentation masks.
//!
//! Saving runs on a detached worker thread. Failures are logged and returned
//! through the [`SaveHandle`] for callers that wait; the analysis result never
//! depends on them.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use thiserror::Error;

use crate::segmentation::SegmentationMask;

#[derive(Debug, Error)]
pub enum MaskSaveError {
    #[error("Cannot derive a mask file name from '{0}'")]
    InvalidImageName(String),

    #[error("Failed to create mask directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode mask '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Mask save worker panicked")]
    WorkerPanicked,
}

/// Handle to a running save. Dropping it detaches the worker.
#[derive(Debug)]
pub struct SaveHandle {
    handle: JoinHandle<Result<PathBuf, MaskSaveError>>,
}

impl SaveHandle {
    /// Wait for the save to finish.
    pub fn join(self) -> Result<PathBuf, MaskSaveError> {
        self.handle
            .join()
            .map_err(|_| MaskSaveError::WorkerPanicked)?
    }
}

#[derive(Debug, Clone)]
pub struct MaskSaver {
    directory: PathBuf,
}

impl MaskSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// `<directory>/<image stem>_mask.png`.
    pub fn mask_path(&self, image_name: &str) -> Result<PathBuf, MaskSaveError> {
        let stem = Path::new(image_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MaskSaveError::InvalidImageName(image_name.to_string()))?;

        Ok(self.directory.join(format!("{stem}_mask.png")))
    }

    /// Write the mask as a 16-bit grayscale PNG on the calling thread.
    pub fn save_blocking(
        &self,
        mask: &SegmentationMask,
        image_name: &str,
    ) -> Result<PathBuf, MaskSaveError> {
        let path = self.mask_path(image_name)?;

        std::fs::create_dir_all(&self.directory).map_err(|source| MaskSaveError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        mask.to_luma16()
            .save(&path)
            .map_err(|source| MaskSaveError::Encode {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    /// Save on a detached worker thread.
    ///
    /// Returns `None` if the worker could not be started; that is logged and
    /// otherwise ignored.
    pub fn spawn(&self, mask: SegmentationMask, image_name: &str) -> Option<SaveHandle> {
        let saver = self.clone();
        let image_name = image_name.to_string();

        let spawned = std::thread::Builder::new()
            .name("mask-save".to_string())
            .spawn(move || {
                let result = saver.save_blocking(&mask, &image_name);
                match &result {
                    Ok(path) => tracing::debug!("Saved segmentation mask to {}", path.display()),
                    Err(e) => tracing::warn!("Failed to save mask for {}: {}", image_name, e),
                }
                result
            });

        match spawned {
            Ok(handle) => Some(SaveHandle { handle }),
            Err(e) => {
                tracing::warn!("Failed to start mask save worker: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_path_uses_image_stem() {
        let saver = MaskSaver::new("/data/masks");
        assert_eq!(
            saver.mask_path("/sdcard/slides/patient_07.jpg").unwrap(),
            PathBuf::from("/data/masks/patient_07_mask.png")
        );
        assert_eq!(
            saver.mask_path("slide.v2.png").unwrap(),
            PathBuf::from("/data/masks/slide.v2_mask.png")
        );
    }

    #[test]
    fn test_mask_path_rejects_empty_name() {
        let saver = MaskSaver::new("masks");
        assert!(matches!(
            saver.mask_path(""),
            Err(MaskSaveError::InvalidImageName(_))
        ));
    }

    #[test]
    fn test_spawned_save_writes_png() {
        let dir = common::test_utils::test_output_path("smear/mask_saver");
        let saver = MaskSaver::new(&dir);
        let mask = SegmentationMask::new(4, 2, vec![0, 1, 1, 0, 2, 2, 0, 3]).unwrap();

        let path = saver
            .spawn(mask.clone(), "capture_001.jpg")
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(path, dir.join("capture_001_mask.png"));
        let loaded = image::open(&path).unwrap().to_luma16();
        assert_eq!(loaded.as_raw(), &vec![0u16, 1, 1, 0, 2, 2, 0, 3]);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        // A regular file where the directory should be.
        let blocker = common::test_utils::test_output_path("smear/mask_blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let saver = MaskSaver::new(blocker.join("nested"));
        let err = saver
            .spawn(SegmentationMask::empty(2, 2), "x.png")
            .unwrap()
            .join()
            .unwrap_err();
        assert!(matches!(err, MaskSaveError::CreateDir { .. }));
    }
}
