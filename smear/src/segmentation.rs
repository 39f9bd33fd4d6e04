//! Boundary with the external segmentation and classification stages.
//!
//! The segmenter decides whether an image is usable and, if so, returns a
//! labeled mask plus cell locations. The order of `cells` is the detection
//! order every later stage relies on: the classifier must answer in that same
//! order, and rendering and aggregation walk it unchanged.

use crate::cells::{CellLocation, Classification};
use crate::image::Image;

/// Labeled segmentation mask. Label 0 is background, 1.. are cell regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationMask {
    width: u32,
    height: u32,
    labels: Vec<u32>,
}

impl SegmentationMask {
    /// Returns `None` if `labels` does not hold exactly `width * height` entries.
    pub fn new(width: u32, height: u32, labels: Vec<u32>) -> Option<Self> {
        (labels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            labels,
        })
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            labels: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    #[inline]
    pub fn label(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.labels[y as usize * self.width as usize + x as usize]
    }

    /// Highest label present, i.e. the number of regions for a compact labeling.
    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Lossless 16-bit grayscale rendering of the labels, saturating above `u16::MAX`.
    pub fn to_luma16(&self) -> image::ImageBuffer<image::Luma<u16>, Vec<u16>> {
        image::ImageBuffer::from_fn(self.width, self.height, |x, y| {
            image::Luma([self.label(x, y).min(u16::MAX as u32) as u16])
        })
    }
}

/// Result of segmenting one image.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentationOutcome {
    /// Image is unusable (e.g. uniformly dark) and must be recaptured.
    Retake,
    /// Segmentation succeeded. `cells` may be empty and is in detection order.
    Segmented {
        mask: SegmentationMask,
        cells: Vec<CellLocation>,
    },
}

/// External cell segmentation stage.
pub trait Segmenter: Send + Sync {
    /// Segment the resized working image. `reference_value` is the resize
    /// scale between original and working image.
    fn segment(&self, image: &Image, reference_value: f32) -> anyhow::Result<SegmentationOutcome>;
}

/// External per-cell classifier.
pub trait Classifier: Send + Sync {
    /// Classify every cell, returning exactly one result per location, in order.
    fn classify(
        &self,
        image: &Image,
        mask: &SegmentationMask,
        cells: &[CellLocation],
    ) -> anyhow::Result<Vec<Classification>>;
}

impl<T: Segmenter + ?Sized> Segmenter for Box<T> {
    fn segment(&self, image: &Image, reference_value: f32) -> anyhow::Result<SegmentationOutcome> {
        (**self).segment(image, reference_value)
    }
}

impl<T: Classifier + ?Sized> Classifier for Box<T> {
    fn classify(
        &self,
        image: &Image,
        mask: &SegmentationMask,
        cells: &[CellLocation],
    ) -> anyhow::Result<Vec<Classification>> {
        (**self).classify(image, mask, cells)
    }
}
