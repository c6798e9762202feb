use crate::batch::{self, SkippedSlice};
use crate::enums::{FailurePolicy, SliceOrder};
use crate::geometry::VoxelGeometry;
use crate::mask::{MaskCoordinateSet, extract_foreground_coords};
use crate::slice_loader::{SliceError, SliceLoader};

use log::{debug, info};
use std::path::{Path, PathBuf};

/// Volume covered by `coords` when every voxel measures `voxel_volume`
pub fn slice_volume(voxel_volume: f64, coords: &MaskCoordinateSet) -> f64 {
    coords.len() as f64 * voxel_volume
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliceVolume {
    pub path: PathBuf,
    pub voxel_count: usize,
    pub volume: f64,
}

/// Result of measuring every slice file of a directory.
#[derive(Debug, Default)]
pub struct VolumeReport {
    pub slices: Vec<SliceVolume>,
    pub skipped: Vec<SkippedSlice>,
    /// Sum of all slice volumes in mm³
    pub total: f64,
}

impl VolumeReport {
    pub fn voxel_count(&self) -> usize {
        self.slices.iter().map(|slice| slice.voxel_count).sum()
    }
}

/// Sums the segmented volume over all slice files below a directory.
#[derive(Clone, Debug, Default)]
pub struct VolumeAggregator {
    geometry: VoxelGeometry,
    order: SliceOrder,
    policy: FailurePolicy,
}

impl VolumeAggregator {
    pub fn new(geometry: VoxelGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: SliceOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Total segmented volume in mm³ of all slice files below `directory`
    ///
    /// # Errors
    ///
    /// With `FailurePolicy::Abort` the first slice that fails to load or has
    /// no usable mask aborts the whole computation.
    pub fn total_volume(&self, directory: impl AsRef<Path>) -> Result<f64, SliceError> {
        Ok(self.scan(directory)?.total)
    }

    /// Measure every slice file below `directory`
    pub fn scan(&self, directory: impl AsRef<Path>) -> Result<VolumeReport, SliceError> {
        let directory = directory.as_ref();
        info!("Computing segmented volume under {}", directory.display());

        let paths = SliceLoader::discover(directory, self.order)?;
        let outcome = batch::process_files(paths, self.policy, |path| self.measure_slice(path))?;

        // f64::sum of nothing is -0.0
        let total = outcome
            .processed
            .iter()
            .fold(0.0, |total, slice| total + slice.volume);
        info!(
            "Total segmented volume over {} slices: {total} mm^3",
            outcome.processed.len()
        );

        Ok(VolumeReport {
            slices: outcome.processed,
            skipped: outcome.skipped,
            total,
        })
    }

    /// Load one slice file and measure its segmented volume
    pub fn measure_slice(&self, path: impl AsRef<Path>) -> Result<SliceVolume, SliceError> {
        let path = path.as_ref();
        let coords = extract_foreground_coords(&SliceLoader::load(path)?)?;
        let volume = slice_volume(self.geometry.voxel_volume(), &coords);
        debug!(
            "{}: {} voxels, {volume} mm^3",
            path.display(),
            coords.len()
        );

        Ok(SliceVolume {
            path: path.to_path_buf(),
            voxel_count: coords.len(),
            volume,
        })
    }
}
