use crate::batch::{self, SkippedSlice};
use crate::enums::{FailurePolicy, SliceOrder};
use crate::mask::{MaskCoordinateSet, extract_foreground_coords};
use crate::slice_loader::{RawSliceData, SliceError, SliceLoader};

use log::{debug, info};
use std::{fmt, path::Path};

/// A foreground voxel in slice space.
///
/// `row` and `column` are 1-based while `slice` is the index carried by the
/// slice file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Voxel3D {
    pub row: usize,
    pub column: usize,
    pub slice: u32,
}

impl Voxel3D {
    pub const fn new(row: usize, column: usize, slice: u32) -> Self {
        Self { row, column, slice }
    }

    pub const fn as_tuple(&self) -> (usize, usize, u32) {
        (self.row, self.column, self.slice)
    }
}

impl From<(usize, usize, u32)> for Voxel3D {
    fn from((row, column, slice): (usize, usize, u32)) -> Self {
        Self::new(row, column, slice)
    }
}

impl fmt::Display for Voxel3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.row, self.column, self.slice)
    }
}

/// Map 0-based mask coordinates onto 1-based voxels of slice `slice_index`
pub fn coords_to_3d(coords: &MaskCoordinateSet, slice_index: u32) -> Vec<Voxel3D> {
    coords
        .iter()
        .map(|(row, column)| Voxel3D::new(row + 1, column + 1, slice_index))
        .collect()
}

/// Voxels of the foreground of one slice
///
/// # Errors
///
/// Fails like [`extract_foreground_coords`] when the slice has no usable mask
pub fn slice_to_3d(data: &RawSliceData, slice_index: u32) -> Result<Vec<Voxel3D>, SliceError> {
    let coords = extract_foreground_coords(data)?;
    Ok(coords_to_3d(&coords, slice_index))
}

/// Coordinate cloud of a directory together with the files left out.
#[derive(Debug, Default)]
pub struct CloudReport {
    pub voxels: Vec<Voxel3D>,
    pub slice_count: usize,
    pub skipped: Vec<SkippedSlice>,
}

/// Rebuilds the coordinate cloud of a segmented structure from its slice
/// files.
#[derive(Clone, Debug, Default)]
pub struct CloudReconstructor {
    order: SliceOrder,
    policy: FailurePolicy,
}

impl CloudReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: SliceOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All voxels of all slice files below `directory`, slice after slice
    ///
    /// # Errors
    ///
    /// With `FailurePolicy::Abort` a file name without a slice index or a
    /// slice that cannot be loaded aborts the reconstruction.
    pub fn reconstruct_volume(
        &self,
        directory: impl AsRef<Path>,
    ) -> Result<Vec<Voxel3D>, SliceError> {
        Ok(self.reconstruct(directory)?.voxels)
    }

    pub fn reconstruct(&self, directory: impl AsRef<Path>) -> Result<CloudReport, SliceError> {
        let directory = directory.as_ref();
        info!("Reconstructing coordinate cloud under {}", directory.display());

        let paths = SliceLoader::discover(directory, self.order)?;
        let outcome = batch::process_files(paths, self.policy, Self::reconstruct_slice)?;

        let slice_count = outcome.processed.len();
        let voxels: Vec<_> = outcome.processed.into_iter().flatten().collect();
        info!("Reconstructed {} voxels from {slice_count} slices", voxels.len());

        Ok(CloudReport {
            voxels,
            slice_count,
            skipped: outcome.skipped,
        })
    }

    /// Voxels of a single slice file, indexed by the number in its name
    pub fn reconstruct_slice(path: &Path) -> Result<Vec<Voxel3D>, SliceError> {
        let slice_index = SliceLoader::parse_slice_index(path)?;
        let voxels = slice_to_3d(&SliceLoader::load(path)?, slice_index)?;
        debug!(
            "{}: slice {slice_index}, {} voxels",
            path.display(),
            voxels.len()
        );
        Ok(voxels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MASK_KEY;
    use ndarray::{Array2, array};
    use std::collections::HashSet;

    fn slice_with_mask(mask: Array2<i64>) -> RawSliceData {
        RawSliceData::new().with_array(MASK_KEY, mask.into_dyn())
    }

    #[test]
    fn origin_maps_to_one_based_voxel() {
        let data = slice_with_mask(array![[1, 0], [0, 0]]);
        let voxels = slice_to_3d(&data, 5).unwrap();
        assert_eq!(voxels, vec![Voxel3D::new(1, 1, 5)]);
    }

    #[test]
    fn square_maps_to_four_voxels() {
        let data = slice_with_mask(array![[1, 1, 0], [1, 1, 0], [0, 0, 0]]);
        let voxels: HashSet<_> = slice_to_3d(&data, 1)
            .unwrap()
            .into_iter()
            .map(|voxel| voxel.as_tuple())
            .collect();
        let expected: HashSet<_> = [(1, 1, 1), (1, 2, 1), (2, 1, 1), (2, 2, 1)]
            .into_iter()
            .collect();
        assert_eq!(voxels, expected);
    }

    #[test]
    fn slice_index_is_taken_as_given() {
        let data = slice_with_mask(array![[0, 0], [0, 1]]);
        assert_eq!(slice_to_3d(&data, 63).unwrap(), vec![Voxel3D::new(2, 2, 63)]);
    }

    #[test]
    fn slice_without_mask_fails() {
        assert!(matches!(
            slice_to_3d(&RawSliceData::new(), 1),
            Err(SliceError::MissingKey { .. })
        ));
    }

    #[test]
    fn file_name_is_checked_before_loading() {
        let err = CloudReconstructor::reconstruct_slice(Path::new("/non/existent/mask.mat"))
            .unwrap_err();
        assert!(matches!(err, SliceError::FilenameFormat { .. }));
    }

    #[test]
    fn voxel_displays_as_space_separated_triple() {
        assert_eq!(Voxel3D::new(3, 4, 12).to_string(), "3 4 12");
    }
}
