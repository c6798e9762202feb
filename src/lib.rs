//! # cartilage-volume
//!
//! Measures the volume of a segmented structure (wrist cartilage) from a
//! stack of binary segmentation masks, one MAT file per slice, and checks
//! the coordinate clouds reconstructed from two scan planes against each
//! other.
//!
//! Each slice file must hold a 2D array named `mask` in which cartilage is
//! labelled with `1`. Every other value counts as background. Slice files
//! are found recursively below a directory by their ".mat" extension. The
//! slice index used for coordinate clouds is read from the file name, which
//! has to look like `IMG-0003-00063_edit.mat` (slice 63).
//!
//! The voxel size defaults to the wrist MRI protocol
//! ([`VoxelGeometry::WRIST_MRI`]): 0.5 mm slices with 0.507812 mm pixels.
//!
//! By default a single unreadable slice aborts a directory scan. With
//! [`FailurePolicy::Skip`] failing files are reported instead.
//!
//! # Examples
//!
//! ## Total volume of a directory
//!
//! ```no_run
//! # use cartilage_volume::{VolumeAggregator, VoxelGeometry, SliceOrder};
//! let volume = VolumeAggregator::new(VoxelGeometry::WRIST_MRI)
//!     .with_order(SliceOrder::SliceIndex)
//!     .total_volume("masks/003")
//!     .expect("should have measured all slices");
//! println!("{volume} mm^3");
//! ```
//!
//! ## Comparing coronal and axial reconstructions
//!
//! ```no_run
//! # use cartilage_volume::{CloudReconstructor, compare};
//! let reconstructor = CloudReconstructor::new();
//! let coronal = reconstructor.reconstruct_volume("masks/coronal").unwrap();
//! let axial = reconstructor.reconstruct_volume("masks/axial").unwrap();
//! let result = compare(&coronal, &axial);
//! println!(
//!     "{} coronal voxels not in axial, {} axial voxels not in coronal",
//!     result.missing_from_axial, result.missing_from_coronal
//! );
//! ```

mod batch;
pub mod cloud;
pub mod compare;
pub mod enums;
pub mod geometry;
pub mod mask;
pub mod slice_loader;
pub mod volume;

pub use batch::SkippedSlice;
pub use cloud::{CloudReconstructor, CloudReport, Voxel3D, slice_to_3d};
pub use compare::{CloudComparison, compare, compare_by_scan};
pub use enums::{FailurePolicy, Plane, SliceOrder};
pub use geometry::VoxelGeometry;
pub use mask::{MaskCoordinateSet, extract_foreground_coords};
pub use slice_loader::{RawSliceData, SliceError, SliceLoader};
pub use volume::{SliceVolume, VolumeAggregator, VolumeReport, slice_volume};

use std::path::Path;

/// Total segmented volume in mm³ below `directory` with the wrist MRI
/// geometry, aborting on the first bad slice
pub fn compute_total_volume(directory: impl AsRef<Path>) -> Result<f64, SliceError> {
    VolumeAggregator::default().total_volume(directory)
}

/// Coordinate cloud of all slices below `directory`, aborting on the first
/// bad slice
pub fn reconstruct_coordinate_cloud(
    directory: impl AsRef<Path>,
) -> Result<Vec<Voxel3D>, SliceError> {
    CloudReconstructor::default().reconstruct_volume(directory)
}

/// `(coronal voxels missing from axial, axial voxels missing from coronal)`
pub fn compare_coordinate_clouds(coronal: &[Voxel3D], axial: &[Voxel3D]) -> (usize, usize) {
    compare(coronal, axial).as_tuple()
}
