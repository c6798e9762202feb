use crate::slice_loader::{RawSliceData, SliceError};

use ndarray::ArrayView2;

/// Name of the segmentation mask array inside a slice file.
pub const MASK_KEY: &str = "mask";

/// Label marking cartilage in a mask. Any other value is background.
pub const FOREGROUND_LABEL: i64 = 1;

/// `(row, column)` positions of foreground pixels in one slice, in row-major
/// scan order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaskCoordinateSet {
    coords: Vec<(usize, usize)>,
}

impl MaskCoordinateSet {
    /// Collect the positions where `mask` equals [`FOREGROUND_LABEL`]
    pub fn from_mask(mask: &ArrayView2<'_, i64>) -> Self {
        let coords = mask
            .indexed_iter()
            .filter(|&(_, &value)| value == FOREGROUND_LABEL)
            .map(|(index, _)| index)
            .collect();
        Self { coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.coords.iter().copied()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.coords
    }
}

impl FromIterator<(usize, usize)> for MaskCoordinateSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}

/// Extract the foreground coordinates of the `mask` array
///
/// # Errors
///
/// `MissingKey` if the slice has no `mask` array, `Shape` if it is not 2D
pub fn extract_foreground_coords(data: &RawSliceData) -> Result<MaskCoordinateSet, SliceError> {
    let mask = data.array2(MASK_KEY)?;
    Ok(MaskCoordinateSet::from_mask(&mask))
}
