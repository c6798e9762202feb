use crate::enums::Plane;

use std::{collections::HashSet, hash::Hash};

/// Disagreement between the coronal and axial reconstructions of the same
/// structure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloudComparison {
    /// Axial voxels absent from the coronal cloud
    pub missing_from_coronal: usize,
    /// Coronal voxels absent from the axial cloud
    pub missing_from_axial: usize,
}

impl CloudComparison {
    pub fn missing_from(&self, plane: Plane) -> usize {
        match plane {
            Plane::Coronal => self.missing_from_coronal,
            Plane::Axial => self.missing_from_axial,
        }
    }

    /// `(missing_from_axial, missing_from_coronal)`: coronal-side count first
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.missing_from_axial, self.missing_from_coronal)
    }

    pub fn is_consistent(&self) -> bool {
        self.missing_from_coronal == 0 && self.missing_from_axial == 0
    }
}

/// Count the voxels each cloud has that the other lacks
///
/// Every list element is counted, so duplicates count once per occurrence.
pub fn compare<T: Eq + Hash>(coronal: &[T], axial: &[T]) -> CloudComparison {
    let coronal_index: HashSet<&T> = coronal.iter().collect();
    let axial_index: HashSet<&T> = axial.iter().collect();

    CloudComparison {
        missing_from_coronal: axial.iter().filter(|v| !coronal_index.contains(v)).count(),
        missing_from_axial: coronal.iter().filter(|v| !axial_index.contains(v)).count(),
    }
}

/// Same counts as [`compare`] by scanning the other list for every element.
///
/// Runs in O(n·m); only useful for element types that cannot be hashed.
pub fn compare_by_scan<T: PartialEq>(coronal: &[T], axial: &[T]) -> CloudComparison {
    CloudComparison {
        missing_from_coronal: axial.iter().filter(|&v| !coronal.contains(v)).count(),
        missing_from_axial: coronal.iter().filter(|&v| !axial.contains(v)).count(),
    }
}
