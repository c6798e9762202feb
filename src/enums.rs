#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    Coronal,
    Axial,
}

/// Order in which discovered slice files are processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliceOrder {
    /// Directory traversal order, entries sorted by file name.
    #[default]
    FileName,
    /// Ascending slice index parsed from the file name.
    SliceIndex,
}

/// What a directory scan does when a single slice file fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing file and return its error.
    #[default]
    Abort,
    /// Record the failure, log it and continue with the next file.
    Skip,
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plane::Coronal => f.write_str("coronal"),
            Plane::Axial => f.write_str("axial"),
        }
    }
}
