use crate::{enums::FailurePolicy, slice_loader::SliceError};

use log::warn;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A slice file left out of a directory scan.
#[derive(Debug)]
pub struct SkippedSlice {
    pub path: PathBuf,
    pub error: SliceError,
}

impl fmt::Display for SkippedSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

pub(crate) struct BatchOutcome<T> {
    pub(crate) processed: Vec<T>,
    pub(crate) skipped: Vec<SkippedSlice>,
}

/// Run `process` over `paths` in order, applying `policy` to failures.
pub(crate) fn process_files<T>(
    paths: Vec<PathBuf>,
    policy: FailurePolicy,
    mut process: impl FnMut(&Path) -> Result<T, SliceError>,
) -> Result<BatchOutcome<T>, SliceError> {
    let mut processed = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match process(&path) {
            Ok(item) => processed.push(item),
            Err(error) if policy == FailurePolicy::Skip => {
                warn!("Skipping {}: {error}", path.display());
                skipped.push(SkippedSlice { path, error });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(BatchOutcome { processed, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Vec<PathBuf> {
        ["a.mat", "b.mat", "c.mat"].iter().map(PathBuf::from).collect()
    }

    fn fail_on_b(path: &Path) -> Result<String, SliceError> {
        if path == Path::new("b.mat") {
            Err(SliceError::MissingKey {
                key: "mask".to_owned(),
            })
        } else {
            Ok(path.display().to_string())
        }
    }

    #[test]
    fn abort_returns_first_error() {
        let result = process_files(paths(), FailurePolicy::Abort, fail_on_b);
        assert!(matches!(result, Err(SliceError::MissingKey { .. })));
    }

    #[test]
    fn skip_collects_failures_and_keeps_going() {
        let outcome = process_files(paths(), FailurePolicy::Skip, fail_on_b).unwrap();
        assert_eq!(outcome.processed, vec!["a.mat", "c.mat"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, PathBuf::from("b.mat"));
        assert!(matches!(
            outcome.skipped[0].error,
            SliceError::MissingKey { .. }
        ));
    }

    #[test]
    fn skipped_slice_names_file_and_error() {
        let skipped = SkippedSlice {
            path: PathBuf::from("IMG-1-2_edit.mat"),
            error: SliceError::MissingKey {
                key: "mask".to_owned(),
            },
        };
        assert_eq!(
            skipped.to_string(),
            "IMG-1-2_edit.mat: Array `mask` not found in slice data"
        );
    }
}
