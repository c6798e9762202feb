use crate::enums::SliceOrder;

use matfile::{MatFile, NumericData};
use ndarray::{ArrayD, ArrayView2, Ix2, IxDyn, ShapeBuilder};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// File name suffix of the per-slice mask files.
pub const SLICE_SUFFIX: &str = ".mat";

const FILENAME_DELIMITER: char = '-';
const SLICE_INDEX_SEGMENT: usize = 2;
const FILENAME_SUFFIX: &str = "_edit.mat";

const MAT_HEADER_LEN: usize = 128;
const MI_MATRIX: u32 = 14;
const MX_INT32_CLASS: u8 = 12;

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("Cannot read slice file {}: {reason}", .path.display())]
    FileFormat { path: PathBuf, reason: String },

    #[error("Array `{key}` not found in slice data")]
    MissingKey { key: String },

    #[error("Array `{key}` has {ndim} dimensions, expected 2")]
    Shape { key: String, ndim: usize },

    #[error("Cannot parse slice index from file name `{file_name}`")]
    FilenameFormat { file_name: String },

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl SliceError {
    fn file_format(path: &Path, reason: impl ToString) -> Self {
        Self::FileFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Named arrays read from one slice file.
///
/// MAT files store arrays column-major; arrays are kept in that memory
/// layout but index the same way MATLAB does, so `array[[r, c]]` is row `r`
/// and column `c`.
#[derive(Clone, Debug, Default)]
pub struct RawSliceData {
    arrays: BTreeMap<String, ArrayD<i64>>,
}

impl RawSliceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_array(mut self, name: impl Into<String>, array: ArrayD<i64>) -> Self {
        self.insert(name, array);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, array: ArrayD<i64>) -> Option<ArrayD<i64>> {
        self.arrays.insert(name.into(), array)
    }

    pub fn get(&self, name: &str) -> Option<&ArrayD<i64>> {
        self.arrays.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// Borrow the array stored under `key` as a 2D view
    ///
    /// # Errors
    ///
    /// `MissingKey` if there is no such array, `Shape` if it is not 2D
    pub fn array2(&self, key: &str) -> Result<ArrayView2<'_, i64>, SliceError> {
        let array = self.get(key).ok_or_else(|| SliceError::MissingKey {
            key: key.to_owned(),
        })?;
        array
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| SliceError::Shape {
                key: key.to_owned(),
                ndim: array.ndim(),
            })
    }
}

pub struct SliceLoader;

impl SliceLoader {
    /// Load every numeric array of a MAT file
    ///
    /// # Errors
    ///
    /// Returns `FileFormat` if the file cannot be opened, is not a level 5
    /// MAT file or holds an array whose data does not fit its dimensions.
    /// `int32` arrays cannot be decoded by the MAT reader and are reported
    /// as such.
    pub fn load(path: impl AsRef<Path>) -> Result<RawSliceData, SliceError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| SliceError::file_format(path, err))?;
        let mat_file = MatFile::parse(bytes.as_slice()).map_err(|err| {
            if Self::has_int32_array(&bytes) {
                SliceError::file_format(
                    path,
                    "int32 arrays are not supported, save masks as uint8, logical, int8 or double",
                )
            } else {
                SliceError::file_format(path, format!("{err:?}"))
            }
        })?;

        let mut data = RawSliceData::new();
        for array in mat_file.arrays() {
            let values = Self::to_i64(array.data());
            let shape = IxDyn(array.size()).f();
            let array_nd = ArrayD::from_shape_vec(shape, values).map_err(|err| {
                SliceError::file_format(path, format!("array `{}`: {err}", array.name()))
            })?;
            data.insert(array.name(), array_nd);
        }
        Ok(data)
    }

    /// Recursively find all slice files below `root`
    ///
    /// Entries of each directory are visited in file name order. Symbolic
    /// links to files count as slice files; linked directories are not
    /// descended into.
    pub fn find_slice_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, SliceError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(root.as_ref()).sort_by_file_name() {
            let entry = entry?;
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && Self::is_slice_file_name(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Find slice files below `root` and arrange them in the requested order
    ///
    /// With `SliceOrder::SliceIndex`, files whose name carries no slice
    /// index keep their relative order and come first.
    pub fn discover(
        root: impl AsRef<Path>,
        order: SliceOrder,
    ) -> Result<Vec<PathBuf>, SliceError> {
        let mut paths = Self::find_slice_files(root)?;
        if matches!(order, SliceOrder::SliceIndex) {
            paths.sort_by_cached_key(|path| Self::parse_slice_index(path).ok());
        }
        Ok(paths)
    }

    /// Parse the slice index out of a file name such as `IMG-0003-00063_edit.mat`
    ///
    /// The name is split on `-`, the third segment is taken and trailing
    /// characters of `_edit.mat` are stripped before parsing the rest as a
    /// number. Names that do not follow this layout are rejected.
    pub fn parse_slice_index(path: impl AsRef<Path>) -> Result<u32, SliceError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        file_name
            .split(FILENAME_DELIMITER)
            .nth(SLICE_INDEX_SEGMENT)
            .map(|segment| segment.trim_end_matches(|c: char| FILENAME_SUFFIX.contains(c)))
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| SliceError::FilenameFormat {
                file_name: file_name.to_string(),
            })
    }

    fn is_slice_file_name(path: &Path) -> bool {
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.ends_with(SLICE_SUFFIX))
    }

    // Walks the uncompressed top-level elements of a little-endian file.
    fn has_int32_array(bytes: &[u8]) -> bool {
        if bytes.get(126..MAT_HEADER_LEN) != Some(b"IM".as_slice()) {
            return false;
        }
        let mut offset = MAT_HEADER_LEN;
        while let (Some(data_type), Some(size)) =
            (read_u32(bytes, offset), read_u32(bytes, offset + 4))
        {
            // class byte of the array flags sub-element
            if data_type == MI_MATRIX && bytes.get(offset + 16) == Some(&MX_INT32_CLASS) {
                return true;
            }
            offset = offset.saturating_add(8).saturating_add(size as usize);
        }
        false
    }

    // Floating point classes truncate toward zero.
    fn to_i64(data: &NumericData) -> Vec<i64> {
        match data {
            NumericData::Int8 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::UInt8 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::Int16 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::UInt16 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::Int32 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::UInt32 { real, .. } => real.iter().map(|&v| i64::from(v)).collect(),
            NumericData::Int64 { real, .. } => real.clone(),
            NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as i64).collect(),
            NumericData::Single { real, .. } => real.iter().map(|&v| v as i64).collect(),
            NumericData::Double { real, .. } => real.iter().map(|&v| v as i64).collect(),
        }
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let word = bytes.get(at..at.checked_add(4)?)?;
    word.try_into().ok().map(u32::from_le_bytes)
}
