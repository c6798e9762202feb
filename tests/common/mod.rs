//! Writes minimal uncompressed MAT level 5 files for tests.

use ndarray::{Array2, ArrayD};
use std::{fs, io, path::Path};

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

const LOGICAL_FLAG: u32 = 0x0200;

/// MATLAB array class a fixture array is stored as.
#[derive(Clone, Copy, Debug)]
pub enum MatClass {
    UInt8,
    Logical,
    Int8,
    Double,
    Int32,
}

impl MatClass {
    fn flags(self) -> u32 {
        match self {
            MatClass::UInt8 => 9,
            MatClass::Logical => 9 | LOGICAL_FLAG,
            MatClass::Int8 => 8,
            MatClass::Double => 6,
            MatClass::Int32 => 12,
        }
    }

    fn data_type(self) -> u32 {
        match self {
            MatClass::UInt8 | MatClass::Logical => MI_UINT8,
            MatClass::Int8 => MI_INT8,
            MatClass::Double => MI_DOUBLE,
            MatClass::Int32 => MI_INT32,
        }
    }

    fn encode(self, value: i32, buf: &mut Vec<u8>) {
        match self {
            MatClass::UInt8 | MatClass::Logical => buf.push(value as u8),
            MatClass::Int8 => buf.push(value as i8 as u8),
            MatClass::Double => buf.extend_from_slice(&f64::from(value).to_le_bytes()),
            MatClass::Int32 => buf.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

fn push_element(buf: &mut Vec<u8>, data_type: u32, payload: &[u8]) {
    buf.extend_from_slice(&data_type.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    while buf.len() % 8 != 0 {
        buf.push(0);
    }
}

fn push_matrix(buf: &mut Vec<u8>, name: &str, class: MatClass, array: &ArrayD<i32>) {
    let mut body = Vec::new();

    let flags: Vec<u8> = [class.flags(), 0].iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut body, MI_UINT32, &flags);

    let dims: Vec<u8> = array
        .shape()
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    push_element(&mut body, MI_INT32, &dims);

    push_element(&mut body, MI_INT8, name.as_bytes());

    // MAT files are column-major: the reversed-axes view iterates that way
    let mut data = Vec::new();
    for &value in array.view().reversed_axes().iter() {
        class.encode(value, &mut data);
    }
    push_element(&mut body, class.data_type(), &data);

    push_element(buf, MI_MATRIX, &body);
}

pub fn write_mat_as(
    path: &Path,
    class: MatClass,
    arrays: &[(&str, ArrayD<i32>)],
) -> io::Result<()> {
    let mut buf = Vec::new();
    let mut text = b"MATLAB 5.0 MAT-file, written by cartilage-volume tests".to_vec();
    text.resize(116, b' ');
    buf.extend_from_slice(&text);
    buf.extend_from_slice(&[0; 8]);
    buf.extend_from_slice(&0x0100u16.to_le_bytes());
    buf.extend_from_slice(b"IM");

    for (name, array) in arrays {
        push_matrix(&mut buf, name, class, array);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, buf)
}

/// Write `arrays` as `uint8`, the class `savemat` picks for small masks
pub fn write_mat(path: &Path, arrays: &[(&str, ArrayD<i32>)]) -> io::Result<()> {
    write_mat_as(path, MatClass::UInt8, arrays)
}

pub fn write_mask(path: &Path, mask: Array2<i32>) -> io::Result<()> {
    write_mat(path, &[("mask", mask.into_dyn())])
}

/// A `rows`×`cols` mask with foreground at `points`
pub fn mask_with(rows: usize, cols: usize, points: &[(usize, usize)]) -> Array2<i32> {
    let mut mask = Array2::zeros((rows, cols));
    for &point in points {
        mask[point] = 1;
    }
    mask
}
