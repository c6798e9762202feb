/// Physical size of one mask voxel in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelGeometry {
    pub slice_thickness: f64,
    /// In-plane pixel size as (row, column) spacing
    pub pixel_spacing: (f64, f64),
}

impl VoxelGeometry {
    /// Wrist MRI protocol: 0.5 mm slices, 0.507812 mm square pixels.
    pub const WRIST_MRI: Self = Self::new(0.5, (0.507812, 0.507812));

    /// One cubic unit per voxel, so volumes equal voxel counts.
    pub const UNIT: Self = Self::new(1.0, (1.0, 1.0));

    pub const fn new(slice_thickness: f64, pixel_spacing: (f64, f64)) -> Self {
        Self {
            slice_thickness,
            pixel_spacing,
        }
    }

    pub fn pixel_area(&self) -> f64 {
        self.pixel_spacing.0 * self.pixel_spacing.1
    }

    /// Volume of a single voxel in mm³
    pub fn voxel_volume(&self) -> f64 {
        self.slice_thickness * self.pixel_area()
    }
}

impl Default for VoxelGeometry {
    fn default() -> Self {
        Self::WRIST_MRI
    }
}
