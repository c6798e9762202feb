use std::path::PathBuf;

use anyhow::{Context, Result};
use cartilage_volume::{
    CloudReconstructor, FailurePolicy, Plane, SkippedSlice, SliceOrder, VolumeAggregator,
    VoxelGeometry, compare,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "cartilage-volume")]
#[command(about = "Segmented cartilage volume from per-slice MAT masks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the total segmented volume of a directory of slices
    Volume {
        /// Directory searched recursively for .mat slice files
        directory: PathBuf,

        /// Skip slices that cannot be read instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Order in which slices are processed
        #[arg(long, value_enum, default_value_t = Order::FileName)]
        order: Order,

        /// Print the volume of every slice
        #[arg(long)]
        per_slice: bool,
    },

    /// Reconstruct the 3D coordinate cloud of a directory of slices
    Cloud {
        /// Directory searched recursively for .mat slice files
        directory: PathBuf,

        /// Skip slices that cannot be read instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Order in which slices are processed
        #[arg(long, value_enum, default_value_t = Order::FileName)]
        order: Order,

        /// Print every voxel as `row column slice`
        #[arg(long)]
        print: bool,
    },

    /// Compare the coordinate clouds of a coronal and an axial series
    Compare {
        /// Directory with the coronal slices
        coronal: PathBuf,

        /// Directory with the axial slices
        axial: PathBuf,

        /// Skip slices that cannot be read instead of aborting
        #[arg(long)]
        skip_invalid: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    FileName,
    SliceIndex,
}

impl From<Order> for SliceOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::FileName => SliceOrder::FileName,
            Order::SliceIndex => SliceOrder::SliceIndex,
        }
    }
}

fn policy(skip_invalid: bool) -> FailurePolicy {
    if skip_invalid {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    }
}

// Printed regardless of the log level so a reduced total is never silent.
fn report_skipped(skipped: &[SkippedSlice]) {
    for slice in skipped {
        eprintln!("Skipped {slice}");
    }
    if !skipped.is_empty() {
        eprintln!("{} slice files were skipped", skipped.len());
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Volume {
            directory,
            skip_invalid,
            order,
            per_slice,
        } => {
            let report = VolumeAggregator::new(VoxelGeometry::WRIST_MRI)
                .with_order(order.into())
                .with_policy(policy(skip_invalid))
                .scan(&directory)
                .with_context(|| format!("Failed to measure {}", directory.display()))?;
            if per_slice {
                for slice in &report.slices {
                    println!("{}\t{}\t{}", slice.path.display(), slice.voxel_count, slice.volume);
                }
            }
            report_skipped(&report.skipped);
            println!("Total segmented volume: {} mm^3", report.total);
        }
        Commands::Cloud {
            directory,
            skip_invalid,
            order,
            print,
        } => {
            let report = CloudReconstructor::new()
                .with_order(order.into())
                .with_policy(policy(skip_invalid))
                .reconstruct(&directory)
                .with_context(|| format!("Failed to reconstruct {}", directory.display()))?;
            if print {
                for voxel in &report.voxels {
                    println!("{voxel}");
                }
            }
            report_skipped(&report.skipped);
            println!(
                "{} voxels from {} slices",
                report.voxels.len(),
                report.slice_count
            );
        }
        Commands::Compare {
            coronal,
            axial,
            skip_invalid,
        } => {
            let reconstructor = CloudReconstructor::new().with_policy(policy(skip_invalid));
            let coronal_cloud = reconstructor
                .reconstruct(&coronal)
                .with_context(|| format!("Failed to reconstruct {}", coronal.display()))?;
            let axial_cloud = reconstructor
                .reconstruct(&axial)
                .with_context(|| format!("Failed to reconstruct {}", axial.display()))?;
            report_skipped(&coronal_cloud.skipped);
            report_skipped(&axial_cloud.skipped);

            let result = compare(&coronal_cloud.voxels, &axial_cloud.voxels);
            for plane in [Plane::Coronal, Plane::Axial] {
                println!("Missing from {plane}: {}", result.missing_from(plane));
            }
        }
    }

    Ok(())
}
