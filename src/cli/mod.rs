//! CLI commands and interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contact-surface-area")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the contact surface area between two closed meshes
    Compute {
        /// First mesh (STL or JSON)
        #[arg(value_name = "MESH_A")]
        mesh_a: PathBuf,

        /// Second mesh (STL or JSON)
        #[arg(value_name = "MESH_B")]
        mesh_b: PathBuf,

        /// Name of the first mesh (defaults to the file stem)
        #[arg(long)]
        name_a: Option<String>,

        /// Name of the second mesh (defaults to the file stem)
        #[arg(long)]
        name_b: Option<String>,

        /// Soft distance cap for threshold fitting
        #[arg(long)]
        soft_cap: Option<f64>,

        /// Use a k-d tree for nearest centroid lookups
        #[arg(long)]
        kdtree: bool,

        /// Configuration file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write a JSON report
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Write probe, reference and contact VTU files into this directory
        #[arg(long, value_name = "DIR")]
        vtu_dir: Option<PathBuf>,
    },

    /// Display information about a mesh file
    Info {
        /// Path to the mesh file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write the default configuration as JSON
    InitConfig {
        /// Output file path
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
}
