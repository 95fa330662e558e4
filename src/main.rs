//! Contact Surface Area CLI Application

use anyhow::{bail, Context};
use clap::Parser;
use contact_surface_area::config::CsaConfig;
use contact_surface_area::contact::{ContactMetrics, CsaPipeline, DistanceMethod, ProgressEvent};
use contact_surface_area::io::{read_mesh, write_contact_vtu, CsaReport};
use contact_surface_area::mesh::{
    mesh_area, DegenerateFacePolicy, DivergenceVolume, MeshRoles, TriangleMesh, VolumeCalculator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod cli;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Compute {
            mesh_a,
            mesh_b,
            name_a,
            name_b,
            soft_cap,
            kdtree,
            config,
            report,
            vtu_dir,
        } => {
            let mut config = match config {
                Some(path) => CsaConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => CsaConfig::default(),
            };
            if let Some(cap) = soft_cap {
                config.soft_cap = cap;
            }
            if kdtree {
                config.distance_method = DistanceMethod::KdTree;
            }

            cmd_compute(
                (mesh_a, name_a),
                (mesh_b, name_b),
                config,
                report,
                vtu_dir,
            )
        }
        Commands::Info { input } => cmd_info(input),
        Commands::InitConfig { output } => {
            CsaConfig::default()
                .to_file(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

fn load(path: &Path, name: Option<&str>) -> anyhow::Result<TriangleMesh> {
    read_mesh(path, name).with_context(|| format!("Failed to load mesh {}", path.display()))
}

fn cmd_compute(
    (path_a, name_a): (PathBuf, Option<String>),
    (path_b, name_b): (PathBuf, Option<String>),
    config: CsaConfig,
    report: Option<PathBuf>,
    vtu_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mesh_a = load(&path_a, name_a.as_deref())?;
    let mesh_b = load(&path_b, name_b.as_deref())?;
    let roles = MeshRoles::assign(mesh_a, mesh_b);

    println!(
        "Probe: '{}' ({} faces), reference: '{}' ({} faces)",
        roles.probe.name(),
        roles.probe.num_faces(),
        roles.reference.name(),
        roles.reference.num_faces()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let handle = CsaPipeline::new(config.clone()).spawn(roles);

    let mut outcome = None;
    for event in handle.events.iter() {
        match event {
            ProgressEvent::StageStarted(stage) => spinner.set_message(stage.message()),
            ProgressEvent::Finished(result) => {
                spinner.finish_with_message("Finished");
                outcome = Some(Ok(*result));
            }
            ProgressEvent::Failed { stage, message } => {
                spinner.abandon_with_message("Failed");
                let stage = stage.map(|s| s.name()).unwrap_or("setup");
                outcome = Some(Err(anyhow::anyhow!("{} stage failed: {}", stage, message)));
            }
            ProgressEvent::End => break,
        }
    }

    let roles = handle.join()?;
    let result = match outcome {
        Some(result) => result?,
        None => bail!("pipeline ended without a result"),
    };

    result.print_summary();
    let metrics = ContactMetrics::compute(&result, &roles.probe);
    metrics.print_summary(&result.probe_name);

    if let Some(path) = report {
        CsaReport::new(&config, &result, &roles)
            .export(&path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if let Some(dir) = vtu_dir {
        let written = write_contact_vtu(&roles.probe, &roles.reference, &result, &dir, None)
            .with_context(|| format!("Failed to write VTU files to {}", dir.display()))?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    println!("Reading mesh file: {}", input.display());
    let mesh = load(&input, None)?;

    let area = mesh_area(&mesh, DegenerateFacePolicy::Skip)?;
    let volume = DivergenceVolume.volume(&mesh);

    println!("\n{}", "=".repeat(60));
    println!("MESH INFORMATION: {}", mesh.name());
    println!("{}", "=".repeat(60));
    println!();
    println!("  Faces:             {}", mesh.num_faces());
    println!("  Surface Area:      {:.6}", area.area);
    println!("  Volume:            {:.6}", volume);
    println!("  Degenerate Faces:  {}", area.degenerate_faces.len());
    println!();
    println!("{}", "=".repeat(60));

    Ok(())
}
