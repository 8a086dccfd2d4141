use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use pt_app::{AppResult, Quantity, RunProgressEvent, project_service, query, run_service};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pcbtherm")]
#[command(about = "pcbtherm - PCB joule heating and steady-state temperature", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List the electrical networks of every conductor layer
    Networks {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Map loads and solve the board temperature
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Write every layer's results as CSV into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Run and export one quantity of one layer as CSV
    Export {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Layer name
        #[arg(long)]
        layer: String,
        /// temperature, loss or network
        #[arg(long, default_value = "temperature")]
        quantity: String,
        /// Output CSV file path
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Networks { project_path } => cmd_networks(&project_path),
        Commands::Run {
            project_path,
            export_dir,
        } => cmd_run(&project_path, export_dir.as_deref()),
        Commands::Export {
            project_path,
            layer,
            quantity,
            out,
        } => cmd_export(&project_path, &layer, &quantity, &out),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    for layer in project_service::list_layers(&project) {
        println!(
            "  {} - {:?}, {:.2} mil ({} features, {} loads)",
            layer.name, layer.kind, layer.thickness_mil, layer.feature_count, layer.load_count
        );
    }
    Ok(())
}

fn cmd_networks(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let runtime = pt_app::compile_board(&project)?;

    for layer in &runtime.layers {
        let Some(networks) = &layer.networks else {
            continue;
        };
        println!("Layer '{}': {} networks", layer.name, networks.network_count());
        for net in networks.networks() {
            println!("  #{} - {} cells, first at {}", net.id, net.cell_count, net.anchor);
        }
        for load in &layer.loads {
            let start = networks.network_at(load.start);
            let end = networks.network_at(load.end);
            let status = match (start, end) {
                (Some(a), Some(b)) if a == b => format!("on network #{a}"),
                (Some(a), Some(b)) => format!("spans networks #{a} and #{b}"),
                _ => "has a terminal off copper".to_string(),
            };
            println!("  load '{}' {}", load.name, status);
        }
    }
    Ok(())
}

fn run_with_progress(project_path: &Path) -> AppResult<run_service::RunResponse> {
    let project = project_service::load_project(project_path)?;
    tracing::info!(path = %project_path.display(), layers = project.board.layers.len(), "project loaded");
    println!("Running project: {}", project.name);

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::run_project_with_progress(
        &project,
        Some(&mut |event| {
            let emit_now = last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();
    Ok(response)
}

fn cmd_run(project_path: &Path, export_dir: Option<&Path>) -> AppResult<()> {
    let response = run_with_progress(project_path)?;
    println!("✓ Simulation completed: {}", response.project_name);

    let ambient = &response.solution.ambient;
    println!(
        "  Ambient: {:.2} C, estimated board {:.2} C ({} iterations)",
        ambient.ambient_c,
        ambient.board_c(),
        ambient.iterations
    );
    println!("  Total joule loss: {:.4} W", response.total_loss_w());

    println!("\nLayers:");
    for s in query::layer_stats(&response) {
        println!(
            "  {:<12} {:?}  min {:.2} C  mean {:.2} C  max {:.2} C  loss {:.4} W  networks {}",
            s.name, s.kind, s.min_c, s.mean_c, s.max_c, s.loss_w, s.network_count
        );
    }
    if let Some(spot) = query::hottest(&response) {
        println!(
            "\nHottest cell: {:.2} C on '{}' at {}",
            spot.temperature_c, spot.layer, spot.coord
        );
    }

    print_timing_summary(&response.timing);

    if let Some(dir) = export_dir {
        let written = query::export_all(&response, dir)?;
        println!("\nWrote {} files to {}", written.len(), dir.display());
    }
    Ok(())
}

fn cmd_export(project_path: &Path, layer: &str, quantity: &str, out: &Path) -> AppResult<()> {
    let quantity: Quantity = quantity.parse()?;
    let response = run_with_progress(project_path)?;
    query::export_layer_csv(&response, layer, quantity, out)?;
    println!("✓ Exported {} of layer '{}' to {}", quantity.name(), layer, out.display());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
    let tick = (event.elapsed_wall_s * 10.0) as usize;
    let detail = event.message.as_deref().unwrap_or("");
    print!(
        "\r{} {:<18} {:>7.2}s  {}",
        SPINNER[tick % SPINNER.len()],
        event.stage.label(),
        event.elapsed_wall_s,
        detail
    );
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &run_service::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    println!(
        "  Compile: {:.3}s ({:.1}%)",
        timing.compile_time_s,
        100.0 * timing.compile_time_s / total
    );
    println!(
        "  Loads:   {:.3}s ({:.1}%)",
        timing.loss_time_s,
        100.0 * timing.loss_time_s / total
    );
    println!(
        "  Solve:   {:.3}s ({:.1}%)",
        timing.solve_time_s,
        100.0 * timing.solve_time_s / total
    );
    println!("  Total:   {:.3}s", timing.total_time_s);
    println!("  Linear iterations: {}", timing.linear_iterations);
    if timing.final_residual_norm > 0.0 {
        println!("  Final residual: {:.3e}", timing.final_residual_norm);
    }
}
