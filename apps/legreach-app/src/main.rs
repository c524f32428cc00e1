//! legreach command-line front end.
//!
//! Modes of operation:
//! - `fk`: foot position for femur/tibia angles
//! - `ik`: joint angles, limit report and servo targets for a foot position
//! - `reach`: approximated reachable band over a height range
//! - `outline`: range-of-motion boundary polylines
//! - `force`: force capacity at one foot position
//! - `grid`: force capacity over a grid, written as CSV
//! - `info`: geometry summary and crate versions
//!
//! Geometry comes from a built-in preset or a TOML profile. Angles are read
//! and printed in degrees.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Args, Parser, Subcommand, ValueEnum};

use legreach_core::prelude::*;
use legreach_force::{DEFAULT_DIRECTION, ForceGrid, GridAxes, LegForceCalculator};
use legreach_ik::{IkBranch, LegKinematicsSolver, MotionHalf};

/// Set by Ctrl-C; stops a running grid sweep between rows.
static CANCELLED: AtomicBool = AtomicBool::new(false);

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Hexapod leg reachability and force capacity.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    geometry: GeometryArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GeometryArgs {
    /// Built-in geometry preset.
    #[arg(short, long, global = true, default_value = "phantomx-mk2")]
    preset: String,

    /// TOML leg profile; takes precedence over --preset.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the joint torque limit (N·mm).
    #[arg(long, global = true, allow_negative_numbers = true)]
    torque_max: Option<f64>,

    /// Override the approximate minimum reach radius (mm).
    #[arg(long, global = true, allow_negative_numbers = true)]
    min_radius: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Foot position from femur and tibia angles (degrees).
    Fk {
        #[arg(allow_negative_numbers = true)]
        theta2: f64,
        #[arg(allow_negative_numbers = true)]
        theta3: f64,
    },

    /// Joint angles for a foot position (mm).
    Ik {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,

        /// Knee branch to solve for.
        #[arg(short, long, value_enum, default_value_t = BranchArg::Primary)]
        branch: BranchArg,
    },

    /// Approximated reachable band for heights in [z-min, z-max).
    Reach {
        #[arg(long, default_value_t = -150.0, allow_negative_numbers = true)]
        z_min: f64,
        #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
        z_max: f64,
        #[arg(long, default_value_t = 10.0)]
        step: f64,
    },

    /// Range-of-motion boundary as `line,x,z` rows.
    Outline {
        #[arg(value_enum)]
        half: HalfArg,

        /// Angular step (degrees).
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },

    /// Force capacity at one foot position.
    Force {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[command(flatten)]
        direction: DirectionArgs,
    },

    /// Force capacity over a grid, as CSV.
    Grid {
        #[arg(long, default_value_t = -100.0, allow_negative_numbers = true)]
        x_min: f64,
        #[arg(long, default_value_t = 300.0, allow_negative_numbers = true)]
        x_max: f64,
        #[arg(long, default_value_t = -300.0, allow_negative_numbers = true)]
        z_min: f64,
        #[arg(long, default_value_t = 300.0, allow_negative_numbers = true)]
        z_max: f64,

        /// Grid spacing (mm, at least 1).
        #[arg(long, default_value_t = 5.0)]
        step: f64,

        #[command(flatten)]
        direction: DirectionArgs,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Evaluate rows in order on one thread.
        #[arg(long)]
        sequential: bool,
    },

    /// Print the geometry and crate versions.
    Info,
}

#[derive(Args)]
struct DirectionArgs {
    /// Force x component at the foot.
    #[arg(long, default_value_t = DEFAULT_DIRECTION.0, allow_negative_numbers = true)]
    fx: f64,
    /// Force z component at the foot.
    #[arg(long, default_value_t = DEFAULT_DIRECTION.1, allow_negative_numbers = true)]
    fz: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum BranchArg {
    Primary,
    Reverse,
}

impl From<BranchArg> for IkBranch {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::Primary => Self::Primary,
            BranchArg::Reverse => Self::Reverse,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HalfArg {
    Upper,
    Lower,
}

impl From<HalfArg> for MotionHalf {
    fn from(arg: HalfArg) -> Self {
        match arg {
            HalfArg::Upper => Self::Upper,
            HalfArg::Lower => Self::Lower,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry loading
// ---------------------------------------------------------------------------

fn load_geometry(args: &GeometryArgs) -> Result<LegGeometry, LegreachError> {
    let mut geometry = match &args.config {
        Some(path) => {
            let geometry = LegGeometry::from_file(path)?;
            log::info!("loaded profile '{}' from {}", geometry.name(), path.display());
            geometry
        }
        None => presets::by_name(&args.preset)?,
    };
    if let Some(torque_max) = args.torque_max {
        geometry = geometry.with_torque_max(torque_max)?;
    }
    if let Some(radius) = args.min_radius {
        geometry = geometry.with_approx_min_radius(radius)?;
    }
    Ok(geometry)
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_fk(solver: &LegKinematicsSolver, theta2: f64, theta3: f64) -> Result<(), LegreachError> {
    let (t2, t3) = (theta2.to_radians(), theta3.to_radians());
    let mut out = io::stdout().lock();
    match solver.position_from_angles(t2, t3) {
        Some(foot) => writeln!(out, "foot: x={:.3} z={:.3}", foot.x, foot.z)?,
        None => {
            let report = solver.joint_limit_report(&JointAngles::planar(t2, t3));
            let joints: Vec<_> = report.offending().map(|j| j.name()).collect();
            writeln!(out, "out of range: {}", joints.join(", "))?;
        }
    }
    Ok(())
}

fn run_ik(solver: &LegKinematicsSolver, x: f64, z: f64, branch: IkBranch) -> Result<(), LegreachError> {
    let result = solver.inverse_kinematics(x, z, branch);
    let report = solver.joint_limit_report(&result.angles);
    let [t1, t2, t3] = result.angles.to_degrees();
    let servo = solver.servo_targets(x, z);

    let mut out = io::stdout().lock();
    writeln!(out, "reached: {} ({:?} branch)", result.reached, result.branch)?;
    writeln!(out, "angles:  theta1={t1:.3} theta2={t2:.3} theta3={t3:.3} deg")?;
    if report.all_within() {
        writeln!(out, "limits:  ok")?;
    } else {
        let joints: Vec<_> = report.offending().map(|j| j.name()).collect();
        writeln!(out, "limits:  out of range: {}", joints.join(", "))?;
    }
    for (name, p) in ["base", "coxa", "femur", "foot"]
        .iter()
        .zip(result.positions.as_slice())
    {
        writeln!(out, "  {name:<6} x={:9.3} z={:9.3}", p.x, p.z)?;
    }
    writeln!(
        out,
        "servo:   ticks={:?} left={:?} right={:?}",
        servo.servo, servo.left, servo.right
    )?;
    Ok(())
}

fn run_reach(solver: &LegKinematicsSolver, z_min: f64, z_max: f64, step: f64) -> Result<(), LegreachError> {
    let band = solver.approx_reach_band(z_min, z_max, step)?;
    let mut out = io::stdout().lock();
    writeln!(out, "z,min_radius,max_radius")?;
    for s in band {
        writeln!(out, "{},{},{}", s.z, s.min_radius, s.max_radius)?;
    }
    Ok(())
}

fn run_outline(solver: &LegKinematicsSolver, half: MotionHalf, step_deg: f64) -> Result<(), LegreachError> {
    let trace = solver.range_of_motion(half, step_deg.to_radians())?;
    let mut out = io::stdout().lock();
    writeln!(out, "line,x,z")?;
    for (line, points) in trace.polylines().iter().enumerate() {
        for p in *points {
            writeln!(out, "{line},{:.4},{:.4}", p.x, p.z)?;
        }
    }
    Ok(())
}

fn run_force(calc: &LegForceCalculator, x: f64, z: f64, dir: &DirectionArgs) -> Result<(), LegreachError> {
    let sample = calc.sample(x, z, dir.fx, dir.fz);
    let mut out = io::stdout().lock();
    match calc.feasible_pose(x, z) {
        Some(pose) => {
            let [_, t2, t3] = pose.angles.to_degrees();
            writeln!(
                out,
                "pose:       {:?} branch, theta2={t2:.3} theta3={t3:.3} deg",
                pose.branch
            )?;
        }
        None => writeln!(out, "pose:       none within limits")?,
    }
    writeln!(out, "multiplier: {}", sample.multiplier)?;
    Ok(())
}

fn run_grid(
    calc: &LegForceCalculator,
    axes: &GridAxes,
    dir: &DirectionArgs,
    output: Option<&PathBuf>,
    sequential: bool,
) -> Result<(), LegreachError> {
    if let Err(e) = ctrlc::set_handler(|| CANCELLED.store(true, Ordering::Relaxed)) {
        log::warn!("Ctrl-C handler not installed: {e}");
    }

    let (rows, cols) = axes.shape();
    log::info!("evaluating {rows}x{cols} force grid");

    let mut sweep = calc
        .grid_sweep(axes)
        .with_force(dir.fx, dir.fz)
        .with_cancel_flag(&CANCELLED);
    if sequential {
        sweep = sweep.sequential();
    }
    let report_every = (rows / 10).max(1);
    let grid = sweep.run_with_progress(|p| {
        if p.completed % report_every == 0 {
            log::info!("{:3.0}% ({}/{} rows)", p.fraction() * 100.0, p.completed, p.total);
        }
        ControlFlow::Continue(())
    });

    match output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write_grid_csv(&grid, &mut file)?;
            file.flush()?;
            log::info!("wrote {}", path.display());
        }
        None => write_grid_csv(&grid, &mut io::stdout().lock())?,
    }
    Ok(())
}

/// Header row of `x` values, then one `z,values...` row per grid row.
fn write_grid_csv(grid: &ForceGrid, out: &mut impl Write) -> io::Result<()> {
    let axes = grid.axes();
    write!(out, "z\\x")?;
    for x in axes.xs() {
        write!(out, ",{x}")?;
    }
    writeln!(out)?;
    for (z, row) in axes.zs().iter().zip(grid.values()) {
        write!(out, "{z}")?;
        for v in row {
            write!(out, ",{v}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn run_info(geometry: &LegGeometry) {
    let deg = |r: JointRange| (r.min.to_degrees(), r.max.to_degrees());
    println!("legreach v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("geometry: {}", geometry.name());
    println!(
        "  lengths:    coxa={} femur={} tibia={} mm",
        geometry.coxa_length(),
        geometry.femur_length(),
        geometry.tibia_length()
    );
    for (name, range) in [
        ("theta1", geometry.theta1_range()),
        ("theta2", geometry.theta2_range()),
        ("theta3", geometry.theta3_range()),
    ] {
        let (min, max) = deg(range);
        println!("  {name}:     [{min:.1}, {max:.1}] deg");
    }
    println!("  torque_max: {} N·mm", geometry.torque_max());
    println!("  min_radius: {} mm", geometry.approx_min_radius());
    println!();
    println!("presets: {}", presets::NAMES.join(", "));
    println!();
    println!("crates:");
    println!("  legreach-core  {}", env!("CARGO_PKG_VERSION"));
    println!("  legreach-ik    {}", env!("CARGO_PKG_VERSION"));
    println!("  legreach-force {}", env!("CARGO_PKG_VERSION"));
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<(), LegreachError> {
    let geometry = load_geometry(&cli.geometry)?;
    log::debug!("using geometry '{}'", geometry.name());

    match cli.command {
        Commands::Fk { theta2, theta3 } => run_fk(&LegKinematicsSolver::new(geometry), theta2, theta3),
        Commands::Ik { x, z, branch } => {
            run_ik(&LegKinematicsSolver::new(geometry), x, z, branch.into())
        }
        Commands::Reach { z_min, z_max, step } => {
            run_reach(&LegKinematicsSolver::new(geometry), z_min, z_max, step)
        }
        Commands::Outline { half, step } => {
            run_outline(&LegKinematicsSolver::new(geometry), half.into(), step)
        }
        Commands::Force { x, z, direction } => {
            run_force(&LegForceCalculator::new(geometry), x, z, &direction)
        }
        Commands::Grid {
            x_min,
            x_max,
            z_min,
            z_max,
            step,
            direction,
            output,
            sequential,
        } => {
            let axes = GridAxes::from_bounds(x_min, x_max, z_min, z_max, step)?;
            run_grid(
                &LegForceCalculator::new(geometry),
                &axes,
                &direction,
                output.as_ref(),
                sequential,
            )
        }
        Commands::Info => {
            run_info(&geometry);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_positionals() {
        let cli = Cli::try_parse_from(["legreach", "ik", "150", "-80", "--branch", "reverse"]).unwrap();
        match cli.command {
            Commands::Ik { x, z, branch } => {
                assert!((x - 150.0).abs() < f64::EPSILON);
                assert!((z + 80.0).abs() < f64::EPSILON);
                assert!(matches!(branch, BranchArg::Reverse));
            }
            _ => panic!("expected ik"),
        }
    }

    #[test]
    fn preset_and_overrides_apply() {
        let cli = Cli::try_parse_from([
            "legreach",
            "--preset",
            "xr-r1",
            "--torque-max",
            "500",
            "info",
        ])
        .unwrap();
        let g = load_geometry(&cli.geometry).unwrap();
        assert_eq!(g.name(), "xr-r1");
        assert!((g.torque_max() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_override_is_an_error() {
        let cli = Cli::try_parse_from(["legreach", "--min-radius", "-1", "info"]).unwrap();
        assert!(matches!(
            load_geometry(&cli.geometry),
            Err(LegreachError::Config(ConfigError::NegativeMinRadius(_)))
        ));
    }

    #[test]
    fn oversized_grid_is_an_error() {
        let cli = Cli::try_parse_from(["legreach", "grid", "--x-max", "1e300"]).unwrap();
        assert!(matches!(
            run(cli),
            Err(LegreachError::Sample(SampleError::TooManySamples { .. }))
        ));
    }

    #[test]
    fn grid_csv_layout() {
        let calc = LegForceCalculator::new(presets::phantomx_mk2());
        let axes = GridAxes::from_bounds(230.0, 240.0, -10.0, 0.0, 10.0).unwrap();
        let grid = calc.evaluate_grid(&axes, 0.0, 1.0);
        let mut buf = Vec::new();
        write_grid_csv(&grid, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "z\\x,230,240");
        assert!(lines[2].starts_with("0,"));
        assert!(lines[2].ends_with(",9"));
    }
}
