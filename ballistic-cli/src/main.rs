mod output;

use ballistic_core::analytic::{flight_time, max_height, range};
use ballistic_core::integrator::evaluate_at;
use ballistic_core::{
    BodyParameters, DragModel, EnvironmentParameters, ForceModel, Projectile, ScenarioConfig,
    Scheme, Simulation, SimulationSettings, Wind,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::DVec2;
use output::{write_csv, ScreenTransform};
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ballistic")]
#[command(about = "Projectile trajectories under gravity, drag and wind", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a TOML scenario until every projectile settles
    Run {
        /// Path to the scenario file
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fly a single shot described on the command line
    Shot {
        #[command(flatten)]
        shot: ShotArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Closed-form range, apex and flight time without drag
    Query {
        /// Launch speed in m/s
        #[arg(long)]
        speed: f64,
        /// Launch angle in degrees
        #[arg(long)]
        angle: f64,
        /// Launch height above the landing plane
        #[arg(long, default_value_t = 0.0)]
        height: f64,
        #[arg(long, default_value_t = 9.81)]
        gravity: f64,
    },
    /// State of a shot at a given time after launch
    At {
        /// Seconds after launch
        #[arg(long)]
        time: f64,
        #[command(flatten)]
        shot: ShotArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Write trajectory points to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Give up after this many frames
    #[arg(long, default_value_t = 100_000)]
    max_frames: u64,
    /// Emit CSV in screen coordinates for a canvas of this height (pixels)
    #[arg(long)]
    screen_height: Option<f64>,
    /// Pixels per metre for screen coordinates
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Args)]
struct ShotArgs {
    #[arg(long, default_value_t = 40.0)]
    speed: f64,
    /// Degrees above the horizontal
    #[arg(long, default_value_t = 45.0)]
    angle: f64,
    #[arg(long, default_value_t = 0.0)]
    x: f64,
    #[arg(long, default_value_t = 0.0)]
    y: f64,
    #[arg(long, default_value_t = 0.145)]
    mass: f64,
    #[arg(long, default_value_t = 0.47)]
    cd: f64,
    /// Cross-section in m²
    #[arg(long, default_value_t = 0.0042)]
    area: f64,
    /// Air density in kg/m³
    #[arg(long, default_value_t = 1.225)]
    rho: f64,
    #[arg(long, default_value_t = 9.81)]
    gravity: f64,
    #[arg(long, default_value_t = 0.0)]
    wind_speed: f64,
    /// Direction the wind blows toward, degrees from +x
    #[arg(long, default_value_t = 0.0)]
    wind_direction: f64,
    #[arg(long, default_value_t = 0.01)]
    dt: f64,
    #[arg(long, value_enum, default_value_t = SchemeArg::Rk4)]
    scheme: SchemeArg,
    #[arg(long, value_enum, default_value_t = DragArg::Quadratic)]
    drag: DragArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Euler,
    Rk4,
}

#[derive(Clone, Copy, ValueEnum)]
enum DragArg {
    None,
    Quadratic,
    Linear,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Euler => Scheme::SemiImplicitEuler,
            SchemeArg::Rk4 => Scheme::Rk4,
        }
    }
}

impl From<DragArg> for DragModel {
    fn from(arg: DragArg) -> Self {
        match arg {
            DragArg::None => DragModel::None,
            DragArg::Quadratic => DragModel::Quadratic,
            DragArg::Linear => DragModel::Linear,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

impl ShotArgs {
    fn environment(&self) -> CliResult<EnvironmentParameters> {
        let wind = Wind::from_speed_direction(self.wind_speed, self.wind_direction)?;
        Ok(EnvironmentParameters::new(self.gravity, self.rho)?.with_wind(wind))
    }

    fn settings(&self) -> SimulationSettings {
        SimulationSettings {
            dt: self.dt,
            scheme: self.scheme.into(),
            drag: self.drag.into(),
            ..SimulationSettings::default()
        }
    }

    fn projectile(&self) -> CliResult<Projectile> {
        let body = BodyParameters::new(self.mass, self.cd, self.area)?;
        Ok(Projectile::new(
            DVec2::new(self.x, self.y),
            self.speed,
            self.angle,
            body,
        )?)
    }

    fn simulation(&self) -> CliResult<Simulation> {
        let mut sim = Simulation::new(self.environment()?, self.settings())?;
        sim.add_projectile(self.projectile()?);
        Ok(sim)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { file, output } => run_scenario(&file, &output),
        Commands::Shot { shot, output } => shot.simulation().and_then(|sim| fly(sim, &output)),
        Commands::Query {
            speed,
            angle,
            height,
            gravity,
        } => query(speed, angle, height, gravity),
        Commands::At { time, shot } => at(time, &shot),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_scenario(file: &Path, output: &OutputArgs) -> CliResult<()> {
    let source = fs::read_to_string(file)?;
    let sim = ScenarioConfig::from_toml_str(&source)?.build_simulation()?;
    info!(file = %file.display(), projectiles = sim.projectiles().len(), "scenario loaded");
    fly(sim, output)
}

fn fly(mut sim: Simulation, output: &OutputArgs) -> CliResult<()> {
    sim.launch_all();
    for failure in sim.run_until_settled(output.max_frames) {
        warn!(projectile = failure.index, "{}", failure.error);
    }
    if sim.any_active() {
        warn!(frames = sim.frames(), "frame limit reached before every projectile settled");
    }

    for index in 0..sim.projectiles().len() {
        let telemetry = sim.telemetry(index)?;
        println!("projectile {}", index);
        println!("  phase = {:?}", telemetry.phase);
        println!("  time = {:.3}", telemetry.time);
        println!(
            "  position = ({:.3}, {:.3})",
            telemetry.position.x, telemetry.position.y
        );
        println!("  speed = {:.3}", telemetry.speed);
        if let Some(apex) = sim.projectile(index)?.trajectory().max_height() {
            println!("  max_height = {:.3}", apex);
        }
        if let Some(landing) = telemetry.landing_range {
            println!("  range = {:.3}", landing);
        }
        if let Some(distance) = telemetry.target_distance {
            println!("  target_distance = {:.3}", distance);
        }
        println!(
            "  energy = {:.3} J ({} drag, {})",
            telemetry.kinetic_energy + telemetry.potential_energy,
            telemetry.drag,
            telemetry.scheme
        );
    }

    if let Some(path) = &output.csv {
        let transform = output
            .screen_height
            .map(|height| ScreenTransform::new(height, output.scale))
            .transpose()?;
        let mut writer = BufWriter::new(fs::File::create(path)?);
        write_csv(&mut writer, &sim, transform.as_ref())?;
        info!(path = %path.display(), "trajectory written");
    }
    Ok(())
}

/// Range, apex height and flight time, in that order.
fn closed_form(speed: f64, angle: f64, height: f64, gravity: f64) -> Result<[f64; 3], String> {
    if !(gravity.is_finite() && gravity > 0.0) {
        return Err(format!("gravity must be positive for closed-form queries, got {}", gravity));
    }
    let theta = angle.to_radians();
    Ok([
        range(speed, theta, gravity, height),
        max_height(speed, theta, gravity, height),
        flight_time(speed, theta, gravity, height),
    ])
}

fn query(speed: f64, angle: f64, height: f64, gravity: f64) -> CliResult<()> {
    let [distance, apex, time] = closed_form(speed, angle, height, gravity)?;
    println!("range = {:.3}", distance);
    println!("max_height = {:.3}", apex);
    println!("flight_time = {:.3}", time);
    Ok(())
}

fn at(time: f64, shot: &ShotArgs) -> CliResult<()> {
    let settings = shot.settings();
    let forces = ForceModel::new(
        shot.environment()?,
        BodyParameters::new(shot.mass, shot.cd, shot.area)?,
        settings.drag,
    )
    .with_limits(settings.limits);
    let state = evaluate_at(
        DVec2::new(shot.x, shot.y),
        shot.angle.to_radians(),
        shot.speed,
        time,
        &forces,
    )?;
    println!("position = ({:.3}, {:.3})", state.pos.x, state.pos.y);
    println!("velocity = ({:.3}, {:.3})", state.vel.x, state.vel.y);
    println!("speed = {:.3}", state.speed());
    Ok(())
}
