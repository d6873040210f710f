use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use glide_sim::dynamics::state::SimConfig;
use glide_sim::io::{write_history_file, write_summary_file, FlightSummary};
use glide_sim::physics::atmosphere;
use glide_sim::sim::{simulate, EventKind, Release};
use glide_sim::tracker::TrackerConfig;

/// Simulate one glide bomb release and report its time to impact.
#[derive(Debug, Parser)]
#[command(name = "glide-sim", version)]
struct Args {
    /// Release altitude, m
    #[arg(long, default_value_t = 9000.0)]
    altitude: f64,

    /// True airspeed at release, km/h
    #[arg(long, default_value_t = 950.0)]
    tas: f64,

    /// Ground range to the target, m
    #[arg(long, default_value_t = 15_000.0)]
    range: f64,

    /// Write the sampled trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let config = SimConfig::default();
    let sound_speed = atmosphere::sound_speed(args.altitude);
    let release = Release::new(args.altitude, args.tas / 3.6 / sound_speed, args.range);

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let traj = simulate(&release, &config)?;
    let summary = FlightSummary::from_trajectory(&traj);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  GLIDE BOMB RELEASE  {}  ({})", traj.mode(), traj.profile.name);
    println!("====================================================================");
    println!();
    println!("  Release");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Altitude:      {:>8.0} m     TAS:          {:>8.0} km/h",
        release.altitude, args.tas
    );
    println!(
        "  Mach:          {:>8.3}       Range:        {:>8.0} m",
        release.mach, release.target_range
    );
    println!(
        "  LOS:           {:>8.2} deg   Glide ratio:  {:>8.2}",
        traj.classification.los_deg, traj.classification.glide_ratio
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &traj.events {
        let label = match &e.kind {
            EventKind::Release => "RELEASE".to_string(),
            EventKind::PhaseChange { from, to } => format!("{from} -> {to}"),
            EventKind::Impact => "IMPACT".to_string(),
            EventKind::TimeLimit => "TIME LIMIT".to_string(),
        };
        println!(
            "  {:<20} t={:>6.2}s   x={:>8.0}m   alt={:>7.0}m   vel={:>6.1}m/s",
            label,
            e.time,
            e.state.downrange(),
            e.state.altitude(),
            e.state.speed()
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Time to impact:{:>8.1} s   (raw {:.1} s, margin ±{:.1} s)",
        traj.flight_time,
        traj.raw_time,
        traj.flight_time * TrackerConfig::default().tti_error_fraction
    );
    println!("  Impact point:  {:>8.0} m", traj.terminal_distance);
    println!(
        "  Max speed:     {:>8.1} m/s   Impact speed: {:>6.1} m/s",
        summary.max_speed_ms, summary.impact_speed_ms
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>8}  {:>7}  {:>7}  {:>9}",
        "t (s)", "x (m)", "alt (m)", "vel(m/s)", "gam(°)", "aoa(°)", "phase"
    );
    println!("  {}", "─".repeat(66));

    let n = traj.history.len();
    let interval = (n / 30).max(1);
    for (i, s) in traj.history.iter().enumerate() {
        if i % interval != 0 && i + 1 != n {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.0}  {:>9.0}  {:>8.1}  {:>7.2}  {:>7.2}  {:>9}",
            s.time,
            s.distance,
            s.altitude,
            s.speed,
            s.flight_path_angle.to_degrees(),
            s.aoa.to_degrees(),
            s.phase
        );
    }
    println!();
    println!("  Simulation: {} samples, dt={} s", n, config.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        write_history_file(path, &traj.history)?;
        println!("  wrote {}", path.display());
    }
    if let Some(path) = &args.json {
        write_summary_file(path, &summary)?;
        println!("  wrote {}", path.display());
    }

    Ok(())
}
