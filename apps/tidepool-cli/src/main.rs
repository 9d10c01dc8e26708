use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use tidepool_assets::ScenarioConfig;
use tidepool_kernel::{ChainAnimator, FrameDriver, Joint, SimulationState};
use tidepool_render::{DebugTextRenderer, RenderView, Renderer};
use tidepool_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

/// Milliseconds fed to the chain's wall clock per headless tick. Desktop
/// samples real time; headless runs use a tick-derived value so they
/// reproduce exactly.
const SYNTHETIC_FRAME_MS: f64 = 16.0;

#[derive(Parser)]
#[command(name = "tidepool-cli", about = "Headless tidepool operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Step a scenario headlessly and print the scene
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "240")]
        ticks: u64,
        /// Scenario file (YAML); built-in defaults are used when absent
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Print a summary every N ticks (0 = only at the end)
        #[arg(long, default_value = "0")]
        every: u64,
    },
    /// Pose a synthetic chain and dump joint angles per tick
    Chain {
        /// Number of joints in the synthetic chain
        #[arg(short, long, default_value = "8")]
        joints: usize,
        /// Number of ticks to pose
        #[arg(short, long, default_value = "10")]
        ticks: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tidepool-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", tidepool_render::crate_info());
            println!("assets: {}", tidepool_assets::crate_info());
            println!("ecs: {}", tidepool_ecs::crate_info());
            println!("input: {}", tidepool_input::crate_info());
            println!("tools: {}", tidepool_tools::crate_info());
        }
        Commands::Run {
            ticks,
            scenario,
            every,
        } => {
            let scenario = match scenario {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "loading scenario");
                    ScenarioConfig::load(&path)?
                }
                None => ScenarioConfig::default(),
            };
            println!(
                "Running {} bodies for {ticks} ticks (seed={})",
                scenario.bodies, scenario.seed
            );

            let mut state = SimulationState::default();
            state.swarm.spawn_scattered(
                scenario.bodies,
                scenario.seed,
                scenario.spread,
                Vec3::splat(scenario.half_extent),
            );
            let mut driver = FrameDriver::new(state);

            for tick in 0..ticks {
                driver.tick(tick as f64 * SYNTHETIC_FRAME_MS);
                if every > 0 && driver.ticks() % every == 0 {
                    println!("{}", SceneInspector::summary(&driver));
                }
            }

            let renderer = DebugTextRenderer::new();
            print!("{}", renderer.render(driver.state(), &RenderView::default()));
            println!("{}", SceneInspector::summary(&driver));
        }
        Commands::Chain { joints, ticks } => {
            let mut chain = ChainAnimator::new();
            chain.install(
                (0..joints)
                    .map(|i| Joint::named(format!("seg_{i}")))
                    .collect(),
            );

            for tick in 0..ticks {
                chain.step(tick as f64 * SYNTHETIC_FRAME_MS);
                println!("t={:.3}", chain.sim_time());
                for (index, joint) in chain.joints().iter().enumerate() {
                    let (axis, angle) = joint.local_orientation.to_axis_angle();
                    println!(
                        "  {index} '{}' angle={:.4} axis=({:.2}, {:.2}, {:.2})",
                        joint.name, angle, axis.x, axis.y, axis.z
                    );
                }
            }
        }
    }

    Ok(())
}
