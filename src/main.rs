use bouncing_balls::state::AppState;
use bouncing_balls::widget::SimulationWidget;
use bouncing_balls::{SimConfig, Simulation};
use clap::Parser;
use druid::{AppLauncher, LocalizedString, PlatformError, WindowDesc};

/// Circles bouncing in a box. Left-drag to throw one, right-click to add one.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Added to vertical velocity every frame
    #[arg(long, default_value_t = 50.0)]
    gravity: f64,

    /// Target frame rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=240))]
    fps: u64,

    /// Seed for spawned bodies; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the debug overlay shown
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            width: self.width,
            height: self.height,
            gravity: self.gravity,
            seed: self.seed,
            ..SimConfig::default()
        }
    }
}

/// Main function
pub fn main() -> Result<(), PlatformError> {
    env_logger::Builder::from_default_env().init();
    let args = Args::parse();
    let config = args.sim_config();
    log::info!(
        "starting {}x{} viewport, gravity {}, {} fps",
        config.width,
        config.height,
        config.gravity,
        args.fps
    );

    let main_window = WindowDesc::new(SimulationWidget::new(Simulation::new(config), args.fps))
        .title(LocalizedString::new("Bouncing Balls"))
        .window_size((args.width, args.height))
        .resizable(false);

    let initial_state = AppState {
        debug: args.debug,
        paused: false,
        body_count: 1,
    };

    AppLauncher::with_window(main_window).launch(initial_state)?;

    Ok(())
}
