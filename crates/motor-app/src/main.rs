use std::process::ExitCode;

use motor_core::{
    app::App,
    args::ProcessArgs,
    clock::FrameClock,
    error::LifecycleError,
    logging::{self, LogBuffer},
};
use motor_mod_input::InputModule;
use motor_mod_render::RenderModule;
use motor_mod_stats::StatsModule;

const TARGET_FPS: u32 = 60;

/// Register the reference modules. Render goes last so it draws after every
/// other module has finished its frame.
fn build_app(log_buffer: LogBuffer) -> Result<App, LifecycleError> {
    let mut app = App::new(ProcessArgs::from_env());

    let stats = StatsModule::new();
    let metrics = stats.metrics();
    let frame_stats = app.shared_stats();

    app.register(InputModule::new())?;
    app.register(stats)?;
    app.register(RenderModule::new(metrics, frame_stats, log_buffer))?;
    Ok(app)
}

fn run(app: &mut App) -> Result<(), LifecycleError> {
    app.awake()?;
    app.start()?;
    let outcome = app.run(&mut FrameClock::capped(TARGET_FPS))?;
    tracing::info!(
        ?outcome,
        frames = app.stats().frames(),
        fps = app.stats().fps(),
        "frame loop finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let log_buffer = logging::init();
    tracing::info!("Motor starting up");

    let mut app = match build_app(log_buffer) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "failed to construct app");
            eprintln!("motor: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(&mut app);

    // Always torn down, also after a failed Awake or Start.
    let cleanup = app.clean_up();
    drop(app);

    if let Err(err) = cleanup {
        eprintln!("motor: {err}");
    }

    match result {
        Ok(()) => {
            tracing::info!("Motor shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "fatal lifecycle error");
            eprintln!("motor: fatal: {err}");
            ExitCode::FAILURE
        }
    }
}
