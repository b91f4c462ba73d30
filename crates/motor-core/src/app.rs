use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use motor_config::{config_path, Config};

use crate::args::ProcessArgs;
use crate::clock::FrameClock;
use crate::context::{AppContext, Identity};
use crate::error::{LifecycleError, Phase};
use crate::frame::{FrameHooks, FrameOutcome, FrameStats, SharedFrameStats};
use crate::module::Module;
use crate::registry::ModuleRegistry;

/// Name of the module queried for the quit signal unless overridden.
pub const DEFAULT_INPUT_MODULE: &str = "input";

/// Where the app is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Modules are being registered.
    Constructed,
    /// Every module woke up.
    Awake,
    /// Every module started.
    Started,
    /// At least one frame has run.
    Running,
    /// Awake or Start aborted; only CleanUp is allowed.
    Failed,
    /// Teardown finished and every module was released.
    CleanedUp,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Constructed => write!(f, "constructed"),
            LifecycleState::Awake => write!(f, "awake"),
            LifecycleState::Started => write!(f, "started"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Failed => write!(f, "failed"),
            LifecycleState::CleanedUp => write!(f, "cleaned up"),
        }
    }
}

/// The lifecycle orchestrator.
///
/// Owns every module and drives them through
/// `Constructed -> Awake -> Started -> Running -> CleanedUp`. Forward phases
/// visit modules in registration order and stop at the first failure without
/// rolling back; [`clean_up`](App::clean_up) visits every module in reverse
/// order no matter what happened before.
pub struct App {
    registry: ModuleRegistry,
    context: AppContext,
    config: Option<Config>,
    config_path: PathBuf,
    state: LifecycleState,
    input_module: &'static str,
    stats: FrameStats,
    published: Option<SharedFrameStats>,
    hooks: Option<Box<dyn FrameHooks>>,
}

type PassFn = fn(&mut dyn Module, f32) -> anyhow::Result<()>;

impl App {
    /// Create an app reading its configuration from [`config_path`].
    pub fn new(args: ProcessArgs) -> Self {
        Self {
            registry: ModuleRegistry::new(),
            context: AppContext::new(args),
            config: None,
            config_path: config_path(),
            state: LifecycleState::Constructed,
            input_module: DEFAULT_INPUT_MODULE,
            stats: FrameStats::default(),
            published: None,
            hooks: None,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Designate the module whose [`Module::quit_requested`] stops the loop.
    pub fn with_input_module(mut self, name: &'static str) -> Self {
        self.input_module = name;
        self
    }

    /// Install extra prepare/finish hooks.
    pub fn with_hooks(mut self, hooks: Box<dyn FrameHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Register a module and run its [`Module::init`].
    ///
    /// Only allowed while the app is still `Constructed`.
    pub fn register<M: Module + 'static>(&mut self, module: M) -> Result<(), LifecycleError> {
        if self.state != LifecycleState::Constructed {
            return Err(LifecycleError::RegistrationClosed(module.name()));
        }
        self.registry.register(Box::new(module))
    }

    /// Load the configuration and wake every module.
    ///
    /// A configuration failure aborts before any module is touched.
    pub fn awake(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(Phase::Awake, &[LifecycleState::Constructed])?;

        let config = match Config::load(&self.config_path) {
            Ok(config) => config,
            Err(err) => {
                let message = format!("{err:#}");
                tracing::error!(
                    path = %self.config_path.display(),
                    error = %message,
                    "could not load configuration"
                );
                self.state = LifecycleState::Failed;
                return Err(LifecycleError::Config(message));
            }
        };

        self.awake_with(config)
    }

    /// Wake every module using an already parsed configuration.
    pub fn awake_with(&mut self, config: Config) -> Result<(), LifecycleError> {
        self.expect_state(Phase::Awake, &[LifecycleState::Constructed])?;

        self.context.set_identity(Identity::from_config(&config));
        tracing::info!(
            title = self.context.title(),
            organization = self.context.organization(),
            modules = self.registry.len(),
            "awakening modules"
        );

        let config = self.config.insert(config);
        let context = &self.context;
        let result = self
            .registry
            .try_for_each(|m| m.awake(config.module(m.name()), context));

        self.finish_phase(Phase::Awake, result, LifecycleState::Awake)
    }

    /// Start every module.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(Phase::Start, &[LifecycleState::Awake])?;

        let context = &self.context;
        let result = self.registry.try_for_each(|m| m.start(context));

        self.finish_phase(Phase::Start, result, LifecycleState::Started)
    }

    /// Run one frame with the given delta time.
    ///
    /// Pass failures are reported as [`FrameOutcome::Failed`], not as an
    /// error; `Err` only means the app is not in a state that runs frames.
    pub fn update(&mut self, dt: f32) -> Result<FrameOutcome, LifecycleError> {
        self.expect_state(
            Phase::Update,
            &[LifecycleState::Started, LifecycleState::Running],
        )?;
        self.state = LifecycleState::Running;

        let frame = self.stats.prepare(dt, Instant::now());
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.prepare(frame);
        }
        self.publish_stats();

        let outcome = if self.quit_requested() {
            tracing::info!(frame, module = self.input_module, "quit requested");
            FrameOutcome::Quit
        } else {
            self.run_passes(frame, dt)
        };

        self.stats.finish(outcome);
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.finish(frame, outcome);
        }
        self.publish_stats();

        Ok(outcome)
    }

    /// Loop frames until the input module requests quit or a pass fails.
    pub fn run(&mut self, clock: &mut FrameClock) -> Result<FrameOutcome, LifecycleError> {
        loop {
            let outcome = self.update(clock.tick())?;
            if outcome.should_stop() {
                tracing::info!(
                    frames = self.stats.frames(),
                    ?outcome,
                    "frame loop stopped"
                );
                return Ok(outcome);
            }
        }
    }

    /// Clean up every module in reverse registration order, then release
    /// them all.
    ///
    /// Each module gets its turn even if an earlier one failed. Calling this
    /// again after it completed does nothing.
    pub fn clean_up(&mut self) -> Result<(), LifecycleError> {
        if self.state == LifecycleState::CleanedUp {
            return Ok(());
        }

        tracing::info!(state = %self.state, modules = self.registry.len(), "cleaning up modules");
        let failures = self.registry.for_each_reverse(|m| m.clean_up());
        for failure in &failures {
            tracing::error!(
                module = failure.module,
                phase = %Phase::CleanUp,
                error = %format!("{:#}", failure.error),
                "module failed to clean up"
            );
        }

        self.registry.clear();
        self.config = None;
        self.state = LifecycleState::CleanedUp;

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::Cleanup {
                failed: failures.into_iter().map(|f| f.module).collect(),
            })
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn title(&self) -> &str {
        self.context.title()
    }

    pub fn organization(&self) -> &str {
        self.context.organization()
    }

    pub fn argc(&self) -> usize {
        self.context.argc()
    }

    pub fn argv(&self, index: usize) -> Option<&str> {
        self.context.argv(index)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Handle to a copy of [`stats`](App::stats) kept current every frame.
    ///
    /// Every call returns the same handle.
    pub fn shared_stats(&mut self) -> SharedFrameStats {
        self.published
            .get_or_insert_with(|| Arc::new(Mutex::new(self.stats.clone())))
            .clone()
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn module(&self, name: &str) -> Option<&dyn Module> {
        self.registry.get(name)
    }

    /// Include or exclude a module from the per-frame passes.
    ///
    /// Returns `false` if no module has that name.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        self.registry.set_active(name, active)
    }

    /// Whether the designated input module currently asks to quit.
    pub fn quit_requested(&self) -> bool {
        self.registry
            .get(self.input_module)
            .is_some_and(|m| m.quit_requested())
    }

    fn run_passes(&mut self, frame: u64, dt: f32) -> FrameOutcome {
        let passes: [(Phase, PassFn); 3] = [
            (Phase::PreUpdate, |m, _| m.pre_update()),
            (Phase::Update, |m, dt| m.update(dt)),
            (Phase::PostUpdate, |m, _| m.post_update()),
        ];

        for (phase, pass) in passes {
            let result = self.registry.try_for_each_active(|m| pass(m, dt));

            if let Err(failure) = result {
                tracing::error!(
                    frame,
                    module = failure.module,
                    %phase,
                    error = %format!("{:#}", failure.error),
                    "frame aborted"
                );
                return FrameOutcome::Failed;
            }
        }

        FrameOutcome::Continue
    }

    fn publish_stats(&self) {
        if let Some(shared) = &self.published {
            if let Ok(mut stats) = shared.lock() {
                stats.clone_from(&self.stats);
            }
        }
    }

    fn expect_state(&self, phase: Phase, allowed: &[LifecycleState]) -> Result<(), LifecycleError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            tracing::warn!(%phase, state = %self.state, "lifecycle transition out of order");
            Err(LifecycleError::OutOfOrder {
                phase,
                state: self.state,
            })
        }
    }

    fn finish_phase(
        &mut self,
        phase: Phase,
        result: Result<(), crate::error::ModuleFailure>,
        next: LifecycleState,
    ) -> Result<(), LifecycleError> {
        match result {
            Ok(()) => {
                tracing::debug!(%phase, "phase complete");
                self.state = next;
                Ok(())
            }
            Err(failure) => {
                tracing::error!(
                    module = failure.module,
                    %phase,
                    error = %format!("{:#}", failure.error),
                    "module failed; aborting phase"
                );
                self.state = LifecycleState::Failed;
                Err(failure.into_lifecycle(phase))
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if self.state != LifecycleState::CleanedUp {
            if let Err(err) = self.clean_up() {
                tracing::warn!(error = %err, "clean up on drop reported failures");
            }
        }
    }
}
