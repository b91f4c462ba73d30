use anyhow::Result;
use motor_config::ConfigNode;

use crate::context::AppContext;

/// A subsystem driven by the [`crate::app::App`] lifecycle.
///
/// Modules are registered once at construction and owned by the
/// [`crate::registry::ModuleRegistry`]. The orchestrator calls them in
/// registration order for every forward phase and in reverse order for
/// [`clean_up`](Module::clean_up), so a module that produces a resource must
/// be registered before the modules consuming it.
///
/// Every callback except [`name`](Module::name) has a no-op default.
pub trait Module {
    /// Unique identifier. Also the key of the module's configuration table.
    fn name(&self) -> &'static str;

    /// Called once, synchronously, at registration time.
    ///
    /// No configuration is available yet and sibling modules may not exist.
    fn init(&mut self) {}

    /// Acquire resources. Called once after every module is registered.
    ///
    /// `config` is the `[config.<name>]` table, empty if the document has none.
    fn awake(&mut self, _config: ConfigNode<'_>, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    /// Cross-module wiring. Called once after every module has awoken.
    fn start(&mut self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    fn pre_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Per-frame work. `dt` is the elapsed time of the frame in seconds.
    fn update(&mut self, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn post_update(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release resources. A failure here does not stop the other modules
    /// from cleaning up.
    fn clean_up(&mut self) -> Result<()> {
        Ok(())
    }

    /// Return `true` to stop the frame loop.
    ///
    /// Only queried on the module designated as the input module.
    fn quit_requested(&self) -> bool {
        false
    }
}
