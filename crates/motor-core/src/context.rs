use motor_config::Config;

use crate::args::ProcessArgs;

/// Application identity read from `[config.app]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub title: String,
    pub organization: String,
}

impl Identity {
    /// Extract `app.title` and `app.organization`; missing fields are empty.
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.title().to_string(),
            organization: config.organization().to_string(),
        }
    }
}

/// Facilities the app hands to modules during Awake and Start.
///
/// Modules receive a shared reference instead of reaching for global state.
/// Identity is empty until the configuration has loaded.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    identity: Identity,
    args: ProcessArgs,
}

impl AppContext {
    pub fn new(args: ProcessArgs) -> Self {
        Self {
            identity: Identity::default(),
            args,
        }
    }

    /// Context with a preset identity, for driving a module outside an [`App`](crate::app::App).
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn title(&self) -> &str {
        &self.identity.title
    }

    pub fn organization(&self) -> &str {
        &self.identity.organization
    }

    pub fn args(&self) -> &ProcessArgs {
        &self.args
    }

    pub fn argc(&self) -> usize {
        self.args.argc()
    }

    pub fn argv(&self, index: usize) -> Option<&str> {
        self.args.argv(index)
    }
}
