use std::fmt;

use crate::app::LifecycleState;

/// A lifecycle phase, used to label failures and log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Awake,
    Start,
    PreUpdate,
    Update,
    PostUpdate,
    CleanUp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Awake => write!(f, "awake"),
            Phase::Start => write!(f, "start"),
            Phase::PreUpdate => write!(f, "pre_update"),
            Phase::Update => write!(f, "update"),
            Phase::PostUpdate => write!(f, "post_update"),
            Phase::CleanUp => write!(f, "clean_up"),
        }
    }
}

/// Why a lifecycle transition did not succeed.
#[derive(Debug)]
pub enum LifecycleError {
    /// The configuration document could not be read or parsed.
    Config(String),
    /// A module callback returned an error.
    Module {
        phase: Phase,
        module: &'static str,
        message: String,
    },
    /// A transition was requested from a state that does not allow it.
    OutOfOrder {
        phase: Phase,
        state: LifecycleState,
    },
    /// A module with the same name is already registered.
    DuplicateModule(&'static str),
    /// Registration was attempted after the app left `Constructed`.
    RegistrationClosed(&'static str),
    /// One or more modules failed to clean up. Teardown still completed.
    Cleanup { failed: Vec<&'static str> },
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration load failed: {msg}"),
            Self::Module {
                phase,
                module,
                message,
            } => write!(f, "module {module} failed during {phase}: {message}"),
            Self::OutOfOrder { phase, state } => {
                write!(f, "cannot run {phase} while the app is {state}")
            }
            Self::DuplicateModule(name) => write!(f, "duplicate module name: {name}"),
            Self::RegistrationClosed(name) => {
                write!(f, "cannot register {name}: registration is closed")
            }
            Self::Cleanup { failed } => {
                write!(f, "clean_up failed for: {}", failed.join(", "))
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

/// A module callback failure reported by the registry iterators.
#[derive(Debug)]
pub struct ModuleFailure {
    pub module: &'static str,
    pub error: anyhow::Error,
}

impl ModuleFailure {
    /// Convert into a [`LifecycleError::Module`] for `phase`.
    pub fn into_lifecycle(self, phase: Phase) -> LifecycleError {
        LifecycleError::Module {
            phase,
            module: self.module,
            message: format!("{:#}", self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Awake.to_string(), "awake");
        assert_eq!(Phase::PreUpdate.to_string(), "pre_update");
        assert_eq!(Phase::CleanUp.to_string(), "clean_up");
    }

    #[test]
    fn module_failure_keeps_context_chain() {
        let failure = ModuleFailure {
            module: "window",
            error: anyhow::anyhow!("no display").context("failed to create window"),
        };
        let err = failure.into_lifecycle(Phase::Awake);
        assert_eq!(
            err.to_string(),
            "module window failed during awake: failed to create window: no display"
        );
    }

    #[test]
    fn cleanup_lists_every_failed_module() {
        let err = LifecycleError::Cleanup {
            failed: vec!["render", "window"],
        };
        assert_eq!(err.to_string(), "clean_up failed for: render, window");
    }

    #[test]
    fn out_of_order_names_phase_and_state() {
        let err = LifecycleError::OutOfOrder {
            phase: Phase::Start,
            state: LifecycleState::Constructed,
        };
        assert_eq!(err.to_string(), "cannot run start while the app is constructed");
    }
}
