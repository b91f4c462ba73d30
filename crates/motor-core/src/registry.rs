use std::collections::HashMap;

use crate::error::{LifecycleError, ModuleFailure};
use crate::module::Module;

struct Entry {
    module: Box<dyn Module>,
    active: bool,
}

/// Ordered owner of every registered module.
///
/// Registration order is the forward order used by Awake, Start and the
/// per-frame passes; its exact reverse is the teardown order. There is no
/// removal: the composition is fixed once the app is constructed.
pub struct ModuleRegistry {
    entries: Vec<Entry>,
    index: HashMap<&'static str, usize>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a module and call its [`Module::init`].
    ///
    /// The module starts active. A duplicate name is rejected before `init`
    /// runs.
    pub fn register(&mut self, mut module: Box<dyn Module>) -> Result<(), LifecycleError> {
        let name = module.name();
        if self.index.contains_key(name) {
            return Err(LifecycleError::DuplicateModule(name));
        }
        module.init();
        self.index.insert(name, self.entries.len());
        self.entries.push(Entry {
            module,
            active: true,
        });
        tracing::debug!(module = name, position = self.entries.len(), "module registered");
        Ok(())
    }

    /// Call `f` on every module in registration order, stopping at the first
    /// error.
    pub fn try_for_each<F>(&mut self, mut f: F) -> Result<(), ModuleFailure>
    where
        F: FnMut(&mut dyn Module) -> anyhow::Result<()>,
    {
        for entry in &mut self.entries {
            let name = entry.module.name();
            f(entry.module.as_mut()).map_err(|error| ModuleFailure { module: name, error })?;
        }
        Ok(())
    }

    /// Like [`try_for_each`](Self::try_for_each) but skips inactive modules.
    pub fn try_for_each_active<F>(&mut self, mut f: F) -> Result<(), ModuleFailure>
    where
        F: FnMut(&mut dyn Module) -> anyhow::Result<()>,
    {
        for entry in self.entries.iter_mut().filter(|e| e.active) {
            let name = entry.module.name();
            f(entry.module.as_mut()).map_err(|error| ModuleFailure { module: name, error })?;
        }
        Ok(())
    }

    /// Call `f` on every module in reverse registration order.
    ///
    /// Never stops early; every failure is collected and returned in the
    /// order it occurred.
    pub fn for_each_reverse<F>(&mut self, mut f: F) -> Vec<ModuleFailure>
    where
        F: FnMut(&mut dyn Module) -> anyhow::Result<()>,
    {
        let mut failures = Vec::new();
        for entry in self.entries.iter_mut().rev() {
            let name = entry.module.name();
            if let Err(error) = f(entry.module.as_mut()) {
                failures.push(ModuleFailure { module: name, error });
            }
        }
        failures
    }

    /// Drop every module, last registered first.
    pub fn clear(&mut self) {
        while let Some(entry) = self.entries.pop() {
            tracing::trace!(module = entry.module.name(), "module released");
        }
        self.index.clear();
    }

    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.index.get(name).map(|&i| &*self.entries[i].module)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Module + 'static)> {
        self.index
            .get(name)
            .copied()
            .map(|i| &mut *self.entries[i].module)
    }

    /// Toggle a module's participation in the per-frame passes.
    ///
    /// Returns `false` if no module has that name.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.index.get(name).copied() {
            Some(i) => {
                self.entries[i].active = active;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, name: &str) -> Option<bool> {
        self.index.get(name).map(|&i| self.entries[i].active)
    }

    /// Module names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.module.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
