//! Modules and the module cache.
//!
//! A module is identified by the absolute path of its source file. The cache
//! is owned by one interpreter session: a module is registered before its
//! body runs (so a circular import sees the partially evaluated module instead
//! of recursing) and is never evicted.

mod loader;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use kite_ir::Name;

use crate::environment::Environment;
use crate::errors::{no_such_attribute, undefined_name, EvalError, EvalResult};

pub use loader::{
    FsModuleLoader, LoadError, LoadedModule, MemoryModuleLoader, ModuleLoader, NoModuleLoader,
    SourceParser, DEFAULT_EXTENSION,
};

/// Module data.
pub struct ModuleValue {
    path: Rc<Path>,
    env: Environment,
    exports: RefCell<FxHashSet<Name>>,
}

/// Shared handle to a module.
#[derive(Clone)]
pub struct Module(Rc<ModuleValue>);

impl Module {
    /// Create a module with an empty export set.
    pub fn new(path: Rc<Path>, env: Environment) -> Module {
        Module(Rc::new(ModuleValue {
            path,
            env,
            exports: RefCell::new(FxHashSet::default()),
        }))
    }

    pub fn path(&self) -> &Rc<Path> {
        &self.0.path
    }

    /// Root environment of the module.
    pub fn env(&self) -> &Environment {
        &self.0.env
    }

    pub fn ptr_eq(&self, other: &Module) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Mark a top-level name as visible to importers.
    ///
    /// The name must already be bound in the module's root scope.
    pub fn export(&self, name: &Name) -> Result<(), EvalError> {
        if self.0.env.lookup_local(name.as_str()).is_none() {
            return Err(undefined_name(name.as_str()));
        }
        self.0.exports.borrow_mut().insert(name.clone());
        Ok(())
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.0.exports.borrow().contains(name)
    }

    /// Exported names, sorted.
    pub fn exported_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.0.exports.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Attribute read: only exported names are visible.
    pub fn get_attribute(&self, name: &str) -> EvalResult {
        if !self.is_exported(name) {
            return Err(no_such_attribute("module", name));
        }
        self.0
            .env
            .lookup_local(name)
            .ok_or_else(|| undefined_name(name))
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<module {}>", self.0.path.display())
    }
}

/// Modules of one session, keyed by absolute path.
#[derive(Default)]
pub struct ModuleCache {
    modules: FxHashMap<PathBuf, Module>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Module> {
        self.modules.get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    /// Register a module. An existing entry for the same path is kept.
    pub fn insert(&mut self, module: Module) -> Module {
        let path = module.path().to_path_buf();
        self.modules.entry(path).or_insert(module).clone()
    }

    /// Find the module whose root environment is `env`.
    pub fn find_by_env(&self, env: &Environment) -> Option<Module> {
        self.modules
            .values()
            .find(|module| module.env().ptr_eq(env))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
