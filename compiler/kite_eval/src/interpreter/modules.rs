//! `import` and `export`.

use std::rc::Rc;

use kite_ir::{Name, Stmt};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::environment::Environment;
use crate::errors::{EvalError, EvalResult};
use crate::module::Module;
use crate::value::Value;

impl Interpreter {
    /// Import the module named by `spec`.
    ///
    /// A path already in the session cache returns the cached module without
    /// re-evaluating it. Otherwise the module is registered before its body
    /// runs, so an import cycle sees the partially evaluated module.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn import(&mut self, spec: &str) -> EvalResult {
        let path = self.loader.resolve(spec)?;
        if let Some(module) = self.modules.get(&path) {
            tracing::debug!(path = %path.display(), "module cache hit");
            return Ok(Value::Module(module));
        }
        tracing::debug!(path = %path.display(), "module cache miss");

        let loaded = self.loader.load(&path)?;
        if let Some(source) = loaded.source {
            self.sources.insert(path.clone(), source);
        }
        let module = self
            .modules
            .insert(Module::new(Rc::from(path.as_path()), Environment::new()));
        self.run_module_body(&module, &loaded.program.statements)?;
        Ok(Value::Module(module))
    }

    /// Execute a module's statements in its root environment under a frame
    /// for the module's file.
    pub(crate) fn run_module_body(&mut self, module: &Module, statements: &[Stmt]) -> EvalResult {
        let frame = CallFrame::module(Rc::clone(module.path()));
        let env = module.env().clone();
        self.with_frame(frame, |interp| interp.exec_top_level(statements, &env))
    }

    /// `export(a, b, ...)` in the module that contains the statement.
    ///
    /// Every frame records the file its code was defined in, so a function
    /// exporting from module A still targets A when B's body calls it.
    pub(crate) fn export(&mut self, names: &[Name]) -> Result<(), EvalError> {
        let Some(module) = self.modules.get(&self.current_file()) else {
            return Err(EvalError::new("export outside of a module"));
        };
        for name in names {
            module.export(name)?;
        }
        Ok(())
    }
}
