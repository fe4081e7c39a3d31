//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::class::Class;
use crate::diagnostics::{CallStack, SourceMap};
use crate::module::{ModuleCache, ModuleLoader, NoModuleLoader};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Call depth at which a script is stopped with a recursion error.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Builder for creating Interpreter instances with various configurations.
///
/// ```text
/// let mut interp = InterpreterBuilder::new()
///     .print_handler(buffer_handler())
///     .module_loader(FsModuleLoader::new(parse).with_root("scripts"))
///     .build();
/// ```
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    module_loader: Option<Box<dyn ModuleLoader>>,
    max_recursion_depth: Option<usize>,
}

impl InterpreterBuilder {
    /// Create a builder with stdout printing, imports disabled and the
    /// default recursion limit.
    pub fn new() -> Self {
        Self {
            print_handler: None,
            module_loader: None,
            max_recursion_depth: Some(DEFAULT_MAX_RECURSION_DEPTH),
        }
    }

    /// Set the print handler used by the `print` builtin.
    ///
    /// Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set how `import(...)` resolves and parses modules.
    ///
    /// Default refuses every import.
    #[must_use]
    pub fn module_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.module_loader = Some(Box::new(loader));
        self
    }

    /// Set the maximum call depth; `None` removes the limit.
    #[must_use]
    pub fn max_recursion_depth(mut self, depth: Option<usize>) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter {
        Interpreter {
            root_class: Class::root(),
            modules: ModuleCache::new(),
            call_stack: CallStack::new(self.max_recursion_depth),
            sources: SourceMap::new(),
            loader: self
                .module_loader
                .unwrap_or_else(|| Box::new(NoModuleLoader)),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            exception_trace: None,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
