//! Module resolution and loading.
//!
//! The interpreter never touches the filesystem itself: `import` asks the
//! configured `ModuleLoader` to resolve the argument to an absolute path and,
//! on a cache miss, to produce the parsed program. Parsing belongs to the
//! host, which plugs in a `SourceParser`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use kite_ir::Program;

use crate::errors::{module_not_found, EvalError, EvalErrorKind};

/// Extension appended to import paths that lack it.
pub const DEFAULT_EXTENSION: &str = "kite";

/// Error during module resolution or loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no module found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("imports are not enabled (requested '{0}')")]
    Disabled(String),
}

impl From<LoadError> for EvalError {
    fn from(err: LoadError) -> Self {
        let kind = match err {
            LoadError::NotFound(path) => return module_not_found(&path.display().to_string()),
            LoadError::Disabled(spec) => return module_not_found(&spec),
            LoadError::Io { path, source } => EvalErrorKind::Io {
                path: path.display().to_string(),
                message: source.to_string(),
            },
            LoadError::Parse { path, message } => EvalErrorKind::Parse {
                path: path.display().to_string(),
                message,
            },
        };
        EvalError::from_kind(kind)
    }
}

/// A parsed module ready for evaluation.
pub struct LoadedModule {
    pub program: Program,
    /// Source text, for traceback rendering.
    pub source: Option<Rc<str>>,
}

/// Turns source text into a program. Implemented by the host's parser.
pub trait SourceParser {
    fn parse(&self, path: &Path, source: &str) -> Result<Program, String>;
}

impl<F> SourceParser for F
where
    F: Fn(&Path, &str) -> Result<Program, String>,
{
    fn parse(&self, path: &Path, source: &str) -> Result<Program, String> {
        self(path, source)
    }
}

/// Strategy for resolving and loading imported modules.
pub trait ModuleLoader {
    /// Resolve an `import` argument to the absolute path that identifies the
    /// module, checking that it exists.
    fn resolve(&self, spec: &str) -> Result<PathBuf, LoadError>;

    /// Load and parse the module at a resolved path.
    fn load(&self, path: &Path) -> Result<LoadedModule, LoadError>;
}

fn with_extension(spec: &str, extension: &str) -> String {
    let suffix = format!(".{extension}");
    if spec.ends_with(&suffix) {
        spec.to_string()
    } else {
        format!("{spec}{suffix}")
    }
}

/// Default loader: refuses every import.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoModuleLoader;

impl ModuleLoader for NoModuleLoader {
    fn resolve(&self, spec: &str) -> Result<PathBuf, LoadError> {
        Err(LoadError::Disabled(spec.to_string()))
    }

    fn load(&self, path: &Path) -> Result<LoadedModule, LoadError> {
        Err(LoadError::NotFound(path.to_path_buf()))
    }
}

/// Filesystem loader.
///
/// Relative paths resolve against `root` (the process working directory
/// unless set). Resolved paths are canonical, so `./lib` and `lib.kite` name
/// the same module.
pub struct FsModuleLoader<P> {
    parser: P,
    root: Option<PathBuf>,
    extension: String,
}

impl<P: SourceParser> FsModuleLoader<P> {
    pub fn new(parser: P) -> Self {
        FsModuleLoader {
            parser,
            root: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Base directory for relative import paths.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Extension appended to import paths (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn base(&self) -> Result<PathBuf, LoadError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|source| LoadError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}

impl<P: SourceParser> ModuleLoader for FsModuleLoader<P> {
    fn resolve(&self, spec: &str) -> Result<PathBuf, LoadError> {
        let file = with_extension(spec, &self.extension);
        let path = Path::new(&file);
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base()?.join(path)
        };
        match fs::canonicalize(&joined) {
            Ok(resolved) if resolved.is_file() => Ok(resolved),
            Ok(_) => Err(LoadError::NotFound(joined)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound(joined)),
            Err(source) => Err(LoadError::Io {
                path: joined,
                source,
            }),
        }
    }

    fn load(&self, path: &Path) -> Result<LoadedModule, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = self
            .parser
            .parse(path, &source)
            .map_err(|message| LoadError::Parse {
                path: path.to_path_buf(),
                message,
            })?;
        Ok(LoadedModule {
            program,
            source: Some(Rc::from(source)),
        })
    }
}

/// In-memory loader for hosts that hold pre-parsed modules.
///
/// Modules live under a virtual root (`/` by default).
pub struct MemoryModuleLoader {
    root: PathBuf,
    extension: String,
    modules: FxHashMap<PathBuf, (Program, Option<Rc<str>>)>,
}

impl Default for MemoryModuleLoader {
    fn default() -> Self {
        MemoryModuleLoader {
            root: PathBuf::from("/"),
            extension: DEFAULT_EXTENSION.to_string(),
            modules: FxHashMap::default(),
        }
    }
}

impl MemoryModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module under `name` (extension optional).
    #[must_use]
    pub fn with_module(mut self, name: &str, program: Program) -> Self {
        let path = self.path_for(name);
        self.modules.insert(path, (program, None));
        self
    }

    /// Add a module together with its source text.
    #[must_use]
    pub fn with_source(mut self, name: &str, program: Program, source: &str) -> Self {
        let path = self.path_for(name);
        self.modules.insert(path, (program, Some(Rc::from(source))));
        self
    }

    fn path_for(&self, spec: &str) -> PathBuf {
        let file = with_extension(spec, &self.extension);
        let path = Path::new(&file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn resolve(&self, spec: &str) -> Result<PathBuf, LoadError> {
        let path = self.path_for(spec);
        if self.modules.contains_key(&path) {
            Ok(path)
        } else {
            Err(LoadError::NotFound(path))
        }
    }

    fn load(&self, path: &Path) -> Result<LoadedModule, LoadError> {
        match self.modules.get(path) {
            Some((program, source)) => Ok(LoadedModule {
                program: program.clone(),
                source: source.clone(),
            }),
            None => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }
}
