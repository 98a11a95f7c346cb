//! Compilation report: diagnostics plus emitted files

use collection_generator_common::{
    EmissionError, NameCollisionError, NormalizationError, UnsupportedTypeError,
};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Relative output path plus content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub content: String,
}

/// The source file and metadata file of one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedModule {
    pub name: String,
    pub source: EmittedFile,
    pub metadata: EmittedFile,
}

impl EmittedModule {
    pub fn files(&self) -> [&EmittedFile; 2] {
        [&self.source, &self.metadata]
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Document,
    /// Operation label, e.g. `GetWidget (GET /widgets/{id})`
    Operation(String),
    Module(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Document => f.write_str("document"),
            Scope::Operation(label) => write!(f, "operation {}", label),
            Scope::Module(name) => write!(f, "module {}", name),
        }
    }
}

/// Any failure recorded in a report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error(transparent)]
    NameCollision(#[from] NameCollisionError),

    #[error(transparent)]
    Emission(#[from] EmissionError),

    #[error("{0}")]
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub scope: Scope,
    pub error: CompileError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.severity, self.scope, self.error)
    }
}

/// Result of compiling one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub vendor: String,
    pub app: String,
    pub diagnostics: Vec<Diagnostic>,
    pub modules: Vec<EmittedModule>,
    fatal: bool,
}

impl CompileReport {
    pub fn new(vendor: &str, app: &str) -> Self {
        Self {
            vendor: vendor.to_string(),
            app: app.to_string(),
            diagnostics: Vec::new(),
            modules: Vec::new(),
            fatal: false,
        }
    }

    pub fn error(&mut self, scope: Scope, error: impl Into<CompileError>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            scope,
            error: error.into(),
        });
    }

    pub fn warning(&mut self, scope: Scope, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            scope,
            error: CompileError::Notice(message.into()),
        });
    }

    /// Record an error that invalidates the whole document
    ///
    /// Any module emitted so far is discarded.
    pub fn fail(&mut self, scope: Scope, error: impl Into<CompileError>) {
        self.error(scope, error);
        self.modules.clear();
        self.fatal = true;
    }

    pub fn mark_fatal(&mut self) {
        self.modules.clear();
        self.fatal = true;
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// No fatal error and no error-level diagnostic
    pub fn is_success(&self) -> bool {
        !self.fatal && self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Every emitted file, module by module
    pub fn files(&self) -> impl Iterator<Item = &EmittedFile> {
        self.modules.iter().flat_map(|m| m.files())
    }

    /// Directory, relative to the output root, holding this report's modules
    pub fn module_dir(&self) -> PathBuf {
        module_dir(&self.vendor, &self.app)
    }
}

/// `<vendor>/<app>/plugins/modules`
pub fn module_dir(vendor: &str, app: &str) -> PathBuf {
    Path::new(vendor).join(app).join("plugins").join("modules")
}
