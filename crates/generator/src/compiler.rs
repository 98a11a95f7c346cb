//! Compilation driver
//!
//! Runs normalize, build, map, resolve, group and emit over one document and
//! collects everything that went wrong into a [`CompileReport`].

use crate::emitter::ModuleEmitter;
use crate::grouping::group_operations;
use crate::report::{CompileReport, Scope};
use collection_generator_common::{EmissionError, GeneratorConfig, Result};
use collection_generator_parser::{
    build_operations, normalize, normalize_identifier, resolve, SpecDocument, TypeMapper,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Compiles specification documents into module files
///
/// Holds no mutable state, so one compiler can serve several threads.
pub struct Compiler {
    emitter: ModuleEmitter,
}

impl Compiler {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let emitter = ModuleEmitter::new(config)?;
        Ok(Self { emitter })
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.emitter.config()
    }

    /// Compile one vendor/app document
    ///
    /// `vendor` and `app` end up in Python import paths and argument names,
    /// so they are normalized to identifiers first.
    pub fn compile(&self, doc: &SpecDocument, vendor: &str, app: &str) -> CompileReport {
        let (vendor_id, app_id) = (normalize_identifier(vendor), normalize_identifier(app));
        let mut report = CompileReport::new(&vendor_id, &app_id);
        for (raw, normalized) in [(vendor, &vendor_id), (app, &app_id)] {
            if raw != normalized.as_str() {
                report.warning(
                    Scope::Document,
                    format!("namespace '{}' normalized to '{}'", raw, normalized),
                );
            }
        }
        let (vendor, app) = (vendor_id.as_str(), app_id.as_str());
        let grouping = self.config().layout.grouping;

        let spec = match normalize(doc) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(vendor, app, error = %e, "document rejected");
                report.fail(Scope::Document, e);
                return report;
            }
        };

        let operations = build_operations(&spec, vendor, app, &self.config().naming);
        if operations.is_empty() {
            report.warning(Scope::Document, "document declares no operations");
            return report;
        }

        let mut mapped = Vec::with_capacity(operations.len());
        for operation in operations {
            let label = operation.label();
            match TypeMapper::map_operation(operation) {
                Ok(m) => mapped.push(m),
                Err(e) => {
                    warn!(operation = %label, error = %e, "skipping operation");
                    report.error(Scope::Operation(label), e);
                }
            }
        }
        debug!(mapped = mapped.len(), "mapped operation types");

        let candidates = mapped.len();
        let resolution = resolve(mapped, &self.config().naming, grouping);
        for rejected in resolution.rejected {
            report.error(Scope::Operation(rejected.operation), rejected.error);
        }
        if candidates > 0 && resolution.operations.is_empty() {
            warn!(vendor, app, "every operation failed name resolution");
            report.mark_fatal();
            return report;
        }

        for group in group_operations(resolution.operations, grouping) {
            match self.emitter.emit(&group) {
                Ok(module) => report.modules.push(module),
                Err(e) => {
                    warn!(module = %group.module_name, error = %e, "module not emitted");
                    report.error(Scope::Module(group.module_name.clone()), e);
                }
            }
        }

        if let Some(path) = duplicate_path(&report) {
            report.fail(Scope::Document, EmissionError::DuplicatePath { path });
            return report;
        }

        info!(
            vendor,
            app,
            grouping = %grouping,
            modules = report.modules.len(),
            errors = report.errors().count(),
            "compiled document"
        );
        report
    }
}

fn duplicate_path(report: &CompileReport) -> Option<String> {
    let mut seen = BTreeSet::new();
    report
        .files()
        .find(|file| !seen.insert(file.path.clone()))
        .map(|file| file.path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CompileError, EmittedFile, EmittedModule};
    use collection_generator_common::NormalizationError;
    use serde_json::json;
    use std::path::PathBuf;

    fn compiler() -> Compiler {
        Compiler::new(GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_compiler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compiler>();
    }

    #[test]
    fn test_missing_paths_is_fatal() {
        let doc = SpecDocument::from_value(json!({"swagger": "2.0"}));
        let report = compiler().compile(&doc, "acme", "widgets");

        assert!(report.is_fatal());
        assert_eq!(report.files().count(), 0);
        assert!(matches!(
            report.diagnostics[0].error,
            CompileError::Normalization(NormalizationError::UnsupportedSpec { .. })
        ));
    }

    #[test]
    fn test_namespace_is_normalized() {
        let doc = SpecDocument::from_value(json!({
            "swagger": "2.0",
            "paths": {"/widgets": {"get": {"operationId": "listWidgets"}}}
        }));
        let report = compiler().compile(&doc, "acme", "my-app");

        assert!(report.is_success());
        assert_eq!(report.app, "my_app");
        assert_eq!(report.warnings().count(), 1);

        let source = &report.modules[0].source.content;
        assert!(source.contains("ansible_collections.acme.my_app.plugins.module_utils.my_app"));
        assert!(source.contains("my_app_hostname=module.params[\"my_app_hostname\"]"));
        assert!(!source.contains("my-app"));
        assert_eq!(
            report.modules[0].source.path,
            PathBuf::from("acme/my_app/plugins/modules/widgets.py")
        );
    }

    #[test]
    fn test_empty_document_warns() {
        let doc = SpecDocument::from_value(json!({"swagger": "2.0", "paths": {}}));
        let report = compiler().compile(&doc, "acme", "widgets");

        assert!(report.is_success());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_every_operation_colliding_is_fatal() {
        let doc = SpecDocument::from_value(json!({
            "swagger": "2.0",
            "paths": {
                "/users": {"get": {"operationId": "List-Users"}},
                "/people": {"get": {"operationId": "list_users"}}
            }
        }));
        let config = GeneratorConfig::default()
            .with_grouping(collection_generator_common::GroupingPolicy::PerOperation);
        let report = Compiler::new(config).unwrap().compile(&doc, "acme", "widgets");

        assert!(report.is_fatal());
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.files().count(), 0);
    }

    #[test]
    fn test_duplicate_path_detection() {
        let file = EmittedFile {
            path: PathBuf::from("acme/widgets/plugins/modules/a.py"),
            content: String::new(),
        };
        let mut report = CompileReport::new("acme", "widgets");
        for _ in 0..2 {
            report.modules.push(EmittedModule {
                name: "a".to_string(),
                source: file.clone(),
                metadata: EmittedFile {
                    path: PathBuf::from("acme/widgets/plugins/modules/a.json"),
                    content: String::new(),
                },
            });
        }
        assert_eq!(
            duplicate_path(&report),
            Some("acme/widgets/plugins/modules/a.py".to_string())
        );
    }
}
