//! Collision-free identifiers for modules, entry points and parameters
//!
//! Resolution only looks at the set of operations, so shuffling the input
//! never changes which names an operation receives.

use collection_generator_common::{
    GroupingPolicy, MappedOperation, NameCollisionError, NamingConfig, Parameter,
    ResolvedOperation,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

/// Identifiers that cannot be used as generated argument names
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "false", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "none", "nonlocal", "not", "or", "pass", "raise", "return", "true", "try", "while",
    "with", "yield",
];

/// Argument selecting the entry point of a per-resource module
pub const STATE_ARGUMENT: &str = "state";

/// Connection arguments injected into every module of an app
pub fn connection_arguments(app: &str) -> [String; 3] {
    [
        format!("{}_hostname", app),
        format!("{}_username", app),
        format!("{}_password", app),
    ]
}

/// Normalize a name into a lower-case identifier
///
/// # Examples
/// ```
/// use collection_generator_parser::normalize_identifier;
///
/// assert_eq!(normalize_identifier("GetWidget"), "get_widget");
/// assert_eq!(normalize_identifier("List-Users"), "list_users");
/// assert_eq!(normalize_identifier("2fa.code"), "n2fa_code");
/// ```
pub fn normalize_identifier(name: &str) -> String {
    let snake = split_camel_case(name);
    let collapsed = SEPARATORS.replace_all(&snake, "_");
    let trimmed = collapsed.trim_matches('_');

    match trimmed.chars().next() {
        None => "unnamed".to_string(),
        Some(first) if first.is_ascii_digit() => format!("n{}", trimmed),
        Some(_) => trimmed.to_string(),
    }
}

/// Convert PascalCase or camelCase to lower snake_case
fn split_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            // HTTPServer -> http_server, widgetId -> widget_id
            let boundary = i > 0
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || (chars[i - 1].is_uppercase()
                        && i + 1 < chars.len()
                        && chars[i + 1].is_lowercase()));
            if boundary {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Outcome of name resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Operations that received collision-free names, in input order
    pub operations: Vec<ResolvedOperation>,
    /// Operations dropped because their names could not be disambiguated
    pub rejected: Vec<RejectedOperation>,
}

/// An operation that failed name resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedOperation {
    /// Diagnostic label of the operation
    pub operation: String,
    pub error: NameCollisionError,
}

/// Assigns module, entry point and parameter names
pub struct NameResolver<'a> {
    naming: &'a NamingConfig,
    grouping: GroupingPolicy,
}

/// Name resolution target of one operation
#[derive(Debug, Clone)]
struct Target {
    module: String,
    entry_point: String,
}

impl<'a> NameResolver<'a> {
    pub fn new(naming: &'a NamingConfig, grouping: GroupingPolicy) -> Self {
        Self { naming, grouping }
    }

    /// Resolve every operation
    pub fn resolve(&self, operations: Vec<MappedOperation>) -> Resolution {
        let mut targets: Vec<Target> = operations.iter().map(|op| self.target(op)).collect();

        // First collision: suffix every member of the group with its action
        for group in colliding_groups(&targets, self.grouping) {
            for index in group {
                let action = operations[index].operation.action.as_str();
                let suffixed = format!("{}_{}", targets[index].module, action);
                targets[index].module = normalize_identifier(&suffixed);
            }
        }

        // Second collision: every operation involved fails
        let mut failures: BTreeMap<usize, NameCollisionError> = BTreeMap::new();
        for group in colliding_groups(&targets, self.grouping) {
            let mut names: Vec<String> = group
                .iter()
                .map(|&index| self.source_name(&operations[index]))
                .collect();
            names.sort();

            let error = NameCollisionError {
                names,
                path: targets[group[0]].module.clone(),
            };
            for index in group {
                failures.insert(index, error.clone());
            }
        }

        let mut resolution = Resolution::default();
        for (index, (mapped, target)) in operations.into_iter().zip(targets).enumerate() {
            let label = mapped.operation.label();
            let outcome = match failures.remove(&index) {
                Some(error) => Err(error),
                None => self.resolve_parameters(mapped, target),
            };

            match outcome {
                Ok(resolved) => {
                    debug!(
                        operation = %label,
                        module = %resolved.module_name,
                        entry_point = %resolved.entry_point,
                        "resolved names"
                    );
                    resolution.operations.push(resolved);
                }
                Err(error) => {
                    warn!(operation = %label, error = %error, "name resolution failed");
                    resolution.rejected.push(RejectedOperation {
                        operation: label,
                        error,
                    });
                }
            }
        }

        resolution
    }

    fn target(&self, mapped: &MappedOperation) -> Target {
        let operation = &mapped.operation;
        let entry_point = operation.action.as_str().to_string();

        let module = match self.grouping {
            GroupingPolicy::PerResource => normalize_identifier(&operation.resource),
            GroupingPolicy::PerOperation => match &operation.operation_id {
                Some(id) => normalize_identifier(id),
                None => normalize_identifier(&format!("{}_{}", operation.resource, entry_point)),
            },
        };

        Target {
            module,
            entry_point,
        }
    }

    /// Name the operation was declared under, for collision reports
    fn source_name(&self, mapped: &MappedOperation) -> String {
        let operation = &mapped.operation;
        match (self.grouping, &operation.operation_id) {
            (GroupingPolicy::PerOperation, Some(id)) => id.clone(),
            _ => format!("{} {}", operation.action.as_str().to_uppercase(), operation.path),
        }
    }

    fn resolve_parameters(
        &self,
        mut mapped: MappedOperation,
        target: Target,
    ) -> Result<ResolvedOperation, NameCollisionError> {
        let reserved = self.reserved_words(&mapped.operation.app);
        resolve_scope(&mut mapped.parameters, &target.module, &reserved)?;

        Ok(ResolvedOperation {
            module_name: target.module,
            entry_point: target.entry_point,
            mapped,
        })
    }

    fn reserved_words(&self, app: &str) -> BTreeSet<String> {
        PYTHON_KEYWORDS
            .iter()
            .map(|w| w.to_string())
            .chain(std::iter::once(STATE_ARGUMENT.to_string()))
            .chain(connection_arguments(&normalize_identifier(app)))
            .chain(self.naming.reserved_words.iter().map(|w| normalize_identifier(w)))
            .collect()
    }
}

/// Convenience wrapper around [`NameResolver::resolve`]
pub fn resolve(
    operations: Vec<MappedOperation>,
    naming: &NamingConfig,
    grouping: GroupingPolicy,
) -> Resolution {
    NameResolver::new(naming, grouping).resolve(operations)
}

/// Indices of operations sharing a target, sorted by target
///
/// Per-resource modules hold one entry point per action, so only the pair
/// collides there; per-operation modules must be unique on their own.
fn colliding_groups(targets: &[Target], grouping: GroupingPolicy) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<(&str, &str), Vec<usize>> = BTreeMap::new();
    for (index, target) in targets.iter().enumerate() {
        let entry_point = match grouping {
            GroupingPolicy::PerResource => target.entry_point.as_str(),
            GroupingPolicy::PerOperation => "",
        };
        groups
            .entry((target.module.as_str(), entry_point))
            .or_default()
            .push(index);
    }

    groups
        .into_values()
        .filter(|members| members.len() > 1)
        .collect()
}

/// Normalize names in one parameter scope, then recurse into nested fields
fn resolve_scope(
    parameters: &mut [Parameter],
    scope: &str,
    reserved: &BTreeSet<String>,
) -> Result<(), NameCollisionError> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for parameter in parameters.iter_mut() {
        let mut name = normalize_identifier(&parameter.original_name);
        if reserved.contains(&name) {
            name.push('_');
        }
        seen.entry(name.clone())
            .or_default()
            .push(parameter.original_name.clone());
        parameter.name = name;
    }

    if let Some((name, mut names)) = seen.into_iter().find(|(_, names)| names.len() > 1) {
        names.sort();
        return Err(NameCollisionError {
            names,
            path: format!("{}.{}", scope, name),
        });
    }

    for parameter in parameters.iter_mut() {
        let nested_scope = format!("{}.{}", scope, parameter.name);
        if let Some(fields) = parameter.mapped_type.fields_mut() {
            resolve_scope(fields, &nested_scope, reserved)?;
        }
    }

    Ok(())
}
