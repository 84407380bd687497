// dskt-check/src/schema.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// A single schema violation: where in the instance it occurred and what went
/// wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// A compiled JSON Schema. Built once at startup and shared read-only.
pub struct SchemaCheck {
    validator: jsonschema::Validator,
}

impl SchemaCheck {
    pub fn compile(schema: &serde_json::Value) -> Result<Self> {
        let validator = jsonschema::validator_for(schema)?;
        Ok(Self { validator })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
        let schema: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse schema {}", path.display()))?;
        Self::compile(&schema).with_context(|| format!("compile schema {}", path.display()))
    }

    /// Collect every violation in one pass. CI feedback quality depends on
    /// seeing all problems at once, not just the first.
    pub fn check(&self, doc: &serde_json::Value) -> Vec<Violation> {
        self.validator
            .iter_errors(doc)
            .map(|err| Violation {
                path: err.instance_path().to_string(),
                message: err.to_string(),
            })
            .collect()
    }
}

/// One `- path: message` line per violation, for console output.
pub fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| {
            if v.path.is_empty() {
                format!("- {}", v.message)
            } else {
                format!("- {}: {}", v.path, v.message)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest_schema() -> SchemaCheck {
        SchemaCheck::compile(&json!({
            "type": "object",
            "required": ["name", "version"],
            "properties": {
                "name": { "type": "string" },
                "version": { "type": "string" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn valid_document_has_no_violations() {
        let schema = manifest_schema();
        assert!(schema.check(&json!({"name": "Foo", "version": "1.0"})).is_empty());
    }

    #[test]
    fn reports_every_violation_not_just_the_first() {
        let schema = manifest_schema();
        // Missing required "name" and a wrong-typed "version": a
        // first-error-only validator would hide one of them.
        let violations = schema.check(&json!({"version": 3}));
        assert_eq!(violations.len(), 2);
        let rendered = render_violations(&violations);
        assert!(rendered.contains("name"));
        assert!(rendered.contains("version"));
    }

    #[test]
    fn violation_paths_point_into_the_instance() {
        let schema = manifest_schema();
        let violations = schema.check(&json!({"name": "Foo", "version": 1}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/version");
    }

    #[test]
    fn bad_schema_fails_to_compile() {
        assert!(SchemaCheck::compile(&json!({"type": "not-a-type"})).is_err());
    }
}
