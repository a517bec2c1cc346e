//! `formsmith check` - structural and expression diagnostics for the draft

use std::path::Path;

use anyhow::Result;

use formsmith::domain::services::expression::Expression;
use formsmith::domain::services::{check_persist_ready, evaluation_order};

use super::context::read_draft;

pub fn cmd_check(path: &Path, json: bool) -> Result<()> {
    let draft = read_draft(path)?;
    let violations = check_persist_ready(&draft);

    let mut expression_errors = Vec::new();
    let mut expression_warnings = Vec::new();
    for field in draft.derived_fields() {
        let Some(derived) = &field.derived else {
            continue;
        };
        match Expression::parse(&derived.expression) {
            Ok(expr) => {
                for read in expr.field_refs() {
                    if !derived.parents.contains(&read) {
                        expression_warnings.push((
                            field.id.clone(),
                            format!("reads '{}' which is not a declared parent", read),
                        ));
                    }
                }
            }
            Err(e) => expression_errors.push((field.id.clone(), e.to_string())),
        }
    }

    let order: Vec<String> = evaluation_order(&draft)
        .map(|indices| {
            indices
                .into_iter()
                .map(|i| draft.fields[i].id.to_string())
                .collect()
        })
        .unwrap_or_default();

    let ok = violations.is_empty() && expression_errors.is_empty();

    if json {
        let out = serde_json::json!({
            "type": "check",
            "ok": ok,
            "violations": violations.iter().map(|v| serde_json::json!({
                "field": v.field().map(|f| f.to_string()),
                "message": v.to_string(),
            })).collect::<Vec<_>>(),
            "expressions": expression_errors.iter().map(|(field, message)| serde_json::json!({
                "field": field,
                "message": message,
            })).collect::<Vec<_>>(),
            "warnings": expression_warnings.iter().map(|(field, message)| serde_json::json!({
                "field": field,
                "message": message,
            })).collect::<Vec<_>>(),
            "evaluation_order": order,
        });
        println!("{}", out);
    } else {
        for violation in &violations {
            println!("error: {}", violation);
        }
        for (field, message) in &expression_errors {
            println!("error: field '{}': {}", field, message);
        }
        for (field, message) in &expression_warnings {
            println!("warning: field '{}': {}", field, message);
        }
        if !order.is_empty() {
            println!("derived evaluation order: {}", order.join(" -> "));
        }
        if ok {
            println!("ok: '{}' is ready to save", draft.name);
        }
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
