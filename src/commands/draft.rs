//! `formsmith draft` - edit the local draft file

use std::path::Path;

use anyhow::{bail, Result};

use formsmith::application::FieldPatch;
use formsmith::{DerivedSpec, FieldId, FormBuilder, FormSchema, ValidationRule, Value};

use super::context::{read_draft, write_draft};
use crate::cli::{DraftAction, UpdateArgs};

pub fn cmd_draft(path: &Path, action: DraftAction, json: bool) -> Result<()> {
    if let DraftAction::New { name, force } = &action {
        if path.exists() && !*force {
            bail!(
                "{} already exists (use --force to replace it)",
                path.display()
            );
        }
        write_draft(path, &FormSchema::draft(name.clone()))?;
        println!("Started draft '{}' in {}", name, path.display());
        return Ok(());
    }

    let mut builder = FormBuilder::edit(read_draft(path)?)?;

    match action {
        DraftAction::New { .. } => {}
        DraftAction::Add {
            field_type,
            label,
            required,
        } => {
            let field = builder.add_field(field_type);
            let patch = FieldPatch {
                label,
                required: required.then_some(true),
                ..FieldPatch::default()
            };
            if !patch.is_empty() {
                builder.update_field(field.id.as_str(), patch)?;
            }
            println!("{}", field.id);
        }
        DraftAction::Update(args) => {
            let id = args.id.clone();
            let patch = build_patch(builder.draft(), args)?;
            if patch.is_empty() {
                bail!("nothing to update for field '{}'", id);
            }
            builder.update_field(&id, patch)?;
        }
        DraftAction::Remove { id } => builder.remove_field(&id)?,
        DraftAction::Move { from, to } => builder.reorder_field(from, to)?,
        DraftAction::Rename { name } => builder.set_name(name),
        DraftAction::Show => {
            print_draft(builder.draft(), json)?;
            return Ok(());
        }
    }

    write_draft(path, builder.draft())
}

fn build_patch(draft: &FormSchema, args: UpdateArgs) -> Result<FieldPatch> {
    let Some(field) = draft.field(&args.id) else {
        bail!("no field with id '{}'", args.id);
    };

    let mut patch = FieldPatch {
        label: args.label,
        field_type: args.field_type,
        required: args.required,
        options: args.options,
        ..FieldPatch::default()
    };

    let field_type = args.field_type.unwrap_or(field.field_type);
    if args.clear_default {
        patch.default_value = Some(None);
    } else if let Some(raw) = &args.default {
        patch.default_value = Some(Some(Value::from_input(field_type, raw)));
    }

    if args.no_validation {
        patch.validation = Some(None);
    } else if args.not_empty
        || args.min_length.is_some()
        || args.max_length.is_some()
        || args.email
        || args.password
    {
        let mut rule = field.validation.clone().unwrap_or_default();
        rule.not_empty |= args.not_empty;
        rule.email |= args.email;
        rule.custom_password |= args.password;
        if args.min_length.is_some() {
            rule.min_length = args.min_length;
        }
        if args.max_length.is_some() {
            rule.max_length = args.max_length;
        }
        patch.validation = Some(Some(rule).filter(|r: &ValidationRule| !r.is_empty()));
    }

    if args.no_derive {
        let mut derived = field.derived.clone().unwrap_or_default();
        derived.enabled = false;
        patch.derived = Some(derived);
    } else if args.derive_from.is_some() || args.expression.is_some() {
        let current = field.derived.clone().unwrap_or_default();
        let parents = match args.derive_from {
            Some(parents) => parents.into_iter().map(FieldId::from).collect(),
            None => current.parents,
        };
        let expression = args.expression.unwrap_or(current.expression);
        patch.derived = Some(DerivedSpec::new(parents, expression));
    }

    Ok(patch)
}

fn print_draft(draft: &FormSchema, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(draft)?);
        return Ok(());
    }

    let name = if draft.name.is_empty() {
        "(unnamed)"
    } else {
        draft.name.as_str()
    };
    println!("{} - {} field(s)", name, draft.len());
    for (index, field) in draft.fields.iter().enumerate() {
        let mut flags = Vec::new();
        if field.required {
            flags.push("required".to_string());
        }
        if let Some(derived) = field.derived.as_ref().filter(|d| d.enabled) {
            flags.push(format!("= {}", derived.expression));
        }
        if !field.options().is_empty() {
            flags.push(format!("[{}]", field.options().join(", ")));
        }
        println!(
            "  {:>2}. {} ({}) {:?} {}",
            index,
            field.id,
            field.field_type,
            field.label,
            flags.join(" ")
        );
    }
    Ok(())
}
