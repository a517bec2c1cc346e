//! `formsmith save | list | show` - stored forms

use std::path::Path;

use anyhow::Result;

use formsmith::{FormId, FormsmithError};

use formsmith::config::Config;

use super::context::{forms_use_case, read_draft, write_draft};

pub fn cmd_save(config: &Config, path: &Path, json: bool) -> Result<()> {
    let forms = forms_use_case(config);

    let draft = read_draft(path)?;
    let stored = forms.save_draft(&draft).map_err(FormsmithError::from)?;
    // Later saves of the same draft overwrite the stored copy
    write_draft(path, &stored)?;

    let id = stored.id.as_ref().map(FormId::to_string).unwrap_or_default();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "type": "saved",
                "id": id,
                "name": stored.name,
                "fields": stored.fields.len(),
            })
        );
    } else {
        println!("Saved '{}' as {}", stored.name, id);
    }
    Ok(())
}

pub fn cmd_list(config: &Config, json: bool) -> Result<()> {
    let all = forms_use_case(config).list();

    if json {
        let items: Vec<_> = all
            .iter()
            .map(|form| {
                serde_json::json!({
                    "id": form.id,
                    "name": form.name,
                    "createdAt": form.created_at,
                    "fields": form.fields.len(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({ "type": "forms", "count": items.len(), "forms": items })
        );
        return Ok(());
    }

    if all.is_empty() {
        println!("No saved forms.");
        return Ok(());
    }
    for form in &all {
        let created = form
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{}  {}  {} ({} field(s))",
            form.id.as_ref().map(FormId::as_str).unwrap_or("-"),
            created,
            form.name,
            form.fields.len()
        );
    }
    Ok(())
}

pub fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let id = FormId::from(id);
    let form = forms_use_case(config)
        .load(&id)
        .ok_or(FormsmithError::FormNotFound { id })?;
    println!("{}", serde_json::to_string_pretty(&form)?);
    Ok(())
}
