//! `formsmith fill` - fill in a stored form and submit it

use std::sync::Arc;

use anyhow::{anyhow, Result};

use formsmith::application::{SessionOptions, SessionPolicy};
use formsmith::domain::ports::{FillEventSink, NoopEventSink};
use formsmith::infrastructure::JsonEventSink;
use formsmith::{FillSession, FormId, FormsmithError, SubmitOutcome, Value};

use formsmith::config::Config;

use super::context::forms_use_case;

pub fn cmd_fill(
    config: &Config,
    id: Option<String>,
    assignments: &[String],
    revalidate_derived: bool,
    json: bool,
) -> Result<()> {
    let forms = forms_use_case(config);

    let schema = match id {
        Some(id) => {
            let id = FormId::from(id);
            forms
                .load(&id)
                .ok_or(FormsmithError::FormNotFound { id })?
        }
        None => forms
            .latest()
            .ok_or_else(|| anyhow!("no saved forms to fill"))?,
    };

    let events: Arc<dyn FillEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(NoopEventSink)
    };
    let policy = SessionPolicy {
        revalidate_derived: revalidate_derived || config.session.revalidate_derived,
    };
    let options = SessionOptions::default()
        .with_policy(policy)
        .with_events(events);
    let mut session = FillSession::start_with(schema, options).map_err(FormsmithError::from)?;

    for assignment in assignments {
        let (field_id, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{}'", assignment))?;
        let field_type = session
            .schema()
            .field(field_id)
            .map(|f| f.field_type)
            .ok_or_else(|| anyhow!("form has no field '{}'", field_id))?;
        session
            .on_change(field_id, Value::from_input(field_type, raw))
            .map_err(FormsmithError::from)?;
        if !json {
            if let Some(error) = session.error(field_id) {
                println!("{}: {}", field_id, error);
            }
        }
    }

    if !json {
        for diagnostic in session.diagnostics() {
            eprintln!("warning: {}", diagnostic);
        }
    }

    match session.submit() {
        SubmitOutcome::Success(values) => {
            if !json {
                println!("Submitted '{}'", session.schema().name);
                for field in &session.schema().fields {
                    let value = values.get(&field.id).unwrap_or(&Value::Null);
                    println!("  {} = {}", field.label, value);
                }
            }
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            if !json {
                println!("Rejected: {} error(s)", errors.len());
                for (field_id, message) in &errors {
                    let label = session
                        .schema()
                        .field(field_id.as_str())
                        .map(|f| f.label.as_str())
                        .unwrap_or(field_id.as_str());
                    println!("  {}: {}", label, message);
                }
            }
            std::process::exit(1);
        }
    }
}
