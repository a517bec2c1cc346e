//! Scenario: design an order form, save it, fill it in.

use std::sync::Arc;

use chrono::NaiveDate;

use formsmith::application::{FieldPatch, SessionOptions};
use formsmith::infrastructure::{JsonFormRepository, MemoryKeyValueStore};
use formsmith::{
    DerivedSpec, FieldType, FillSession, FormBuilder, FormsUseCase, SubmitOutcome,
    ValidationRule, Value,
};

#[test]
fn scenario_order_form_totals_and_submit() {
    let mut builder = FormBuilder::new();
    builder.set_name("Order");

    let qty = builder.add_field(FieldType::Number).id;
    let price = builder.add_field(FieldType::Number).id;
    let total = builder.add_field(FieldType::Number).id;
    let label = builder.add_field(FieldType::Text).id;
    let email = builder.add_field(FieldType::Text).id;

    builder
        .update_field(
            total.as_str(),
            FieldPatch::default().label("Total").derived(DerivedSpec::new(
                [qty.clone(), price.clone()],
                format!("fields['{}'] * fields['{}']", qty, price),
            )),
        )
        .unwrap();
    builder
        .update_field(
            label.as_str(),
            FieldPatch::default().derived(DerivedSpec::new(
                [total.clone()],
                format!("'Total: ' + fields['{}']", total),
            )),
        )
        .unwrap();
    builder
        .update_field(
            email.as_str(),
            FieldPatch::default()
                .label("Email")
                .required(true)
                .validation(Some(ValidationRule {
                    not_empty: true,
                    email: true,
                    ..ValidationRule::default()
                })),
        )
        .unwrap();

    let forms = FormsUseCase::new(Arc::new(JsonFormRepository::new(
        MemoryKeyValueStore::new(),
    )));
    let stored = forms.save_draft(builder.draft()).unwrap();
    let loaded = forms.load(stored.id.as_ref().unwrap()).unwrap();
    assert_eq!(loaded.fields, builder.draft().fields);

    let options =
        SessionOptions::default().with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut session = FillSession::start_with(loaded, options).unwrap();

    session.on_change(qty.as_str(), 3.0).unwrap();
    session.on_change(price.as_str(), 2.5).unwrap();
    assert_eq!(session.value(total.as_str()), Some(&Value::Number(7.5)));
    assert_eq!(
        session.value(label.as_str()),
        Some(&Value::Text("Total: 7.5".into()))
    );

    let SubmitOutcome::Rejected(errors) = session.submit() else {
        panic!("empty email must block submit");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[&email], "Required");

    session.on_change(email.as_str(), "not-an-email").unwrap();
    assert_eq!(session.error(email.as_str()), Some("Invalid email"));

    session.on_change(email.as_str(), "ada@example.com").unwrap();
    assert_eq!(session.error(email.as_str()), None);

    let SubmitOutcome::Success(values) = session.submit() else {
        panic!("valid form must submit");
    };
    assert_eq!(values.len(), 5);
    assert_eq!(values[&email], Value::Text("ada@example.com".into()));
}

#[test]
fn scenario_removing_a_parent_keeps_the_draft_consistent() {
    let mut builder = FormBuilder::new();
    builder.set_name("Signup");
    let birth = builder.add_field(FieldType::Date).id;
    let age = builder.add_field(FieldType::Number).id;
    builder
        .update_field(
            age.as_str(),
            FieldPatch::default().derived(DerivedSpec::new(
                [birth.clone()],
                format!("ageInYears(fields['{}'])", birth),
            )),
        )
        .unwrap();

    builder.remove_field(birth.as_str()).unwrap();

    let age_field = builder.draft().field(age.as_str()).unwrap();
    let derived = age_field.derived.as_ref().unwrap();
    assert!(derived.parents.is_empty());
    assert!(!derived.enabled);
    assert!(formsmith::check_invariants(builder.draft()).is_empty());
}

#[test]
fn scenario_broken_expression_degrades_to_blank() {
    let mut builder = FormBuilder::new();
    builder.set_name("Calc");
    let a = builder.add_field(FieldType::Number).id;
    let broken = builder.add_field(FieldType::Text).id;
    let fine = builder.add_field(FieldType::Number).id;
    builder
        .update_field(
            broken.as_str(),
            FieldPatch::default().derived(DerivedSpec::new([a.clone()], "fields[")),
        )
        .unwrap();
    builder
        .update_field(
            fine.as_str(),
            FieldPatch::default().derived(DerivedSpec::new(
                [a.clone()],
                format!("fields['{}'] + 1", a),
            )),
        )
        .unwrap();

    let mut session = FillSession::start(builder.into_schema()).unwrap();
    session.on_change(a.as_str(), 41.0).unwrap();

    assert_eq!(session.value(broken.as_str()), Some(&Value::Text(String::new())));
    assert_eq!(session.value(fine.as_str()), Some(&Value::Number(42.0)));
    assert_eq!(session.diagnostics().len(), 1);
    assert_eq!(session.diagnostics()[0].field, broken);
}
