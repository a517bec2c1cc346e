//! Scenario: forms survive restarts and a damaged store.

use std::fs;

use formsmith::domain::ports::{FormRepository, StoreError};
use formsmith::infrastructure::{FileKeyValueStore, JsonFormRepository};
use formsmith::{DerivedSpec, FieldSpec, FieldType, FormSchema, ValidationRule};

fn contact_form() -> FormSchema {
    FormSchema::draft("Contact")
        .with_field(
            FieldSpec::new("name", FieldType::Text)
                .with_label("Name")
                .with_required(true)
                .with_validation(ValidationRule {
                    not_empty: true,
                    max_length: Some(40),
                    ..ValidationRule::default()
                }),
        )
        .with_field(
            FieldSpec::new("topic", FieldType::Radio).with_options(["Sales", "Support"]),
        )
        .with_field(FieldSpec::new("greeting", FieldType::Text).with_derived(
            DerivedSpec::new(["name"], "'Hello ' + fields['name']"),
        ))
}

#[test]
fn scenario_saved_form_reloads_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let repo = JsonFormRepository::new(FileKeyValueStore::with_dir(dir.path()));
        let stored = repo.save(&contact_form()).unwrap();
        assert!(stored.created_at.is_some());
        stored.id.unwrap()
    };

    let repo = JsonFormRepository::new(FileKeyValueStore::with_dir(dir.path()));
    let loaded = repo.load_by_id(&id).unwrap();
    assert_eq!(loaded.name, "Contact");
    assert_eq!(loaded.fields, contact_form().fields);
}

#[test]
fn scenario_forms_keep_storage_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFormRepository::new(FileKeyValueStore::with_dir(dir.path()));
    for name in ["first", "second", "third"] {
        repo.save(&FormSchema::draft(name)).unwrap();
    }
    let names: Vec<String> = repo.load_all().into_iter().map(|f| f.name).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn scenario_saving_twice_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFormRepository::new(FileKeyValueStore::with_dir(dir.path()));
    let stored = repo.save(&contact_form()).unwrap();
    let err = repo.save(&stored).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { .. }));
    assert_eq!(repo.load_all().len(), 1);
}

#[test]
fn scenario_damaged_store_reads_as_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("forms_v1.json"), "[{\"name\":").unwrap();

    let repo = JsonFormRepository::new(FileKeyValueStore::with_dir(dir.path()));
    assert!(repo.load_all().is_empty());

    repo.save(&contact_form()).unwrap();
    assert_eq!(repo.load_all().len(), 1);
}
