#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

use formsmith::domain::services::expression::Expression;
use formsmith::{Value, ValueMap};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Parsing and evaluating arbitrary input must never panic
        if let Ok(expr) = Expression::parse(source) {
            let mut values = ValueMap::new();
            for id in expr.field_refs() {
                values.insert(id, Value::Number(7.0));
            }
            let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            let _ = expr.evaluate(&values, today);
        }
    }
});
