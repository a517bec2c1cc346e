//! Property tests for derived-field recompute order.

use chrono::NaiveDate;
use proptest::prelude::*;

use formsmith::domain::services::DerivedEngine;
use formsmith::{DerivedSpec, FieldSpec, FieldType, FormSchema, Value, ValueMap};

/// Field `f{i}` may depend on any `f{j}` with `j < i`, so the graph is acyclic
fn dag(max: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2..max).prop_flat_map(|n| {
        (0..n)
            .map(|i| proptest::sample::subsequence((0..i).collect::<Vec<_>>(), 0..=i))
            .collect::<Vec<_>>()
    })
}

fn field(i: usize, parents: &[usize]) -> FieldSpec {
    let spec = FieldSpec::new(format!("f{}", i), FieldType::Number);
    if parents.is_empty() {
        return spec;
    }
    let expression = parents
        .iter()
        .map(|p| format!("fields['f{}']", p))
        .chain(std::iter::once(i.to_string()))
        .collect::<Vec<_>>()
        .join(" + ");
    spec.with_derived(DerivedSpec::new(
        parents.iter().map(|p| format!("f{}", p)),
        expression,
    ))
}

fn schema(graph: &[Vec<usize>], order: &[usize]) -> FormSchema {
    order.iter().fold(FormSchema::draft("dag"), |schema, &i| {
        schema.with_field(field(i, &graph[i]))
    })
}

fn inputs(graph: &[Vec<usize>]) -> ValueMap {
    graph
        .iter()
        .enumerate()
        .filter(|(_, parents)| parents.is_empty())
        .map(|(i, _)| (format!("f{}", i).into(), Value::Number(i as f64 * 10.0)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: recompute results do not depend on field declaration order.
    #[test]
    fn property_recompute_is_order_independent(
        (graph, shuffled) in dag(9).prop_flat_map(|graph| {
            let n = graph.len();
            (Just(graph), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let engine = DerivedEngine::new()
            .with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let declared: Vec<usize> = (0..graph.len()).collect();
        let values = inputs(&graph);

        let a = engine.recompute(&schema(&graph, &declared), &values).unwrap();
        let b = engine.recompute(&schema(&graph, &shuffled), &values).unwrap();

        prop_assert!(a.diagnostics.is_empty());
        prop_assert_eq!(a.values, b.values);
    }

    /// PROPERTY: a second recompute over its own output changes nothing.
    #[test]
    fn property_recompute_is_idempotent(graph in dag(8)) {
        let engine = DerivedEngine::new()
            .with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let order: Vec<usize> = (0..graph.len()).collect();
        let schema = schema(&graph, &order);

        let first = engine.recompute(&schema, &inputs(&graph)).unwrap();
        let second = engine.recompute(&schema, &first.values).unwrap();
        prop_assert!(second.changed.is_empty());
        prop_assert_eq!(first.values, second.values);
    }
}
