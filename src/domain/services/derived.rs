//! Derived field engine
//!
//! Computes every field whose derivation is enabled from the current values
//! of its declared parents. Evaluation is a single pass in dependency order:
//! a derived field may read another derived field's fresh value, and a
//! dependency cycle is refused up front instead of being iterated.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use super::expression::{EvalError, Expression, ParseError};
use super::invariants::join_ids;
use crate::domain::entities::FormSchema;
use crate::domain::value_objects::{FieldId, Value, ValueMap};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivedError {
    #[error("cyclic dependency between derived fields: {}", join_ids(.fields))]
    CyclicDependency { fields: Vec<FieldId> },
}

/// Why a single derived field fell back to an empty value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionFailure {
    #[error("malformed expression: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

/// Non-fatal record of a failed derived field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionDiagnostic {
    pub field: FieldId,
    pub expression: String,
    pub failure: ExpressionFailure,
}

impl std::fmt::Display for ExpressionDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field '{}': {}", self.field, self.failure)
    }
}

/// Outcome of one recompute pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recomputation {
    pub values: ValueMap,
    /// Derived fields whose value differs from the input map
    pub changed: Vec<FieldId>,
    pub diagnostics: Vec<ExpressionDiagnostic>,
}

/// Order in which derived fields must be evaluated, as indices into
/// `schema.fields`
///
/// Only enabled derived fields take part; ties keep schema order. Parents that
/// are plain fields (or unknown ids) impose no ordering.
pub fn evaluation_order(schema: &FormSchema) -> Result<Vec<usize>, DerivedError> {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for (i, field) in schema.fields.iter().enumerate() {
        index_of.entry(field.id.as_str()).or_insert(i);
    }

    let derived: Vec<usize> = schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_derived())
        .map(|(i, _)| i)
        .collect();

    let mut dependents: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    let mut in_degree: BTreeMap<usize, usize> = derived.iter().map(|&i| (i, 0)).collect();
    for &child in &derived {
        let parents: BTreeSet<usize> = schema.fields[child]
            .derived_parents()
            .iter()
            .filter_map(|p| index_of.get(p.as_str()).copied())
            .filter(|&p| in_degree.contains_key(&p))
            .collect();
        for parent in parents {
            dependents.entry(parent).or_default().insert(child);
            *in_degree.entry(child).or_default() += 1;
        }
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&i, _)| i)
        .collect();
    let mut ordered = Vec::with_capacity(derived.len());

    while let Some(next) = ready.pop_first() {
        ordered.push(next);
        for &child in dependents.get(&next).into_iter().flatten() {
            if let Some(deg) = in_degree.get_mut(&child) {
                *deg = deg.saturating_sub(1);
                if *deg == 0 {
                    ready.insert(child);
                }
            }
        }
    }

    if ordered.len() == derived.len() {
        return Ok(ordered);
    }

    let placed: BTreeSet<usize> = ordered.into_iter().collect();
    let stuck: BTreeSet<usize> = derived
        .into_iter()
        .filter(|i| !placed.contains(i))
        .collect();
    let fields = cycle_members(&stuck, &dependents)
        .into_iter()
        .map(|i| schema.fields[i].id.clone())
        .collect();
    Err(DerivedError::CyclicDependency { fields })
}

/// Narrow the nodes Kahn's algorithm could not place down to those on a
/// cycle, by peeling off nodes that only feed out of the stuck set.
fn cycle_members(
    stuck: &BTreeSet<usize>,
    dependents: &BTreeMap<usize, BTreeSet<usize>>,
) -> BTreeSet<usize> {
    let mut remaining = stuck.clone();
    loop {
        let sinks: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|node| {
                !dependents
                    .get(node)
                    .is_some_and(|out| out.iter().any(|c| remaining.contains(c)))
            })
            .collect();
        if sinks.is_empty() {
            return remaining;
        }
        for sink in sinks {
            remaining.remove(&sink);
        }
    }
}

struct PlanStep {
    field: FieldId,
    parents: Vec<FieldId>,
    source: String,
    expression: Result<Expression, ParseError>,
}

/// A schema's derived fields, ordered and parsed once, ready to evaluate
/// against any number of value maps
pub struct DerivedPlan {
    steps: Vec<PlanStep>,
}

impl DerivedPlan {
    pub fn build(schema: &FormSchema) -> Result<Self, DerivedError> {
        let order = evaluation_order(schema)?;
        let steps = order
            .into_iter()
            .map(|i| {
                let field = &schema.fields[i];
                let source = field
                    .derived
                    .as_ref()
                    .map(|d| d.expression.clone())
                    .unwrap_or_default();
                PlanStep {
                    field: field.id.clone(),
                    parents: field.derived_parents().to_vec(),
                    expression: Expression::parse(&source),
                    source,
                }
            })
            .collect();
        Ok(Self { steps })
    }

    /// Derived field ids in evaluation order
    pub fn order(&self) -> Vec<&FieldId> {
        self.steps.iter().map(|s| &s.field).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// One pass over the derived fields; plain fields are never touched
    pub fn evaluate(&self, values: &ValueMap, today: NaiveDate) -> Recomputation {
        let mut next = values.clone();
        let mut changed = Vec::new();
        let mut diagnostics = Vec::new();

        for step in &self.steps {
            // Only declared parents are visible to the expression
            let visible: ValueMap = step
                .parents
                .iter()
                .filter_map(|p| next.get(p).map(|v| (p.clone(), v.clone())))
                .collect();

            let outcome = match &step.expression {
                Ok(expr) => expr.evaluate(&visible, today).map_err(ExpressionFailure::from),
                Err(parse_error) => Err(ExpressionFailure::from(parse_error.clone())),
            };

            let value = match outcome {
                Ok(value) => value,
                Err(failure) => {
                    match &failure {
                        ExpressionFailure::Parse(_) => {
                            log::warn!("derived field '{}': {}", step.field, failure)
                        }
                        ExpressionFailure::Eval(_) => {
                            log::debug!("derived field '{}': {}", step.field, failure)
                        }
                    }
                    diagnostics.push(ExpressionDiagnostic {
                        field: step.field.clone(),
                        expression: step.source.clone(),
                        failure,
                    });
                    Value::Text(String::new())
                }
            };

            if next.get(&step.field) != Some(&value) {
                changed.push(step.field.clone());
            }
            next.insert(step.field.clone(), value);
        }

        Recomputation {
            values: next,
            changed,
            diagnostics,
        }
    }
}

/// Entry point for recomputing derived values
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedEngine {
    today: Option<NaiveDate>,
}

impl DerivedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date date functions see (defaults to the current UTC date)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn plan(&self, schema: &FormSchema) -> Result<DerivedPlan, DerivedError> {
        DerivedPlan::build(schema)
    }

    /// Recompute all derived fields of `schema` over `values`
    pub fn recompute(
        &self,
        schema: &FormSchema,
        values: &ValueMap,
    ) -> Result<Recomputation, DerivedError> {
        let plan = self.plan(schema)?;
        log::debug!(
            "recomputing {} derived field(s) in order [{}]",
            plan.steps.len(),
            plan.order()
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(plan.evaluate(values, self.today()))
    }
}

/// Recompute with the default engine
pub fn recompute(schema: &FormSchema, values: &ValueMap) -> Result<Recomputation, DerivedError> {
    DerivedEngine::new().recompute(schema, values)
}
