//! Fuzz target for predicate construction and evaluation.
//!
//! Generates arbitrary paths, operators and raw values against a small
//! recursive record type to find panics in resolution, coercion or
//! evaluation.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_predicate_construction
//! ```

#![no_main]

use arbitrary::Arbitrary;
use dynpred::prelude::*;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary, Record)]
#[record(rename_all = "PascalCase")]
struct Account {
    name: String,
    balance: i64,
    rate: f32,
    active: bool,
    parent: Option<Box<Account>>,
}

/// A fuzzable raw value.
#[derive(Debug, Arbitrary, Clone)]
enum FuzzFilterValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl From<FuzzFilterValue> for FilterValue {
    fn from(val: FuzzFilterValue) -> Self {
        match val {
            FuzzFilterValue::Null => FilterValue::Null,
            FuzzFilterValue::Bool(b) => FilterValue::Bool(b),
            FuzzFilterValue::Int(i) => FilterValue::Int(i),
            FuzzFilterValue::UInt(u) => FilterValue::UInt(u),
            FuzzFilterValue::Float(f) => FilterValue::Float(f),
            FuzzFilterValue::String(s) => FilterValue::String(s),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    segments: Vec<u8>,
    raw_path: Option<String>,
    op: u8,
    value: FuzzFilterValue,
    short_circuit: bool,
    record: Account,
}

const SEGMENTS: [&str; 6] = ["Name", "Balance", "Rate", "Active", "Parent", "Missing"];

fuzz_target!(|input: Input| {
    let path = match &input.raw_path {
        Some(raw) => raw.clone(),
        None => input
            .segments
            .iter()
            .take(20)
            .map(|i| SEGMENTS[*i as usize % SEGMENTS.len()])
            .collect::<Vec<_>>()
            .join("."),
    };
    let op = FilterOperator::ALL[input.op as usize % FilterOperator::ALL.len()];
    let policy = if input.short_circuit {
        NullPolicy::ShortCircuit
    } else {
        NullPolicy::Propagate
    };
    let builder = PredicateBuilder::with_config(FilterConfig::default().with_null_policy(policy));

    let predicate = match builder.predicate::<Account>(&path, op, input.value.clone()) {
        Ok(predicate) => predicate,
        Err(err) => {
            assert!(!err.is_evaluation_error(), "{err}");
            return;
        }
    };

    let compiled = predicate.clone().compile();
    match (predicate.evaluate(&input.record), compiled.call(&input.record)) {
        (Ok(lhs), Ok(rhs)) => assert_eq!(lhs, rhs),
        (Err(lhs), Err(rhs)) => assert_eq!(lhs, rhs),
        (lhs, rhs) => panic!("one-shot {lhs:?} and compiled {rhs:?} disagree"),
    }

    if op == FilterOperator::Equals {
        if let Ok(negated) = builder.predicate::<Account>(&path, FilterOperator::DoesntEqual, input.value) {
            if let (Ok(eq), Ok(ne)) = (predicate.evaluate(&input.record), negated.evaluate(&input.record)) {
                assert_eq!(eq, !ne);
            }
        }
    }

    if let Ok(getter) = builder.getter::<Account>(&path) {
        let _ = getter.get(&input.record);
    }
});
