//! Integration tests for derived records, path resolution, predicates and
//! getters.
//!
//! These tests exercise the public surface the way a calling layer would:
//! a record type declared with `#[derive(Record)]`, filters built from
//! untyped input, and batch evaluation over a collection.

use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, TimeZone, Utc};
use dynpred::prelude::*;
use dynpred::{PropertyType, ScalarKind, resolve};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Record)]
#[record(rename_all = "PascalCase")]
struct Address {
    city: String,
    zip: Option<String>,
}

#[derive(Debug, Clone, Record)]
#[record(rename_all = "PascalCase")]
struct Person {
    name: String,
    age: i32,
    address: Address,
    #[record(rename = "Boss")]
    manager: Option<Box<Person>>,
    #[record(skip)]
    #[allow(dead_code)]
    notes: Vec<String>,
}

#[derive(Debug, Record)]
struct Order {
    id: Uuid,
    total: Decimal,
    shipped: bool,
    placed_on: NaiveDate,
    paid_at: Option<chrono::DateTime<Utc>>,
    weight: f64,
    items: u16,
    customer: Arc<Person>,
}

fn person(name: &str, age: i32, city: &str) -> Person {
    Person {
        name: name.to_string(),
        age,
        address: Address {
            city: city.to_string(),
            zip: None,
        },
        manager: None,
        notes: Vec::new(),
    }
}

fn people() -> Vec<Person> {
    vec![
        person("John", 30, "Paris"),
        person("Ann", 20, "Lyon"),
        person("Joanna", 45, "Paris"),
    ]
}

fn order() -> Order {
    Order {
        id: Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
        total: Decimal::new(4999, 2),
        shipped: false,
        placed_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        paid_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
        weight: 1.25,
        items: 3,
        customer: Arc::new(person("John", 30, "Paris")),
    }
}

// ==================== Resolution ====================

#[test]
fn test_resolve_chain_length_matches_segments() {
    for (path, len) in [
        ("Name", 1),
        ("Address.City", 2),
        ("Boss.Address.City", 3),
        ("Boss.Boss.Boss.Name", 4),
    ] {
        let access = resolve::<Person>(path).unwrap();
        assert_eq!(access.len(), len, "{path}");
    }
}

#[test]
fn test_resolve_invalid_paths() {
    for path in ["", "a..b", ".Name", "Name.", "Address .City"] {
        assert!(
            matches!(resolve::<Person>(path), Err(FilterError::InvalidPath { .. })),
            "{path:?}"
        );
    }
}

#[test]
fn test_resolve_unknown_property_at_each_hop() {
    assert_eq!(
        resolve::<Person>("Nmae").unwrap_err(),
        FilterError::unknown_property("Nmae", "Person")
    );
    assert_eq!(
        resolve::<Person>("Address.Town").unwrap_err(),
        FilterError::unknown_property("Town", "Address")
    );
    // Renamed and skipped fields are not reachable under their Rust names
    assert_eq!(
        resolve::<Person>("Manager").unwrap_err(),
        FilterError::unknown_property("Manager", "Person")
    );
    assert_eq!(
        resolve::<Person>("Notes").unwrap_err(),
        FilterError::unknown_property("Notes", "Person")
    );
}

#[test]
fn test_derived_schema() {
    let schema = Person::schema();
    let names: Vec<_> = schema.properties().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Name", "Age", "Address", "Boss"]);
    assert!(schema.property("Boss").unwrap().is_nullable());

    let access = resolve::<Order>("placed_on").unwrap();
    assert_eq!(access.leaf_type(), PropertyType::Scalar(ScalarKind::Date));
}

// ==================== Predicates ====================

#[test]
fn test_equals_nested_city() {
    let in_paris = predicate::<Person>("Address.City", FilterOperator::Equals, "Paris").unwrap();
    assert!(in_paris.evaluate(&person("A", 30, "Paris")).unwrap());
    assert!(!in_paris.evaluate(&person("A", 30, "Lyon")).unwrap());
}

#[test]
fn test_starts_with_name() {
    let jo = predicate::<Person>("Name", FilterOperator::StartsWith, "Jo").unwrap();
    assert!(jo.evaluate(&person("John", 30, "Paris")).unwrap());
    assert!(!jo.evaluate(&person("Ann", 30, "Paris")).unwrap());
}

#[test]
fn test_greater_than_coerces_text() {
    let older = predicate::<Person>("Age", FilterOperator::GreaterThan, "25").unwrap();
    assert_eq!(older.value(), &Value::I32(25));
    assert!(older.evaluate(&person("A", 30, "Paris")).unwrap());
    assert!(!older.evaluate(&person("A", 20, "Paris")).unwrap());

    let err = predicate::<Person>("Age", FilterOperator::GreaterThan, "abc").unwrap_err();
    assert!(matches!(err, FilterError::ValueCoercion { .. }));
}

#[test]
fn test_contains_on_number_unsupported() {
    let err = predicate::<Person>("Age", FilterOperator::Contains, "3").unwrap_err();
    assert_eq!(err, FilterError::unsupported_operator("Contains", "i32"));
}

#[test]
fn test_doesnt_equal_is_negation_of_equals() {
    let data = people();
    for value in ["Paris", "Lyon", "Berlin"] {
        let eq = predicate::<Person>("Address.City", FilterOperator::Equals, value).unwrap();
        let ne = predicate::<Person>("Address.City", FilterOperator::DoesntEqual, value).unwrap();
        for p in &data {
            assert_eq!(eq.evaluate(p).unwrap(), !ne.evaluate(p).unwrap());
        }
    }
}

#[test]
fn test_compiled_predicate_is_idempotent() {
    let older = compiled_predicate::<Person>("Age", FilterOperator::GreaterThan, 25).unwrap();
    let john = person("John", 30, "Paris");
    assert_eq!(older.call(&john).unwrap(), older.call(&john).unwrap());
}

#[test]
fn test_batch_filtering() {
    let data = people();
    let in_paris =
        compiled_predicate::<Person>("Address.City", FilterOperator::Equals, "Paris").unwrap();
    let older = compiled_predicate::<Person>("Age", FilterOperator::GreaterThan, 40).unwrap();

    let matches: Vec<_> = data
        .iter()
        .filter(|&p| in_paris.matches(p) && older.matches(p))
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(matches, vec!["Joanna"]);

    let count = data.iter().filter(|&p| in_paris.as_fn()(p)).count();
    assert_eq!(count, 2);
}

#[test]
fn test_operator_from_untyped_input() {
    let op: FilterOperator = "EndsWith".parse().unwrap();
    let value = FilterValue::try_from(serde_json::json!("na")).unwrap();
    let p = predicate::<Person>("Name", op, value).unwrap();
    assert!(p.evaluate(&person("Joanna", 45, "Paris")).unwrap());

    let err = "Like".parse::<FilterOperator>().unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
}

#[test]
fn test_scalar_kinds() {
    let o = order();

    let by_id = predicate::<Order>(
        "id",
        FilterOperator::Equals,
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
    )
    .unwrap();
    assert!(by_id.evaluate(&o).unwrap());

    let expensive = predicate::<Order>("total", FilterOperator::GreaterThan, "19.99").unwrap();
    assert!(expensive.evaluate(&o).unwrap());

    let pending = predicate::<Order>("shipped", FilterOperator::Equals, false).unwrap();
    assert!(pending.evaluate(&o).unwrap());

    let before = predicate::<Order>("placed_on", FilterOperator::LessThan, "2024-04-01").unwrap();
    assert!(before.evaluate(&o).unwrap());

    let paid_late =
        predicate::<Order>("paid_at", FilterOperator::GreaterThan, "2024-03-01T10:00:00+02:00")
            .unwrap();
    assert!(paid_late.evaluate(&o).unwrap());

    let light = predicate::<Order>("weight", FilterOperator::LessThan, 2).unwrap();
    assert!(light.evaluate(&o).unwrap());

    let many = predicate::<Order>("items", FilterOperator::GreaterThan, 2.0).unwrap();
    assert!(many.evaluate(&o).unwrap());

    let customer =
        predicate::<Order>("customer.Address.City", FilterOperator::Equals, "Paris").unwrap();
    assert!(customer.evaluate(&o).unwrap());
}

#[test]
fn test_equality_only_kinds_reject_ordering() {
    let err = predicate::<Order>("shipped", FilterOperator::GreaterThan, true).unwrap_err();
    assert_eq!(err, FilterError::unsupported_operator("GreaterThan", "bool"));

    let err = predicate::<Order>("items", FilterOperator::Equals, 70_000).unwrap_err();
    assert!(matches!(err, FilterError::ValueCoercion { .. }));
}

#[test]
fn test_record_leaf_rejects_operators() {
    let err = predicate::<Person>("Address", FilterOperator::Equals, "Paris").unwrap_err();
    assert_eq!(err, FilterError::unsupported_operator("Equals", "Address"));
}

// ==================== Null handling ====================

#[test]
fn test_nullable_leaf() {
    let mut p = person("Ann", 20, "Lyon");
    let no_zip = predicate::<Person>("Address.Zip", FilterOperator::Equals, FilterValue::Null).unwrap();
    assert!(no_zip.evaluate(&p).unwrap());

    p.address.zip = Some("69001".into());
    assert!(!no_zip.evaluate(&p).unwrap());

    let err = predicate::<Person>("Name", FilterOperator::Equals, FilterValue::Null).unwrap_err();
    assert!(matches!(err, FilterError::ValueCoercion { .. }));
}

#[test]
fn test_null_check_on_optional_record() {
    let no_boss = predicate::<Person>("Boss", FilterOperator::Equals, FilterValue::Null).unwrap();
    let has_boss =
        compiled_predicate::<Person>("Boss", FilterOperator::DoesntEqual, FilterValue::Null)
            .unwrap();

    let mut ann = person("Ann", 20, "Lyon");
    assert!(no_boss.evaluate(&ann).unwrap());
    assert!(!has_boss.matches(&ann));

    ann.manager = Some(Box::new(person("John", 30, "Paris")));
    assert!(!no_boss.evaluate(&ann).unwrap());
    assert!(has_boss.matches(&ann));

    let err =
        predicate::<Person>("Boss", FilterOperator::GreaterThan, FilterValue::Null).unwrap_err();
    assert_eq!(err, FilterError::unsupported_operator("GreaterThan", "Person"));
}

#[test]
fn test_absent_intermediate_propagates_by_default() {
    let boss_city =
        predicate::<Person>("Boss.Address.City", FilterOperator::Equals, "Paris").unwrap();
    let err = boss_city.evaluate(&person("Ann", 20, "Lyon")).unwrap_err();
    assert_eq!(err, FilterError::null_reference("Boss.Address.City", "Boss"));

    let mut ann = person("Ann", 20, "Lyon");
    ann.manager = Some(Box::new(person("John", 30, "Paris")));
    assert!(boss_city.evaluate(&ann).unwrap());
}

#[test]
fn test_absent_intermediate_short_circuits() {
    let builder = PredicateBuilder::with_config(
        FilterConfig::default().with_null_policy(NullPolicy::ShortCircuit),
    );
    let boss_city = builder
        .compiled_predicate::<Person>("Boss.Address.City", FilterOperator::Equals, "Paris")
        .unwrap();
    let not_boss_city = builder
        .compiled_predicate::<Person>("Boss.Address.City", FilterOperator::DoesntEqual, "Paris")
        .unwrap();

    let ann = person("Ann", 20, "Lyon");
    assert!(!boss_city.call(&ann).unwrap());
    assert!(not_boss_city.call(&ann).unwrap());

    let getter = builder.getter::<Person>("Boss.Name").unwrap();
    assert_eq!(getter.get(&ann).unwrap(), Value::Null);
}

// ==================== Getters ====================

#[test]
fn test_getter_round_trip() {
    let mut ann = person("Ann", 20, "Lyon");
    ann.manager = Some(Box::new(person("John", 30, "Paris")));

    assert_eq!(
        getter::<Person>("Name").unwrap().get(&ann).unwrap(),
        Value::Text(ann.name.clone())
    );
    assert_eq!(
        getter::<Person>("Age").unwrap().get(&ann).unwrap(),
        Value::I32(ann.age)
    );
    assert_eq!(
        compiled_getter::<Person>("Boss.Address.City")
            .unwrap()
            .get(&ann)
            .unwrap(),
        Value::Text("Paris".into())
    );
}

#[test]
fn test_getter_record_snapshot_serializes() {
    let ann = person("Ann", 20, "Lyon");
    let address = getter::<Person>("Address").unwrap();
    let value = address.get(&ann).unwrap();
    assert_eq!(value, ann.address.snapshot());
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        serde_json::json!({ "City": "Lyon", "Zip": null })
    );
}

// ==================== Concurrency ====================

#[test]
fn test_compiled_artifacts_shared_across_threads() {
    let data = Arc::new(people());
    let in_paris =
        compiled_predicate::<Person>("Address.City", FilterOperator::Equals, "Paris").unwrap();
    let name = compiled_getter::<Person>("Name").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = Arc::clone(&data);
            let in_paris = in_paris.clone();
            let name = name.clone();
            thread::spawn(move || {
                data.iter()
                    .filter(|&p| in_paris.matches(p))
                    .map(|p| name.get(p).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            vec![Value::Text("John".into()), Value::Text("Joanna".into())]
        );
    }
}
