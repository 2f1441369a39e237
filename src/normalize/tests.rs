//! Tests for the normalize module

use super::*;
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test_case("id", "id" ; "already snake")]
#[test_case("customerId", "customer_id" ; "camel case")]
#[test_case("OrderTotal", "order_total" ; "pascal case")]
#[test_case("ordered_at", "ordered_at" ; "underscores kept")]
#[test_case("unit price", "unit_price" ; "space")]
#[test_case("sku-code", "sku_code" ; "dash")]
#[test_case("2nd_line", "_2nd_line" ; "leading digit")]
#[test_case("  name ", "name" ; "trimmed")]
#[test_case("", "_" ; "empty")]
#[test_case("HTTPStatus", "httpstatus" ; "acronym stays joined")]
fn test_normalize_identifier(input: &str, expected: &str) {
    assert_eq!(normalize_identifier(input), expected);
}

#[test]
fn test_flatten_nested_object() {
    let record = json!({
        "id": 1,
        "address": {"city": "Philadelphia", "geo": {"lat": 39.9}}
    });

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.get("id"), Some(&json!(1)));
    assert_eq!(row.get("address__city"), Some(&json!("Philadelphia")));
    assert_eq!(row.get("address__geo__lat"), Some(&json!(39.9)));
    assert!(!row.contains_key("address"));
}

#[test]
fn test_flatten_arrays_become_json_text() {
    let record = json!({"sku": "JAF-001", "tags": ["hot", "new"]});

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.get("tags"), Some(&json!("[\"hot\",\"new\"]")));
}

#[test]
fn test_flatten_empty_object_adds_no_columns() {
    let record = json!({"id": 1, "meta": {}});

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.len(), 1);
}

#[test]
fn test_flatten_respects_max_depth() {
    let record = json!({"a": {"b": {"c": 1}}});

    let row = flatten_record(&record, 2);

    assert_eq!(row.get("a__b"), Some(&json!("{\"c\":1}")));
}

#[test]
fn test_flatten_normalizes_nested_keys() {
    let record = json!({"shippingAddress": {"zipCode": "19103"}});

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.get("shipping_address__zip_code"), Some(&json!("19103")));
}

#[test]
fn test_flatten_colliding_keys_are_suffixed() {
    let record = json!({"customerId": 7, "customer_id": 8});

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.len(), 2);
    let mut values: Vec<_> = [row.get("customer_id"), row.get("customer_id_1")]
        .into_iter()
        .map(|v| v.and_then(serde_json::Value::as_i64).unwrap())
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![7, 8]);
}

#[test]
fn test_flatten_nested_path_collides_with_flat_key() {
    let record = json!({"store": {"id": 1}, "store__id": 2});

    let row = flatten_record(&record, DEFAULT_MAX_DEPTH);

    assert_eq!(row.len(), 2);
    assert!(row.contains_key("store__id"));
    assert!(row.contains_key("store__id_1"));
}

#[test]
fn test_flatten_scalar_record() {
    let row = flatten_record(&json!(42), DEFAULT_MAX_DEPTH);
    assert_eq!(row.get(VALUE_COLUMN), Some(&json!(42)));

    let row = flatten_record(&json!([1, 2]), DEFAULT_MAX_DEPTH);
    assert_eq!(row.get(VALUE_COLUMN), Some(&json!("[1,2]")));
}

#[test]
fn test_normalizer_adds_load_id() {
    let normalizer = Normalizer::new("1700000000.000001");
    let page = normalizer
        .normalize(&[json!({"id": 1}), json!({"id": 2})])
        .unwrap();

    assert_eq!(page.len(), 2);
    for row in &page.rows {
        assert_eq!(row[LOAD_ID_COLUMN], json!("1700000000.000001"));
    }
    assert_eq!(
        page.schema.field_with_name(LOAD_ID_COLUMN).unwrap().data_type(),
        &DataType::Utf8
    );
}

#[test]
fn test_normalizer_keeps_source_load_id_field() {
    let normalizer = Normalizer::new("1700000000.000001");
    let page = normalizer
        .normalize(&[json!({"id": 1, "_load_id": "upstream-42"})])
        .unwrap();

    let row = &page.rows[0];
    assert_eq!(row[LOAD_ID_COLUMN], json!("1700000000.000001"));
    assert_eq!(row["_load_id_1"], json!("upstream-42"));
}

#[test]
fn test_normalizer_schema_covers_all_rows() {
    let normalizer = Normalizer::new("1");
    let page = normalizer
        .normalize(&[
            json!({"id": 1, "name": "Alice"}),
            json!({"id": 2, "customer": {"tier": "gold"}}),
        ])
        .unwrap();

    assert!(page.schema.field_with_name("name").is_ok());
    assert!(page.schema.field_with_name("customer__tier").is_ok());
    assert_eq!(
        page.schema.field_with_name("id").unwrap().data_type(),
        &DataType::Int64
    );
}

#[test]
fn test_normalized_page_to_batch_with_wider_schema() {
    let normalizer = Normalizer::new("1");
    let first = normalizer.normalize(&[json!({"id": 1})]).unwrap();
    let second = normalizer
        .normalize(&[json!({"id": 2, "email": "b@example.com"})])
        .unwrap();

    let merged = crate::output::merge_schemas(&first.schema, &second.schema);
    let batch = first.to_batch(&merged).unwrap();

    assert_eq!(batch.num_rows(), 1);
    assert_eq!(batch.num_columns(), merged.fields().len());
}

#[test]
fn test_normalizer_max_depth_floor() {
    let normalizer = Normalizer::new("1").with_max_depth(0);
    let page = normalizer.normalize(&[json!({"a": {"b": 1}})]).unwrap();

    assert_eq!(page.rows[0]["a"], json!("{\"b\":1}"));
}
