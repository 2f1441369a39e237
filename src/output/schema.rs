//! Arrow schema inference and JSON to Arrow conversion
//!
//! Records reaching this module are already flat: nested objects have been
//! expanded into columns and arrays serialized to JSON text. Column order is
//! the order in which columns are first seen.

use crate::error::{Error, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered column set used while inferring
#[derive(Default)]
struct Columns {
    order: Vec<(String, DataType)>,
    index: HashMap<String, usize>,
}

impl Columns {
    fn add(&mut self, name: &str, data_type: DataType) {
        match self.index.get(name) {
            Some(&i) => {
                let merged = merge_types(&self.order[i].1, &data_type);
                self.order[i].1 = merged;
            }
            None => {
                self.index.insert(name.to_string(), self.order.len());
                self.order.push((name.to_string(), data_type));
            }
        }
    }

    fn into_schema(self) -> Schema {
        let fields: Vec<Field> = self
            .order
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true))
            .collect();
        Schema::new(fields)
    }
}

/// Give columns seen only with null values a storable type
///
/// Inferred and merged schemas keep `DataType::Null` so a later page can still
/// settle the column's type; call this once the final schema is known.
pub fn resolve_null_types(schema: &Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| match field.data_type() {
            DataType::Null => field.as_ref().clone().with_data_type(DataType::Utf8),
            _ => field.as_ref().clone(),
        })
        .collect();
    Schema::new(fields)
}

/// Infer an Arrow schema from a set of flat JSON records
///
/// All fields are nullable. Mixed integer/float columns become Float64; any
/// other mix falls back to Utf8. Columns holding only nulls stay
/// `DataType::Null`.
pub fn infer_schema(records: &[Value]) -> Result<Schema> {
    let mut columns = Columns::default();

    for record in records {
        let Value::Object(obj) = record else {
            return Err(Error::output(format!(
                "expected a JSON object record, found {record}"
            )));
        };
        for (key, value) in obj {
            columns.add(key, infer_type(value));
        }
    }

    Ok(columns.into_schema())
}

/// Merge two schemas, keeping the column order of `first` and appending
/// columns only present in `second`
pub fn merge_schemas(first: &Schema, second: &Schema) -> Schema {
    let mut columns = Columns::default();

    for field in first.fields().iter().chain(second.fields().iter()) {
        columns.add(field.name(), field.data_type().clone());
    }

    columns.into_schema()
}

/// Convert JSON records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data. Columns missing
/// from a record are null; null-only columns are written as text.
pub fn json_to_arrow(records: &[Value], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => resolve_null_types(schema),
        None => resolve_null_types(&infer_schema(records)?),
    };
    let schema = Arc::new(schema);

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| match record {
                Value::Object(obj) => obj.get(field.name()).filter(|v| !v.is_null()),
                _ => None,
            })
            .collect();

        columns.push(build_array(&values, field.data_type()));
    }

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) | Value::Array(_) | Value::Object(_) => DataType::Utf8,
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Arc::new(arr)
        }

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Arc::new(arr)
        }
    }
}
