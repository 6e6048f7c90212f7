//! Plain-data views of hover layers for printing and table widgets.
use polars::prelude::{AnyValue, DataFrame};
use serde_json::{Map, Number, Value, json};

use crate::hover::tab::HoverLayer;

/// Convert a Polars AnyValue into a display string
pub fn anyvalue_to_display_string(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => crate::hover::format::format_number(*v),
        other => format!("{other}"),
    }
}

/// Convert a Polars AnyValue into a serde_json::Value
fn anyvalue_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::UInt8(n) => Value::Number((*n).into()),
        AnyValue::UInt16(n) => Value::Number((*n).into()),
        AnyValue::UInt32(n) => Value::Number((*n).into()),
        AnyValue::UInt64(n) => Value::Number((*n).into()),
        AnyValue::Int8(n) => Value::Number((*n).into()),
        AnyValue::Int16(n) => Value::Number((*n).into()),
        AnyValue::Int32(n) => Value::Number((*n).into()),
        AnyValue::Int64(n) => Value::Number((*n).into()),
        AnyValue::Float32(n) => Number::from_f64(f64::from(*n)).map_or(Value::Null, Value::Number),
        AnyValue::Float64(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        other => Value::String(format!("{other}")),
    }
}

/// Column names and up to `max_rows` rows of display strings.
pub fn frame_rows(df: &DataFrame, max_rows: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let rows = (0..df.height().min(max_rows))
        .map(|row| {
            df.get_columns()
                .iter()
                .map(|column| {
                    column
                        .get(row)
                        .map(|v| anyvalue_to_display_string(&v))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    (headers, rows)
}

/// Rows of `df` as JSON objects keyed by column name.
pub fn frame_to_json(df: &DataFrame, max_rows: usize) -> Value {
    let records = (0..df.height().min(max_rows))
        .map(|row| {
            let mut record = Map::new();
            for column in df.get_columns() {
                let value = column.get(row).map(|v| anyvalue_to_json(&v)).unwrap_or(Value::Null);
                record.insert(column.name().to_string(), value);
            }
            Value::Object(record)
        })
        .collect();
    Value::Array(records)
}

/// JSON form of a hover layer. The footer bitmap is reported by size only.
pub fn layer_to_json(layer: &HoverLayer, max_rows: usize) -> Value {
    let header = layer.header.as_ref().map(|summary| {
        let fields: Map<String, Value> = summary
            .rows()
            .into_iter()
            .map(|(name, text)| (name.to_string(), Value::String(text)))
            .collect();
        Value::Object(fields)
    });
    let footer = layer
        .footer
        .as_ref()
        .map(|image| json!({ "width": image.width(), "height": image.height() }));
    json!({
        "name": layer.name,
        "header": header,
        "data": layer.data.iter().map(|df| frame_to_json(df, max_rows)).collect::<Vec<_>>(),
        "footer": footer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frame_rows_formats_and_truncates() {
        let df = df! {
            "host" => ["a", "b", "c"],
            "value" => [1.0, 2.5, 3.0],
        }
        .unwrap();
        let (headers, rows) = frame_rows(&df, 2);
        assert_eq!(headers, vec!["host".to_string(), "value".to_string()]);
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), "2.5".to_string()],
            ]
        );
    }

    #[test]
    fn test_frame_to_json_nulls() {
        let df = df! { "yMax" => [None::<f64>, Some(20.0)] }.unwrap();
        assert_eq!(frame_to_json(&df, 10), json!([{ "yMax": null }, { "yMax": 20.0 }]));
    }

    #[test]
    fn test_layer_without_header() {
        let layer = HoverLayer {
            name: "Heatmap".to_string(),
            header: None,
            data: Vec::new(),
            footer: None,
        };
        assert_eq!(
            layer_to_json(&layer, 5),
            json!({ "name": "Heatmap", "header": null, "data": [], "footer": null })
        );
    }
}
