//! Host dataview JSON to pipeline records, settings and update bundles.

use serde_json::Value;

use pipeline_core::{LayoutBand, PipelineError, PipelineRecord, PipelineSettings, Viewport};

const ROLE_TITLE: &str = "Title";
const ROLE_PHASE: &str = "Phase";
const ROLE_CATEGORY: &str = "Category";
const ROLE_NAME: &str = "Name";

/// Convert the rows of one dataview from a JSON string.
pub fn records_from_str(dataview_json: &str) -> Result<Vec<PipelineRecord>, PipelineError> {
    let value: Value =
        serde_json::from_str(dataview_json).map_err(|err| PipelineError::Parse(err.to_string()))?;
    records_from_value(&value)
}

/// Convert the rows of one dataview held in a `serde_json::Value`.
///
/// The dataview is expected as `{"table": {"columns": [...], "rows": [...]}}`;
/// a bare `{"columns", "rows"}` object is accepted as well. A dataview with
/// no table shape yields an empty record list rather than an error.
pub fn records_from_value(dataview: &Value) -> Result<Vec<PipelineRecord>, PipelineError> {
    let Some(table) = table_of(dataview) else {
        return Ok(Vec::new());
    };

    let columns = table.get("columns").and_then(Value::as_array);
    let rows = table.get("rows").and_then(Value::as_array);
    let (Some(columns), Some(rows)) = (columns, rows) else {
        return Ok(Vec::new());
    };

    let indexes = scan_roles(columns);

    Ok(rows
        .iter()
        .filter_map(Value::as_array)
        .map(|row| record_from_row(row, &indexes))
        .collect())
}

fn table_of(dataview: &Value) -> Option<&Value> {
    if let Some(table) = dataview.get("table") {
        return Some(table);
    }
    if dataview.get("columns").is_some() && dataview.get("rows").is_some() {
        return Some(dataview);
    }
    None
}

/// Column position claimed by each semantic role; first match wins.
#[derive(Debug, Default)]
struct RoleIndexes {
    title: Option<usize>,
    phase: Option<usize>,
    category: Option<usize>,
    name: Option<usize>,
}

fn scan_roles(columns: &[Value]) -> RoleIndexes {
    let mut indexes = RoleIndexes::default();

    for (position, column) in columns.iter().enumerate() {
        if indexes.title.is_none() && has_role(column, ROLE_TITLE) {
            indexes.title = Some(position);
        }
        if indexes.phase.is_none() && has_role(column, ROLE_PHASE) {
            indexes.phase = Some(position);
        }
        if indexes.category.is_none() && has_role(column, ROLE_CATEGORY) {
            indexes.category = Some(position);
        }
        if indexes.name.is_none() && has_role(column, ROLE_NAME) {
            indexes.name = Some(position);
        }
    }

    indexes
}

fn has_role(column: &Value, role: &str) -> bool {
    column
        .get("roles")
        .and_then(|roles| roles.get(role))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn record_from_row(row: &[Value], indexes: &RoleIndexes) -> PipelineRecord {
    let field = |index: Option<usize>| index.and_then(|i| row.get(i)).and_then(cell_text);

    PipelineRecord {
        title: field(indexes.title),
        phase: field(indexes.phase),
        category: field(indexes.category),
        name: field(indexes.name),
    }
}

/// Render a cell the way the host displays it; falsy values map to `None`.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(text) => {
            if text.is_empty() {
                None
            } else {
                Some(text.clone())
            }
        }
        Value::Number(number) => number_text(number),
        _ => None,
    }
}

fn number_text(number: &serde_json::Number) -> Option<String> {
    if let Some(int) = number.as_i64() {
        return if int == 0 {
            None
        } else {
            Some(int.to_string())
        };
    }

    let float = number.as_f64()?;
    if float == 0.0 {
        return None;
    }
    Some(format_numeric(float))
}

fn format_numeric(value: f64) -> String {
    if (value.fract() - 0.0).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else if (value * 10.0).fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Resolve the raw settings blob. Properties live under the
/// [`PipelineSettings::OBJECT_NAME`] object; a blob handing the property bag
/// directly is accepted too. Each property is decoded on its own, so an
/// absent or malformed field falls back to its default without dragging the
/// other fields along, never an error.
pub fn settings_from_value(raw: Option<&Value>) -> PipelineSettings {
    let defaults = PipelineSettings::default();
    let Some(raw) = raw else {
        return defaults;
    };

    let object = raw.get(PipelineSettings::OBJECT_NAME).unwrap_or(raw);
    PipelineSettings {
        title: text_property(object, "title").unwrap_or(defaults.title),
        phases: text_property(object, "phases").unwrap_or(defaults.phases),
        categories: text_property(object, "categories").unwrap_or(defaults.categories),
        image_url: text_property(object, "imageUrl").unwrap_or(defaults.image_url),
        layout: match text_property(object, "layout") {
            Some(layout) => LayoutBand::parse(&layout),
            None => defaults.layout,
        },
    }
}

fn text_property(object: &Value, property: &str) -> Option<String> {
    object
        .get(property)
        .and_then(Value::as_str)
        .map(|text| text.to_string())
}

/// One decoded `update` payload from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBundle {
    pub viewport: Viewport,
    pub settings: PipelineSettings,
    pub records: Vec<PipelineRecord>,
}

/// Decode a full update payload from a JSON string.
pub fn bundle_from_str(bundle_json: &str) -> Result<UpdateBundle, PipelineError> {
    let value: Value =
        serde_json::from_str(bundle_json).map_err(|err| PipelineError::Parse(err.to_string()))?;
    bundle_from_value(&value)
}

/// Decode a full update payload: viewport, the first table-shaped dataset in
/// `dataViews` and the raw settings. A missing dataset or missing settings
/// yield defaults; only a payload that is not a JSON object is an error.
pub fn bundle_from_value(bundle: &Value) -> Result<UpdateBundle, PipelineError> {
    if !bundle.is_object() {
        return Err(PipelineError::Parse(
            "update payload is not a JSON object".to_string(),
        ));
    }

    let records = match first_table_dataview(bundle) {
        Some(dataview) => records_from_value(dataview)?,
        None => Vec::new(),
    };

    Ok(UpdateBundle {
        viewport: viewport_from(bundle),
        settings: settings_from_value(bundle.get("settings")),
        records,
    })
}

fn first_table_dataview(bundle: &Value) -> Option<&Value> {
    bundle
        .get("dataViews")
        .and_then(Value::as_array)?
        .iter()
        .find(|dataview| table_of(dataview).is_some())
}

fn viewport_from(bundle: &Value) -> Viewport {
    let Some(viewport) = bundle.get("viewport") else {
        return Viewport::default();
    };

    Viewport {
        width: viewport.get("width").and_then(Value::as_f64).unwrap_or(0.0),
        height: viewport
            .get("height")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
    }
}
