//! Schema descriptors: JSON Table Schema and CSVW table groups.
//!
//! A descriptor is either a single [`TableSchema`] listing the expected fields,
//! or a [`TableGroup`] naming several CSV files, each with an optional schema
//! of its own.
//!
//! A payload that is not valid JSON does not fail to load. It produces a
//! table schema whose description is [`MALFORMED_DESCRIPTION`]; callers are
//! expected to check [`TableSchema::is_malformed`] and reject it.
//!
//! # Examples
//!
//! ```rust
//! use csvlint_core::schema::Schema;
//!
//! let schema = Schema::from_json(
//!     r#"{"fields": [{"name": "id", "constraints": {"required": true}}]}"#,
//!     "schema.json",
//! )
//! .unwrap();
//!
//! let table = schema.as_table().unwrap();
//! assert_eq!(table.field_for_column(1).unwrap().name, "id");
//! assert!(table.field_for_column(2).is_none());
//! ```

use crate::fetch::{self, is_url, strip_file_scheme, FILE_SCHEME_PREFIX};
use crate::prelude::*;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Description marker of a schema whose payload could not be parsed.
pub const MALFORMED_DESCRIPTION: &str = "malformed";

/// A loaded schema descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A single-table schema
    Table(TableSchema),
    /// A group of tables, each with its own location
    Group(TableGroup),
}

/// An ordered list of expected fields for one CSV table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSchema {
    /// Where the schema was loaded from
    pub uri: String,
    /// Optional title
    pub title: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Fields in column order
    pub fields: Vec<Field>,
}

/// A named column with its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Column name expected in the header
    pub name: String,
    /// Constraint mapping, keyed as written in the descriptor (`minLength`, ...)
    pub constraints: Map<String, Value>,
}

/// A CSVW table group.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGroup {
    /// Where the group was loaded from
    pub uri: String,
    /// Tables in declaration order
    pub tables: Vec<Table>,
}

/// One table of a [`TableGroup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Resolved location: an HTTP(S) URL or a `file:` reference
    pub url: String,
    /// The table's column schema, if declared
    pub schema: Option<TableSchema>,
}

impl Schema {
    /// Fetches and parses a schema descriptor from a path or URL.
    ///
    /// # Errors
    ///
    /// Returns [`CsvlintError::Fetch`] when the descriptor cannot be retrieved
    /// and [`CsvlintError::Metadata`] when its structure is invalid.
    #[instrument]
    pub async fn load_from_uri(reference: &str) -> Result<Self> {
        let bytes = fetch::fetch_bytes(reference).await?;
        let text = String::from_utf8_lossy(&bytes);
        Self::from_json(&text, reference)
    }

    /// Parses a schema descriptor, resolving table URLs against `base`.
    pub fn from_json(text: &str, base: &str) -> Result<Self> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, base, "Schema payload is not valid JSON");
                return Ok(Schema::Table(TableSchema::malformed(base)));
            }
        };

        let object = value
            .as_object()
            .ok_or_else(|| CsvlintError::metadata_at("descriptor must be a JSON object", "$"))?;

        if let Some(tables) = object.get("tables") {
            let tables = tables
                .as_array()
                .ok_or_else(|| CsvlintError::metadata_at("tables must be an array", "$.tables"))?;
            let tables = tables
                .iter()
                .enumerate()
                .map(|(i, table)| parse_table(table, &format!("$.tables[{i}]"), base))
                .collect::<Result<Vec<_>>>()?;
            debug!(tables = tables.len(), "Parsed table group");
            return Ok(Schema::Group(TableGroup {
                uri: base.to_string(),
                tables,
            }));
        }

        if object.contains_key("url") && object.contains_key("tableSchema") {
            let table = parse_table(&value, "$", base)?;
            return Ok(Schema::Group(TableGroup {
                uri: base.to_string(),
                tables: vec![table],
            }));
        }

        parse_table_schema(object, base).map(Schema::Table)
    }

    /// Returns the single-table schema, if this is one.
    pub fn as_table(&self) -> Option<&TableSchema> {
        match self {
            Schema::Table(table) => Some(table),
            Schema::Group(_) => None,
        }
    }

    /// Returns the table group, if this is one.
    pub fn as_group(&self) -> Option<&TableGroup> {
        match self {
            Schema::Table(_) => None,
            Schema::Group(group) => Some(group),
        }
    }

    /// Returns the table schema that applies to a source at `location`.
    pub fn table_schema_for(&self, location: &str) -> Option<&TableSchema> {
        match self {
            Schema::Table(table) => Some(table),
            Schema::Group(group) => group.table_for(location).and_then(|t| t.schema.as_ref()),
        }
    }
}

impl TableSchema {
    /// Creates the sentinel schema produced for an unparseable payload.
    pub fn malformed(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: Some(MALFORMED_DESCRIPTION.to_string()),
            description: Some(MALFORMED_DESCRIPTION.to_string()),
            fields: Vec::new(),
        }
    }

    /// Returns true if this is the malformed-payload sentinel.
    pub fn is_malformed(&self) -> bool {
        self.description.as_deref() == Some(MALFORMED_DESCRIPTION)
    }

    /// Returns the field for a 1-based column number.
    pub fn field_for_column(&self, column: u64) -> Option<&Field> {
        let index = usize::try_from(column.checked_sub(1)?).ok()?;
        self.fields.get(index)
    }
}

impl Field {
    /// Creates a field without constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Map::new(),
        }
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, key: impl Into<String>, value: Value) -> Self {
        self.constraints.insert(key.into(), value);
        self
    }

    /// Whether a value must be present.
    pub fn required(&self) -> bool {
        self.bool_constraint("required")
    }

    /// Whether values must be unique within the column.
    pub fn unique(&self) -> bool {
        self.bool_constraint("unique")
    }

    /// Minimum value length in characters.
    pub fn min_length(&self) -> Option<u64> {
        self.constraints.get("minLength").and_then(Value::as_u64)
    }

    /// Maximum value length in characters.
    pub fn max_length(&self) -> Option<u64> {
        self.constraints.get("maxLength").and_then(Value::as_u64)
    }

    /// Regular expression values must match in full.
    pub fn pattern(&self) -> Option<&str> {
        self.constraints.get("pattern").and_then(Value::as_str)
    }

    /// Smallest allowed numeric value.
    pub fn minimum(&self) -> Option<f64> {
        self.numeric_constraint("minimum")
    }

    /// Largest allowed numeric value.
    pub fn maximum(&self) -> Option<f64> {
        self.numeric_constraint("maximum")
    }

    fn bool_constraint(&self, key: &str) -> bool {
        self.constraints
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    // Bounds may be written as numbers or numeric strings
    fn numeric_constraint(&self, key: &str) -> Option<f64> {
        match self.constraints.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl TableGroup {
    /// Finds the table declared at `location`.
    ///
    /// URLs must match exactly. Local locations are compared as absolute
    /// paths, ignoring a `file:` prefix, so `data.csv` run from the
    /// descriptor's directory finds `file:/that/dir/data.csv`.
    pub fn table_for(&self, location: &str) -> Option<&Table> {
        if let Some(table) = self.tables.iter().find(|t| t.url == location) {
            return Some(table);
        }
        if is_url(location) {
            return None;
        }

        let wanted = fetch::absolute_path(Path::new(strip_file_scheme(location)));
        self.tables.iter().find(|t| {
            !is_url(&t.url) && fetch::absolute_path(Path::new(strip_file_scheme(&t.url))) == wanted
        })
    }
}

fn parse_table_schema(object: &Map<String, Value>, base: &str) -> Result<TableSchema> {
    let fields = match object.get("fields") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_field(item, &format!("$.fields[{i}]")))
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(CsvlintError::metadata_at(
                "fields must be an array",
                "$.fields",
            ))
        }
    };

    Ok(TableSchema {
        uri: base.to_string(),
        title: string_property(object, "title"),
        description: string_property(object, "description"),
        fields,
    })
}

fn parse_field(value: &Value, path: &str) -> Result<Field> {
    let object = value
        .as_object()
        .ok_or_else(|| CsvlintError::metadata_at("field must be an object", path))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| CsvlintError::metadata_at("name must be a string", format!("{path}.name")))?;
    let constraints = match object.get("constraints") {
        None => Map::new(),
        Some(Value::Object(constraints)) => constraints.clone(),
        Some(_) => {
            return Err(CsvlintError::metadata_at(
                "constraints must be an object",
                format!("{path}.constraints"),
            ))
        }
    };

    match constraints.get("pattern") {
        None => {}
        Some(Value::String(pattern)) => {
            anchored_pattern(pattern).map_err(|e| {
                CsvlintError::metadata_at(
                    format!("invalid pattern: {e}"),
                    format!("{path}.constraints.pattern"),
                )
            })?;
        }
        Some(_) => {
            return Err(CsvlintError::metadata_at(
                "pattern must be a string",
                format!("{path}.constraints.pattern"),
            ))
        }
    }

    Ok(Field {
        name: name.to_string(),
        constraints,
    })
}

/// Compiles a `pattern` constraint so it must match a whole value.
pub(crate) fn anchored_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

fn parse_table(value: &Value, path: &str, base: &str) -> Result<Table> {
    let object = value
        .as_object()
        .ok_or_else(|| CsvlintError::metadata_at("table must be an object", path))?;
    let url = object
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| CsvlintError::metadata_at("url must be a string", format!("{path}.url")))?;
    let url = resolve_table_url(base, url, &format!("{path}.url"))?;

    let schema = match object.get("tableSchema") {
        None => None,
        Some(Value::Object(table_schema)) => Some(parse_columns(
            table_schema,
            &url,
            &format!("{path}.tableSchema"),
        )?),
        Some(_) => {
            return Err(CsvlintError::metadata_at(
                "tableSchema must be an object",
                format!("{path}.tableSchema"),
            ))
        }
    };

    Ok(Table { url, schema })
}

fn parse_columns(object: &Map<String, Value>, uri: &str, path: &str) -> Result<TableSchema> {
    let columns = match object.get("columns") {
        None => Vec::new(),
        Some(Value::Array(columns)) => columns.clone(),
        Some(_) => {
            return Err(CsvlintError::metadata_at(
                "columns must be an array",
                format!("{path}.columns"),
            ))
        }
    };

    let mut fields = Vec::with_capacity(columns.len());
    for (i, column) in columns.iter().enumerate() {
        let column = column.as_object().ok_or_else(|| {
            CsvlintError::metadata_at("column must be an object", format!("{path}.columns[{i}]"))
        })?;
        let name = column
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| match column.get("titles") {
                Some(Value::String(title)) => Some(title.as_str()),
                Some(Value::Array(titles)) => titles.first().and_then(Value::as_str),
                _ => None,
            })
            .unwrap_or_default();
        let mut field = Field::new(name);
        if column.get("required").and_then(Value::as_bool) == Some(true) {
            field = field.with_constraint("required", Value::Bool(true));
        }
        fields.push(field);
    }

    Ok(TableSchema {
        uri: uri.to_string(),
        title: None,
        description: None,
        fields,
    })
}

fn resolve_table_url(base: &str, url: &str, path: &str) -> Result<String> {
    if is_url(url) || url.starts_with(FILE_SCHEME_PREFIX) {
        return Ok(url.to_string());
    }

    if is_url(base) {
        let joined = url::Url::parse(base)
            .and_then(|base| base.join(url))
            .map_err(|e| CsvlintError::metadata_at(format!("invalid url: {e}"), path))?;
        return Ok(joined.to_string());
    }

    let dir = Path::new(strip_file_scheme(base))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let resolved: PathBuf = fetch::absolute_path(&dir).join(url);
    Ok(format!("{FILE_SCHEME_PREFIX}{}", resolved.display()))
}

fn string_property(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
