use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::compat::{self, ContractVersion};
use crate::descriptor::ConnectionDescriptor;
use crate::error::{Error, UnsupportedTypeError};
use crate::types::SqlType;
use crate::value::Value;

mod factory;

pub use factory::{build_column_metadata, ColumnFactory};

/// Replaces the generic "the raw default is the default" extraction.
///
/// Receives the raw driver string; returns `None` when the column has no usable default
/// (e.g. it is generated by a sequence).
pub type DefaultExtractor = fn(&str) -> Option<String>;

/// Replaces the contract-selected cast of an extracted default.
///
/// Overrides usually handle their own types and delegate everything else to
/// [`cast_default`][crate::compat::cast_default].
pub type DefaultCaster =
    fn(&Value, &ColumnType, ContractVersion) -> Result<Value, UnsupportedTypeError>;

/// Type information for a column: the JDBC type code plus what the driver reported
/// about it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnType {
    pub sql_type: SqlType,
    /// Database-specific type name, e.g. `VARCHAR(255)` or `_int4`.
    pub type_name: Option<String>,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl ColumnType {
    pub fn new(sql_type: SqlType) -> Self {
        ColumnType {
            sql_type,
            type_name: None,
            limit: None,
            precision: None,
            scale: None,
        }
    }

    /// The type name as reported by the driver, or the `java.sql.Types` name.
    pub fn name(&self) -> &str {
        self.type_name.as_deref().unwrap_or(self.sql_type.name())
    }
}

/// A column as described by a driver's metadata facility, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: Option<String>,
    pub sql_type_code: Option<i32>,
    pub type_name: Option<String>,
    pub nullable: bool,
    pub raw_default: Option<String>,
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl Default for RawColumn {
    fn default() -> Self {
        RawColumn {
            name: None,
            sql_type_code: None,
            type_name: None,
            nullable: true,
            raw_default: None,
            limit: None,
            precision: None,
            scale: None,
        }
    }
}

impl RawColumn {
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        RawColumn {
            name: Some(name.to_owned()),
            sql_type_code: Some(sql_type.code()),
            ..RawColumn::default()
        }
    }

    pub fn type_name(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_owned());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn raw_default(mut self, raw_default: &str) -> Self {
        self.raw_default = Some(raw_default.to_owned());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// The connection a column is being built for, as seen by dialect extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnContext {
    dialect: Option<String>,
    driver: Option<String>,
    adapter_spec: Option<String>,
    properties: BTreeMap<String, String>,
}

impl ColumnContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: &str) -> Self {
        self.dialect = Some(dialect.to_owned());
        self
    }

    pub fn driver(mut self, driver: &str) -> Self {
        self.driver = Some(driver.to_owned());
        self
    }

    pub fn adapter_spec(mut self, adapter_spec: &str) -> Self {
        self.adapter_spec = Some(adapter_spec.to_owned());
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_owned(), value.to_owned());
        self
    }

    /// The identifier matched against registered dialect matchers: the explicit dialect,
    /// falling back to the driver class name.
    pub fn dialect_identifier(&self) -> &str {
        self.dialect
            .as_deref()
            .or(self.driver.as_deref())
            .unwrap_or_default()
    }

    pub fn get_adapter_spec(&self) -> Option<&str> {
        self.adapter_spec.as_deref()
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl From<&ConnectionDescriptor> for ColumnContext {
    fn from(target: &ConnectionDescriptor) -> Self {
        ColumnContext {
            dialect: target.get_dialect().map(str::to_owned),
            driver: target.get_driver_class_name().map(str::to_owned),
            adapter_spec: Some(target.get_adapter_spec().to_owned()),
            properties: target.get_properties().clone(),
        }
    }
}

/// A column under construction, handed through each matching dialect extension.
///
/// Extensions are decorate steps: they take the draft by value and return it augmented.
#[derive(Debug, Clone)]
pub struct ColumnDraft {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    raw_default: Option<String>,
    default_extractor: Option<DefaultExtractor>,
    default_caster: Option<DefaultCaster>,
    extensions: BTreeMap<Cow<'static, str>, Value>,
}

impl ColumnDraft {
    pub(crate) fn new(name: &str, sql_type: SqlType, raw: &RawColumn) -> Self {
        ColumnDraft {
            name: name.to_owned(),
            column_type: ColumnType {
                sql_type,
                type_name: raw.type_name.clone(),
                limit: raw.limit,
                precision: raw.precision,
                scale: raw.scale,
            },
            nullable: raw.nullable,
            raw_default: raw.raw_default.clone(),
            default_extractor: None,
            default_caster: None,
            extensions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn raw_default(&self) -> Option<&str> {
        self.raw_default.as_deref()
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Reinterpret the column as another JDBC type (e.g. `TINYINT(1)` as `BOOLEAN`).
    pub fn with_sql_type(mut self, sql_type: SqlType) -> Self {
        self.column_type.sql_type = sql_type;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default_extractor(mut self, extractor: DefaultExtractor) -> Self {
        self.default_extractor = Some(extractor);
        self
    }

    pub fn with_default_caster(mut self, caster: DefaultCaster) -> Self {
        self.default_caster = Some(caster);
        self
    }

    /// Attach a dialect-specific field. Attaching the same key again replaces the value.
    pub fn with_extension(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub(crate) fn finish(self, contract: ContractVersion) -> Result<ColumnMetadata, Error> {
        let extracted = match (self.raw_default.as_deref(), self.default_extractor) {
            (None, _) => None,
            (Some(raw), Some(extract)) => extract(raw),
            (Some(raw), None) => Some(raw.to_owned()),
        };

        let raw = Value::from(extracted);
        let cast = self.default_caster.unwrap_or(compat::cast_default);
        let default = cast(&raw, &self.column_type, contract)?;

        Ok(ColumnMetadata {
            name: self.name,
            column_type: self.column_type,
            nullable: self.nullable,
            default,
            raw_default: self.raw_default,
            extensions: self.extensions,
        })
    }
}

/// Metadata for a single column, specialized by every dialect extension that applied to it.
///
/// The default is always in its cast, native representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnMetadata {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Value,
    raw_default: Option<String>,
    extensions: BTreeMap<Cow<'static, str>, Value>,
}

impl ColumnMetadata {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn sql_type(&self) -> SqlType {
        self.column_type.sql_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_null()
    }

    /// The default exactly as the driver reported it.
    pub fn raw_default(&self) -> Option<&str> {
        self.raw_default.as_deref()
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extensions.iter().map(|(k, v)| (&**k, v))
    }
}
