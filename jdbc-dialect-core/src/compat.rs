//! Default-value casting across revisions of the column-metadata contract.
//!
//! Frameworks sitting on top of this crate changed how a column's default value is shaped
//! over time: the oldest revisions only *extracted* the default and cast it loosely, later ones
//! cast it strictly through the column's type, and the newest ones cast it through the full type
//! metadata (precision and scale included). Each revision is a [`ContractVersion`] with its own
//! [`Strategy`] row; exactly one is active per process.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::{LazyLock, OnceLock};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::column::ColumnType;
use crate::error::{Error, UnsupportedTypeError};
use crate::types::TypeFamily;
use crate::value::Value;

static ACTIVE: OnceLock<ContractVersion> = OnceLock::new();

/// A revision of the surrounding framework's column-metadata construction contract.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ContractVersion {
    /// Framework revisions before 4.2: the default is extracted and cast leniently.
    Legacy,

    /// Framework 4.2: the default is cast strictly through the column's type.
    CastType,

    /// Framework 5.0 and later: strict casting through the full type metadata.
    #[default]
    TypeMetadata,
}

impl ContractVersion {
    /// Environment variable consulted by [`active()`][Self::active] when no contract was
    /// installed explicitly. Accepts a framework version (`4.2`) or a contract name
    /// (`cast-type`).
    pub const ENV_VAR: &'static str = "JDBC_DIALECT_CONTRACT";

    /// Fix the contract used for the rest of the process.
    ///
    /// Returns the already-active contract as the error if one was fixed before.
    pub fn init(self) -> Result<(), ContractVersion> {
        ACTIVE.set(self).map_err(|_| Self::current_or_default())?;

        tracing::debug!(contract = %self, "installed column-metadata contract");

        Ok(())
    }

    /// The contract in effect for this process.
    ///
    /// On first use, falls back to [`ENV_VAR`][Self::ENV_VAR] (read through `dotenvy`, so a
    /// `.env` file is honored) and then to [`TypeMetadata`][Self::TypeMetadata].
    pub fn active() -> Result<ContractVersion, Error> {
        if let Some(contract) = ACTIVE.get() {
            return Ok(*contract);
        }

        let contract = match dotenvy::var(Self::ENV_VAR) {
            Ok(var) => var.parse()?,
            Err(_) => ContractVersion::default(),
        };

        Ok(*ACTIVE.get_or_init(|| contract))
    }

    fn current_or_default() -> ContractVersion {
        ACTIVE.get().copied().unwrap_or_default()
    }

    /// Select the contract for a framework version string such as `3.2`, `4.2.11` or `7.1`.
    pub fn for_framework_version(version: &str) -> Result<Self, Error> {
        let mut parts = version.trim().split('.');

        let mut next = |part: &str| -> Result<u32, Error> {
            parts
                .next()
                .unwrap_or("0")
                .parse()
                .map_err(|_| err_config!("invalid {} in framework version {:?}", part, version))
        };

        let major = next("major")?;
        let minor = next("minor")?;

        Ok(match (major, minor) {
            (..=3, _) | (4, ..=1) => ContractVersion::Legacy,
            (4, _) => ContractVersion::CastType,
            _ => ContractVersion::TypeMetadata,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ContractVersion::Legacy => "legacy",
            ContractVersion::CastType => "cast-type",
            ContractVersion::TypeMetadata => "type-metadata",
        }
    }

    fn strategy(self) -> &'static Strategy {
        match self {
            ContractVersion::Legacy => &LEGACY,
            ContractVersion::CastType => &CAST_TYPE,
            ContractVersion::TypeMetadata => &TYPE_METADATA,
        }
    }
}

impl FromStr for ContractVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match &*s.trim().to_ascii_lowercase() {
            "legacy" => Ok(ContractVersion::Legacy),
            "cast-type" | "cast_type" => Ok(ContractVersion::CastType),
            "type-metadata" | "type_metadata" => Ok(ContractVersion::TypeMetadata),
            version if version.starts_with(|c: char| c.is_ascii_digit()) => {
                Self::for_framework_version(version)
            }
            _ => Err(err_config!("unknown column-metadata contract {:?}", s)),
        }
    }
}

impl Display for ContractVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One casting rule per type family; text defaults are never transformed.
struct Strategy {
    boolean: fn(&str) -> Value,
    integer: fn(&str) -> Value,
    float: fn(&str) -> Value,
    decimal: fn(&str, &ColumnType) -> Value,
    rescale: fn(BigDecimal, &ColumnType) -> BigDecimal,
    date: fn(&str) -> Value,
    time: fn(&str) -> Value,
    timestamp: fn(&str) -> Value,
    binary: fn(&str) -> Value,
}

static LEGACY: Strategy = Strategy {
    boolean: loose_boolean,
    integer: loose_integer,
    float: loose_float,
    decimal: loose_decimal,
    rescale: keep_scale,
    date: loose_date,
    time: parse_time,
    timestamp: loose_timestamp,
    binary: raw_bytes,
};

static CAST_TYPE: Strategy = Strategy {
    boolean: strict_boolean,
    integer: strict_integer,
    float: strict_float,
    decimal: strict_decimal,
    rescale: keep_scale,
    date: strict_date,
    time: parse_time,
    timestamp: strict_timestamp,
    binary: hex_bytes,
};

static TYPE_METADATA: Strategy = Strategy {
    boolean: strict_boolean,
    integer: integral_integer,
    float: strict_float,
    decimal: scaled_decimal,
    rescale: round_to_scale,
    date: strict_date,
    time: parse_time,
    timestamp: strict_timestamp,
    binary: hex_bytes,
};

/// Cast a raw driver default into the native representation implied by `column`.
///
/// Deterministic and free of side effects. A value that already has the native
/// representation is returned unchanged (decimals are still rounded to the column scale where
/// the contract does so for text), so re-applying the cast to its own output is a no-op.
/// `NULL` casts to `NULL` for every type.
pub fn cast_default(
    raw: &Value,
    column: &ColumnType,
    contract: ContractVersion,
) -> Result<Value, UnsupportedTypeError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let family = column.sql_type.family().ok_or(UnsupportedTypeError {
        sql_type: column.sql_type,
        contract,
    })?;

    let strategy = contract.strategy();

    if raw.is_native_for(family) {
        return Ok(match raw {
            Value::Decimal(d) => Value::Decimal((strategy.rescale)(d.clone(), column)),
            _ => raw.clone(),
        });
    }

    let text: Cow<'_, str> = match raw {
        Value::Text(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    };

    Ok(match family {
        TypeFamily::Text => Value::Text(text.into_owned()),
        TypeFamily::Boolean => (strategy.boolean)(&text),
        TypeFamily::Integer => (strategy.integer)(&text),
        TypeFamily::Float => (strategy.float)(&text),
        TypeFamily::Decimal => (strategy.decimal)(&text, column),
        TypeFamily::Date => (strategy.date)(&text),
        TypeFamily::Time => (strategy.time)(&text),
        TypeFamily::Timestamp => (strategy.timestamp)(&text),
        TypeFamily::Binary => (strategy.binary)(&text),
    })
}

const TRUE_VALUES: &[&str] = &["t", "true", "1", "y", "yes", "on"];
const FALSE_VALUES: &[&str] = &["f", "false", "0", "n", "no", "off"];

// optional sign, digits, optional fraction and exponent; anything after is ignored
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+(\.\d+)?([eE][+-]?\d+)?").expect("BUG: invalid LEADING_NUMBER regex")
});

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn leading_number(s: &str) -> Option<&str> {
    LEADING_NUMBER.find(s.trim()).map(|m| m.as_str())
}

fn loose_boolean(s: &str) -> Value {
    if blank(s) {
        return Value::Null;
    }

    let s = s.trim();
    Value::Bool(TRUE_VALUES.iter().any(|t| t.eq_ignore_ascii_case(s)))
}

fn strict_boolean(s: &str) -> Value {
    let s = s.trim();

    if TRUE_VALUES.iter().any(|t| t.eq_ignore_ascii_case(s)) {
        Value::Bool(true)
    } else if FALSE_VALUES.iter().any(|f| f.eq_ignore_ascii_case(s)) {
        Value::Bool(false)
    } else {
        Value::Null
    }
}

fn loose_integer(s: &str) -> Value {
    if blank(s) {
        return Value::Null;
    }

    let Some(number) = leading_number(s) else {
        return Value::Int(0);
    };

    // drop any fraction or exponent; `12.7abc` is 12
    let end = number.find(['.', 'e', 'E']).unwrap_or(number.len());
    number[..end].parse().map_or(Value::Null, Value::Int)
}

fn strict_integer(s: &str) -> Value {
    s.trim().parse().map_or(Value::Null, Value::Int)
}

fn integral_integer(s: &str) -> Value {
    let s = s.trim();

    match s.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => {
            strict_integer(int)
        }
        _ => strict_integer(s),
    }
}

fn loose_float(s: &str) -> Value {
    if blank(s) {
        return Value::Null;
    }

    match leading_number(s) {
        Some(number) => number.parse().map_or(Value::Null, Value::Float),
        None => Value::Float(0.0),
    }
}

fn strict_float(s: &str) -> Value {
    s.trim().parse().map_or(Value::Null, Value::Float)
}

fn loose_decimal(s: &str, _column: &ColumnType) -> Value {
    if blank(s) {
        return Value::Null;
    }

    match leading_number(s) {
        Some(number) => number.parse().map_or(Value::Null, Value::Decimal),
        None => Value::Decimal(BigDecimal::from(0)),
    }
}

fn strict_decimal(s: &str, _column: &ColumnType) -> Value {
    s.trim().parse().map_or(Value::Null, Value::Decimal)
}

fn scaled_decimal(s: &str, column: &ColumnType) -> Value {
    match strict_decimal(s, column) {
        Value::Decimal(d) => Value::Decimal(round_to_scale(d, column)),
        value => value,
    }
}

fn keep_scale(d: BigDecimal, _column: &ColumnType) -> BigDecimal {
    d
}

fn round_to_scale(d: BigDecimal, column: &ColumnType) -> BigDecimal {
    match column.scale {
        Some(scale) => d.round(i64::from(scale)),
        None => d,
    }
}

fn loose_date(s: &str) -> Value {
    let s = s.trim();

    s.get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, DATE_FORMAT).ok())
        .map_or(Value::Null, Value::Date)
}

fn strict_date(s: &str) -> Value {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_or(Value::Null, Value::Date)
}

fn parse_time(s: &str) -> Value {
    let s = s.trim();

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
        .map_or(Value::Null, Value::Time)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

fn loose_timestamp(s: &str) -> Value {
    parse_timestamp(s)
        .or_else(|| match loose_date(s) {
            Value::Date(date) => Some(date.and_time(NaiveTime::MIN)),
            _ => None,
        })
        .map_or(Value::Null, Value::Timestamp)
}

fn strict_timestamp(s: &str) -> Value {
    parse_timestamp(s).map_or(Value::Null, Value::Timestamp)
}

fn raw_bytes(s: &str) -> Value {
    Value::Bytes(s.as_bytes().to_vec())
}

fn hex_bytes(s: &str) -> Value {
    let s = s.trim();

    let digits = if let Some(rest) = s.strip_prefix("\\x").or_else(|| s.strip_prefix("0x")) {
        rest
    } else if let Some(rest) = s
        .strip_prefix("X'")
        .or_else(|| s.strip_prefix("x'"))
        .and_then(|rest| rest.strip_suffix('\''))
    {
        rest
    } else {
        return raw_bytes(s);
    };

    hex::decode(digits).map_or(Value::Null, Value::Bytes)
}
