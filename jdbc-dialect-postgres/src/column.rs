use std::sync::LazyLock;

use jdbc_dialect_core::{
    cast_default, BoxDynError, ColumnContext, ColumnDraft, ColumnType, ContractVersion,
    DialectMatcher, Result, SqlType, UnsupportedTypeError, Value,
};
use regex::Regex;

// 'literal' or 'literal'::type, possibly cast more than once; '' escapes a quote
static QUOTED_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^'((?:[^']|'')*)'(?:::[\w\s\[\]".]+)*$"#)
        .expect("BUG: invalid QUOTED_LITERAL regex")
});

// 42, -1, (-1), (-1)::integer
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\(?(-?\d+(?:\.\d+)?)\)?(?:::[\w\s\[\]".]+)*$"#)
        .expect("BUG: invalid NUMBER regex")
});

static NULL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^NULL(?:::.*)?$").expect("BUG: invalid NULL_LITERAL regex")
});

static NEXTVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^nextval\(").expect("BUG: invalid NEXTVAL regex")
});

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[\w.]+\(.*\)|current_(?:date|time|timestamp|user)|localtime(?:stamp)?)$")
        .expect("BUG: invalid FUNCTION regex")
});

pub(crate) fn matcher() -> Result<DialectMatcher> {
    DialectMatcher::pattern("(?i)postgres")
}

pub(crate) fn extend(_: &ColumnContext, draft: ColumnDraft) -> Result<ColumnDraft, BoxDynError> {
    let raw_default = draft.raw_default().map(|raw| raw.trim().to_owned());
    let type_name = draft.column_type().type_name.clone();

    let mut draft = draft.with_default_extractor(extract_default);

    if let Some(raw) = raw_default {
        if NEXTVAL.is_match(&raw) {
            draft = draft.with_extension("postgres.serial", true);
        } else if is_server_evaluated(&raw) {
            draft = draft.with_extension("postgres.default_function", raw);
        }
    }

    match type_name.as_deref() {
        // pgjdbc reports `bool` as BIT
        Some("bool") if draft.column_type().sql_type == SqlType::BIT => {
            tracing::trace!(column = draft.name(), "reading bool column as BOOLEAN");
            draft = draft.with_sql_type(SqlType::BOOLEAN);
        }

        Some(name) if name.starts_with('_') || draft.column_type().sql_type == SqlType::ARRAY => {
            let element = name.trim_start_matches('_').to_owned();

            tracing::trace!(column = draft.name(), %element, "reading array column");

            draft = draft
                .with_sql_type(SqlType::ARRAY)
                .with_extension("postgres.element_type", element)
                .with_default_caster(cast_array_default);
        }

        // jsonb, uuid, inet and friends
        _ if draft.column_type().sql_type == SqlType::OTHER => {
            draft = draft.with_default_caster(cast_other_default);
        }

        _ => {}
    }

    Ok(draft)
}

fn extract_default(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || NULL_LITERAL.is_match(raw) {
        return None;
    }

    if let Some(captures) = QUOTED_LITERAL.captures(raw) {
        return Some(captures[1].replace("''", "'"));
    }

    if let Some(captures) = NUMBER.captures(raw) {
        return Some(captures[1].to_owned());
    }

    // sequences, functions and expressions are evaluated by the server on insert
    if is_server_evaluated(raw) {
        return None;
    }

    Some(raw.to_owned())
}

/// A function call, or an expression such as `'a'::text || 'b'::text` that is more than one
/// literal.
fn is_server_evaluated(raw: &str) -> bool {
    FUNCTION.is_match(raw) || (raw.contains('\'') && !QUOTED_LITERAL.is_match(raw))
}

/// Keep the default of a type pgjdbc reports as `OTHER` as the literal text.
///
/// Columns of any other type are cast as usual.
pub fn cast_other_default(
    raw: &Value,
    column: &ColumnType,
    contract: ContractVersion,
) -> Result<Value, UnsupportedTypeError> {
    if column.sql_type != SqlType::OTHER {
        return cast_default(raw, column, contract);
    }

    Ok(match raw {
        Value::Null | Value::Text(_) => raw.clone(),
        other => Value::Text(other.to_string()),
    })
}

/// Cast an array literal such as `{1,2,NULL}` element by element.
///
/// Element types are taken from the `_`-prefixed array type name (`_int4` holds `int4`).
/// Columns that are not arrays are cast as usual.
pub fn cast_array_default(
    raw: &Value,
    column: &ColumnType,
    contract: ContractVersion,
) -> Result<Value, UnsupportedTypeError> {
    if column.sql_type != SqlType::ARRAY {
        return cast_default(raw, column, contract);
    }

    let text = match raw {
        Value::Null => return Ok(Value::Null),
        Value::Array(_) => return Ok(raw.clone()),
        Value::Text(text) => text,
        _ => {
            return Err(UnsupportedTypeError {
                sql_type: column.sql_type,
                contract,
            })
        }
    };

    let Some(items) = parse_array_literal(text) else {
        return Ok(Value::Null);
    };

    let element = ColumnType::new(element_type(column.type_name.as_deref().unwrap_or_default()));

    items
        .into_iter()
        .map(|item| match item {
            Some(item) => cast_default(&Value::Text(item), &element, contract),
            None => Ok(Value::Null),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn element_type(array_type: &str) -> SqlType {
    match &*array_type.trim_start_matches('_').to_ascii_lowercase() {
        "bool" => SqlType::BOOLEAN,
        "int2" => SqlType::SMALLINT,
        "int4" => SqlType::INTEGER,
        "int8" => SqlType::BIGINT,
        "float4" => SqlType::REAL,
        "float8" => SqlType::DOUBLE,
        "numeric" => SqlType::NUMERIC,
        "date" => SqlType::DATE,
        "time" => SqlType::TIME,
        "timestamp" => SqlType::TIMESTAMP,
        "bytea" => SqlType::BINARY,
        _ => SqlType::VARCHAR,
    }
}

/// Split a one-dimensional array literal into its elements; unquoted `NULL` is `None`.
fn parse_array_literal(literal: &str) -> Option<Vec<Option<String>>> {
    let inner = literal.trim().strip_prefix('{')?.strip_suffix('}')?;

    let mut items = Vec::new();

    if inner.trim().is_empty() {
        return Some(items);
    }

    let mut chars = inner.chars();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }

            '\\' if in_quotes => current.push(chars.next()?),

            // nested arrays are not supported
            '{' | '}' if !in_quotes => return None,

            ',' if !in_quotes => {
                items.push(finish_item(&mut current, quoted));
                quoted = false;
            }

            c => current.push(c),
        }
    }

    if in_quotes {
        return None;
    }

    items.push(finish_item(&mut current, quoted));

    Some(items)
}

fn finish_item(current: &mut String, quoted: bool) -> Option<String> {
    let item = std::mem::take(current);

    if quoted {
        return Some(item);
    }

    let item = item.trim();

    if item.eq_ignore_ascii_case("NULL") {
        None
    } else {
        Some(item.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use jdbc_dialect_core::{ColumnFactory, DialectRegistry, RawColumn};

    use super::*;
    use crate::DIALECT;

    fn registry() -> anyhow::Result<DialectRegistry> {
        let registry = DialectRegistry::new();
        DIALECT.install_into(&registry)?;
        Ok(registry)
    }

    fn pgjdbc() -> ColumnContext {
        ColumnContext::new().driver("org.postgresql.Driver")
    }

    #[test]
    fn it_strips_casts_from_defaults() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let status = RawColumn::new("status", SqlType::VARCHAR)
            .type_name("varchar")
            .raw_default("'active'::character varying");
        assert_eq!(
            factory.build(&pgjdbc(), &status)?.default(),
            &Value::Text("active".into())
        );

        for raw in ["'-1'::integer", "(-1)", "-1"] {
            let delta = RawColumn::new("delta", SqlType::INTEGER).raw_default(raw);
            assert_eq!(factory.build(&pgjdbc(), &delta)?.default(), &Value::Int(-1), "{raw}");
        }

        let note = RawColumn::new("note", SqlType::VARCHAR).raw_default("NULL::character varying");
        assert_eq!(factory.build(&pgjdbc(), &note)?.default(), &Value::Null);

        Ok(())
    }

    #[test]
    fn it_marks_serial_and_function_defaults() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let id = RawColumn::new("id", SqlType::INTEGER)
            .nullable(false)
            .raw_default("nextval('users_id_seq'::regclass)");
        let column = factory.build(&pgjdbc(), &id)?;
        assert_eq!(column.default(), &Value::Null);
        assert_eq!(column.extension("postgres.serial"), Some(&Value::Bool(true)));

        let created = RawColumn::new("created_at", SqlType::TIMESTAMP).raw_default("now()");
        let column = factory.build(&pgjdbc(), &created)?;
        assert_eq!(column.default(), &Value::Null);
        assert_eq!(
            column.extension("postgres.default_function"),
            Some(&Value::Text("now()".into()))
        );

        Ok(())
    }

    #[test]
    fn it_reads_bool_columns_as_booleans() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let active = RawColumn::new("active", SqlType::BIT)
            .type_name("bool")
            .raw_default("true");
        let column = factory.build(&pgjdbc(), &active)?;

        assert_eq!(column.sql_type(), SqlType::BOOLEAN);
        assert_eq!(column.default(), &Value::Bool(true));

        Ok(())
    }

    #[test]
    fn it_casts_array_defaults_per_element() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let scores = RawColumn::new("scores", SqlType::ARRAY)
            .type_name("_int4")
            .raw_default("'{1,2,NULL}'::integer[]");
        let column = factory.build(&pgjdbc(), &scores)?;

        let expected = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Null]);
        assert_eq!(column.default(), &expected);
        assert_eq!(
            column.extension("postgres.element_type"),
            Some(&Value::Text("int4".into()))
        );

        // already native
        assert_eq!(
            cast_array_default(&expected, column.column_type(), ContractVersion::TypeMetadata)?,
            expected
        );

        let tags = RawColumn::new("tags", SqlType::ARRAY)
            .type_name("_text")
            .raw_default(r#"'{"a,b",c,"NULL"}'::text[]"#);
        assert_eq!(
            factory.build(&pgjdbc(), &tags)?.default(),
            &Value::Array(vec![
                Value::Text("a,b".into()),
                Value::Text("c".into()),
                Value::Text("NULL".into()),
            ])
        );

        Ok(())
    }

    #[test]
    fn it_keeps_other_typed_defaults_as_text() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let raws = [
            RawColumn::new("id", SqlType::INTEGER).raw_default("1"),
            RawColumn::new("meta", SqlType::OTHER)
                .type_name("jsonb")
                .raw_default("'{}'::jsonb"),
            RawColumn::new("token", SqlType::OTHER)
                .type_name("uuid")
                .raw_default("'00000000-0000-0000-0000-000000000000'::uuid"),
            RawColumn::new("origin", SqlType::OTHER).type_name("inet"),
        ];
        let columns = factory.build_all(&pgjdbc(), &raws)?;

        assert_eq!(columns[0].default(), &Value::Int(1));
        assert_eq!(columns[1].sql_type(), SqlType::OTHER);
        assert_eq!(columns[1].default(), &Value::Text("{}".into()));
        assert_eq!(
            columns[2].default(),
            &Value::Text("00000000-0000-0000-0000-000000000000".into())
        );
        assert_eq!(columns[3].default(), &Value::Null);

        Ok(())
    }

    #[test]
    fn it_treats_expression_defaults_as_functions() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let label = RawColumn::new("label", SqlType::VARCHAR)
            .type_name("text")
            .raw_default("'a'::text || 'b'::text");
        let column = factory.build(&pgjdbc(), &label)?;

        assert_eq!(column.default(), &Value::Null);
        assert_eq!(
            column.extension("postgres.default_function"),
            Some(&Value::Text("'a'::text || 'b'::text".into()))
        );

        let quoted = RawColumn::new("quoted", SqlType::VARCHAR)
            .type_name("text")
            .raw_default("'it''s'::text");
        let column = factory.build(&pgjdbc(), &quoted)?;

        assert_eq!(column.default(), &Value::Text("it's".into()));
        assert_eq!(column.extension("postgres.default_function"), None);

        Ok(())
    }

    #[test]
    fn it_rejects_nested_array_literals() {
        assert_eq!(parse_array_literal("{{1,2},{3,4}}"), None);
        assert_eq!(parse_array_literal("{}"), Some(vec![]));
        assert_eq!(parse_array_literal("not an array"), None);
    }
}
