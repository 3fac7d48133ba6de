use std::sync::LazyLock;

use jdbc_dialect_core::{
    BoxDynError, ColumnContext, ColumnDraft, ColumnType, DialectMatcher, Result, SqlType,
};
use regex::Regex;

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:current_timestamp|current_date|current_time|localtime|localtimestamp|now|utc_timestamp)(?:\(\d*\))?$",
    )
    .expect("BUG: invalid FUNCTION regex")
});

// `0000-00-00` and `0000-00-00 00:00:00` cannot be represented
static ZERO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0000-00-00(?:[ T]00:00:00(?:\.0+)?)?$").expect("BUG: invalid ZERO_DATE regex")
});

pub(crate) fn matcher() -> Result<DialectMatcher> {
    DialectMatcher::pattern("(?i)mysql|mariadb")
}

pub(crate) fn extend(_: &ColumnContext, draft: ColumnDraft) -> Result<ColumnDraft, BoxDynError> {
    let function = draft
        .raw_default()
        .map(str::trim)
        .filter(|raw| FUNCTION.is_match(raw))
        .map(str::to_ascii_uppercase);

    let is_boolean = is_boolean(draft.column_type());
    let is_bit_field = is_bit_field(draft.column_type());
    let unsigned = draft
        .column_type()
        .type_name
        .as_deref()
        .is_some_and(|name| name.to_ascii_uppercase().contains("UNSIGNED"));

    let mut draft = draft.with_default_extractor(extract_default);

    if let Some(function) = function {
        draft = draft.with_extension("mysql.default_function", function);
    }

    if is_boolean {
        tracing::trace!(column = draft.name(), "reading one-bit column as BOOLEAN");
        draft = draft.with_sql_type(SqlType::BOOLEAN);
    } else if is_bit_field {
        // `b'101'` is a number, not a flag
        tracing::trace!(column = draft.name(), "reading multi-bit column as BIGINT");
        draft = draft.with_sql_type(SqlType::BIGINT);
    }

    if unsigned {
        draft = draft.with_extension("mysql.unsigned", true);
    }

    Ok(draft)
}

/// `TINYINT(1)`, which Connector/J may also report as a one-bit `BIT`.
fn is_boolean(column: &ColumnType) -> bool {
    let tinyint_1 = column
        .type_name
        .as_deref()
        .is_some_and(|name| name.trim().to_ascii_lowercase().starts_with("tinyint(1)"));

    tinyint_1 || (column.sql_type == SqlType::BIT && column.limit == Some(1))
}

/// `BIT(n)` with `n > 1`; up to 64 bits fit a `BIGINT`.
fn is_bit_field(column: &ColumnType) -> bool {
    column.sql_type == SqlType::BIT && column.limit.is_some_and(|bits| bits > 1)
}

fn extract_default(raw: &str) -> Option<String> {
    let raw = raw.trim();

    // MariaDB quotes string literals and reports a missing default as `NULL`
    if let Some(inner) = raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        return Some(inner.replace("''", "'"));
    }

    if raw.eq_ignore_ascii_case("NULL") || FUNCTION.is_match(raw) || ZERO_DATE.is_match(raw) {
        return None;
    }

    // b'1' bit literals
    if let Some(bits) = raw.strip_prefix("b'").and_then(|v| v.strip_suffix('\'')) {
        return u64::from_str_radix(bits, 2).ok().map(|n| n.to_string());
    }

    Some(raw.to_owned())
}

#[cfg(test)]
mod tests {
    use jdbc_dialect_core::{ColumnFactory, ContractVersion, DialectRegistry, RawColumn, Value};

    use super::*;
    use crate::DIALECT;

    fn registry() -> anyhow::Result<DialectRegistry> {
        let registry = DialectRegistry::new();
        DIALECT.install_into(&registry)?;
        Ok(registry)
    }

    fn connector_j() -> ColumnContext {
        ColumnContext::new().driver("com.mysql.cj.jdbc.Driver")
    }

    #[test]
    fn it_reads_tinyint_1_as_boolean() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let enabled = RawColumn::new("enabled", SqlType::TINYINT)
            .type_name("tinyint(1)")
            .raw_default("1");
        let column = factory.build(&connector_j(), &enabled)?;
        assert_eq!(column.sql_type(), SqlType::BOOLEAN);
        assert_eq!(column.default(), &Value::Bool(true));

        let flag = RawColumn::new("flag", SqlType::BIT)
            .type_name("BIT")
            .limit(1)
            .raw_default("b'0'");
        let column = factory.build(&connector_j(), &flag)?;
        assert_eq!(column.sql_type(), SqlType::BOOLEAN);
        assert_eq!(column.default(), &Value::Bool(false));

        Ok(())
    }

    #[test]
    fn it_reads_multi_bit_columns_as_integers() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let flags = RawColumn::new("flags", SqlType::BIT)
            .type_name("BIT")
            .limit(8)
            .raw_default("b'101'");
        let column = factory.build(&connector_j(), &flags)?;

        assert_eq!(column.sql_type(), SqlType::BIGINT);
        assert_eq!(column.default(), &Value::Int(5));

        Ok(())
    }

    #[test]
    fn it_marks_current_timestamp_defaults() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let updated = RawColumn::new("updated_at", SqlType::TIMESTAMP)
            .type_name("DATETIME")
            .raw_default("current_timestamp(3)");
        let column = factory.build(&connector_j(), &updated)?;

        assert_eq!(column.default(), &Value::Null);
        assert_eq!(
            column.extension("mysql.default_function"),
            Some(&Value::Text("CURRENT_TIMESTAMP(3)".into()))
        );

        Ok(())
    }

    #[test]
    fn it_handles_mariadb_quoting_and_zero_dates() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);
        let mariadb = ColumnContext::new().dialect("mariadb");

        let name = RawColumn::new("name", SqlType::VARCHAR).raw_default("'O''Brien'");
        assert_eq!(
            factory.build(&mariadb, &name)?.default(),
            &Value::Text("O'Brien".into())
        );

        let missing = RawColumn::new("nickname", SqlType::VARCHAR).raw_default("NULL");
        assert_eq!(factory.build(&mariadb, &missing)?.default(), &Value::Null);

        let born = RawColumn::new("born", SqlType::DATE).raw_default("0000-00-00");
        assert_eq!(factory.build(&mariadb, &born)?.default(), &Value::Null);

        Ok(())
    }

    #[test]
    fn it_flags_unsigned_columns() -> anyhow::Result<()> {
        let registry = registry()?;
        let factory = ColumnFactory::new(&registry, ContractVersion::TypeMetadata);

        let id = RawColumn::new("id", SqlType::BIGINT).type_name("BIGINT UNSIGNED");
        let column = factory.build(&connector_j(), &id)?;

        assert_eq!(column.extension("mysql.unsigned"), Some(&Value::Bool(true)));
        assert!(!column.has_default());

        Ok(())
    }
}
