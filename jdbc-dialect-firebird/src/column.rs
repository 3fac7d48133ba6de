use std::sync::LazyLock;

use jdbc_dialect_core::{
    BoxDynError, ColumnContext, ColumnDraft, ColumnType, DialectMatcher, Result, SqlType,
};
use regex::Regex;

// Jaybird reports `RDB$DEFAULT_SOURCE` verbatim, including the keyword
static DEFAULT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*DEFAULT\s+(.*?)\s*$").expect("BUG: invalid DEFAULT_CLAUSE regex")
});

static BLOB_SUB_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*BLOB\s+SUB_TYPE\s+(\w+)").expect("BUG: invalid BLOB_SUB_TYPE regex")
});

pub(crate) fn matcher() -> Result<DialectMatcher> {
    DialectMatcher::pattern("(?i)firebird")
}

pub(crate) fn extend(_: &ColumnContext, draft: ColumnDraft) -> Result<ColumnDraft, BoxDynError> {
    let mut draft = draft.with_default_extractor(extract_default);

    if let Some(sub_type) = blob_sub_type(draft.column_type()) {
        // sub-type 1 is the text blob; everything else stays binary
        if sub_type == "TEXT" || sub_type == "1" {
            tracing::trace!(column = draft.name(), "reading text blob as CLOB");
            draft = draft.with_sql_type(SqlType::CLOB);
        }

        draft = draft.with_extension("firebird.blob_sub_type", sub_type);
    }

    Ok(draft)
}

fn blob_sub_type(column: &ColumnType) -> Option<String> {
    let type_name = column.type_name.as_deref()?;
    let captures = BLOB_SUB_TYPE.captures(type_name)?;

    Some(captures[1].to_ascii_uppercase())
}

fn extract_default(raw: &str) -> Option<String> {
    let value = match DEFAULT_CLAUSE.captures(raw) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
        None => raw.trim(),
    };

    if value.is_empty() || value.eq_ignore_ascii_case("NULL") {
        return None;
    }

    Some(unquote(value))
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => value.to_owned(),
    }
}
