use crate::column::{ColumnContext, ColumnDraft, ColumnMetadata, RawColumn};
use crate::compat::ContractVersion;
use crate::connect::ColumnSource;
use crate::error::{Error, Result};
use crate::registry::{self, DialectRegistry};
use crate::types::SqlType;

/// Builds [`ColumnMetadata`] from raw driver columns, applying every dialect extension whose
/// matcher accepts the connection's dialect.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFactory<'r> {
    registry: &'r DialectRegistry,
    contract: ContractVersion,
}

impl<'r> ColumnFactory<'r> {
    pub fn new(registry: &'r DialectRegistry, contract: ContractVersion) -> Self {
        ColumnFactory { registry, contract }
    }

    /// A factory over the process-wide registry and the active contract.
    pub fn global() -> Result<ColumnFactory<'static>> {
        Ok(ColumnFactory::new(
            registry::global(),
            ContractVersion::active()?,
        ))
    }

    pub fn contract(&self) -> ContractVersion {
        self.contract
    }

    /// Build the metadata for one column.
    ///
    /// Either every applicable extension ran and the default was cast, or an error is
    /// returned; a partially extended column is never handed out.
    pub fn build(&self, context: &ColumnContext, raw: &RawColumn) -> Result<ColumnMetadata> {
        let name = raw
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::column("", "raw column descriptor has no name"))?;

        let sql_type = raw
            .sql_type_code
            .map(SqlType)
            .ok_or_else(|| Error::column(name, "raw column descriptor has no SQL type"))?;

        let dialect = context.dialect_identifier();
        let extensions = self.registry.lookup(dialect);

        let mut draft = ColumnDraft::new(name, sql_type, raw);

        for extend in &extensions {
            draft = extend(context, draft).map_err(|e| Error::column(name, e))?;
        }

        let column = draft.finish(self.contract)?;

        tracing::trace!(
            column = column.name(),
            sql_type = %column.sql_type(),
            dialect,
            extensions = extensions.len(),
            "built column metadata"
        );

        Ok(column)
    }

    /// Build every column of a table, failing on the first column that cannot be built.
    pub fn build_all<'a, I>(&self, context: &ColumnContext, raws: I) -> Result<Vec<ColumnMetadata>>
    where
        I: IntoIterator<Item = &'a RawColumn>,
    {
        raws.into_iter().map(|raw| self.build(context, raw)).collect()
    }

    /// Fetch the raw columns of `table` from `source` and build all of them.
    pub fn introspect_table<S>(
        &self,
        context: &ColumnContext,
        source: &mut S,
        table: &str,
    ) -> Result<Vec<ColumnMetadata>>
    where
        S: ColumnSource + ?Sized,
    {
        let raws = source.raw_columns(table).map_err(Error::Connection)?;
        let columns = self.build_all(context, &raws)?;

        tracing::debug!(table, columns = columns.len(), "introspected table columns");

        Ok(columns)
    }
}

/// Build column metadata against the process-wide registry with the active contract.
pub fn build_column_metadata(context: &ColumnContext, raw: &RawColumn) -> Result<ColumnMetadata> {
    ColumnFactory::global()?.build(context, raw)
}
