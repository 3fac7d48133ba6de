//! Per-dialect JDBC connection target resolution and column-metadata extensions.
//!
//! Dialect modules are compiled in with Cargo features (`firebird`, `postgres`, `mysql`) and
//! installed with [`install_default_dialects`]. Installed dialects fill in connection defaults
//! in [`resolve_connection_target`] and specialize every column built by
//! [`build_column_metadata`].
//!
//! ```rust,no_run
//! # fn example() -> jdbc_dialect::Result<()> {
//! use jdbc_dialect::{ColumnContext, ConnectConfig, RawColumn, SqlType, Value};
//!
//! jdbc_dialect::install_default_dialects()?;
//!
//! let target = jdbc_dialect::resolve_connection_target(
//!     ConnectConfig::new().adapter("firebird").database("employee"),
//! )?;
//! assert_eq!(target.get_url(), Some("jdbc:firebirdsql://localhost:3050/employee"));
//!
//! let context = ColumnContext::from(&target);
//! let raw = RawColumn::new("NAME", SqlType::VARCHAR).raw_default("DEFAULT 'unknown'");
//! let column = jdbc_dialect::build_column_metadata(&context, &raw)?;
//! assert_eq!(column.default(), &Value::Text("unknown".into()));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// Modules
// (`connect` and `resolve` also bring in the functions of the same name)
pub use jdbc_dialect_core::{
    column, compat, config, connect, descriptor, dialect, error, registry, resolve, types, value,
};

// Types
pub use jdbc_dialect_core::{
    BoxDynError, ColumnContext, ColumnDraft, ColumnExtension, ColumnFactory, ColumnMetadata,
    ColumnSource, ColumnType, ConnectConfig, Connected, ConnectionDescriptor, Connector,
    ContractVersion, Dialect, DialectMatcher, DialectRegistry, DriverLoader, Error, RawColumn,
    Result, SqlType, TypeFamily, UnsupportedTypeError, Url, Value,
};

#[cfg(feature = "dialect-toml")]
pub use jdbc_dialect_core::config::Config;

// Functions
pub use jdbc_dialect_core::{
    build_column_metadata, cast_default, connect_to_target, find_dialect, install_dialects,
    register_dialect_extension, resolve_connection_target,
};

#[cfg(feature = "firebird")]
#[cfg_attr(docsrs, doc(cfg(feature = "firebird")))]
pub use jdbc_dialect_firebird::{self as firebird, firebird_connection};

#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub use jdbc_dialect_postgres::{self as postgres, postgres_connection};

#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub use jdbc_dialect_mysql::{self as mysql, mysql_connection};

/// Install every dialect compiled in through Cargo features.
///
/// May be called multiple times; dialects that are already installed are skipped. Fails with
/// [`Error::RegistrationClosed`] once the process-wide registry has been sealed.
pub fn install_default_dialects() -> Result<()> {
    install_dialects(&[
        #[cfg(feature = "firebird")]
        &jdbc_dialect_firebird::DIALECT,
        #[cfg(feature = "postgres")]
        &jdbc_dialect_postgres::DIALECT,
        #[cfg(feature = "mysql")]
        &jdbc_dialect_mysql::DIALECT,
    ])?;

    tracing::debug!(
        dialects = ?dialect::installed_dialects(),
        "default dialects installed"
    );

    Ok(())
}
