//! Core of jdbc-dialect.
//!
//! Connection-target resolution, the column-extension registry and the column metadata
//! factory. Dialect modules depend on this crate; applications should use the `jdbc-dialect`
//! facade instead.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(future_incompatible, rust_2018_idioms)]

// Must come first so `err_config!` is in scope for the rest of the crate.
#[macro_use]
pub mod error;

pub mod column;
pub mod compat;
pub mod config;
pub mod connect;
pub mod descriptor;
pub mod dialect;
pub mod registry;
pub mod resolve;
pub mod types;
pub mod value;

pub use url::{self, Url};

pub use column::{
    build_column_metadata, ColumnContext, ColumnDraft, ColumnFactory, ColumnMetadata, ColumnType,
    DefaultCaster, DefaultExtractor, RawColumn,
};
pub use compat::{cast_default, ContractVersion};
pub use config::ConnectConfig;
pub use connect::{connect, connect_to_target, ColumnSource, Connected, Connector, DriverLoader};
pub use descriptor::ConnectionDescriptor;
pub use dialect::{
    find_dialect, install_dialects, ColumnSelector, ConnectDefaults, Dialect, ExtendColumnFn,
};
pub use error::{BoxDynError, Error, Result, UnsupportedTypeError};
pub use registry::{register_dialect_extension, ColumnExtension, DialectMatcher, DialectRegistry};
pub use resolve::{resolve, resolve_connection_target};
pub use types::{SqlType, TypeFamily};
pub use value::Value;
