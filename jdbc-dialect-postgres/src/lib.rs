//! [PostgreSQL] dialect module.
//!
//! [PostgreSQL]: https://www.postgresql.org/
#![warn(future_incompatible, rust_2018_idioms)]

mod column;
mod connection;

use jdbc_dialect_core::dialect::{ColumnSelector, ConnectDefaults, Dialect};

pub use column::{cast_array_default, cast_other_default};
pub use connection::{postgres_connection, resolve};

/// The PostgreSQL dialect: connection defaults for pgjdbc and the PostgreSQL column extension.
pub static DIALECT: Dialect = Dialect {
    name: "postgresql",
    aliases: &["postgres", "pg"],
    defaults: ConnectDefaults {
        host: "localhost",
        port: 5432,
        driver_class: "org.postgresql.Driver",
        url_scheme: "postgresql",
    },
    columns: Some(ColumnSelector {
        matcher: column::matcher,
        extend: column::extend,
    }),
};
