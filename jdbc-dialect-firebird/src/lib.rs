//! [Firebird] dialect module.
//!
//! [Firebird]: https://firebirdsql.org/
#![warn(future_incompatible, rust_2018_idioms)]

mod column;
mod connection;

use jdbc_dialect_core::dialect::{ColumnSelector, ConnectDefaults, Dialect};

pub use connection::{firebird_connection, resolve};

/// The Firebird dialect: connection defaults for Jaybird and the Firebird column extension.
pub static DIALECT: Dialect = Dialect {
    name: "firebird",
    aliases: &["jdbcfirebird"],
    defaults: ConnectDefaults {
        host: "localhost",
        port: 3050,
        driver_class: "org.firebirdsql.jdbc.FBDriver",
        url_scheme: "firebirdsql",
    },
    columns: Some(ColumnSelector {
        matcher: column::matcher,
        extend: column::extend,
    }),
};
