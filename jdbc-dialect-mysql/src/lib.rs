//! [MySQL] and [MariaDB] dialect module.
//!
//! [MySQL]: https://www.mysql.com/
//! [MariaDB]: https://mariadb.org/
#![warn(future_incompatible, rust_2018_idioms)]

mod column;
mod connection;

use jdbc_dialect_core::dialect::{ColumnSelector, ConnectDefaults, Dialect};

pub use connection::{mysql_connection, resolve};

/// The MySQL dialect: connection defaults for Connector/J and the MySQL column extension.
pub static DIALECT: Dialect = Dialect {
    name: "mysql",
    aliases: &["mariadb"],
    defaults: ConnectDefaults {
        host: "localhost",
        port: 3306,
        driver_class: "com.mysql.cj.jdbc.Driver",
        url_scheme: "mysql",
    },
    columns: Some(ColumnSelector {
        matcher: column::matcher,
        extend: column::extend,
    }),
};
