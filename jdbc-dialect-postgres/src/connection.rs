use jdbc_dialect_core::connect::{self, Connected, Connector, DriverLoader};
use jdbc_dialect_core::{ConnectConfig, ConnectionDescriptor, Result};

use crate::DIALECT;

/// Fill in the PostgreSQL defaults for every key `config` leaves out.
///
/// |Key|Default|
/// |---|-------|
/// | `host` | `localhost` |
/// | `port` | `5432` |
/// | `driver` | `org.postgresql.Driver` |
/// | `url` | `jdbc:postgresql://<host>:<port>/<database>` |
pub fn resolve(config: ConnectConfig) -> Result<ConnectionDescriptor> {
    jdbc_dialect_core::resolve(&DIALECT, config)
}

/// Resolve `config` with the PostgreSQL defaults and open the connection.
pub fn postgres_connection<L, C>(
    config: ConnectConfig,
    loader: &L,
    connector: &mut C,
) -> Result<Connected<C::Connection>>
where
    L: DriverLoader + ?Sized,
    C: Connector + ?Sized,
{
    connect::connect(&DIALECT, config, loader, connector)
}
