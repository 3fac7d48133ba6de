use jdbc_dialect_core::connect::{self, Connected, Connector, DriverLoader};
use jdbc_dialect_core::{ConnectConfig, ConnectionDescriptor, Result};

use crate::DIALECT;

/// Fill in the Firebird defaults for every key `config` leaves out.
///
/// |Key|Default|
/// |---|-------|
/// | `host` | `localhost` |
/// | `port` | `3050` |
/// | `driver` | `org.firebirdsql.jdbc.FBDriver` |
/// | `url` | `jdbc:firebirdsql://<host>:<port>/<database>` |
///
/// A configuration with a `jndi` name gets none of these.
pub fn resolve(config: ConnectConfig) -> Result<ConnectionDescriptor> {
    jdbc_dialect_core::resolve(&DIALECT, config)
}

/// Resolve `config` with the Firebird defaults and open the connection.
///
/// The Jaybird driver is loaded through `loader` unless the configuration names a
/// naming-service data source.
pub fn firebird_connection<L, C>(
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_derives_the_firebird_url() -> anyhow::Result<()> {
        let target = resolve(ConnectConfig::new().database("employee"))?;

        assert_eq!(target.get_adapter_spec(), "firebird");
        assert_eq!(target.get_host(), Some("localhost"));
        assert_eq!(target.get_port(), Some(3050));
        assert_eq!(
            target.get_driver_class_name(),
            Some("org.firebirdsql.jdbc.FBDriver")
        );
        assert_eq!(
            target.get_url(),
            Some("jdbc:firebirdsql://localhost:3050/employee")
        );

        Ok(())
    }

    #[test]
    fn it_keeps_database_paths_in_the_url() -> anyhow::Result<()> {
        let target = resolve(
            ConnectConfig::new()
                .host("fb.internal")
                .database("/var/lib/firebird/data/app.fdb"),
        )?;

        assert_eq!(
            target.get_url(),
            Some("jdbc:firebirdsql://fb.internal:3050//var/lib/firebird/data/app.fdb")
        );

        Ok(())
    }

    #[test]
    fn it_leaves_naming_service_targets_alone() -> anyhow::Result<()> {
        let target = resolve(ConnectConfig::new().jndi("java:comp/env/jdbc/employee"))?;

        assert_eq!(target.get_port(), None);
        assert_eq!(target.get_driver_class_name(), None);
        assert_eq!(target.get_url(), None);

        Ok(())
    }
}
