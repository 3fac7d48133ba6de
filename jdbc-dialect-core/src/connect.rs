//! Opening connections through externally supplied collaborators.
//!
//! This crate does not talk to databases itself. A [`DriverLoader`] makes the native driver
//! for a dialect available, a [`Connector`] opens the physical connection, and a
//! [`ColumnSource`] reports the raw column descriptors of a table.

use crate::column::{ColumnContext, RawColumn};
use crate::config::ConnectConfig;
use crate::descriptor::ConnectionDescriptor;
use crate::dialect::Dialect;
use crate::error::{BoxDynError, Error, Result};
use crate::resolve::{resolve, select_dialect};

/// Makes the native driver for a dialect available to the process.
pub trait DriverLoader {
    fn load_driver(&self, dialect: &Dialect) -> Result<(), BoxDynError>;
}

impl<F> DriverLoader for F
where
    F: Fn(&Dialect) -> Result<(), BoxDynError>,
{
    fn load_driver(&self, dialect: &Dialect) -> Result<(), BoxDynError> {
        self(dialect)
    }
}

/// Opens physical connections for resolved connection targets.
pub trait Connector {
    type Connection;

    /// Open a connection to `target`'s URL with its driver class.
    fn open_jdbc_connection(
        &mut self,
        target: &ConnectionDescriptor,
    ) -> Result<Self::Connection, BoxDynError>;

    /// Look up and open `target`'s naming-service data source.
    fn open_naming_service_connection(
        &mut self,
        target: &ConnectionDescriptor,
    ) -> Result<Self::Connection, BoxDynError>;
}

/// Reports the raw column descriptors of a table, as the driver's metadata facility does.
pub trait ColumnSource {
    fn raw_columns(&mut self, table: &str) -> Result<Vec<RawColumn>, BoxDynError>;
}

/// An open connection together with the target it was opened for.
#[derive(Debug)]
pub struct Connected<C> {
    pub target: ConnectionDescriptor,
    pub raw: C,
}

impl<C> Connected<C> {
    /// The context column metadata for this connection is built with.
    pub fn context(&self) -> ColumnContext {
        ColumnContext::from(&self.target)
    }

    pub fn into_raw(self) -> C {
        self.raw
    }
}

/// Resolve `config` for `dialect` and open the connection.
///
/// A naming-service target is opened directly and no driver is loaded. Otherwise the driver
/// is loaded first; a loader failure is reported as [`Error::DriverLoad`] and an opener
/// failure as [`Error::Connection`].
pub fn connect<L, C>(
    dialect: &Dialect,
    config: ConnectConfig,
    loader: &L,
    connector: &mut C,
) -> Result<Connected<C::Connection>>
where
    L: DriverLoader + ?Sized,
    C: Connector + ?Sized,
{
    let target = resolve(dialect, config)?;

    let raw = if target.is_naming_service() {
        tracing::debug!(
            dialect = dialect.name,
            jndi = target.get_jndi(),
            "opening naming-service connection"
        );

        connector
            .open_naming_service_connection(&target)
            .map_err(Error::connection)?
    } else {
        loader
            .load_driver(dialect)
            .map_err(|e| Error::driver_load(dialect.name, e))?;

        tracing::debug!(
            dialect = dialect.name,
            url = target.get_url(),
            "opening connection"
        );

        connector
            .open_jdbc_connection(&target)
            .map_err(Error::connection)?
    };

    Ok(Connected { target, raw })
}

/// Like [`connect`], with the dialect chosen from the installed dialects by `config`.
///
/// See [`resolve_connection_target`][crate::resolve_connection_target] for how the dialect is
/// chosen.
pub fn connect_to_target<L, C>(
    config: ConnectConfig,
    loader: &L,
    connector: &mut C,
) -> Result<Connected<C::Connection>>
where
    L: DriverLoader + ?Sized,
    C: Connector + ?Sized,
{
    let dialect = select_dialect(&config)?;

    connect(dialect, config, loader, connector)
}
