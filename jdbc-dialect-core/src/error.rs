//! Types for working with errors produced by jdbc-dialect.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::Display;
use std::result::Result as StdResult;

use crate::compat::ContractVersion;
use crate::types::SqlType;

/// A specialized `Result` type for jdbc-dialect.
pub type Result<T, E = Error> = StdResult<T, E>;

/// Boxed error type used for extension callbacks and external collaborators.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// No casting rule exists for a SQL type under the active column-metadata contract.
///
/// Returned from [`cast_default`][crate::compat::cast_default] when a non-null default is
/// supplied for a type outside every known type family and no dialect override handled it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no default-value casting rule for SQL type {sql_type} under the {contract} contract")]
pub struct UnsupportedTypeError {
    pub sql_type: SqlType,
    pub contract: ContractVersion,
}

/// Represents all the ways a method can fail within jdbc-dialect.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing or invalid connection parameters.
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// The native driver for a dialect could not be loaded.
    #[error("failed to load the driver for dialect `{dialect}`: {source}")]
    DriverLoad {
        dialect: Cow<'static, str>,

        #[source]
        source: BoxDynError,
    },

    /// Transport-level failure while opening a connection.
    #[error("error opening a connection: {0}")]
    Connection(#[source] BoxDynError),

    /// A raw column descriptor was malformed or a dialect extension failed on it.
    #[error("error constructing metadata for column {column:?}: {source}")]
    ColumnConstruction {
        column: String,

        #[source]
        source: BoxDynError,
    },

    /// See [`UnsupportedTypeError`].
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// [`DialectRegistry::seal`][crate::registry::DialectRegistry::seal] was called before this
    /// registration was attempted.
    #[error("dialect registration is closed; extensions must be registered during startup")]
    RegistrationClosed,
}

impl Error {
    #[doc(hidden)]
    #[inline]
    pub fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    #[doc(hidden)]
    #[inline]
    pub fn config_msg(msg: impl Display) -> Self {
        Error::Configuration(msg.to_string().into())
    }

    #[inline]
    pub(crate) fn column(column: impl Into<String>, source: impl Into<BoxDynError>) -> Self {
        Error::ColumnConstruction {
            column: column.into(),
            source: source.into(),
        }
    }

    /// Wrap a driver loader failure for `dialect`.
    pub fn driver_load(
        dialect: impl Into<Cow<'static, str>>,
        source: impl Into<BoxDynError>,
    ) -> Self {
        Error::DriverLoad {
            dialect: dialect.into(),
            source: source.into(),
        }
    }

    /// Wrap a connection opener failure.
    pub fn connection(source: impl Into<BoxDynError>) -> Self {
        Error::Connection(source.into())
    }
}

// Format an error message as a `Configuration` error
#[macro_export]
macro_rules! err_config {
    ($expr:expr) => {
        $crate::error::Error::Configuration($expr.into())
    };

    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::Error::Configuration(format!($fmt, $($arg)*).into())
    };
}
