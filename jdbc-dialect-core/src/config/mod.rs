//! Partial connection configuration, as supplied by a caller before resolution.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use crate::error::Result;

#[cfg(feature = "dialect-toml")]
mod file;
mod parse;

#[cfg(feature = "dialect-toml")]
pub use file::Config;

/// Connection parameters as the caller supplied them; any key may be missing.
///
/// A `ConnectConfig` can be built with the builder methods, from key/value pairs with
/// [`set`](Self::set), parsed from a JDBC URL (it implements [`FromStr`][std::str::FromStr]),
/// or read from the `DATABASE_URL` environment variable with [`from_env`](Self::from_env).
///
/// ```text
/// jdbc:<scheme>://[user[:password]@]host[:port]/database[?property=value&...]
/// ```
///
/// ## Keys
///
/// |Key|Description|
/// |---|-----------|
/// | `adapter` | Name of the dialect module, e.g. `firebird`. |
/// | `adapter_spec` | Identifier recorded in the descriptor; defaults to the dialect name. |
/// | `host` | Defaults to the dialect's host, usually `localhost`. |
/// | `port` | Defaults to the dialect's port. |
/// | `database` | Required unless `url` is given. |
/// | `driver` | Driver class name; also accepted as `driver_class`. |
/// | `url` | Derived from the other keys if absent; never rewritten if present. |
/// | `dialect` | Selects column extensions; falls back to `driver`. |
/// | `jndi` | Naming-service name (also `data_source`); skips host/port resolution. |
///
/// Every other key is kept as an additional property.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ConnectConfig {
    pub(crate) adapter: Option<String>,
    pub(crate) adapter_spec: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) database: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "driver_class", alias = "driverClass"))]
    pub(crate) driver: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) dialect: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "user"))]
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "data_source"))]
    pub(crate) jndi: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub(crate) properties: BTreeMap<String, String>,
}

impl ConnectConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from key/value pairs; see [`set`](Self::set).
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();

        for (key, value) in pairs {
            config.set(key.as_ref(), value.as_ref())?;
        }

        Ok(config)
    }

    /// Read the configuration from the `DATABASE_URL` environment variable.
    ///
    /// A `.env` file in the current directory or its parents is honored.
    pub fn from_env() -> Result<Self> {
        let url = dotenvy::var("DATABASE_URL")
            .map_err(|e| err_config!("failed to read `DATABASE_URL`: {}", e))?;

        url.parse()
    }

    /// Set a single key. Keys are case-insensitive and `-` is treated as `_`.
    ///
    /// `port` must be a valid port number; unrecognized keys become properties.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
        let value = value.to_owned();

        match &*normalized {
            "adapter" => self.adapter = Some(value),
            "adapter_spec" => self.adapter_spec = Some(value),
            "host" => self.host = Some(value),
            "port" => {
                self.port = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| err_config!("invalid port {:?}", value))?,
                )
            }
            "database" => self.database = Some(value),
            "driver" | "driver_class" | "driverclass" => self.driver = Some(value),
            "url" => self.url = Some(value),
            "dialect" => self.dialect = Some(value),
            "username" | "user" => self.username = Some(value),
            "password" => self.password = Some(value),
            "jndi" | "data_source" | "datasource" => self.jndi = Some(value),
            _ => {
                self.properties.insert(key.to_owned(), value);
            }
        }

        Ok(())
    }

    pub fn adapter(mut self, adapter: &str) -> Self {
        self.adapter = Some(adapter.to_owned());
        self
    }

    pub fn adapter_spec(mut self, adapter_spec: &str) -> Self {
        self.adapter_spec = Some(adapter_spec.to_owned());
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_owned());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(database.to_owned());
        self
    }

    pub fn driver(mut self, driver: &str) -> Self {
        self.driver = Some(driver.to_owned());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_owned());
        self
    }

    pub fn dialect(mut self, dialect: &str) -> Self {
        self.dialect = Some(dialect.to_owned());
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_owned());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }

    /// Route the connection through a naming service instead of host/port.
    pub fn jndi(mut self, name: &str) -> Self {
        self.jndi = Some(name.to_owned());
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn get_adapter(&self) -> Option<&str> {
        self.adapter.as_deref()
    }

    pub fn get_host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn get_port(&self) -> Option<u16> {
        self.port
    }

    pub fn get_database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn get_dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns `true` if this configuration selects the naming-service path.
    pub fn is_naming_service(&self) -> bool {
        self.jndi.is_some()
    }
}

impl Debug for ConnectConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("adapter", &self.adapter)
            .field("adapter_spec", &self.adapter_spec)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("dialect", &self.dialect)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("jndi", &self.jndi)
            .field("properties", &self.properties)
            .finish()
    }
}
