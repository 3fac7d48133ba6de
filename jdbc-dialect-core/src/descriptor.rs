use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

/// The fully resolved set of parameters needed to open a physical connection.
///
/// Produced by [`resolve`][crate::resolve::resolve]; read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub(crate) adapter_spec: String,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) database: Option<String>,
    pub(crate) driver_class_name: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) dialect: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) jndi: Option<String>,
    pub(crate) properties: BTreeMap<String, String>,
}

impl ConnectionDescriptor {
    /// The name of the dialect module that resolved this descriptor.
    pub fn get_adapter_spec(&self) -> &str {
        &self.adapter_spec
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

    pub fn get_driver_class_name(&self) -> Option<&str> {
        self.driver_class_name.as_deref()
    }

    /// The connection URL. Always set unless this is a naming-service descriptor.
    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn get_dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn get_username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn get_password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The naming-service (JNDI) name, if this descriptor targets one.
    pub fn get_jndi(&self) -> Option<&str> {
        self.jndi.as_deref()
    }

    pub fn is_naming_service(&self) -> bool {
        self.jndi.is_some()
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn get_properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("adapter_spec", &self.adapter_spec)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("driver_class_name", &self.driver_class_name)
            .field("url", &self.url)
            .field("dialect", &self.dialect)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("jndi", &self.jndi)
            .field("properties", &self.properties)
            .finish()
    }
}
