use std::collections::BTreeMap;
use std::path::Path;

use crate::compat::ContractVersion;
use crate::error::{Error, Result};

use super::ConnectConfig;

/// Named connections and process settings read from a `jdbc-dialect.toml` file.
///
/// ### Example
/// ```toml
/// contract-version = "4.2"
///
/// [connections.primary]
/// adapter = "firebird"
/// database = "employee"
///
/// [connections.reports]
/// adapter = "postgresql"
/// jndi = "java:comp/env/jdbc/reports"
/// ```
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// The column-metadata contract to install; a framework version or a contract name.
    pub contract_version: Option<String>,

    pub connections: BTreeMap<String, ConnectConfig>,
}

impl Config {
    pub const DEFAULT_FILE_NAME: &'static str = "jdbc-dialect.toml";

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(Error::config)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path)
            .map_err(|e| err_config!("failed to read {}: {}", path.display(), e))?;

        let config = Self::from_toml_str(&contents)?;

        tracing::debug!(
            path = %path.display(),
            connections = config.connections.len(),
            "loaded connection file"
        );

        Ok(config)
    }

    /// A copy of the named connection's configuration.
    pub fn connection(&self, name: &str) -> Result<ConnectConfig> {
        self.connections
            .get(name)
            .cloned()
            .ok_or_else(|| err_config!("no connection named {:?}", name))
    }

    /// The configured contract, if any.
    pub fn contract(&self) -> Result<Option<ContractVersion>> {
        self.contract_version
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    /// Fix the configured contract for the rest of the process, if the file names one.
    ///
    /// Fails if a different contract is already in effect.
    pub fn install_contract(&self) -> Result<()> {
        let Some(contract) = self.contract()? else {
            return Ok(());
        };

        match contract.init() {
            Ok(()) => Ok(()),
            Err(active) if active == contract => Ok(()),
            Err(active) => Err(err_config!(
                "cannot use the {} contract; {} is already in effect",
                contract,
                active
            )),
        }
    }
}
