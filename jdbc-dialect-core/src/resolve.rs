use crate::config::ConnectConfig;
use crate::descriptor::ConnectionDescriptor;
use crate::dialect::{self, Dialect};
use crate::error::Result;

/// Fill in `dialect`'s defaults for every key `config` leaves out.
///
/// * `adapter_spec` defaults to the dialect name.
/// * If a naming-service name (`jndi`) is given, host, port, driver and URL are left as
///   supplied and no defaults are applied to them.
/// * Otherwise `host`, `port` and `driver` take the dialect defaults, and `url` is derived as
///   `jdbc:<scheme>://<host>:<port>/<database>`. An explicit `url` is kept verbatim.
///
/// Fails with [`Error::Configuration`][crate::Error::Configuration] if the URL has to be
/// derived and no `database` was given. Nothing is opened.
pub fn resolve(dialect: &Dialect, config: ConnectConfig) -> Result<ConnectionDescriptor> {
    let ConnectConfig {
        adapter: _,
        adapter_spec,
        host,
        port,
        database,
        driver,
        url,
        dialect: column_dialect,
        username,
        password,
        jndi,
        properties,
    } = config;

    let adapter_spec = adapter_spec.unwrap_or_else(|| dialect.name.to_owned());

    if let Some(jndi) = jndi {
        tracing::debug!(
            dialect = dialect.name,
            %adapter_spec,
            %jndi,
            "resolved naming-service connection target"
        );

        return Ok(ConnectionDescriptor {
            adapter_spec,
            host,
            port,
            database,
            driver_class_name: driver,
            url,
            dialect: column_dialect,
            username,
            password,
            jndi: Some(jndi),
            properties,
        });
    }

    let defaults = &dialect.defaults;

    let host = host.unwrap_or_else(|| defaults.host.to_owned());
    let port = port.unwrap_or(defaults.port);
    let driver = driver.unwrap_or_else(|| defaults.driver_class.to_owned());

    let url = match url {
        Some(url) => url,
        None => {
            let database = database.as_deref().ok_or_else(|| {
                err_config!(
                    "cannot derive a {} connection URL without a database name",
                    dialect.name
                )
            })?;

            defaults.url(&host, port, database)
        }
    };

    tracing::debug!(
        dialect = dialect.name,
        %adapter_spec,
        %url,
        "resolved connection target"
    );

    Ok(ConnectionDescriptor {
        adapter_spec,
        host: Some(host),
        port: Some(port),
        database,
        driver_class_name: Some(driver),
        url: Some(url),
        dialect: column_dialect,
        username,
        password,
        jndi: None,
        properties,
    })
}

/// Resolve `config` against the installed dialect it names.
///
/// The dialect is chosen by `adapter` (a dialect name, alias or URL scheme), or else by the
/// `jdbc:<scheme>:` prefix of an explicit `url`.
pub fn resolve_connection_target(config: ConnectConfig) -> Result<ConnectionDescriptor> {
    let dialect = select_dialect(&config)?;

    resolve(dialect, config)
}

pub(crate) fn select_dialect(config: &ConnectConfig) -> Result<&'static Dialect> {
    if let Some(adapter) = config.get_adapter() {
        return dialect::find_dialect(adapter).ok_or_else(|| {
            err_config!(
                "no installed dialect named {:?}; installed: {:?}",
                adapter,
                dialect::installed_dialects()
            )
        });
    }

    if let Some(url) = config.get_url() {
        return dialect::find_dialect_for_url(url)
            .ok_or_else(|| err_config!("no installed dialect handles the URL {:?}", url));
    }

    Err(err_config!(
        "connection configuration names neither an `adapter` nor a `url`"
    ))
}
