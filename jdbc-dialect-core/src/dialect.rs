//! Dialect modules and the table of installed dialects.
//!
//! A dialect module exposes a single `static DIALECT: Dialect` describing its connection
//! defaults and, optionally, the column extension it contributes. [`install_dialects`] makes a
//! set of dialects available to [`resolve_connection_target`][crate::resolve_connection_target]
//! and registers their column extensions in the process-wide registry.

use std::fmt::{self, Debug, Formatter};

use parking_lot::RwLock;

use crate::column::{ColumnContext, ColumnDraft};
use crate::error::{BoxDynError, Error, Result};
use crate::registry::{self, DialectMatcher, DialectRegistry};

static INSTALLED: RwLock<Vec<&'static Dialect>> = parking_lot::const_rwlock(Vec::new());

pub type ExtendColumnFn = fn(&ColumnContext, ColumnDraft) -> Result<ColumnDraft, BoxDynError>;

/// Values filled into a connection configuration when the caller leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectDefaults {
    pub host: &'static str,
    pub port: u16,
    pub driver_class: &'static str,
    /// The `<scheme>` of `jdbc:<scheme>://…` URLs.
    pub url_scheme: &'static str,
}

impl ConnectDefaults {
    /// `jdbc:<scheme>://<host>:<port>/<database>`
    pub fn url(&self, host: &str, port: u16, database: &str) -> String {
        format!("jdbc:{}://{host}:{port}/{database}", self.url_scheme)
    }
}

/// The column extension a dialect contributes, and the dialect identifiers it applies to.
#[derive(Clone, Copy)]
pub struct ColumnSelector {
    pub matcher: fn() -> Result<DialectMatcher>,
    pub extend: ExtendColumnFn,
}

impl Debug for ColumnSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ColumnSelector");

        match (self.matcher)() {
            Ok(matcher) => s.field("matcher", &matcher),
            Err(e) => s.field("matcher", &format_args!("<invalid: {e}>")),
        };

        s.finish_non_exhaustive()
    }
}

/// A backend database's connection defaults and column behavior.
#[derive(Debug)]
pub struct Dialect {
    /// The canonical name, also used as the default `adapter_spec`.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub defaults: ConnectDefaults,
    pub columns: Option<ColumnSelector>,
}

impl Dialect {
    /// Returns `true` if `name` is this dialect's name, one of its aliases or its URL scheme.
    ///
    /// Comparison ignores ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        let name = name.trim();

        self.name.eq_ignore_ascii_case(name)
            || self.defaults.url_scheme.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }

    /// Register this dialect's column extension, if it has one, in `registry`.
    pub fn install_into(&self, registry: &DialectRegistry) -> Result<()> {
        let Some(columns) = self.columns else {
            return Ok(());
        };

        registry.register_fn((columns.matcher)()?, columns.extend)
    }
}

/// Make `dialects` available for connection resolution and register their column
/// extensions in the process-wide registry.
///
/// Installing a dialect that is already installed has no effect. Fails with
/// [`Error::RegistrationClosed`] once the process-wide registry has been sealed.
pub fn install_dialects(dialects: &[&'static Dialect]) -> Result<()> {
    let registry = registry::global();

    if registry.is_sealed() {
        return Err(Error::RegistrationClosed);
    }

    let mut installed = INSTALLED.write();

    for &dialect in dialects {
        if installed.iter().any(|known| known.name == dialect.name) {
            tracing::debug!(dialect = dialect.name, "dialect already installed");
            continue;
        }

        dialect.install_into(registry)?;
        installed.push(dialect);

        tracing::debug!(
            dialect = dialect.name,
            port = dialect.defaults.port,
            driver = dialect.defaults.driver_class,
            "installed dialect"
        );
    }

    Ok(())
}

/// The installed dialect called `name`, by name, alias or URL scheme.
pub fn find_dialect(name: &str) -> Option<&'static Dialect> {
    INSTALLED
        .read()
        .iter()
        .copied()
        .find(|dialect| dialect.is_named(name))
}

/// The installed dialect whose URL scheme starts `url`, e.g. `jdbc:firebirdsql://…`.
pub fn find_dialect_for_url(url: &str) -> Option<&'static Dialect> {
    let rest = url.trim().strip_prefix("jdbc:")?;
    let (scheme, _) = rest.split_once(':')?;

    find_dialect(scheme)
}

/// The names of the installed dialects, in installation order.
pub fn installed_dialects() -> Vec<&'static str> {
    INSTALLED.read().iter().map(|dialect| dialect.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::RawColumn;
    use crate::types::SqlType;

    fn matcher() -> Result<DialectMatcher> {
        DialectMatcher::pattern("(?i)acme")
    }

    fn extend(_: &ColumnContext, draft: ColumnDraft) -> Result<ColumnDraft, BoxDynError> {
        Ok(draft.with_extension("acme.seen", true))
    }

    static ACME: Dialect = Dialect {
        name: "acme",
        aliases: &["acmedb"],
        defaults: ConnectDefaults {
            host: "localhost",
            port: 7000,
            driver_class: "com.acme.Driver",
            url_scheme: "acme-sql",
        },
        columns: Some(ColumnSelector { matcher, extend }),
    };

    #[test]
    fn it_formats_the_default_url() {
        assert_eq!(
            ACME.defaults.url("db.local", 7001, "stock"),
            "jdbc:acme-sql://db.local:7001/stock"
        );
    }

    #[test]
    fn it_matches_names_aliases_and_schemes() {
        assert!(ACME.is_named("acme"));
        assert!(ACME.is_named("ACMEDB"));
        assert!(ACME.is_named("acme-sql"));
        assert!(!ACME.is_named("postgres"));
    }

    #[test]
    fn it_registers_the_column_extension() {
        let registry = DialectRegistry::new();
        ACME.install_into(&registry).unwrap();

        // installing again replaces in place
        ACME.install_into(&registry).unwrap();
        assert_eq!(registry.len(), 1);

        let context = ColumnContext::new().driver("com.acme.Driver");
        let extensions = registry.lookup(context.dialect_identifier());
        assert_eq!(extensions.len(), 1);

        let raw = RawColumn::new("id", SqlType::INTEGER);
        let draft = ColumnDraft::new("id", SqlType::INTEGER, &raw);
        let draft = extensions[0](&context, draft).unwrap();

        assert_eq!(draft.extension("acme.seen"), Some(&true.into()));
    }

    #[test]
    fn it_finds_installed_dialects() {
        install_dialects(&[&ACME, &ACME]).unwrap();

        assert_eq!(
            installed_dialects().iter().filter(|&&name| name == "acme").count(),
            1
        );
        assert!(find_dialect("acmedb").is_some());
        assert!(find_dialect_for_url("jdbc:acme-sql://localhost/stock").is_some());
        assert!(find_dialect_for_url("acme-sql://localhost/stock").is_none());
    }
}
