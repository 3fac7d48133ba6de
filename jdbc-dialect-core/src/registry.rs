//! Process-wide dispatch from dialect identifiers to column extensions.
//!
//! Each dialect module registers a `(matcher, extension)` pair while the process starts up.
//! When a column is built, every extension whose matcher accepts the connection's dialect
//! identifier is applied, in registration order.
//!
//! If two matchers accept the same identifier, both extensions run and the one registered
//! later wins for any field both of them set.

use std::borrow::Cow;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;

use crate::column::{ColumnContext, ColumnDraft};
use crate::error::{BoxDynError, Error, Result};

static GLOBAL: DialectRegistry = DialectRegistry::new();

/// A dialect-supplied decorate step for column metadata.
pub type ColumnExtension = Arc<
    dyn Fn(&ColumnContext, ColumnDraft) -> Result<ColumnDraft, BoxDynError> + Send + Sync + 'static,
>;

/// Decides whether a registered extension applies to a dialect identifier.
#[derive(Clone)]
pub enum DialectMatcher {
    /// Case-sensitive equality.
    Exact(Cow<'static, str>),

    /// Regular expression search anywhere in the identifier.
    Pattern(Regex),

    /// An arbitrary predicate, identified by `name` for replacement and diagnostics.
    Predicate {
        name: &'static str,
        matches: fn(&str) -> bool,
    },
}

impl DialectMatcher {
    pub fn exact(dialect: impl Into<Cow<'static, str>>) -> Self {
        DialectMatcher::Exact(dialect.into())
    }

    /// Compile `pattern` into a matcher; an invalid pattern is a configuration error.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(DialectMatcher::Pattern)
            .map_err(Error::config)
    }

    pub fn predicate(name: &'static str, matches: fn(&str) -> bool) -> Self {
        DialectMatcher::Predicate { name, matches }
    }

    /// Returns `true` if this matcher accepts `dialect`.
    pub fn matches(&self, dialect: &str) -> bool {
        match self {
            DialectMatcher::Exact(exact) => exact == dialect,
            DialectMatcher::Pattern(regex) => regex.is_match(dialect),
            DialectMatcher::Predicate { matches, .. } => matches(dialect),
        }
    }
}

/// Two matchers are identical if they are of the same kind and have the same string,
/// pattern source or predicate name.
impl PartialEq for DialectMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DialectMatcher::Exact(a), DialectMatcher::Exact(b)) => a == b,
            (DialectMatcher::Pattern(a), DialectMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            (
                DialectMatcher::Predicate { name: a, .. },
                DialectMatcher::Predicate { name: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

impl Eq for DialectMatcher {}

impl Debug for DialectMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DialectMatcher::Exact(exact) => f.debug_tuple("Exact").field(exact).finish(),
            DialectMatcher::Pattern(regex) => {
                f.debug_tuple("Pattern").field(&regex.as_str()).finish()
            }
            DialectMatcher::Predicate { name, .. } => {
                f.debug_struct("Predicate").field("name", name).finish()
            }
        }
    }
}

impl Display for DialectMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DialectMatcher::Exact(exact) => write!(f, "{exact:?}"),
            DialectMatcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            DialectMatcher::Predicate { name, .. } => write!(f, "<{name}>"),
        }
    }
}

struct RegistryEntry {
    matcher: DialectMatcher,
    extension: ColumnExtension,
}

/// An ordered, append-mostly list of `(matcher, extension)` pairs.
///
/// Registration and lookup may happen from any thread; a lookup always observes either all
/// or none of a concurrent registration. Once [sealed](Self::seal), further registration
/// fails with [`Error::RegistrationClosed`].
pub struct DialectRegistry {
    entries: RwLock<Vec<RegistryEntry>>,
    sealed: AtomicBool,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    pub const fn new() -> Self {
        DialectRegistry {
            entries: parking_lot::const_rwlock(Vec::new()),
            sealed: AtomicBool::new(false),
        }
    }

    /// Register `extension` for every dialect `matcher` accepts.
    ///
    /// Registering an identical matcher again replaces its extension and keeps its original
    /// position in the dispatch order.
    pub fn register(&self, matcher: DialectMatcher, extension: ColumnExtension) -> Result<()> {
        let mut entries = self.entries.write();

        if self.sealed.load(Ordering::Acquire) {
            return Err(Error::RegistrationClosed);
        }

        if let Some(entry) = entries.iter_mut().find(|entry| entry.matcher == matcher) {
            tracing::debug!(%matcher, "replacing column extension");
            entry.extension = extension;
        } else {
            tracing::debug!(%matcher, position = entries.len(), "registering column extension");
            entries.push(RegistryEntry { matcher, extension });
        }

        Ok(())
    }

    /// Convenience wrapper around [`register`](Self::register) for closures.
    pub fn register_fn<F>(&self, matcher: DialectMatcher, extension: F) -> Result<()>
    where
        F: Fn(&ColumnContext, ColumnDraft) -> Result<ColumnDraft, BoxDynError>
            + Send
            + Sync
            + 'static,
    {
        self.register(matcher, Arc::new(extension))
    }

    /// Every extension whose matcher accepts `dialect`, in registration order.
    pub fn lookup(&self, dialect: &str) -> Vec<ColumnExtension> {
        let entries = self.entries.read();

        let matched: Vec<&RegistryEntry> = entries
            .iter()
            .filter(|entry| entry.matcher.matches(dialect))
            .collect();

        if matched.len() > 1 {
            tracing::debug!(
                dialect,
                matchers = ?matched.iter().map(|entry| &entry.matcher).collect::<Vec<_>>(),
                "multiple column extensions apply; later registrations win on shared fields"
            );
        }

        matched
            .into_iter()
            .map(|entry| entry.extension.clone())
            .collect()
    }

    /// The registered matchers, in dispatch order.
    pub fn matchers(&self) -> Vec<DialectMatcher> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.matcher.clone())
            .collect()
    }

    /// Close the registration phase.
    pub fn seal(&self) {
        let _entries = self.entries.write();
        self.sealed.store(true, Ordering::Release);

        tracing::debug!("dialect registration closed");
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for DialectRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("matchers", &self.matchers())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

/// The process-wide registry.
pub fn global() -> &'static DialectRegistry {
    &GLOBAL
}

/// Register a column extension in the process-wide registry.
///
/// Meant to be called by a dialect module while it loads.
pub fn register_dialect_extension<F>(matcher: DialectMatcher, extension: F) -> Result<()>
where
    F: Fn(&ColumnContext, ColumnDraft) -> Result<ColumnDraft, BoxDynError>
        + Send
        + Sync
        + 'static,
{
    GLOBAL.register_fn(matcher, extension)
}
