//! # The Container — a keyed service-location registry
//!
//! The container maps string keys to [`Entry`] bindings and resolves
//! them on demand. Bind operations differ only in *what* they store;
//! resolution always runs the same match over the entry's tag.
//!
//! # Examples
//! ```rust
//! use sanduq::prelude::*;
//!
//! let mut container = Container::new();
//! container.bind_value("greeting", String::from("hello"));
//! container.bind_factory("message", |c: &Container| {
//!     let greeting = c.get::<String>("greeting")?;
//!     Ok(format!("{greeting}, world"))
//! });
//!
//! let message = container.get::<String>("message").unwrap();
//! assert_eq!(*message, "hello, world");
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::entry::{Entry, FactoryFn, Value};
use crate::error::{Result, SanduqError};

// ═══════════════════════════════════════════
// Resolver (interop seam)
// ═══════════════════════════════════════════

/// Minimal resolution interface: `has` and `resolve`.
///
/// Code that only needs to look entries up can depend on this narrow
/// surface instead of the concrete [`Container`].
pub trait Resolver {
    /// True iff `key` has a bound entry. Never fails.
    fn has(&self, key: &str) -> bool;

    /// Resolve `key` to a type-erased value.
    fn resolve(&self, key: &str) -> Result<Value>;
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A string-keyed registry of values and factories.
///
/// Binding goes through `&mut self`; resolution through `&self`. The
/// call model is single-threaded and synchronous — a multi-threaded
/// host must add its own locking around the container, though the
/// singleton cache cells are safe under racing first resolutions of
/// distinct keys.
#[derive(Default)]
pub struct Container {
    entries: HashMap<String, Entry>,
}

impl Container {
    /// An empty container.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// A container pre-populated with key → value bindings.
    ///
    /// Each pair lands as a literal entry; use [`value`](crate::entry::value)
    /// to erase typed values.
    ///
    /// ```
    /// use sanduq::prelude::*;
    ///
    /// let container = Container::with_values([("a", value("abc")), ("b", value(123))]);
    /// assert_eq!(*container.get::<&str>("a").unwrap(), "abc");
    /// assert_eq!(*container.get::<i32>("b").unwrap(), 123);
    /// ```
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            entries: values
                .into_iter()
                .map(|(k, v)| (k.into(), Entry::Value(v)))
                .collect(),
        }
    }

    // ── Binding ──

    /// Insert or overwrite a literal value for `key`.
    ///
    /// Never fails; last write wins silently.
    pub fn bind_value<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        self.insert(key.into(), Entry::Value(Arc::new(value)));
    }

    /// Insert or overwrite a factory for `key`.
    ///
    /// The factory is re-invoked with the container on every resolution
    /// of `key`, so it may resolve other entries while constructing its
    /// result.
    pub fn bind_factory<T, F>(&mut self, key: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert(key.into(), Entry::Factory(erase(factory)));
    }

    /// Insert or overwrite a singleton factory for `key`.
    ///
    /// Called ONCE on first resolution (via `OnceCell`); the result is
    /// cached for the lifetime of the container and handed back on every
    /// subsequent resolution. Rebinding the key discards the cache.
    pub fn bind_singleton<T, F>(&mut self, key: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert(key.into(), Entry::singleton(erase(factory)));
    }

    /// Insert or overwrite a protected factory for `key`.
    ///
    /// Resolving `key` yields the factory itself as a value wrapping a
    /// [`FactoryFn`], without running it — see [`Container::factory`]
    /// for the typed accessor.
    pub fn protect<T, F>(&mut self, key: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert(key.into(), Entry::Protected(erase(factory)));
    }

    /// Wrap the existing entry for `key` with a decorator.
    ///
    /// Resolving `key` afterwards first resolves the previous entry to
    /// produce `inner`, then returns `decorator(inner, container)`.
    /// Repeated calls nest outer-most-last.
    ///
    /// # Errors
    /// - [`SanduqError::NotFound`] if `key` is unbound.
    /// - [`SanduqError::NotInvocable`] if the entry is a literal value.
    ///
    /// Either failure leaves the container untouched.
    pub fn extend<F>(&mut self, key: &str, decorator: F) -> Result<()>
    where
        F: Fn(Value, &Container) -> Result<Value> + Send + Sync + 'static,
    {
        match self.entries.get(key) {
            None => {
                return Err(SanduqError::NotFound {
                    key: key.to_owned(),
                });
            }
            Some(entry) if !entry.is_invocable() => {
                return Err(SanduqError::NotInvocable {
                    key: key.to_owned(),
                });
            }
            Some(_) => {}
        }

        let Some(inner) = self.entries.remove(key) else {
            // presence checked above
            return Err(SanduqError::NotFound {
                key: key.to_owned(),
            });
        };

        let wrapped: FactoryFn = Arc::new(move |c: &Container| {
            let resolved = inner.resolve(c)?;
            decorator(resolved, c)
        });

        debug!(key = %key, "extended entry");
        self.entries.insert(key.to_owned(), Entry::Factory(wrapped));
        Ok(())
    }

    // ── Resolution ──

    /// True iff `key` has a bound entry. Never fails.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolve `key` to a type-erased value.
    ///
    /// The canonical resolution entry point: literals come back
    /// unchanged, factories run with the container as their argument,
    /// singletons memoize, protected factories come back unexecuted.
    ///
    /// # Errors
    /// [`SanduqError::NotFound`] if `key` is unbound.
    pub fn get_raw(&self, key: &str) -> Result<Value> {
        trace!(key = %key, "resolving");

        let entry = self.entries.get(key).ok_or_else(|| SanduqError::NotFound {
            key: key.to_owned(),
        })?;
        entry.resolve(self)
    }

    /// Resolve `key` and downcast to `T`.
    ///
    /// ```rust,ignore
    /// let db: Arc<Database> = container.get::<Database>("db")?;
    /// ```
    ///
    /// # Errors
    /// [`SanduqError::NotFound`] if `key` is unbound,
    /// [`SanduqError::TypeMismatch`] if the resolved value is not a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        self.get_raw(key)?
            .downcast::<T>()
            .map_err(|_| SanduqError::TypeMismatch {
                key: key.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Resolve a protected entry back to its factory.
    ///
    /// The returned [`FactoryFn`] is the one passed to
    /// [`Container::protect`], still unexecuted; run it yourself with a
    /// container reference.
    pub fn factory(&self, key: &str) -> Result<FactoryFn> {
        self.get::<FactoryFn>(key).map(|f| (*f).clone())
    }

    // ── Introspection ──

    /// Number of bound entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    // ── Internal ──

    fn insert(&mut self, key: String, entry: Entry) {
        debug!(key = %key, kind = entry.kind(), "bound entry");
        self.entries.insert(key, entry);
    }
}

impl Resolver for Container {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn resolve(&self, key: &str) -> Result<Value> {
        self.get_raw(key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bound", &self.entries.len())
            .finish()
    }
}

// Erases a typed factory into the stored FactoryFn shape.
fn erase<T, F>(factory: F) -> FactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |c: &Container| Ok(Arc::new(factory(c)?) as Value))
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, Resolver};
    pub use crate::entry::{value, Entry, FactoryFn, Value};
    pub use crate::error::{Result, SanduqError};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
