//! Container entries — the tagged bindings behind every key.
//!
//! Every key in a [`Container`](crate::container::Container) maps to one
//! [`Entry`]. The tag is fixed at bind time, so resolution is a plain
//! match instead of a runtime is-this-callable test: values come back
//! as-is, factories run with the container as their argument, singletons
//! memoize through a cache cell, and protected factories come back
//! unexecuted.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::container::Container;
use crate::error::Result;

/// A type-erased resolved value.
///
/// `Arc`-erased rather than boxed so literal and singleton entries hand
/// out the same underlying object on every resolution (observable via
/// [`Arc::ptr_eq`]).
pub type Value = Arc<dyn Any + Send + Sync>;

/// Type alias for factory functions.
///
/// A factory takes a reference to the container (to resolve other
/// entries during construction) and returns a type-erased value or an
/// error.
///
/// # Why `Arc` and not `Box`?
/// Factories get cloned out of the map during resolution and recaptured
/// by `extend` wrappers. `Arc` allows cloning without copying the
/// closure.
pub type FactoryFn = Arc<dyn Fn(&Container) -> Result<Value> + Send + Sync>;

/// Erases a typed value into a [`Value`].
///
/// Handy for pre-populating a container:
///
/// ```
/// use sanduq::prelude::*;
///
/// let container = Container::with_values([("a", value("abc")), ("b", value(123))]);
/// assert_eq!(*container.get::<i32>("b").unwrap(), 123);
/// ```
pub fn value<T: Send + Sync + 'static>(v: T) -> Value {
    Arc::new(v)
}

/// A stored binding for a key.
///
/// The variant decides how resolution interprets the entry; every public
/// resolution path funnels through [`Entry::resolve`].
pub enum Entry {
    /// A literal; resolution returns it unchanged.
    Value(Value),
    /// Re-invoked with the container on every resolution.
    Factory(FactoryFn),
    /// Invoked at most once per container; the cell caches the result
    /// for the container's lifetime and never reverts to empty.
    Singleton {
        factory: FactoryFn,
        cell: OnceCell<Value>,
    },
    /// Resolution yields the factory itself, unexecuted.
    Protected(FactoryFn),
}

impl Entry {
    /// A singleton entry with an empty cache cell.
    pub(crate) fn singleton(factory: FactoryFn) -> Self {
        Entry::Singleton {
            factory,
            cell: OnceCell::new(),
        }
    }

    /// The uniform resolution rule.
    pub(crate) fn resolve(&self, container: &Container) -> Result<Value> {
        match self {
            Entry::Value(v) => Ok(Arc::clone(v)),
            Entry::Factory(f) => f(container),
            Entry::Singleton { factory, cell } => {
                let v = cell.get_or_try_init(|| factory(container))?;
                Ok(Arc::clone(v))
            }
            Entry::Protected(f) => Ok(Arc::new(Arc::clone(f)) as Value),
        }
    }

    /// Everything except a literal is backed by a factory and can be
    /// extended.
    pub(crate) fn is_invocable(&self) -> bool {
        !matches!(self, Entry::Value(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Entry::Value(_) => "value",
            Entry::Factory(_) => "factory",
            Entry::Singleton { .. } => "singleton",
            Entry::Protected(_) => "protected",
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(_) => f.write_str("Entry::Value"),
            Entry::Factory(_) => f.write_str("Entry::Factory"),
            Entry::Singleton { cell, .. } => f
                .debug_struct("Entry::Singleton")
                .field("initialized", &cell.get().is_some())
                .finish(),
            Entry::Protected(_) => f.write_str("Entry::Protected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    #[test]
    fn value_entry_resolves_to_same_object() {
        let container = Container::new();
        let entry = Entry::Value(value(String::from("abc")));

        let a = entry.resolve(&container).unwrap();
        let b = entry.resolve(&container).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn factory_entry_reinvoked_each_resolve() {
        let container = Container::new();
        let entry = Entry::Factory(Arc::new(|_| Ok(value(String::from("fresh")))));

        let a = entry.resolve(&container).unwrap();
        let b = entry.resolve(&container).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn singleton_entry_caches_first_result() {
        let container = Container::new();
        let entry = Entry::singleton(Arc::new(|_| Ok(value(42i32))));

        let a = entry.resolve(&container).unwrap();
        let b = entry.resolve(&container).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn protected_entry_yields_factory_unexecuted() {
        let container = Container::new();
        let factory: FactoryFn = Arc::new(|_| Ok(value(String::from("ran"))));
        let entry = Entry::Protected(factory);

        let resolved = entry.resolve(&container).unwrap();
        let f = resolved.downcast::<FactoryFn>().unwrap();

        let result = f(&container).unwrap();
        assert_eq!(*result.downcast::<String>().unwrap(), "ran");
    }

    #[test]
    fn invocable_check() {
        assert!(!Entry::Value(value(1i32)).is_invocable());
        assert!(Entry::Factory(Arc::new(|_| Ok(value(1i32)))).is_invocable());
        assert!(Entry::singleton(Arc::new(|_| Ok(value(1i32)))).is_invocable());
        assert!(Entry::Protected(Arc::new(|_| Ok(value(1i32)))).is_invocable());
    }

    #[test]
    fn debug_shows_singleton_state() {
        let container = Container::new();
        let entry = Entry::singleton(Arc::new(|_| Ok(value(1i32))));

        assert!(format!("{entry:?}").contains("initialized: false"));
        entry.resolve(&container).unwrap();
        assert!(format!("{entry:?}").contains("initialized: true"));
    }
}
