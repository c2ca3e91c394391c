//! # Sanduq — a minimal keyed service-location container
//!
//! A string-keyed registry that stores values or factory functions and
//! resolves them on demand, with singletons, decoration ([`extend`]),
//! and deliberately-unresolved ([`protect`]) entries.
//!
//! [`extend`]: Container::extend
//! [`protect`]: Container::protect
//!
//! ```
//! use sanduq::prelude::*;
//!
//! let mut container = Container::new();
//! container.bind_singleton("config", |_| Ok(String::from("debug=true")));
//! container.bind_factory("service", |c: &Container| {
//!     let config = c.get::<String>("config")?;
//!     Ok(format!("service[{config}]"))
//! });
//!
//! assert_eq!(*container.get::<String>("service").unwrap(), "service[debug=true]");
//! ```

pub mod container;
pub mod entry;
pub mod error;

pub use container::{prelude, Container, Resolver};
pub use entry::{value, Entry, FactoryFn, Value};
pub use error::{Result, SanduqError};
