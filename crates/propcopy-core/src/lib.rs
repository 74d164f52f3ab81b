//! Propcopy Core - name-matching property copier
//!
//! This crate copies scalar properties from one value to a new value of an
//! unrelated type by matching getter and setter names, converting through
//! text where the two sides disagree on type.
//!
//! # Main Components
//!
//! - **Introspection**: the [`Introspect`] capability and the
//!   [`introspect!`] macro that lists a type's accessors
//! - **Accessor Cache**: process-wide, append-only cache of discovered
//!   getter and setter tables
//! - **Copier**: property matching plus scalar coercion
//! - **Error Handling**: [`CopyError`] built with `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```
//! use propcopy_core::{copy_properties, introspect, Result};
//!
//! #[derive(Debug, Default)]
//! struct OrderEntity {
//!     id: i64,
//!     quantity: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct OrderDto {
//!     id: Option<i64>,
//!     quantity: i32,
//! }
//!
//! introspect!(OrderEntity { Id => id: i64, Quantity => quantity: String });
//! introspect!(OrderDto { Id => id: Option<i64>, Quantity => quantity: i32 });
//!
//! fn example() -> Result<()> {
//!     let entity = OrderEntity { id: 7, quantity: "3".to_string() };
//!     let dto: Option<OrderDto> = copy_properties(Some(&entity))?;
//!     let dto = dto.unwrap();
//!     assert_eq!(dto.id, Some(7));
//!     assert_eq!(dto.quantity, 3);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod cache;
pub mod config;
pub mod copier;
pub mod error;
pub mod introspect;
pub mod value;

// Re-export main types for convenience
pub use cache::{AccessorCache, AccessorDescriptor, AccessorTable, PropertyName};
pub use config::{CopyConfig, CopyConfigBuilder};
pub use copier::{Copier, SkipReason};
pub use error::{AccessorKind, CopyError, Result};
pub use introspect::{Bean, BeanType, Introspect, Method, Signature};
pub use value::{PropertyValue, Scalar, ScalarKind, ValueType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Copy `source` into a new `T` using the shared copier
pub fn copy_properties<S, T>(source: Option<&S>) -> Result<Option<T>>
where
    S: Bean + ?Sized,
    T: Introspect,
{
    Copier::shared().copy_properties(source)
}

/// Copy every item into a new `T` using the shared copier
pub fn convert_list<'a, S, T, I>(items: Option<I>) -> Result<Vec<T>>
where
    S: Bean + ?Sized + 'a,
    T: Introspect,
    I: IntoIterator<Item = &'a S>,
{
    Copier::shared().convert_list(items)
}
