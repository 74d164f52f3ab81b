//! Accessor discovery capability
//!
//! Rust has no runtime reflection, so a copyable type describes itself by
//! implementing [`Introspect`]: it lists its public methods by name, each
//! with a [`Signature`] telling whether it is a zero-argument reader, a
//! single-argument writer or something else. The accessor cache keeps the
//! readers named `get*` and the writers named `set*`.
//!
//! Most types never implement the trait by hand; the [`introspect!`] macro
//! generates the method list from a field list.
//!
//! [`introspect!`]: crate::introspect!

use crate::cache::{self, AccessorTable};
use crate::error::{AccessorKind, Result};
use crate::value::{PropertyValue, ValueType};
use std::any::{Any, TypeId};
use std::fmt;

/// Zero-argument reader of one property
pub type Reader<T> = fn(&T) -> anyhow::Result<PropertyValue>;

/// Single-argument writer of one property
pub type Writer<T> = fn(&mut T, PropertyValue) -> anyhow::Result<()>;

/// Shape of a method as seen by accessor discovery
pub enum Signature<T> {
    Reader { returns: ValueType, read: Reader<T> },
    Writer { accepts: ValueType, write: Writer<T> },
    /// Any other arity or return shape, never an accessor
    Other,
}

/// One public method of an introspectable type
pub struct Method<T> {
    pub name: &'static str,
    pub signature: Signature<T>,
}

impl<T> Method<T> {
    pub fn reader(name: &'static str, returns: ValueType, read: Reader<T>) -> Self {
        Self {
            name,
            signature: Signature::Reader { returns, read },
        }
    }

    pub fn writer(name: &'static str, accepts: ValueType, write: Writer<T>) -> Self {
        Self {
            name,
            signature: Signature::Writer { accepts, write },
        }
    }

    pub fn other(name: &'static str) -> Self {
        Self {
            name,
            signature: Signature::Other,
        }
    }
}

/// Capability a type implements to take part in property copying
pub trait Introspect: Any + Send + Sync + Sized {
    /// Every public method of the type, in declaration order
    fn methods() -> Vec<Method<Self>>;

    /// Build an empty instance, the zero-argument constructor
    fn instantiate() -> Result<Self>;
}

/// Object-safe view of an introspectable value
///
/// Blanket-implemented for every [`Introspect`] type so values of different
/// types can be handed around as `&dyn Bean`.
pub trait Bean: Any + Send + Sync {
    fn bean_type(&self) -> BeanType;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Introspect> Bean for T {
    fn bean_type(&self) -> BeanType {
        BeanType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Runtime descriptor of an introspectable type
#[derive(Clone, Copy)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
    discover: fn(AccessorKind) -> AccessorTable,
    instantiate: fn() -> Result<Box<dyn Bean>>,
}

impl BeanType {
    pub fn of<T: Introspect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            discover: cache::discover::<T>,
            instantiate: instantiate_boxed::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Introspect the type, bypassing any cache
    pub fn discover(&self, kind: AccessorKind) -> AccessorTable {
        (self.discover)(kind)
    }

    pub fn instantiate(&self) -> Result<Box<dyn Bean>> {
        (self.instantiate)()
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanType {}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeanType").field(&self.name).finish()
    }
}

fn instantiate_boxed<T: Introspect>() -> Result<Box<dyn Bean>> {
    let value = T::instantiate()?;
    Ok(Box::new(value))
}

/// Implement [`Introspect`] for a struct from its copyable fields
///
/// Each entry names the property, the field and the field type. A `get`
/// reader and a `set` writer are generated per property; mark an entry
/// `[read]` or `[write]` to generate only one of them. The struct must
/// implement `Default`, which serves as the zero-argument constructor.
///
/// ```
/// use propcopy_core::introspect;
///
/// #[derive(Debug, Default)]
/// struct UserDto {
///     id: i64,
///     name: Option<String>,
///     version: i32,
/// }
///
/// introspect! {
///     UserDto {
///         Id => id: i64,
///         Name => name: Option<String>,
///         Version [read] => version: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! introspect {
    ($ty:ident { $($prop:ident $([$mode:ident])? => $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::Introspect for $ty {
            fn methods() -> ::std::vec::Vec<$crate::Method<Self>> {
                let mut methods: ::std::vec::Vec<$crate::Method<Self>> = ::std::vec::Vec::new();
                $(
                    methods.extend($crate::introspect!(@accessors [$($mode)?] $prop, $field, $fty));
                )*
                methods
            }

            fn instantiate() -> $crate::Result<Self> {
                ::std::result::Result::Ok(<Self as ::std::default::Default>::default())
            }
        }
    };
    (@accessors [] $prop:ident, $field:ident, $fty:ty) => {
        [
            $crate::introspect!(@reader $prop, $field, $fty),
            $crate::introspect!(@writer $prop, $field, $fty),
        ]
    };
    (@accessors [read] $prop:ident, $field:ident, $fty:ty) => {
        [$crate::introspect!(@reader $prop, $field, $fty)]
    };
    (@accessors [write] $prop:ident, $field:ident, $fty:ty) => {
        [$crate::introspect!(@writer $prop, $field, $fty)]
    };
    (@reader $prop:ident, $field:ident, $fty:ty) => {
        $crate::Method::<Self>::reader(
            concat!("get", stringify!($prop)),
            <$fty as $crate::Scalar>::VALUE_TYPE,
            |this: &Self| {
                ::std::result::Result::Ok($crate::Scalar::into_value(
                    ::std::clone::Clone::clone(&this.$field),
                ))
            },
        )
    };
    (@writer $prop:ident, $field:ident, $fty:ty) => {
        $crate::Method::<Self>::writer(
            concat!("set", stringify!($prop)),
            <$fty as $crate::Scalar>::VALUE_TYPE,
            |this: &mut Self, value: $crate::PropertyValue| {
                this.$field = <$fty as $crate::Scalar>::from_value(value)
                    .map_err($crate::value::value_mismatch::<$fty>)?;
                ::std::result::Result::Ok(())
            },
        )
    };
}
