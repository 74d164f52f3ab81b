//! Per-type accessor tables and the discovery routine that builds them
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

use crate::error::{AccessorKind, CopyError, Result};
use crate::introspect::{Introspect, Reader, Signature, Writer};
use crate::value::{PropertyValue, ValueType};
use std::any::{Any, TypeId};
use std::collections::hash_map::{self, HashMap};
use std::fmt;
use std::sync::Arc;

/// Name shared by a getter and a setter of the same property
pub type PropertyName = String;

type ErasedReader = Arc<dyn Fn(&dyn Any) -> anyhow::Result<PropertyValue> + Send + Sync>;
type ErasedWriter = Arc<dyn Fn(&mut dyn Any, PropertyValue) -> anyhow::Result<()> + Send + Sync>;

#[derive(Clone)]
enum Invoker {
    Read(ErasedReader),
    Write(ErasedWriter),
}

/// One discovered getter or setter
#[derive(Clone)]
pub struct AccessorDescriptor {
    name: PropertyName,
    declaring_type: TypeId,
    declaring_type_name: &'static str,
    value_type: ValueType,
    invoker: Invoker,
}

impl AccessorDescriptor {
    fn reader<T: Introspect>(name: &str, returns: ValueType, read: Reader<T>) -> Self {
        let invoke: ErasedReader = Arc::new(move |receiver: &dyn Any| {
            let this = receiver
                .downcast_ref::<T>()
                .ok_or_else(|| anyhow::anyhow!("receiver is not a {}", std::any::type_name::<T>()))?;
            read(this)
        });
        Self {
            name: name.to_string(),
            declaring_type: TypeId::of::<T>(),
            declaring_type_name: std::any::type_name::<T>(),
            value_type: returns,
            invoker: Invoker::Read(invoke),
        }
    }

    fn writer<T: Introspect>(name: &str, accepts: ValueType, write: Writer<T>) -> Self {
        let invoke: ErasedWriter = Arc::new(move |receiver: &mut dyn Any, value: PropertyValue| {
            let this = receiver
                .downcast_mut::<T>()
                .ok_or_else(|| anyhow::anyhow!("receiver is not a {}", std::any::type_name::<T>()))?;
            write(this, value)
        });
        Self {
            name: name.to_string(),
            declaring_type: TypeId::of::<T>(),
            declaring_type_name: std::any::type_name::<T>(),
            value_type: accepts,
            invoker: Invoker::Write(invoke),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    pub fn declaring_type_name(&self) -> &'static str {
        self.declaring_type_name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn kind(&self) -> AccessorKind {
        match self.invoker {
            Invoker::Read(_) => AccessorKind::Getter,
            Invoker::Write(_) => AccessorKind::Setter,
        }
    }

    /// Invoke a getter on `receiver`
    pub fn read(&self, receiver: &dyn Any) -> Result<PropertyValue> {
        match &self.invoker {
            Invoker::Read(read) => read(receiver).map_err(|source| self.access_error(source)),
            Invoker::Write(_) => Err(self.access_error(anyhow::anyhow!("accessor is not readable"))),
        }
    }

    /// Invoke a setter on `receiver`
    pub fn write(&self, receiver: &mut dyn Any, value: PropertyValue) -> Result<()> {
        match &self.invoker {
            Invoker::Write(write) => write(receiver, value).map_err(|source| self.access_error(source)),
            Invoker::Read(_) => Err(self.access_error(anyhow::anyhow!("accessor is not writable"))),
        }
    }

    fn access_error(&self, source: anyhow::Error) -> CopyError {
        CopyError::Access {
            property: self.name.clone(),
            type_name: self.declaring_type_name,
            kind: self.kind(),
            source,
        }
    }
}

impl fmt::Debug for AccessorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type_name)
            .field("value_type", &self.value_type)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Getters or setters of one type, keyed by property name
#[derive(Debug, Clone)]
pub struct AccessorTable {
    owner: TypeId,
    owner_name: &'static str,
    kind: AccessorKind,
    entries: HashMap<PropertyName, AccessorDescriptor>,
}

impl AccessorTable {
    fn new<T: 'static>(kind: AccessorKind) -> Self {
        Self {
            owner: TypeId::of::<T>(),
            owner_name: std::any::type_name::<T>(),
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn owner(&self) -> TypeId {
        self.owner
    }

    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&AccessorDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, PropertyName, AccessorDescriptor> {
        self.entries.iter()
    }

    /// Property names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert(&mut self, descriptor: AccessorDescriptor) -> Option<AccessorDescriptor> {
        self.entries.insert(descriptor.name.clone(), descriptor)
    }
}

impl<'a> IntoIterator for &'a AccessorTable {
    type Item = (&'a PropertyName, &'a AccessorDescriptor);
    type IntoIter = hash_map::Iter<'a, PropertyName, AccessorDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Strip the accessor prefix from a method name
///
/// `None` when the name does not carry the prefix of `kind`.
pub fn property_name(method_name: &str, kind: AccessorKind) -> Option<&str> {
    method_name.strip_prefix(kind.prefix())
}

/// Introspect `T` and collect its accessors of one kind
///
/// Only readers named `get*` and writers named `set*` are kept. When two
/// accessors derive the same property name the later one replaces the
/// earlier one.
pub(crate) fn discover<T: Introspect>(kind: AccessorKind) -> AccessorTable {
    let mut table = AccessorTable::new::<T>(kind);

    for method in T::methods() {
        let Some(property) = property_name(method.name, kind) else {
            continue;
        };

        let descriptor = match (kind, method.signature) {
            (AccessorKind::Getter, Signature::Reader { returns, read }) => {
                AccessorDescriptor::reader::<T>(property, returns, read)
            }
            (AccessorKind::Setter, Signature::Writer { accepts, write }) => {
                AccessorDescriptor::writer::<T>(property, accepts, write)
            }
            _ => continue,
        };

        if let Some(previous) = table.insert(descriptor) {
            log::warn!(
                "{} '{}' on {} declared more than once, keeping the last ({} replaced)",
                kind,
                property,
                table.owner_name,
                previous.value_type
            );
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Method;
    use crate::value::ScalarKind;

    #[derive(Debug, Default)]
    struct Account {
        balance: i64,
        owner: String,
    }

    impl Introspect for Account {
        fn methods() -> Vec<Method<Self>> {
            vec![
                Method::<Self>::reader("getBalance", ValueType::required(ScalarKind::I64), |a| {
                    Ok(PropertyValue::I64(a.balance))
                }),
                Method::<Self>::writer("setBalance", ValueType::required(ScalarKind::I64), |a, v| {
                    if let PropertyValue::I64(v) = v {
                        a.balance = v;
                    }
                    Ok(())
                }),
                // Reader without the prefix is not a getter
                Method::<Self>::reader("owner", ValueType::required(ScalarKind::Text), |a| {
                    Ok(PropertyValue::Text(a.owner.clone()))
                }),
                // Prefixed name with the wrong shape is ignored
                Method::<Self>::other("getHistory"),
                Method::<Self>::writer("getConfused", ValueType::required(ScalarKind::Bool), |_, _| Ok(())),
                // Same property twice: the second wins
                Method::<Self>::reader("getOwner", ValueType::required(ScalarKind::I32), |_| {
                    Ok(PropertyValue::I32(0))
                }),
                Method::<Self>::reader("getOwner", ValueType::required(ScalarKind::Text), |a| {
                    Ok(PropertyValue::Text(a.owner.clone()))
                }),
            ]
        }

        fn instantiate() -> Result<Self> {
            Ok(Self::default())
        }
    }

    #[derive(Debug, Default)]
    struct Other;

    impl Introspect for Other {
        fn methods() -> Vec<Method<Self>> {
            Vec::new()
        }

        fn instantiate() -> Result<Self> {
            Ok(Self)
        }
    }

    #[test]
    fn test_property_name_derivation() {
        assert_eq!(property_name("getName", AccessorKind::Getter), Some("Name"));
        assert_eq!(property_name("setName", AccessorKind::Setter), Some("Name"));
        assert_eq!(property_name("setName", AccessorKind::Getter), None);
        assert_eq!(property_name("get", AccessorKind::Getter), Some(""));
        assert_eq!(property_name("name", AccessorKind::Getter), None);
    }

    #[test]
    fn test_discover_getters() {
        let table = discover::<Account>(AccessorKind::Getter);
        assert_eq!(table.kind(), AccessorKind::Getter);
        assert_eq!(table.owner(), TypeId::of::<Account>());
        assert_eq!(table.names(), vec!["Balance", "Owner"]);

        for (_, descriptor) in &table {
            assert_eq!(descriptor.declaring_type(), TypeId::of::<Account>());
            assert_eq!(descriptor.kind(), AccessorKind::Getter);
        }
    }

    #[test]
    fn test_discover_setters() {
        let table = discover::<Account>(AccessorKind::Setter);
        assert_eq!(table.names(), vec!["Balance"]);
        assert!(!table.contains("Confused"));
    }

    #[test]
    fn test_last_collision_wins() {
        let table = discover::<Account>(AccessorKind::Getter);
        let owner = table.get("Owner").unwrap();
        assert_eq!(owner.value_type(), ValueType::required(ScalarKind::Text));

        let account = Account {
            balance: 3,
            owner: "ada".to_string(),
        };
        assert_eq!(owner.read(&account).unwrap(), PropertyValue::Text("ada".to_string()));
    }

    #[test]
    fn test_descriptor_invocation() {
        let getters = discover::<Account>(AccessorKind::Getter);
        let setters = discover::<Account>(AccessorKind::Setter);
        let mut account = Account::default();

        setters
            .get("Balance")
            .unwrap()
            .write(&mut account, PropertyValue::I64(250))
            .unwrap();
        assert_eq!(
            getters.get("Balance").unwrap().read(&account).unwrap(),
            PropertyValue::I64(250)
        );
    }

    #[test]
    fn test_descriptor_rejects_foreign_receiver() {
        let getters = discover::<Account>(AccessorKind::Getter);
        let err = getters.get("Balance").unwrap().read(&Other).unwrap_err();
        match err {
            CopyError::Access { property, kind, .. } => {
                assert_eq!(property, "Balance");
                assert_eq!(kind, AccessorKind::Getter);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_descriptor_kind_mismatch() {
        let getters = discover::<Account>(AccessorKind::Getter);
        let mut account = Account::default();
        let err = getters
            .get("Balance")
            .unwrap()
            .write(&mut account, PropertyValue::I64(1))
            .unwrap_err();
        assert!(err.to_string().contains("not writable"));
    }

    #[test]
    fn test_empty_type() {
        let table = discover::<Other>(AccessorKind::Setter);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
