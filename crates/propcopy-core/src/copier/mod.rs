//! Name-matching property copier
//!
//! The [`Copier`] instantiates a target, intersects the target's setters with
//! the source's getters by property name, and moves each matched value
//! across using the rules in [`coerce`]:
//!
//! - same scalar kind: the value is written unchanged
//! - text into anything else: the text is parsed
//! - anything into text: the value is rendered
//! - otherwise the property is left at its default
//!
//! Unmatched names, absent values and kinds without a parse rule are skipped
//! silently. Instantiation, access and parse failures abort the copy.
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

pub mod coerce;


use crate::cache::AccessorCache;
use crate::config::CopyConfig;
use crate::error::Result;
use crate::introspect::{Bean, BeanType, Introspect};
use crate::value::PropertyValue;
use coerce::Plan;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

static SHARED_COPIER: OnceLock<Copier> = OnceLock::new();

/// Why a matched or unmatched property was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source has no getter with this name
    Unmatched,
    /// The getter returned no value, or the target slot cannot hold none
    AbsentValue,
    /// Textual source, but no parse rule for the target kind
    NoParseRule,
    /// Neither compatible nor convertible through text
    Incompatible,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unmatched => write!(f, "no matching getter"),
            SkipReason::AbsentValue => write!(f, "no value to copy"),
            SkipReason::NoParseRule => write!(f, "no parse rule for target type"),
            SkipReason::Incompatible => write!(f, "incompatible types"),
        }
    }
}

enum Outcome {
    Write(PropertyValue),
    Skip(SkipReason),
}

/// Copies same-named properties between unrelated types
#[derive(Debug, Clone)]
pub struct Copier {
    cache: Arc<AccessorCache>,
    config: CopyConfig,
}

impl Copier {
    /// Copier over the global cache with default settings
    pub fn new() -> Self {
        Self {
            cache: AccessorCache::global(),
            config: CopyConfig::default(),
        }
    }

    /// Copier over the global cache with custom settings
    pub fn with_config(config: CopyConfig) -> Result<Self> {
        Self::with_cache(AccessorCache::global(), config)
    }

    /// Copier over a caller-supplied cache
    pub fn with_cache(cache: Arc<AccessorCache>, config: CopyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { cache, config })
    }

    /// The process-wide copier, created on first use
    pub fn shared() -> &'static Copier {
        SHARED_COPIER.get_or_init(Copier::new)
    }

    pub fn cache(&self) -> &AccessorCache {
        &self.cache
    }

    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Copy `source` into a freshly instantiated `T`
    ///
    /// An absent source gives an absent target.
    pub fn copy_properties<S, T>(&self, source: Option<&S>) -> Result<Option<T>>
    where
        S: Bean + ?Sized,
        T: Introspect,
    {
        match source {
            Some(source) => self.copy_new(source).map(Some),
            None => Ok(None),
        }
    }

    /// Copy `source` into a fresh instance of a type known only at runtime
    pub fn copy_to_type<S>(&self, source: Option<&S>, target_type: &BeanType) -> Result<Option<Box<dyn Bean>>>
    where
        S: Bean + ?Sized,
    {
        let Some(source) = source else {
            return Ok(None);
        };

        let mut target = target_type.instantiate()?;
        self.populate(&source.bean_type(), source.as_any(), target_type, target.as_any_mut())?;
        Ok(Some(target))
    }

    /// Copy `source` into an existing `target`
    pub fn copy_into<S, T>(&self, source: &S, target: &mut T) -> Result<()>
    where
        S: Bean + ?Sized,
        T: Bean + ?Sized,
    {
        let target_type = target.bean_type();
        self.populate(&source.bean_type(), source.as_any(), &target_type, target.as_any_mut())
    }

    /// Copy every item into a new `T`, keeping input order
    ///
    /// An absent input gives an empty list. The first failing item aborts the
    /// whole batch.
    pub fn convert_list<'a, S, T, I>(&self, items: Option<I>) -> Result<Vec<T>>
    where
        S: Bean + ?Sized + 'a,
        T: Introspect,
        I: IntoIterator<Item = &'a S>,
    {
        let Some(items) = items else {
            return Ok(Vec::new());
        };

        items.into_iter().map(|item| self.copy_new(item)).collect()
    }

    fn copy_new<S, T>(&self, source: &S) -> Result<T>
    where
        S: Bean + ?Sized,
        T: Introspect,
    {
        let mut target = T::instantiate()?;
        self.copy_into(source, &mut target)?;
        Ok(target)
    }

    fn populate(
        &self,
        source_type: &BeanType,
        source: &dyn Any,
        target_type: &BeanType,
        target: &mut dyn Any,
    ) -> Result<()> {
        let setters = self.cache.setter_table(target_type);
        let getters = self.cache.getter_table(source_type);

        for (name, setter) in setters.iter() {
            let Some(getter) = getters.get(name) else {
                self.skipped(name, source_type, target_type, SkipReason::Unmatched);
                continue;
            };

            let target_slot = setter.value_type();
            let outcome = match coerce::plan(getter.value_type(), target_slot) {
                Plan::Direct => {
                    let value = getter.read(source)?;
                    if value.is_null() && !target_slot.nullable {
                        Outcome::Skip(SkipReason::AbsentValue)
                    } else {
                        Outcome::Write(value)
                    }
                }
                Plan::Parse => match getter.read(source)? {
                    PropertyValue::Text(text) => {
                        match coerce::parse_text(&text, target_slot.kind, name, &self.config)? {
                            Some(parsed) => Outcome::Write(parsed),
                            None => Outcome::Skip(SkipReason::NoParseRule),
                        }
                    }
                    _ => Outcome::Skip(SkipReason::AbsentValue),
                },
                Plan::Format => match getter.read(source)?.render(&self.config.datetime_format)? {
                    Some(text) => Outcome::Write(PropertyValue::Text(text)),
                    None => Outcome::Skip(SkipReason::AbsentValue),
                },
                Plan::Skip => Outcome::Skip(SkipReason::Incompatible),
            };

            match outcome {
                Outcome::Write(value) => setter.write(target, value)?,
                Outcome::Skip(reason) => self.skipped(name, source_type, target_type, reason),
            }
        }

        Ok(())
    }

    fn skipped(&self, property: &str, source: &BeanType, target: &BeanType, reason: SkipReason) {
        if self.config.log_skipped {
            log::trace!(
                "Skipping '{}' from {} to {}: {}",
                property,
                source.name(),
                target.name(),
                reason
            );
        }
    }
}

impl Default for Copier {
    fn default() -> Self {
        Self::new()
    }
}
