//! Compatibility and coercion rules for one matched property pair
//!
//! Copyright (c) 2025 Propcopy Team
//! Licensed under the Apache-2.0 license

use crate::config::CopyConfig;
use crate::error::{CopyError, Result};
use crate::value::{PropertyValue, ScalarKind, ValueType};
use bigdecimal::BigDecimal;
use std::str::FromStr;

type ParseFailure = Box<dyn std::error::Error + Send + Sync>;

/// How a getter's value reaches a setter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Same scalar kind: write the value unchanged
    Direct,
    /// Textual source, non-textual target: parse the text
    Parse,
    /// Non-textual source, textual target: render the value
    Format,
    /// Nothing applies
    Skip,
}

/// Identical types, or the required and nullable forms of one kind
pub fn is_direct_compatible(source: ValueType, target: ValueType) -> bool {
    source.kind == target.kind
}

/// Pick the rule for a getter/setter pair, first match wins
pub fn plan(source: ValueType, target: ValueType) -> Plan {
    if is_direct_compatible(source, target) {
        Plan::Direct
    } else if source.is_textual() {
        Plan::Parse
    } else if target.is_textual() {
        Plan::Format
    } else {
        Plan::Skip
    }
}

/// Parse `text` into a value of `target`
///
/// `Ok(None)` when no parse rule exists for the target kind. Malformed
/// numeric text is a [`CopyError::Conversion`].
pub fn parse_text(
    text: &str,
    target: ScalarKind,
    property: &str,
    config: &CopyConfig,
) -> Result<Option<PropertyValue>> {
    let numeric = if config.trim_numeric_text { text.trim() } else { text };

    let parsed = match target {
        ScalarKind::I32 => parse_with(numeric, PropertyValue::I32),
        ScalarKind::I64 => parse_with(numeric, PropertyValue::I64),
        // Float parsing ignores surrounding whitespace regardless of config
        ScalarKind::F64 => parse_with(text.trim(), PropertyValue::F64),
        ScalarKind::F32 => parse_with(text.trim(), PropertyValue::F32),
        ScalarKind::Bool => Ok(PropertyValue::Bool(text.eq_ignore_ascii_case("true"))),
        ScalarKind::I8 => parse_with(numeric, PropertyValue::I8),
        ScalarKind::I16 => parse_with(numeric, PropertyValue::I16),
        ScalarKind::Decimal => parse_with::<BigDecimal>(numeric, PropertyValue::Decimal),
        ScalarKind::Char | ScalarKind::Text | ScalarKind::DateTime => return Ok(None),
    };

    parsed.map(Some).map_err(|source| CopyError::Conversion {
        property: property.to_string(),
        value: text.to_string(),
        target: target.name().to_string(),
        source: Some(source),
    })
}

fn parse_with<T>(
    text: &str,
    wrap: fn(T) -> PropertyValue,
) -> std::result::Result<PropertyValue, ParseFailure>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>().map(wrap).map_err(|e| Box::new(e) as ParseFailure)
}
