//! Decoder configuration types
//!
//! The decoder needs very little configuration: the field separator of the
//! capture, the placeholder used when a file carries no machine id, and the
//! century added to two-digit years.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Accepted centuries for two-digit years
const CENTURY_BASE_RANGE: std::ops::RangeInclusive<i32> = 0..=9900;

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Separator between the fields of a record (DEX uses `*`)
    #[serde(default = "default_field_separator")]
    pub field_separator: char,

    /// Machine id reported when a file has no usable ID1 record
    #[serde(default)]
    pub unknown_machine_id: String,

    /// Century added to two-digit years in PA5 dates
    #[serde(default = "default_century_base")]
    pub century_base: i32,
}

fn default_field_separator() -> char {
    '*'
}

fn default_century_base() -> i32 {
    2000
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            field_separator: default_field_separator(),
            unknown_machine_id: String::new(),
            century_base: default_century_base(),
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the field separator
    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.field_separator = separator;
        self
    }

    /// Builder method: set the placeholder machine id
    pub fn with_unknown_machine_id(mut self, machine_id: impl Into<String>) -> Self {
        self.unknown_machine_id = machine_id.into();
        self
    }

    /// Builder method: set the century for two-digit years
    pub fn with_century_base(mut self, century_base: i32) -> Self {
        self.century_base = century_base;
        self
    }

    /// Check that the separator can actually delimit DEX fields
    pub fn validate(&self) -> Result<()> {
        let sep = self.field_separator;
        if sep.is_whitespace() || sep.is_alphanumeric() {
            return Err(DecoderError::InvalidConfig(format!(
                "field separator {:?} must not be whitespace or alphanumeric",
                sep
            )));
        }
        if !CENTURY_BASE_RANGE.contains(&self.century_base) || self.century_base % 100 != 0 {
            return Err(DecoderError::InvalidConfig(format!(
                "century base {} is not a multiple of 100 between {} and {}",
                self.century_base,
                CENTURY_BASE_RANGE.start(),
                CENTURY_BASE_RANGE.end()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_field_separator('|')
            .with_unknown_machine_id("Unknown")
            .with_century_base(1900);

        assert_eq!(config.field_separator, '|');
        assert_eq!(config.unknown_machine_id, "Unknown");
        assert_eq!(config.century_base, 1900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::new();
        assert_eq!(config.field_separator, '*');
        assert_eq!(config.unknown_machine_id, "");
        assert_eq!(config.century_base, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_separator() {
        assert!(DecoderConfig::new().with_field_separator(' ').validate().is_err());
        assert!(DecoderConfig::new().with_field_separator('A').validate().is_err());
        assert!(DecoderConfig::new().with_century_base(1950).validate().is_err());
        assert!(DecoderConfig::new().with_century_base(2147483600).validate().is_err());
        assert!(DecoderConfig::new().with_century_base(-100).validate().is_err());
        assert!(DecoderConfig::new().with_century_base(9900).validate().is_ok());
    }
}
