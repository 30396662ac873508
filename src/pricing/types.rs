use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Pricing scheme reported by the API for a model.
///
/// Serialized names match the API's `pricing.type` values. The
/// `output_character_length` and `output_length` variants are never sent by
/// the API today but keep every scheme symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PricingType {
    Time,
    Tokens,
    InputTokens,
    OutputTokens,
    #[serde(alias = "input_chars")]
    InputCharacterLength,
    #[serde(alias = "output_chars")]
    OutputCharacterLength,
    InputLength,
    OutputLength,
    ImageUnits,
}

impl PricingType {
    pub(crate) const ALL: [PricingType; 9] = [
        PricingType::Time,
        PricingType::Tokens,
        PricingType::InputTokens,
        PricingType::OutputTokens,
        PricingType::InputCharacterLength,
        PricingType::OutputCharacterLength,
        PricingType::InputLength,
        PricingType::OutputLength,
        PricingType::ImageUnits,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PricingType::Time => "time",
            PricingType::Tokens => "tokens",
            PricingType::InputTokens => "input_tokens",
            PricingType::OutputTokens => "output_tokens",
            PricingType::InputCharacterLength => "input_character_length",
            PricingType::OutputCharacterLength => "output_character_length",
            PricingType::InputLength => "input_length",
            PricingType::OutputLength => "output_length",
            PricingType::ImageUnits => "image_units",
        }
    }

    /// Raw field holding the price that is predictable from the request
    /// itself (tokens sent, characters submitted, image size).
    pub(crate) fn input_price_key(self) -> Option<&'static str> {
        match self {
            PricingType::ImageUnits => Some("cents_per_image_unit"),
            PricingType::Tokens | PricingType::InputTokens => Some("cents_per_input_token"),
            PricingType::InputCharacterLength => Some("cents_per_input_chars"),
            PricingType::InputLength => Some("cents_per_input_sec"),
            PricingType::Time
            | PricingType::OutputTokens
            | PricingType::OutputCharacterLength
            | PricingType::OutputLength => None,
        }
    }

    /// Raw field holding the price that only becomes known at runtime
    /// (tokens generated, inference seconds).
    pub(crate) fn output_price_key(self) -> Option<&'static str> {
        match self {
            PricingType::Time => Some("cents_per_sec"),
            PricingType::Tokens | PricingType::OutputTokens => Some("cents_per_output_token"),
            PricingType::OutputCharacterLength => Some("cents_per_output_chars"),
            PricingType::OutputLength => Some("cents_per_output_sec"),
            PricingType::ImageUnits
            | PricingType::InputTokens
            | PricingType::InputCharacterLength
            | PricingType::InputLength => None,
        }
    }

    pub(crate) fn is_input_priced(self) -> bool {
        self.input_price_key().is_some()
    }

    pub(crate) fn is_output_priced(self) -> bool {
        self.output_price_key().is_some()
    }

    /// Unit a normalized price refers to
    pub(crate) fn unit(self) -> &'static str {
        match self {
            PricingType::Time => "runtime seconds",
            PricingType::Tokens | PricingType::InputTokens | PricingType::OutputTokens => {
                "1M tokens"
            }
            PricingType::InputCharacterLength | PricingType::OutputCharacterLength => {
                "1M characters"
            }
            PricingType::InputLength | PricingType::OutputLength => "audio minutes",
            PricingType::ImageUnits => "1024x1024 image iteration",
        }
    }
}

impl fmt::Display for PricingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingType {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_chars" => return Ok(PricingType::InputCharacterLength),
            "output_chars" => return Ok(PricingType::OutputCharacterLength),
            _ => {}
        }
        PricingType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| NormalizeError::UnsupportedType {
                input: s.to_string(),
            })
    }
}

/// Bit pattern of a price, used so that equality and hashing agree
pub(crate) fn price_bits(price: Option<f64>) -> Option<u64> {
    price.map(f64::to_bits)
}

/// Normalized pricing (cents per normalized unit, see [`PricingType::unit`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Pricing {
    #[serde(rename = "type")]
    pub(crate) kind: PricingType,
    #[serde(default)]
    pub(crate) normalized_input_price: Option<f64>,
    #[serde(default)]
    pub(crate) normalized_output_price: Option<f64>,
    /// Fraction of the input price charged for cached input tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rate_per_input_price_cached: Option<f64>,
    /// Fraction of the input price charged for writing the cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rate_per_input_price_cache_write: Option<f64>,
}

impl PartialEq for Pricing {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && price_bits(self.normalized_input_price) == price_bits(other.normalized_input_price)
            && price_bits(self.normalized_output_price)
                == price_bits(other.normalized_output_price)
            && price_bits(self.rate_per_input_price_cached)
                == price_bits(other.rate_per_input_price_cached)
            && price_bits(self.rate_per_input_price_cache_write)
                == price_bits(other.rate_per_input_price_cache_write)
    }
}

impl Eq for Pricing {}

impl Hash for Pricing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        price_bits(self.normalized_input_price).hash(state);
        price_bits(self.normalized_output_price).hash(state);
        price_bits(self.rate_per_input_price_cached).hash(state);
        price_bits(self.rate_per_input_price_cache_write).hash(state);
    }
}

/// Default canvas of an image-unit model
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ImageUnitDefaults {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) iterations: f64,
}

/// 1024x1024 pixels over 25 iterations, assumed when the API reports a zero canvas
const FALLBACK_PIXEL_OPS: f64 = 1024.0 * 1024.0 * 25.0;

impl ImageUnitDefaults {
    pub(crate) fn pixel_ops(&self) -> f64 {
        let ops = self.width * self.height * self.iterations;
        if ops == 0.0 { FALLBACK_PIXEL_OPS } else { ops }
    }
}
