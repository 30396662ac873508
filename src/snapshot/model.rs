use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::Pricing;

/// One model offering with everything worth tracking across snapshots
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) struct ModelRecord {
    pub(crate) name: String,
    pub(crate) pricing: Pricing,
    /// Unix timestamp of deprecation, 0 while the model is live
    #[serde(default, deserialize_with = "deprecated_timestamp")]
    pub(crate) deprecated: i64,
    #[serde(default)]
    pub(crate) replaced_by: Option<String>,
    /// e.g. "fp8", "bfloat16"; absent means full precision
    #[serde(default)]
    pub(crate) quantization: Option<String>,
}

/// Older caches copied the API value verbatim: `null` or a float
fn deprecated_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map_or(0, |t| t as i64))
}

impl ModelRecord {
    /// Compact JSON with fixed field order, the unit of snapshot hashing.
    pub(crate) fn canonical(&self) -> String {
        // Only strings and numbers with string keys; non-finite floats become null
        serde_json::to_string(self).expect("model record serialization is infallible")
    }

    pub(crate) fn is_deprecated(&self) -> bool {
        self.deprecated != 0
    }
}

impl fmt::Display for ModelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}", self.name, self.pricing.kind)?;
        if let Some(p) = self.pricing.normalized_input_price {
            write!(f, ", in {p}")?;
        }
        if let Some(p) = self.pricing.normalized_output_price {
            write!(f, ", out {p}")?;
        }
        f.write_str("]")?;
        if let Some(q) = &self.quantization {
            write!(f, " {q}")?;
        }
        if self.is_deprecated() {
            write!(f, " deprecated@{}", self.deprecated)?;
        }
        if let Some(r) = &self.replaced_by {
            write!(f, " -> {r}")?;
        }
        Ok(())
    }
}
