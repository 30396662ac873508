use crate::error::NormalizeError;
use crate::snapshot::ModelRecord;

use super::provider::RawModel;
use super::types::{ImageUnitDefaults, Pricing, PricingType};

const PER_MILLION: f64 = 1_000_000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;
const REFERENCE_CANVAS_PIXELS: f64 = 1024.0 * 1024.0;

const WIDTH_KEY: &str = "default_width";
const HEIGHT_KEY: &str = "default_height";
const ITERATIONS_KEY: &str = "default_iterations";
const CACHED_RATE_KEY: &str = "rate_per_input_price_cached";
const CACHE_WRITE_RATE_KEY: &str = "rate_per_input_price_cache_write";

/// Missing and zero prices both mean "not charged"
fn scale(price: Option<f64>, factor: f64) -> Option<f64> {
    price.filter(|p| *p != 0.0).map(|p| p * factor)
}

/// Convert raw per-unit prices (cents) into comparable normalized prices.
///
/// Returns `(input, output)` in cents per [`PricingType::unit`]. A price on
/// the side a scheme does not charge for is discarded.
pub(crate) fn normalize_prices(
    kind: PricingType,
    input: Option<f64>,
    output: Option<f64>,
    image: Option<ImageUnitDefaults>,
) -> Result<(Option<f64>, Option<f64>), NormalizeError> {
    let input = input.filter(|_| kind.is_input_priced());
    let output = output.filter(|_| kind.is_output_priced());

    let prices = match kind {
        PricingType::Time => (None, scale(output, 1.0)),
        // per token -> per million tokens
        PricingType::Tokens | PricingType::InputTokens | PricingType::OutputTokens => {
            (scale(input, PER_MILLION), scale(output, PER_MILLION))
        }
        // per character -> per million characters
        PricingType::InputCharacterLength | PricingType::OutputCharacterLength => {
            (scale(input, PER_MILLION), scale(output, PER_MILLION))
        }
        // per second of audio -> per minute
        PricingType::InputLength | PricingType::OutputLength => (
            scale(input, SECONDS_PER_MINUTE),
            scale(output, SECONDS_PER_MINUTE),
        ),
        PricingType::ImageUnits => {
            let price = input.ok_or(NormalizeError::MissingImagePrice)?;
            let defaults = image.ok_or(NormalizeError::MissingImageDefaults)?;
            let megapixel_iterations = defaults.pixel_ops() / REFERENCE_CANVAS_PIXELS;
            (Some(price / megapixel_iterations), None)
        }
    };

    Ok(prices)
}

fn image_defaults(raw: &RawModel) -> Result<ImageUnitDefaults, NormalizeError> {
    let field = |key: &'static str| {
        raw.pricing
            .number(key)
            .ok_or(NormalizeError::MissingImageDefault { key })
    };
    Ok(ImageUnitDefaults {
        width: field(WIDTH_KEY)?,
        height: field(HEIGHT_KEY)?,
        iterations: field(ITERATIONS_KEY)?,
    })
}

fn normalize_pricing(raw: &RawModel) -> Result<Pricing, NormalizeError> {
    let kind: PricingType = raw.pricing.kind.parse()?;
    let input = kind.input_price_key().and_then(|k| raw.pricing.number(k));
    let output = kind.output_price_key().and_then(|k| raw.pricing.number(k));
    let image = match kind {
        PricingType::ImageUnits => Some(image_defaults(raw)?),
        _ => None,
    };

    let (normalized_input_price, normalized_output_price) =
        normalize_prices(kind, input, output, image)?;

    Ok(Pricing {
        kind,
        normalized_input_price,
        normalized_output_price,
        rate_per_input_price_cached: raw.pricing.number(CACHED_RATE_KEY),
        rate_per_input_price_cache_write: raw.pricing.number(CACHE_WRITE_RATE_KEY),
    })
}

/// Turn one API entry into a comparable record
pub(crate) fn normalize_model(raw: &RawModel) -> Result<ModelRecord, NormalizeError> {
    let pricing = normalize_pricing(raw).map_err(|e| NormalizeError::InvalidModel {
        model: raw.model_name.clone(),
        source: Box::new(e),
    })?;

    Ok(ModelRecord {
        name: raw.model_name.clone(),
        pricing,
        deprecated: raw.deprecated.map_or(0, |t| t as i64),
        replaced_by: raw.replaced_by.clone(),
        quantization: raw.quantization.clone(),
    })
}
