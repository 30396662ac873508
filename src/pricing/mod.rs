mod normalize;
mod provider;
mod types;

pub(crate) use normalize::normalize_model;
pub(crate) use provider::{DEFAULT_FETCH_TIMEOUT, DeepInfraApi, ModelSource, RawModel};
pub(crate) use types::{Pricing, PricingType, price_bits};
