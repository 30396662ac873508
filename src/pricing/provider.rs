use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;

pub(crate) const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Model entry as returned by the list endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawModel {
    pub(crate) model_name: String,
    pub(crate) pricing: RawPricing,
    #[serde(default)]
    pub(crate) deprecated: Option<f64>,
    #[serde(default)]
    pub(crate) replaced_by: Option<String>,
    #[serde(default)]
    pub(crate) quantization: Option<String>,
}

/// Pricing object of a raw entry. Which keys are present depends on `type`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPricing {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(flatten)]
    pub(crate) fields: serde_json::Map<String, serde_json::Value>,
}

impl RawPricing {
    pub(crate) fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(|v| v.as_f64())
    }
}

/// Anything that can produce the current list of model offerings
pub(crate) trait ModelSource {
    /// Display name for log output
    fn display_name(&self) -> &str;

    fn fetch(&self) -> Result<Vec<RawModel>, FetchError>;
}

/// DeepInfra's public model list endpoint
pub(crate) struct DeepInfraApi {
    url: String,
    timeout: Duration,
}

impl DeepInfraApi {
    pub(crate) fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl ModelSource for DeepInfraApi {
    fn display_name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<RawModel>, FetchError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        let response = agent
            .get(&self.url)
            .header("Content-Type", "application/json")
            .call()
            .map_err(FetchError::Request)?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status != 200 {
            let text = body.read_to_string().unwrap_or_default();
            return Err(FetchError::Status { status, body: text });
        }

        serde_json::from_reader(body.as_reader()).map_err(FetchError::Decode)
    }
}
