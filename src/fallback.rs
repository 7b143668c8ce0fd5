use serde_json::{Map, Value};
use std::{future::Future, path::PathBuf};

use wrap_context::{arg_context, raw_context};

/// Ask for the label of a value the options don't contain.
///
/// `generation` identifies the option list the request was made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRequest {
    pub generation: u64,
    pub value: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackResolution {
    pub generation: u64,
    pub value: String,
    pub values: Vec<String>,
    pub label: Option<String>,
}

impl FallbackRequest {
    pub fn resolved(self, label: Option<String>) -> FallbackResolution {
        FallbackResolution {
            generation: self.generation,
            value: self.value,
            values: self.values,
            label,
        }
    }
}

pub trait FallbackResolver {
    /// `Ok(None)` when the value is unknown to the resolver too
    fn resolve(&self, value: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
}

/// Runs the resolver once. Errors are logged and dropped, the caller only ever
/// sees a resolution with or without a label.
pub async fn resolve_fallback<R>(resolver: &R, request: FallbackRequest) -> FallbackResolution
where
    R: FallbackResolver + Sync,
{
    let result = resolver.resolve(&request.value).await;

    match result {
        Ok(label) => request.resolved(label),
        Err(err) => {
            tracing::debug!(value = %request.value, "fallback lookup failed: {:#}", err);
            request.resolved(None)
        }
    }
}

/// Looks values up in a JSON object of `value -> label`, read on every call.
#[derive(Debug, Clone)]
pub struct JsonFileResolver {
    path: PathBuf,
}

impl JsonFileResolver {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FallbackResolver for JsonFileResolver {
    fn resolve(&self, value: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send {
        let path = self.path.clone();
        let value = value.to_string();

        async move {
            let text = arg_context!(tokio::fs::read_to_string(&path).await)?;
            let labels = raw_context!(serde_json::from_str::<Map<String, Value>>(&text))?;

            anyhow::Ok(
                labels
                    .get(&value)
                    .and_then(Value::as_str)
                    .map(str::to_string),
            )
        }
    }
}
