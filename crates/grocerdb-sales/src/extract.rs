//! Sale extraction from catalog page images with a vision-capable model.
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint. The image is
//! sent inline as a base64 data URL and the model is constrained to answer
//! with a JSON object matching [`SalesCatalog`].

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use grocerdb_core::{SalesCatalog, SalesItem};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SalesError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";

pub(crate) const EXTRACTION_PROMPT: &str = "This is an image of a page from a promotional \
catalog containing multiple grocery products. For each product shown in the image, please \
extract: The product name and The price corresponding to that product";

/// Turns one catalog page image into the sale items printed on it.
pub trait SaleExtractor: Send + Sync {
    fn extract(
        &self,
        image: &Path,
    ) -> impl Future<Output = Result<SalesCatalog, SalesError>> + Send;
}

/// Chat-completions client used by the scrape command.
pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl VisionClient {
    /// Creates a client for the public OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, SalesError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, model, timeout_secs)
    }

    /// Creates a client against a custom OpenAI-compatible base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, SalesError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("grocerdb-scraper/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_owned(),
        })
    }

    async fn extract_image(&self, image: &Path) -> Result<SalesCatalog, SalesError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|source| SalesError::Io {
                path: image.to_path_buf(),
                source,
            })?;
        let data_url = format!("data:{};base64,{}", mime_type(image), STANDARD.encode(&bytes));

        let request = ChatRequest {
            model: &self.model,
            messages: vec![json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": EXTRACTION_PROMPT },
                    { "type": "image_url", "image_url": { "url": data_url } },
                ],
            })],
            response_format: response_format(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SalesError::Extraction(format!(
                "vision API returned status {status}: {}",
                truncate(&body, 300)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SalesError::Extraction(format!("vision response parse error: {e}")))?;
        let message = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| SalesError::Extraction("vision response had no choices".to_owned()))?;

        if let Some(refusal) = message.refusal {
            return Err(SalesError::Extraction(format!("model refused: {refusal}")));
        }
        let content = message
            .content
            .ok_or_else(|| SalesError::Extraction("vision response had no content".to_owned()))?;

        parse_catalog(&content)
    }
}

/// Model output before each item is validated on its own.
#[derive(Deserialize)]
struct RawCatalog {
    products: Vec<Value>,
}

/// Parses model output into a [`SalesCatalog`], dropping items whose sale
/// does not validate so the rest of the page survives.
fn parse_catalog(content: &str) -> Result<SalesCatalog, SalesError> {
    let raw: RawCatalog = serde_json::from_str(content)
        .map_err(|e| SalesError::Extraction(format!("model output is not a sales catalog: {e}")))?;

    let total = raw.products.len();
    let mut products = Vec::with_capacity(total);
    for item in raw.products {
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_owned();
        match serde_json::from_value::<SalesItem>(item) {
            Ok(parsed) => products.push(parsed),
            Err(e) => tracing::warn!(item = %name, error = %e, "dropping invalid sale item"),
        }
    }

    let dropped = total - products.len();
    if dropped > 0 {
        tracing::warn!(
            dropped,
            kept = products.len(),
            "model output contained invalid sale items"
        );
    }
    Ok(SalesCatalog { products })
}

impl SaleExtractor for VisionClient {
    async fn extract(&self, image: &Path) -> Result<SalesCatalog, SalesError> {
        let catalog = self.extract_image(image).await?;
        tracing::debug!(
            image = %image.display(),
            items = catalog.products.len(),
            "sales extracted from image"
        );
        Ok(catalog)
    }
}

fn mime_type(image: &Path) -> &'static str {
    match image
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strict JSON schema for [`SalesCatalog`]. Strict mode requires every
/// property to be listed, so fields of other sale types are nullable.
fn response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "SalesCatalog",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "products": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string", "description": "Product name" },
                                "sale": {
                                    "type": "object",
                                    "properties": {
                                        "type": {
                                            "type": "string",
                                            "enum": ["price", "percentage", "n_for_price"],
                                            "description": "Type of sale"
                                        },
                                        "price": {
                                            "type": ["number", "null"],
                                            "description": "If type=='price', this is the sale price"
                                        },
                                        "discount_percentage": {
                                            "type": ["number", "null"],
                                            "description": "If type=='percentage', percent off (e.g. 20 for 20%)"
                                        },
                                        "n": {
                                            "type": ["integer", "null"],
                                            "description": "If type=='n_for_price', how many items"
                                        },
                                        "total_price": {
                                            "type": ["number", "null"],
                                            "description": "If type=='n_for_price', total for n items"
                                        }
                                    },
                                    "required": ["type", "price", "discount_percentage", "n", "total_price"],
                                    "additionalProperties": false
                                }
                            },
                            "required": ["name", "sale"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["products"],
                "additionalProperties": false
            }
        }
    })
}
