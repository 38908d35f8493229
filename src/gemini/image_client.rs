use serde::{Deserialize, Serialize};

use crate::{
    config::GeminiConfig,
    error::{BgSwapError, Result},
    gemini::prompt::build_instructions,
    models::{BackgroundEditRequest, GeneratedImage, GenerativePart},
};

#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<&'static str>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<GenerativePart>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl ImageClient {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Run one background-replacement call. Returns `Ok(None)` when the
    /// model answered without producing an image; that is a soft absence,
    /// not a failure.
    pub async fn generate(&self, request: &BackgroundEditRequest) -> Result<Option<GeneratedImage>> {
        if request.prompt.is_empty() && request.background.is_none() {
            return Err(BgSwapError::RequestError(
                "a prompt or a background image is required".into(),
            ));
        }

        let model_id = request.model_id.as_deref().unwrap_or(self.config.model());

        // Part ordering is significant: the model reads the first image as
        // the foreground subject and the second as the background reference.
        let mut parts = vec![request.original.clone()];
        if let Some(background) = &request.background {
            parts.push(background.clone());
        }
        let instructions =
            build_instructions(&request.prompt, request.background.is_some(), request.flags);
        parts.push(GenerativePart::text(instructions));

        let payload = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        };

        let body = serde_json::to_string(&payload)
            .map_err(|e| BgSwapError::SerializationError(e.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url(),
            model_id
        );
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            BgSwapError::ConfigError("GEMINI_API_KEY is not configured".into())
        })?;

        log::info!("Generating image with model: {}", model_id);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BgSwapError::GenerationError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BgSwapError::GenerationError(e.to_string()))?;

        if !status.is_success() {
            return Err(BgSwapError::GenerationError(format!(
                "model call returned {}: {}",
                status,
                truncate(&text, 300)
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| BgSwapError::GenerationError(format!("malformed response: {}", e)))?;

        Ok(extract_first_image(&parsed))
    }
}

/// Scan the first candidate's parts in order and take the first one that
/// carries inline image data; text parts are skipped.
fn extract_first_image(response: &GenerateContentResponse) -> Option<GeneratedImage> {
    let content = response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?;

    content.parts.iter().find_map(|part| {
        part.as_inline().map(|inline| GeneratedImage {
            mime_type: inline.mime_type.clone(),
            data: inline.data.clone(),
        })
    })
}

#[async_trait::async_trait]
impl crate::gemini::batch::ImageGenerator for ImageClient {
    async fn generate(&self, request: &BackgroundEditRequest) -> Result<Option<GeneratedImage>> {
        ImageClient::generate(self, request).await
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnhancementFlags;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extraction_takes_the_first_inline_part() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here is your edit"},
                {"inlineData":{"mimeType":"image/png","data":"Rklk"}},
                {"inlineData":{"mimeType":"image/jpeg","data":"c2Vj"}}
            ]}}]}"#,
        );
        let image = extract_first_image(&response).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_uri(), "data:image/png;base64,Rklk");
    }

    #[test]
    fn text_only_responses_yield_no_image() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"cannot comply"}]}}]}"#,
        );
        assert!(extract_first_image(&response).is_none());
    }

    #[test]
    fn missing_candidates_yield_no_image() {
        assert!(extract_first_image(&parse(r#"{}"#)).is_none());
        assert!(extract_first_image(&parse(r#"{"candidates":[]}"#)).is_none());
    }

    #[tokio::test]
    async fn request_without_prompt_or_background_is_rejected_before_network() {
        let client = ImageClient::new(
            reqwest::Client::new(),
            GeminiConfig::new().with_api_key("k"),
        );
        let request = BackgroundEditRequest::new(GenerativePart::inline("image/png", "QUJD"))
            .with_flags(EnhancementFlags::default());

        let result = client.generate(&request).await;
        assert!(matches!(result, Err(BgSwapError::RequestError(_))));
    }

    #[test]
    fn request_payload_orders_parts_image_background_text() {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    GenerativePart::inline("image/png", "QQ=="),
                    GenerativePart::inline("image/jpeg", "Qg=="),
                    GenerativePart::text("instructions"),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].get("inlineData").is_some());
        assert!(parts[1].get("inlineData").is_some());
        assert_eq!(parts[2]["text"], "instructions");
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }
}
