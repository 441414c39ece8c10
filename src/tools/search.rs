use crate::client::{
    ContentFilter, Orientation, Photo, PhotoQuery, PhotoUrls, SearchResponse, UnsplashClient,
};
use crate::config::ResponseFormat;
use crate::error::describe;
use crate::{Config, Error, Result};
use futures::stream::{self, StreamExt};
use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Name under which the tool is registered
pub const TOOL_NAME: &str = "search_photos";

/// Upper bound Unsplash accepts for `per_page`
pub const MAX_PER_PAGE: u32 = 30;

/// Input parameters for the photo search tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchPhotosInput {
    /// Search term for photos
    pub query: String,
    /// Page number (default: 1)
    #[serde(default = "default_page", deserialize_with = "integral_u32")]
    #[schemars(with = "u32", range(min = 1))]
    pub page: u32,
    /// Number of photos per page (default: 10, max: 30)
    #[serde(default = "default_per_page", deserialize_with = "integral_u32")]
    #[schemars(with = "u32", range(min = 1, max = 30))]
    pub per_page: u32,
    /// Filter by orientation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Orientation")]
    pub orientation: Option<Orientation>,
    /// Content safety filter (default: low)
    #[serde(default)]
    pub content_filter: ContentFilter,
}

impl SearchPhotosInput {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: default_page(),
            per_page: default_per_page(),
            orientation: None,
            content_filter: ContentFilter::default(),
        }
    }

    /// Validate search input parameters
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::invalid_input("query", "Query cannot be empty"));
        }

        if self.page == 0 {
            return Err(Error::invalid_input("page", "Page must be at least 1"));
        }

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::invalid_input(
                "per_page",
                format!("Per page must be between 1 and {MAX_PER_PAGE}"),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn to_query(&self) -> PhotoQuery {
        PhotoQuery {
            query: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
            orientation: self.orientation,
            content_filter: self.content_filter,
        }
    }
}

/// Content produced by one tool call
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl SearchOutcome {
    fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    fn failure(err: &Error) -> Self {
        Self {
            content: vec![Content::text(format!(
                "Error searching photos: {}",
                describe(err)
            ))],
            is_error: true,
        }
    }

    #[must_use]
    pub fn into_call_result(self) -> CallToolResult {
        if self.is_error {
            CallToolResult::error(self.content)
        } else {
            CallToolResult::success(self.content)
        }
    }
}

#[derive(Debug, Serialize)]
struct UserSummary<'a> {
    name: Option<&'a str>,
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct Dimensions {
    width: u32,
    height: u32,
}

/// Reduced per-photo record used by text mode
#[derive(Debug, Serialize)]
struct PhotoSummary<'a> {
    id: &'a str,
    description: &'a str,
    urls: &'a PhotoUrls,
    user: UserSummary<'a>,
    dimensions: Dimensions,
    likes: u64,
    color: Option<&'a str>,
    created_at: &'a str,
}

impl<'a> From<&'a Photo> for PhotoSummary<'a> {
    fn from(photo: &'a Photo) -> Self {
        Self {
            id: &photo.id,
            description: photo.display_description(),
            urls: &photo.urls,
            user: UserSummary {
                name: photo.user.name.as_deref(),
                username: &photo.user.username,
            },
            dimensions: Dimensions {
                width: photo.width,
                height: photo.height,
            },
            likes: photo.likes,
            color: photo.color.as_deref(),
            created_at: &photo.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct TextPage<'a> {
    total: u64,
    total_pages: u64,
    current_page: u32,
    per_page: u32,
    results: Vec<PhotoSummary<'a>>,
}

/// Unsplash photo search tool
#[derive(Debug, Clone)]
pub struct SearchTool {
    client: Arc<UnsplashClient>,
    config: Arc<Config>,
}

impl SearchTool {
    /// Create a new search tool
    pub fn new(client: Arc<UnsplashClient>, config: Arc<Config>) -> Self {
        info!(
            "Initializing photo search tool (response format: {})",
            config.response_format
        );
        Self { client, config }
    }

    /// Tool description advertised to the host
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self.config.response_format {
            ResponseFormat::Image => "Search for photos on Unsplash. Returns base64-encoded images.",
            ResponseFormat::Text => {
                "Search for photos on Unsplash. Returns photo URLs and metadata as JSON."
            }
        }
    }

    /// JSON schema of [`SearchPhotosInput`]
    ///
    /// Optional fields are advertised without a `null` alternative.
    pub fn input_schema() -> Result<Arc<JsonObject>> {
        let schema = SchemaSettings::draft2020_12()
            .into_generator()
            .into_root_schema_for::<SearchPhotosInput>();

        match serde_json::to_value(schema)? {
            Value::Object(schema) => Ok(Arc::new(schema)),
            other => Err(Error::Service(format!(
                "Tool input schema is not an object: {other}"
            ))),
        }
    }

    /// Execute a photo search.
    ///
    /// Every failure is folded into an error-flagged outcome.
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, arguments: Value) -> SearchOutcome {
        match self.search(arguments).await {
            Ok(content) => SearchOutcome::success(content),
            Err(err) => {
                warn!(status = ?err.status(), "Photo search failed: {}", err);
                SearchOutcome::failure(&err)
            }
        }
    }

    async fn search(&self, arguments: Value) -> Result<Vec<Content>> {
        let input = Self::parse_input(arguments)?;
        info!(
            "Executing photo search: query='{}', page={}, per_page={}",
            input.query, input.page, input.per_page
        );

        let response = self.client.search_photos(&input.to_query()).await?;

        match self.config.response_format {
            ResponseFormat::Text => Self::render_text(&input, &response),
            ResponseFormat::Image => Ok(self.render_images(&input, response).await),
        }
    }

    fn parse_input(arguments: Value) -> Result<SearchPhotosInput> {
        let input: SearchPhotosInput = serde_json::from_value(arguments)
            .map_err(|e| Error::invalid_input("arguments", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    fn render_text(input: &SearchPhotosInput, response: &SearchResponse) -> Result<Vec<Content>> {
        let page = TextPage {
            total: response.total,
            total_pages: response.total_pages,
            current_page: input.page,
            per_page: input.per_page,
            results: response.results.iter().map(PhotoSummary::from).collect(),
        };

        Ok(vec![Content::text(serde_json::to_string_pretty(&page)?)])
    }

    async fn render_images(&self, input: &SearchPhotosInput, response: SearchResponse) -> Vec<Content> {
        let mut content = Vec::with_capacity(1 + 2 * response.results.len());
        content.push(Content::text(format!(
            "Found {} photos (page {}/{}):",
            response.total, input.page, response.total_pages
        )));

        // Buffered keeps result order regardless of completion order.
        let client = &self.client;
        let fetched: Vec<_> = stream::iter(response.results)
            .map(|photo| async move {
                let image = match photo.urls.regular.as_deref() {
                    Some(url) => client.fetch_image(url).await,
                    None => Err(Error::invalid_input(
                        "urls.regular",
                        "photo has no regular URL",
                    )),
                };
                (photo, image)
            })
            .buffered(self.config.image_concurrency)
            .collect()
            .await;

        for (photo, image) in fetched {
            match serde_json::to_string_pretty(&photo) {
                Ok(metadata) => content.push(Content::text(metadata)),
                Err(err) => {
                    content.push(Self::image_failure(&photo.id, &Error::from(err)));
                    continue;
                }
            }

            match image {
                Ok(data) => {
                    debug!("Embedding image {} ({})", photo.id, data.mime_type);
                    content.push(Content::image(data.base64, data.mime_type));
                }
                Err(err) => {
                    warn!("Failed to fetch image {}: {}", photo.id, err);
                    content.push(Self::image_failure(&photo.id, &err));
                }
            }
        }

        content
    }

    fn image_failure(photo_id: &str, err: &Error) -> Content {
        Content::text(format!(
            "Failed to fetch image {photo_id}: {}",
            describe(err)
        ))
    }
}

/// Default page number
const fn default_page() -> u32 {
    1
}

/// Default number of photos per page
const fn default_per_page() -> u32 {
    10
}

/// Accept JSON integers and integral floats such as `2.0`
fn integral_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_u64() {
        return u32::try_from(value).map_err(|_| D::Error::custom(format!("{number} is out of range")));
    }

    match number.as_f64() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(value) if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Ok(value as u32)
        }
        _ => Err(D::Error::custom(format!(
            "expected a non-negative integer, got {number}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::photo_json;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn create_test_search_tool(format: ResponseFormat) -> SearchTool {
        let config = Arc::new(Config::new("test-key", format));
        let client = Arc::new(UnsplashClient::new(&config).unwrap());
        SearchTool::new(client, config)
    }

    fn text_of(content: &Content) -> &str {
        match &content.raw {
            RawContent::Text(text) => &text.text,
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_input_defaults() {
        let input = SearchTool::parse_input(json!({ "query": "mountains" })).unwrap();
        assert_eq!(input, SearchPhotosInput::new("mountains"));
        assert_eq!(input.page, 1);
        assert_eq!(input.per_page, 10);
        assert_eq!(input.content_filter, ContentFilter::Low);
        assert!(input.orientation.is_none());
    }

    #[test]
    fn test_parse_input_all_fields() {
        let input = SearchTool::parse_input(json!({
            "query": "mountains",
            "page": 3,
            "per_page": 30,
            "orientation": "portrait",
            "content_filter": "high"
        }))
        .unwrap();
        assert_eq!(input.page, 3);
        assert_eq!(input.per_page, 30);
        assert_eq!(input.orientation, Some(Orientation::Portrait));
        assert_eq!(input.content_filter, ContentFilter::High);
    }

    #[test]
    fn test_parse_input_rejects_missing_or_blank_query() {
        assert!(matches!(
            SearchTool::parse_input(json!({})),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            SearchTool::parse_input(json!({ "query": "   " })),
            Err(Error::InvalidInput { ref field, .. }) if field == "query"
        ));
    }

    #[test]
    fn test_parse_input_accepts_integral_floats() {
        let input = SearchTool::parse_input(json!({
            "query": "mountains",
            "page": 2.0,
            "per_page": 15.0
        }))
        .unwrap();
        assert_eq!(input.page, 2);
        assert_eq!(input.per_page, 15);
    }

    #[test]
    fn test_parse_input_rejects_fractional_or_negative_paging() {
        for args in [
            json!({ "query": "a", "page": 1.5 }),
            json!({ "query": "a", "page": -1 }),
            json!({ "query": "a", "per_page": "10" }),
            json!({ "query": "a", "page": 5_000_000_000_u64 }),
        ] {
            assert!(
                matches!(SearchTool::parse_input(args.clone()), Err(Error::InvalidInput { .. })),
                "accepted {args}"
            );
        }
    }

    #[test]
    fn test_parse_input_rejects_out_of_range_paging() {
        for args in [
            json!({ "query": "a", "page": 0 }),
            json!({ "query": "a", "per_page": 0 }),
            json!({ "query": "a", "per_page": 31 }),
            json!({ "query": "a", "orientation": "diagonal" }),
        ] {
            assert!(SearchTool::parse_input(args).is_err());
        }
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = SearchTool::input_schema().unwrap();
        assert_eq!(schema.get("type"), Some(&json!("object")));
        assert_eq!(schema.get("required"), Some(&json!(["query"])));

        let properties = schema.get("properties").and_then(Value::as_object).unwrap();
        for key in ["query", "page", "per_page", "orientation", "content_filter"] {
            assert!(properties.contains_key(key), "missing property {key}");
        }
        assert_eq!(properties["per_page"]["maximum"].as_f64(), Some(30.0));
        assert_eq!(properties["page"]["minimum"].as_f64(), Some(1.0));

        assert_eq!(
            properties["orientation"]["enum"],
            json!(["landscape", "portrait", "squarish"])
        );
        assert_eq!(properties["orientation"]["type"], json!("string"));
        assert_eq!(properties["content_filter"]["enum"], json!(["low", "high"]));
        assert_eq!(properties["query"]["type"], json!("string"));

        let rendered = serde_json::to_string(&*schema).unwrap();
        assert!(!rendered.contains("null"), "schema advertises null: {rendered}");
    }

    #[test]
    fn test_description_depends_on_format() {
        let image = create_test_search_tool(ResponseFormat::Image);
        assert!(image.description().contains("images"));

        let text = create_test_search_tool(ResponseFormat::Text);
        assert!(text.description().contains("URLs and metadata"));
    }

    #[test]
    fn test_render_text_envelope() {
        let response = SearchResponse {
            total: 120,
            total_pages: 12,
            results: vec![
                serde_json::from_value(photo_json("a", "https://img.example/a")).unwrap(),
                serde_json::from_value(photo_json("b", "https://img.example/b")).unwrap(),
            ],
        };
        let mut input = SearchPhotosInput::new("cats");
        input.page = 2;

        let content = SearchTool::render_text(&input, &response).unwrap();
        assert_eq!(content.len(), 1);

        let body: Value = serde_json::from_str(text_of(&content[0])).unwrap();
        assert_eq!(body["total"], json!(120));
        assert_eq!(body["total_pages"], json!(12));
        assert_eq!(body["current_page"], json!(2));
        assert_eq!(body["per_page"], json!(10));

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], json!("a"));
        assert_eq!(results[0]["description"], json!("a cat sitting on a chair"));
        assert_eq!(results[0]["user"], json!({ "name": "Jane Doe", "username": "jdoe" }));
        assert_eq!(results[0]["dimensions"], json!({ "width": 4000, "height": 3000 }));
        assert_eq!(results[0]["urls"]["regular"], json!("https://img.example/a"));
        assert_eq!(results[0]["likes"], json!(42));
        assert_eq!(results[0]["color"], json!("#262626"));
        assert_eq!(results[0]["created_at"], json!("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn test_failure_outcome_is_flagged() {
        let outcome = SearchOutcome::failure(&Error::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        });
        assert!(outcome.is_error);
        assert_eq!(outcome.content.len(), 1);
        assert_eq!(
            text_of(&outcome.content[0]),
            "Error searching photos: Unsplash API error: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_call_with_missing_query_is_error() {
        let tool = create_test_search_tool(ResponseFormat::Text);
        let outcome = tool.call(json!({ "page": 1 })).await;
        assert!(outcome.is_error);
        assert!(text_of(&outcome.content[0]).starts_with("Error searching photos:"));
    }
}
