//! Test suite configuration types
//!
//! Defines the data structures deserialized from a suite directory.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A complete test suite loaded from disk
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Directory name of the suite
    pub slug: String,
    /// Trimmed contents of `description.md`
    pub description: String,
    /// Actor settings passed through to the remote run
    pub settings: ActorSettings,
    /// Test cases in `urls.json` order
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// First line of the description
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    /// URLs of all test cases in suite order
    pub fn urls(&self) -> Vec<String> {
        self.test_cases.iter().map(|tc| tc.url.clone()).collect()
    }
}

/// URL entry in `urls.json`
#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseInput {
    pub slug: String,
    pub url: String,
}

/// Individual test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub slug: String,
    pub url: String,
    pub suite_slug: String,
}

/// Page load event the crawler waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitUntil {
    Networkidle,
    Load,
    Domcontentloaded,
}

/// Browser used by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Launcher {
    Chromium,
    Firefox,
}

/// Precision/recall trade-off of the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionMode {
    FavorPrecision,
    Balanced,
    FavorRecall,
}

/// Actor options with a known type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorOptions {
    // Crawl settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_until: Option<WaitUntil>,
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_request_retries: Option<u32>,
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_load_timeout_secs: Option<u32>,
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_concurrency: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher: Option<Launcher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_cookie_modals: Option<bool>,
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_scroll_height_pixels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_ssl_errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_css: Option<bool>,

    // Export options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_json: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_markdown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_xml: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_xml_tei: Option<bool>,

    // Extraction options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_mode: Option<ExtractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
}

/// Actor input settings from `settings.json`
///
/// Recognized options with a value are typed in `options`. Every other key,
/// and any key set to an explicit `null`, is kept in `extra` and submitted
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ActorSettings {
    #[serde(flatten)]
    pub options: ActorOptions,

    /// Unrecognized keys and explicit nulls, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for ActorSettings {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let (mut extra, values): (Map<String, Value>, Map<String, Value>) =
            map.into_iter().partition(|(_, value)| value.is_null());

        let options: ActorOptions = serde_json::from_value(Value::Object(values.clone()))?;
        let known = match serde_json::to_value(&options)? {
            Value::Object(known) => known,
            _ => Map::new(),
        };
        extra.extend(values.into_iter().filter(|(key, _)| !known.contains_key(key)));

        Ok(Self { options, extra })
    }
}

/// Accept integral JSON numbers written as floats (`2.0`)
fn whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(Some(value as u32))
    } else {
        Err(D::Error::custom(format!("expected a whole number, got {value}")))
    }
}

impl ActorSettings {
    /// Build the actor input for a batch of URLs
    ///
    /// The URLs become the crawl seed list. Link following is always
    /// disabled (`globs` empty, `linkSelector` blank), whatever the settings say.
    pub fn to_actor_input(&self, urls: &[String]) -> serde_json::Result<Value> {
        let mut input = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let start_urls = urls
            .iter()
            .map(|url| serde_json::json!({ "url": url }))
            .collect();
        input.insert("startUrls".to_string(), Value::Array(start_urls));
        input.insert("globs".to_string(), Value::Array(Vec::new()));
        input.insert("linkSelector".to_string(), Value::String(String::new()));

        Ok(Value::Object(input))
    }
}
