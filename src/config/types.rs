use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Setup-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The documentation tree being walked
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the documentation host
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Course slugs to walk, in order
    #[serde(default = "default_courses")]
    pub courses: Vec<String>,

    /// Probe `base/slug/` before walking a course and skip it on failure
    #[serde(rename = "probe-courses", default)]
    pub probe_courses: bool,

    /// Most recent year to probe (walked first)
    #[serde(rename = "first-year", default = "default_first_year")]
    pub first_year: u16,

    /// Oldest year to probe (inclusive)
    #[serde(rename = "last-year", default = "default_last_year")]
    pub last_year: u16,

    /// Assignment-format candidates, tried in order
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

/// HTTP fetching behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Ceiling on simultaneous in-flight requests across the whole walk
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,

    /// Total attempts per URL, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff interval (milliseconds); retry n waits n * base
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Per-request deadline (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment deadline (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Markup heuristics for finding setup commands
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// H2 titles whose sections hold setup instructions (substring match)
    #[serde(rename = "section-headings", default = "default_section_headings")]
    pub section_headings: Vec<String>,

    /// Prefixes a fragment must start with to count as a setup command
    #[serde(rename = "command-prefixes", default = "default_command_prefixes")]
    pub command_prefixes: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON catalog file
    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,
}

impl SiteConfig {
    /// Parses the base URL, guaranteeing a trailing slash so relative joins
    /// stay underneath it
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        if self.base_url.ends_with('/') {
            Url::parse(&self.base_url)
        } else {
            Url::parse(&format!("{}/", self.base_url))
        }
    }

    /// Years to probe, most recent first
    pub fn years(&self) -> impl Iterator<Item = u16> {
        (self.last_year..=self.first_year).rev()
    }
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            courses: default_courses(),
            probe_courses: false,
            first_year: default_first_year(),
            last_year: default_last_year(),
            formats: default_formats(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            section_headings: default_section_headings(),
            command_prefixes: default_command_prefixes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
        }
    }
}

/// Section titles that introduce a problem's setup instructions
pub const DEFAULT_SECTION_HEADINGS: &[&str] =
    &["How to Begin", "Distribution Code", "Getting Started"];

/// Command prefixes of the canonical setup workflow
pub const DEFAULT_COMMAND_PREFIXES: &[&str] =
    &["wget ", "unzip ", "rm ", "cd ", "ls", "mkdir ", "code "];

fn default_base_url() -> String {
    "https://cs50.harvard.edu/".to_string()
}

fn default_courses() -> Vec<String> {
    ["x", "ai", "python", "r", "sql", "web"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_first_year() -> u16 {
    2026
}

fn default_last_year() -> u16 {
    2007
}

fn default_formats() -> Vec<String> {
    vec!["psets".to_string(), "projects".to_string()]
}

fn default_max_concurrent() -> u32 {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    20
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("setup-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_section_headings() -> Vec<String> {
    DEFAULT_SECTION_HEADINGS.iter().map(|s| s.to_string()).collect()
}

fn default_command_prefixes() -> Vec<String> {
    DEFAULT_COMMAND_PREFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}
