use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::CodemedicError;

/// Property holding the bearer token for the completion endpoint.
pub const API_KEY_PROPERTY: &str = "DEEPSEEK_API_KEY";

/// Optional property bounding the completion request, in seconds.
pub const TIMEOUT_PROPERTY: &str = "REQUEST_TIMEOUT_SECS";

/// Environment variable overriding the completion endpoint URL.
pub const API_URL_ENV: &str = "DEEPSEEK_API_URL";

/// Completion endpoint used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model identifier sent with every completion request.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

/// Sampling temperature sent with every completion request.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Request timeout applied when [`TIMEOUT_PROPERTY`] is absent.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Read a `KEY=VALUE` properties file into a map.
///
/// # Errors
///
/// Returns [`CodemedicError::FileNotFound`] if the file does not exist,
/// [`CodemedicError::Io`] for any other read failure, and
/// [`CodemedicError::Config`] for malformed lines.
///
/// # Examples
///
/// ```no_run
/// use codemedic_core::load_properties;
/// use std::path::Path;
///
/// let props = load_properties(Path::new(".env")).unwrap();
/// assert!(props.contains_key("DEEPSEEK_API_KEY"));
/// ```
pub fn load_properties(path: &Path) -> Result<BTreeMap<String, String>, CodemedicError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CodemedicError::FileNotFound(path.to_path_buf()),
        _ => CodemedicError::Io(e),
    })?;
    tracing::debug!(path = %path.display(), "loaded properties file");
    parse_properties(&content)
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and lines starting with `#` are skipped. Each remaining line is
/// split on its first `=`; key and value are trimmed. A later key replaces an
/// earlier one.
///
/// # Errors
///
/// Returns [`CodemedicError::Config`] for a line without `=` or with an empty
/// key. The message carries the 1-based line number.
///
/// # Examples
///
/// ```
/// use codemedic_core::parse_properties;
///
/// let props = parse_properties("# comment\n\nKEY = value with spaces\n").unwrap();
/// assert_eq!(props.len(), 1);
/// assert_eq!(props["KEY"], "value with spaces");
/// ```
pub fn parse_properties(content: &str) -> Result<BTreeMap<String, String>, CodemedicError> {
    let mut properties = BTreeMap::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(CodemedicError::Config(format!(
                "line {}: expected KEY=VALUE, found {line:?}",
                idx + 1
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CodemedicError::Config(format!(
                "line {}: missing key before '='",
                idx + 1
            )));
        }
        properties.insert(key.to_string(), value.trim().to_string());
    }
    Ok(properties)
}

/// Typed configuration for a codemedic run.
///
/// Built once at startup and handed to the components that need it.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use codemedic_core::{CodemedicConfig, DEFAULT_API_URL, DEFAULT_MODEL};
///
/// let mut props = BTreeMap::new();
/// props.insert("DEEPSEEK_API_KEY".to_string(), "sk-test".to_string());
///
/// let config = CodemedicConfig::from_properties(&props, None).unwrap();
/// assert_eq!(config.api_key, "sk-test");
/// assert_eq!(config.api_url, DEFAULT_API_URL);
/// assert_eq!(config.model, DEFAULT_MODEL);
/// ```
#[derive(Clone)]
pub struct CodemedicConfig {
    /// Bearer token for the completion endpoint.
    pub api_key: String,
    /// Full URL of the chat-completion endpoint.
    pub api_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Upper bound on a single completion request.
    pub request_timeout: Duration,
}

impl fmt::Debug for CodemedicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodemedicConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl CodemedicConfig {
    /// Load the properties file at `path` and resolve the endpoint URL from
    /// [`API_URL_ENV`].
    ///
    /// # Errors
    ///
    /// Propagates [`load_properties`] failures and returns
    /// [`CodemedicError::Config`] if validation fails.
    pub fn load(path: &Path) -> Result<Self, CodemedicError> {
        let properties = load_properties(path)?;
        let api_url = std::env::var(API_URL_ENV).ok();
        Self::from_properties(&properties, api_url)
    }

    /// Validate a property map into a typed configuration.
    ///
    /// `api_url` overrides [`DEFAULT_API_URL`] when set and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CodemedicError::Config`] if the API key is missing or blank,
    /// or if the timeout is not a positive integer.
    pub fn from_properties(
        properties: &BTreeMap<String, String>,
        api_url: Option<String>,
    ) -> Result<Self, CodemedicError> {
        let api_key = properties
            .get(API_KEY_PROPERTY)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CodemedicError::Config(format!("{API_KEY_PROPERTY} not found in .env file"))
            })?
            .to_string();

        let timeout_secs = match properties.get(TIMEOUT_PROPERTY) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(CodemedicError::Config(format!(
                        "{TIMEOUT_PROPERTY} must be a positive integer, got {raw:?}"
                    )))
                }
            },
        };

        let api_url = api_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            api_url,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
