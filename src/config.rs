//! Optional config file loading. Search order: ./wikipub.toml, then
//! $XDG_CONFIG_HOME/wikipub/config.toml (or ~/.config/wikipub/config.toml).

use serde::Deserialize;
use std::path::PathBuf;

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Scheme and host prepended to chapter and image paths, e.g. "http://www.appropedia.org".
    pub domain: Option<String>,
    /// Path of the index page under `domain`.
    pub start_path: Option<String>,
    /// Book title passed to templates.
    pub title: Option<String>,
    /// Output directory; the archive is written beside it as `<output>.epub`.
    pub output: Option<PathBuf>,
    /// Template tree to render. Paths are relative to CWD.
    pub templates_dir: Option<PathBuf>,
    /// Log file (appended).
    pub log_file: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds. Unset means the HTTP client's default.
    pub timeout_secs: Option<u64>,
    /// Delay in seconds between requests (default 0).
    pub request_delay_secs: Option<u64>,
}

/// Search order: (1) ./wikipub.toml, (2) $XDG_CONFIG_HOME/wikipub/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("wikipub.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("wikipub").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            return Ok(Some(config));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.domain.is_none());
        assert!(c.start_path.is_none());
        assert!(c.title.is_none());
        assert!(c.output.is_none());
        assert!(c.templates_dir.is_none());
        assert!(c.log_file.is_none());
        assert!(c.user_agent.is_none());
        assert!(c.timeout_secs.is_none());
        assert!(c.request_delay_secs.is_none());
    }

    #[test]
    fn parse_full_config() {
        let s = r#"
            domain = "http://wiki.example.org"
            start_path = "/Book_index"
            title = "A Book"
            output = "abook"
            templates_dir = "tpl"
            log_file = "run.log"
            user_agent = "Custom/1.0"
            timeout_secs = 60
            request_delay_secs = 2
        "#;
        let c: Config = toml::from_str(s).unwrap();
        assert_eq!(c.domain.as_deref(), Some("http://wiki.example.org"));
        assert_eq!(c.start_path.as_deref(), Some("/Book_index"));
        assert_eq!(c.title.as_deref(), Some("A Book"));
        assert_eq!(c.output.as_deref(), Some(std::path::Path::new("abook")));
        assert_eq!(c.templates_dir.as_deref(), Some(std::path::Path::new("tpl")));
        assert_eq!(c.log_file.as_deref(), Some(std::path::Path::new("run.log")));
        assert_eq!(c.user_agent.as_deref(), Some("Custom/1.0"));
        assert_eq!(c.timeout_secs, Some(60));
        assert_eq!(c.request_delay_secs, Some(2));
    }

    #[test]
    fn parse_partial_config() {
        let c: Config = toml::from_str(r#"title = "Only Title""#).unwrap();
        assert_eq!(c.title.as_deref(), Some("Only Title"));
        assert!(c.domain.is_none());
        assert!(c.output.is_none());
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(toml::from_str::<Config>("output = [").is_err());
    }
}
