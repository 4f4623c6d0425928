use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Explicit regular face, e.g. `/opt/fonts/NanumGothic.ttf`.
    pub font_path: Option<PathBuf>,
    pub font_bold_path: Option<PathBuf>,
    /// Directories searched for the NanumGothic pair when no explicit face
    /// is configured.
    pub font_dirs: Vec<PathBuf>,
    pub log_format: LogFormat,
    /// Set when running inside AWS Lambda.
    pub lambda: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| eyre::eyre!("invalid HOST {raw:?}: {e}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| eyre::eyre!("invalid PORT {raw:?}: {e}"))?,
            None => 8080,
        };
        let log_format = match get("GIMPACT_LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            host,
            port,
            font_path: get("GIMPACT_FONT_PATH").map(PathBuf::from),
            font_bold_path: get("GIMPACT_FONT_BOLD_PATH").map(PathBuf::from),
            font_dirs: default_font_dirs(),
            log_format,
            lambda: get("AWS_LAMBDA_RUNTIME_API").is_some(),
        })
    }
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts/truetype/nanum"),
        PathBuf::from("./fonts"),
    ];
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".fonts"));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> eyre::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.font_path.is_none());
        assert!(!config.lambda);
        assert_eq!(config.font_dirs[0], PathBuf::from("/usr/share/fonts/truetype/nanum"));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("GIMPACT_LOG_FORMAT", "pretty"),
            ("GIMPACT_FONT_PATH", "/tmp/NanumGothic.ttf"),
            ("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001"),
        ])
        .unwrap();
        assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.font_path, Some(PathBuf::from("/tmp/NanumGothic.ttf")));
        assert!(config.lambda);
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config(&[("PORT", " "), ("GIMPACT_FONT_PATH", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("PORT", "eighty")]).is_err());
    }
}
