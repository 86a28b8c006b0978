use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub scanner: ScannerLimits,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub outreach: OutreachConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Boundary guards around the scan endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerLimits {
    /// Largest input accepted for a scan, in bytes
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Wall-clock budget for a single scan
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub flutterwave: Option<FlutterwaveSettings>,
    pub nowpayments: Option<NowPaymentsSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlutterwaveSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPaymentsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_secret: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_callback_url: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachConfig {
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default = "default_tool_link")]
    pub tool_link: String,

    #[serde(default = "default_report_link")]
    pub report_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_false")]
    pub log_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scanner: ScannerLimits::default(),
            providers: ProvidersConfig::default(),
            outreach: OutreachConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScannerLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            scan_timeout_ms: default_scan_timeout_ms(),
        }
    }
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            sender_name: default_sender_name(),
            tool_link: default_tool_link(),
            report_link: default_report_link(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_requests: default_false(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML or TOML file, dispatching on extension
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            Some("toml") => toml::from_str(&contents)?,
            other => anyhow::bail!(
                "Unsupported config extension {:?} (expected yaml, yml, or toml)",
                other
            ),
        };

        Ok(config)
    }

    /// Overlay environment variables onto the loaded configuration
    ///
    /// Env vars always win over file values. Provider sections are created on
    /// demand so keys can be supplied entirely through the environment.
    pub fn merge_env(&mut self) {
        if let Ok(host) = std::env::var("PHIGUARD_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PHIGUARD_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring non-numeric PHIGUARD_PORT: {}", port),
            }
        }

        if let Ok(key) = std::env::var("FLUTTERWAVE_SECRET_KEY") {
            self.providers
                .flutterwave
                .get_or_insert_with(|| FlutterwaveSettings {
                    secret_key: None,
                    secret_hash: None,
                    base_url: None,
                    redirect_url: None,
                    enabled: true,
                })
                .secret_key = Some(key);
        }
        if let Ok(hash) = std::env::var("FLUTTERWAVE_SECRET_HASH") {
            if let Some(fw) = self.providers.flutterwave.as_mut() {
                fw.secret_hash = Some(hash);
            }
        }

        if let Ok(key) = std::env::var("NOWPAYMENTS_API_KEY") {
            self.providers
                .nowpayments
                .get_or_insert_with(|| NowPaymentsSettings {
                    api_key: None,
                    ipn_secret: None,
                    base_url: None,
                    ipn_callback_url: None,
                    enabled: true,
                })
                .api_key = Some(key);
        }
        if let Ok(secret) = std::env::var("NOWPAYMENTS_IPN_SECRET") {
            if let Some(np) = self.providers.nowpayments.as_mut() {
                np.ipn_secret = Some(secret);
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_input_bytes() -> usize {
    10_000_000
}

fn default_scan_timeout_ms() -> u64 {
    5_000
}

fn default_sender_name() -> String {
    "The PHI Guard Team".to_string()
}

fn default_tool_link() -> String {
    "https://phiguard.example.com".to_string()
}

fn default_report_link() -> String {
    "https://phiguard.example.com/report".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.scanner.max_input_bytes, 10_000_000);
        assert_eq!(config.scanner.scan_timeout_ms, 5_000);
        assert!(config.providers.flutterwave.is_none());
        assert!(config.providers.nowpayments.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn loads_yaml_config() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        write!(
            file,
            "port: 8080\n\
             scanner:\n  max_input_bytes: 1024\n\
             providers:\n  flutterwave:\n    secret_key: sk_file\n    secret_hash: hash_file\n"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.scanner.max_input_bytes, 1024);
        let fw = config.providers.flutterwave.unwrap();
        assert_eq!(fw.secret_key.as_deref(), Some("sk_file"));
        assert!(fw.enabled);
    }

    #[test]
    fn loads_toml_config() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            "port = 9000\n\n[logging]\nlevel = \"debug\"\nlog_requests = true\n"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.log_requests);
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    #[serial]
    fn merge_env_overrides_file_values() {
        std::env::set_var("PHIGUARD_PORT", "7777");
        std::env::set_var("FLUTTERWAVE_SECRET_KEY", "sk_env");

        let mut config = ServerConfig::default();
        config.merge_env();

        assert_eq!(config.port, 7777);
        assert_eq!(
            config
                .providers
                .flutterwave
                .as_ref()
                .unwrap()
                .secret_key
                .as_deref(),
            Some("sk_env")
        );

        std::env::remove_var("PHIGUARD_PORT");
        std::env::remove_var("FLUTTERWAVE_SECRET_KEY");
    }

    #[test]
    #[serial]
    fn merge_env_without_vars_is_a_noop() {
        std::env::remove_var("PHIGUARD_PORT");
        std::env::remove_var("FLUTTERWAVE_SECRET_KEY");
        std::env::remove_var("NOWPAYMENTS_API_KEY");

        let mut config = ServerConfig::default();
        config.merge_env();

        assert_eq!(config.port, 5000);
        assert!(config.providers.flutterwave.is_none());
        assert!(config.providers.nowpayments.is_none());
    }

    #[test]
    #[serial]
    fn merge_env_ignores_bad_port() {
        std::env::set_var("PHIGUARD_PORT", "not-a-port");
        let mut config = ServerConfig::default();
        config.merge_env();
        assert_eq!(config.port, 5000);
        std::env::remove_var("PHIGUARD_PORT");
    }
}
