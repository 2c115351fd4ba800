use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// false only for local relays such as mailpit
    pub tls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub smtp: SmtpConfig,
    pub newsletter_to: String,
    pub newsletter_from: String,
    pub subscribers_csv: PathBuf,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?;
        let port = match get("SMTP_PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "SMTP_PORT",
                value: raw.clone(),
            })?),
            None => None,
        };
        let tls = match get("SMTP_TLS").as_deref() {
            None | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SMTP_TLS",
                    value: other.to_string(),
                })
            }
        };

        let username = get("SMTP_USERNAME");
        let password = get("SMTP_PASSWORD");
        if username.is_some() != password.is_some() {
            return Err(ConfigError::Missing(if username.is_some() {
                "SMTP_PASSWORD"
            } else {
                "SMTP_USERNAME"
            }));
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            smtp: SmtpConfig {
                host,
                port,
                username,
                password,
                tls,
            },
            newsletter_to: get("NEWSLETTER_TO")
                .unwrap_or_else(|| "contato@movaccess.com.br".to_string()),
            newsletter_from: get("NEWSLETTER_FROM")
                .unwrap_or_else(|| "notificacoes@movaccess.com.br".to_string()),
            subscribers_csv: get("SUBSCRIBERS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("inscricoes.csv")),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}
