use std::env;
use std::fmt;

use chrono::Duration;
use jsonwebtoken::Algorithm;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;
const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },
    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
    #[error("unsupported token algorithm {0:?}; expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm(String),
}

/// Immutable settings for the credential issuer/verifier.
///
/// Built once at startup and handed to `Credentials`; nothing in the auth core
/// reads the environment on its own.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    algorithm: Algorithm,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(
        secret: impl Into<String>,
        algorithm: Algorithm,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        if token_ttl <= Duration::zero() {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                message: "must be positive".into(),
            });
        }
        if token_ttl.num_minutes() > MAX_TOKEN_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                message: format!("must be at most {} minutes", MAX_TOKEN_TTL_MINUTES),
            });
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                message: format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            });
        }

        Ok(Self {
            secret,
            algorithm,
            token_ttl,
            bcrypt_cost,
        })
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub allowed_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let algorithm = match lookup("JWT_ALGORITHM") {
            Some(name) => name
                .trim()
                .parse::<Algorithm>()
                .map_err(|_| ConfigError::UnsupportedAlgorithm(name.clone()))?,
            None => Algorithm::HS256,
        };
        let ttl_minutes = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        let token_ttl = Duration::try_minutes(ttl_minutes).ok_or_else(|| ConfigError::Invalid {
            key: "ACCESS_TOKEN_EXPIRE_MINUTES",
            message: "out of range".into(),
        })?;
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;

        Ok(Self {
            database_url,
            server_port,
            server_host,
            allowed_origins,
            auth: AuthConfig::new(secret, algorithm, token_ttl, bcrypt_cost)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "test-secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.auth.algorithm(), Algorithm::HS256);
        assert_eq!(config.auth.token_ttl(), Duration::hours(24));
        assert_eq!(config.auth.bcrypt_cost(), bcrypt::DEFAULT_COST);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_vars(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "test-secret"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("ALLOWED_ORIGINS", "https://todo.example.com , ,https://admin.example.com"),
            ("JWT_ALGORITHM", "HS512"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "30"),
            ("BCRYPT_COST", "10"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(
            config.allowed_origins,
            vec!["https://todo.example.com", "https://admin.example.com"]
        );
        assert_eq!(config.auth.algorithm(), Algorithm::HS512);
        assert_eq!(config.auth.token_ttl(), Duration::minutes(30));
        assert_eq!(config.auth.bcrypt_cost(), 10);
    }

    #[test]
    fn test_missing_or_blank_secret_is_fatal() {
        let missing = Config::from_vars(lookup_from(&[("DATABASE_URL", "postgres://test")]));
        assert!(matches!(missing, Err(ConfigError::Missing("JWT_SECRET"))));

        let blank = Config::from_vars(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "   "),
        ]));
        assert!(matches!(blank, Err(ConfigError::EmptySecret)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = [("DATABASE_URL", "postgres://test"), ("JWT_SECRET", "s")];

        let mut vars = base.to_vec();
        vars.push(("SERVER_PORT", "eighty"));
        assert!(matches!(
            Config::from_vars(lookup_from(&vars)),
            Err(ConfigError::Invalid { key: "SERVER_PORT", .. })
        ));

        let mut vars = base.to_vec();
        vars.push(("JWT_ALGORITHM", "RS256"));
        assert!(matches!(
            Config::from_vars(lookup_from(&vars)),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));

        let mut vars = base.to_vec();
        vars.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "0"));
        assert!(matches!(
            Config::from_vars(lookup_from(&vars)),
            Err(ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })
        ));

        let mut vars = base.to_vec();
        vars.push(("BCRYPT_COST", "2"));
        assert!(matches!(
            Config::from_vars(lookup_from(&vars)),
            Err(ConfigError::Invalid { key: "BCRYPT_COST", .. })
        ));
    }

    #[test]
    fn test_token_ttl_is_bounded() {
        let base = [("DATABASE_URL", "postgres://test"), ("JWT_SECRET", "s")];

        for minutes in ["525601", "1000000000000", "9223372036854775807"] {
            let mut vars = base.to_vec();
            vars.push(("ACCESS_TOKEN_EXPIRE_MINUTES", minutes));
            assert!(
                matches!(
                    Config::from_vars(lookup_from(&vars)),
                    Err(ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })
                ),
                "{} minutes should be refused",
                minutes
            );
        }

        let mut vars = base.to_vec();
        vars.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "525600"));
        let config = Config::from_vars(lookup_from(&vars)).unwrap();
        assert_eq!(config.auth.token_ttl(), Duration::days(365));
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig::new("super-secret", Algorithm::HS256, Duration::hours(1), 4).unwrap();
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
