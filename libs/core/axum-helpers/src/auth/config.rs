use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

/// Shortest accepted signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// JWT signing configuration.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_TTL_SECS` (default 86400)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }
        Ok(Self { secret, ttl_secs })
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let ttl_secs = env_parse_or("JWT_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        Self::new(secret, ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_new_rejects_short_secret() {
        let err = JwtConfig::new("short", 60).unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn test_from_env_defaults_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", None)],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_secs, DEFAULT_TOKEN_TTL_SECS);
            },
        );
    }

    #[test]
    fn test_from_env_custom_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("3600"))],
            || assert_eq!(JwtConfig::from_env().unwrap().ttl_secs, 3600),
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }
}
