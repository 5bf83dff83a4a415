#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

/// MongoDB connection settings.
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "shop")
///     .with_app_name("shop_api");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string, `mongodb://[user:pass@]host[:port][/db][?options]`
    pub url: String,
    pub database: String,
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

const DEFAULT_URL: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "shop";

impl MongoConfig {
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// Environment variables:
/// - `MONGODB_URL` / `MONGO_URL` (required)
/// - `MONGODB_DATABASE` / `MONGO_DATABASE` (default `shop`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (100), `MONGODB_MIN_POOL_SIZE` (5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (10), `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = first_set(&["MONGODB_URL", "MONGO_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;
        let database = first_set(&["MONGODB_DATABASE", "MONGO_DATABASE"])
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", 100)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", 5)?,
            connect_timeout_secs: env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30,
            )?,
        })
    }
}

#[cfg(feature = "config")]
fn first_set(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_database_keeps_pool_defaults() {
        let config = MongoConfig::with_database("mongodb://db:27017", "catalog");
        assert_eq!(config.url(), "mongodb://db:27017");
        assert_eq!(config.database(), "catalog");
        assert_eq!(config.max_pool_size, 100);
        assert_eq!(config.min_pool_size, 5);
        assert!(config.app_name.is_none());
    }

    #[test]
    fn test_with_app_name() {
        let config = MongoConfig::default().with_app_name("shop_api");
        assert_eq!(config.app_name.as_deref(), Some("shop_api"));
    }

    #[cfg(feature = "config")]
    mod from_env {
        use super::*;

        const UNSET: [(&str, Option<&str>); 4] = [
            ("MONGODB_URL", None),
            ("MONGO_URL", None),
            ("MONGODB_DATABASE", None),
            ("MONGO_DATABASE", None),
        ];

        #[test]
        fn test_reads_primary_names() {
            temp_env::with_vars(
                [
                    ("MONGODB_URL", Some("mongodb://primary:27017")),
                    ("MONGODB_DATABASE", Some("store")),
                    ("MONGODB_MAX_POOL_SIZE", Some("20")),
                ],
                || {
                    let config = MongoConfig::from_env().unwrap();
                    assert_eq!(config.url, "mongodb://primary:27017");
                    assert_eq!(config.database, "store");
                    assert_eq!(config.max_pool_size, 20);
                },
            );
        }

        #[test]
        fn test_falls_back_to_short_names() {
            temp_env::with_vars(UNSET, || {
                temp_env::with_vars(
                    [
                        ("MONGO_URL", Some("mongodb://fallback:27017")),
                        ("MONGO_DATABASE", Some("legacy")),
                    ],
                    || {
                        let config = MongoConfig::from_env().unwrap();
                        assert_eq!(config.url, "mongodb://fallback:27017");
                        assert_eq!(config.database, "legacy");
                    },
                );
            });
        }

        #[test]
        fn test_database_defaults_to_shop() {
            temp_env::with_vars(UNSET, || {
                temp_env::with_var("MONGODB_URL", Some("mongodb://x:27017"), || {
                    assert_eq!(MongoConfig::from_env().unwrap().database, "shop");
                });
            });
        }

        #[test]
        fn test_missing_url_is_an_error() {
            temp_env::with_vars(UNSET, || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(_)));
            });
        }

        #[test]
        fn test_bad_pool_size_is_a_parse_error() {
            temp_env::with_vars(
                [
                    ("MONGODB_URL", Some("mongodb://x:27017")),
                    ("MONGODB_MIN_POOL_SIZE", Some("few")),
                ],
                || {
                    let err = MongoConfig::from_env().unwrap_err();
                    assert!(err.to_string().contains("MONGODB_MIN_POOL_SIZE"));
                },
            );
        }
    }
}
