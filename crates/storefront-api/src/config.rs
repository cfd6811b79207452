use std::env;
use std::path::PathBuf;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `memory` selects the in-process store
    pub database_url: String,
    pub stripe_key: String,
    pub stripe_api_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub product_per_page: i64,
    pub uploads_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            database_url: "memory".to_string(),
            stripe_key: String::new(),
            stripe_api_url: None,
            cors_origins: vec!["*".to_string()],
            product_per_page: 8,
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let stripe_key = env::var("STRIPE_KEY").unwrap_or_default();
        let stripe_api_url = env::var("STRIPE_API_URL").ok();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or(defaults.cors_origins);

        let product_per_page = env::var("PRODUCT_PER_PAGE")
            .ok()
            .and_then(|n| n.parse().ok())
            .filter(|n: &i64| *n > 0)
            .unwrap_or(defaults.product_per_page);

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.uploads_dir);

        Self {
            port,
            database_url,
            stripe_key,
            stripe_api_url,
            cors_origins,
            product_per_page,
            uploads_dir,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == "memory"
    }
}
