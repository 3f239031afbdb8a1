use serde::Deserialize;

/// Server settings, layered from defaults and `TRIVIA_*` environment variables.
///
/// | Env Var                      | Default            |
/// |------------------------------|--------------------|
/// | `TRIVIA_HOST`                | `0.0.0.0`          |
/// | `TRIVIA_PORT`                | `8080`             |
/// | `TRIVIA_DATABASE_URL`        | `sqlite:trivia.db` |
/// | `TRIVIA_QUESTIONS_PER_PAGE`  | `10`               |
/// | `TRIVIA_QUIZ_SEED`           | unset              |
/// | `TRIVIA_CORS_ORIGINS`        | unset (any origin) |
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub questions_per_page: u32,
    #[serde(default)]
    pub quiz_seed: Option<u64>,
    /// Comma-separated list of allowed origins.
    #[serde(default)]
    pub cors_origins: Option<String>,
}

impl Settings {
    /// Reads `.env` if present, then the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("TRIVIA").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("questions_per_page", 10)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if settings.questions_per_page == 0 {
            return Err(config::ConfigError::Message(
                "questions_per_page must be at least 1".into(),
            ));
        }
        Ok(settings)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: "0.0.0.0".into(),
            port: 8080,
            database_url: "sqlite:trivia.db".into(),
            questions_per_page: 10,
            quiz_seed: None,
            cors_origins: None,
        }
    }
}
