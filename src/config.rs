use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory stores are used.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub allow_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_audience: String,

    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub chat_temperature: f32,
    pub chat_max_tokens: u32,

    pub chat_rate_limit_per_minute: u32,
    pub mood_fetch_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            allow_origins: parse_origins(
                &env::var("ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),

            jwt_secret: env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET must be set"),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into()),

            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_else(|_| String::new()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            openai_timeout_secs: env::var("OPENAI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            chat_temperature: env::var("CHAT_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".into())
                .parse()
                .unwrap_or(0.7),
            chat_max_tokens: env::var("CHAT_MAX_TOKENS")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .unwrap_or(500),

            chat_rate_limit_per_minute: env::var("CHAT_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            mood_fetch_limit: env::var("MOOD_FETCH_LIMIT")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `*` anywhere in the list means any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            allow_origins: vec!["*".into()],
            jwt_secret: "test-jwt-secret-with-enough-entropy".into(),
            jwt_audience: "authenticated".into(),
            openai_api_key: String::new(),
            openai_base_url: "http://127.0.0.1:9".into(),
            openai_model: "gpt-4o".into(),
            openai_timeout_secs: 1,
            chat_temperature: 0.7,
            chat_max_tokens: 500,
            chat_rate_limit_per_minute: 20,
            mood_fetch_limit: 100,
        }
    }
}
