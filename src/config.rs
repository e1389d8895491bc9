use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
        })
    }
}

/// Credentials for the image host, read once at startup and handed to
/// [`crate::uploads::Cloudinary::new`]. Nothing else reads these variables.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            cloud_name: env::var("CLOUD_NAME")?,
            api_key: env::var("CLOUD_API_KEY")?,
            api_secret: env::var("CLOUD_API_SECRET")?,
        })
    }
}
