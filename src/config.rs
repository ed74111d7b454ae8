use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_session_expire")]
    pub expire_hours: u64,
    #[serde(default)]
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    /// The single address allowed into the admin area
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Base directory for `/images/optimized/*path`
    #[serde(default = "default_images_dir")]
    pub local_dir: String,
    /// Blob store namespace scanned for `/images/:id`
    #[serde(default = "default_bucket_prefix")]
    pub bucket_prefix: String,
    #[serde(default = "default_quality")]
    pub default_quality: u8,
}

/// Blob store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Gcs,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory when `backend = "local"`
    #[serde(default = "default_storage_path")]
    pub local_path: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub project_id: String,
    /// Browser SDK settings rendered into the login page
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_site_title")]
    pub title: String,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "data/folio.db".to_string()
}

fn default_session_expire() -> u64 {
    24 * 7
}

fn default_images_dir() -> String {
    "static/images".to_string()
}

fn default_bucket_prefix() -> String {
    "images/".to_string()
}

fn default_quality() -> u8 {
    75
}

fn default_storage_path() -> String {
    "data/bucket".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_site_title() -> String {
    "Portfolio".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expire_hours: default_session_expire(),
            cookie_secure: false,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            local_dir: default_images_dir(),
            bucket_prefix: default_bucket_prefix(),
            default_quality: default_quality(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_path: default_storage_path(),
            bucket: String::new(),
            client_email: String::new(),
            private_key: String::new(),
            token_uri: default_token_uri(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            auth_domain: String::new(),
            jwks_url: default_jwks_url(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            title: default_site_title(),
        }
    }
}

impl StorageConfig {
    /// Whether enough credentials are present to talk to the bucket
    pub fn has_gcs_credentials(&self) -> bool {
        !self.bucket.is_empty() && !self.client_email.is_empty() && !self.private_key.is_empty()
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.apply_platform_env();
        config.ensure_directories()?;
        config.ensure_session_secret()?;
        if config.admin.email.is_empty() {
            tracing::warn!("No admin email configured, admin login is disabled");
        }
        tracing::info!(
            "Storage backend: {:?}, identity project: {}",
            config.storage.backend,
            config.identity.project_id
        );
        Ok(config)
    }

    /// Ensure the session signing secret is present and persisted
    fn ensure_session_secret(&mut self) -> anyhow::Result<()> {
        if !self.session.secret.is_empty() {
            return Ok(());
        }

        let secret_path = Path::new("data/.session_secret");
        if secret_path.exists() {
            let secret = fs::read_to_string(secret_path)?;
            self.session.secret = secret.trim().to_string();
            tracing::info!("Loaded persisted session secret from data/.session_secret");
        } else {
            let secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
            if let Some(parent) = secret_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(secret_path, &secret)?;
            self.session.secret = secret;
            tracing::info!("Generated and persisted new session secret to data/.session_secret");
        }
        Ok(())
    }

    /// Load configuration from folio.toml or config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = [
            "folio.toml",
            "config.toml",
            "data/folio.toml",
            "data/config.toml",
        ];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: FOLIO_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("FOLIO_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("FOLIO_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = env::var("FOLIO_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        if let Ok(val) = env::var("FOLIO_CONF_SESSION_SECRET") {
            self.session.secret = val;
        }
        if let Ok(val) = env::var("FOLIO_CONF_SESSION_EXPIRE_HOURS") {
            if let Ok(hours) = val.parse() {
                self.session.expire_hours = hours;
            }
        }
        if let Ok(val) = env::var("FOLIO_CONF_SESSION_COOKIE_SECURE") {
            if let Ok(v) = val.parse() {
                self.session.cookie_secure = v;
            }
        }

        if let Ok(val) = env::var("FOLIO_CONF_ADMIN_EMAIL") {
            self.admin.email = val;
        }

        if let Ok(val) = env::var("FOLIO_CONF_IMAGES_LOCAL_DIR") {
            self.images.local_dir = val;
        }
        if let Ok(val) = env::var("FOLIO_CONF_IMAGES_DEFAULT_QUALITY") {
            if let Ok(q) = val.parse() {
                self.images.default_quality = q;
            }
        }

        if let Ok(val) = env::var("FOLIO_CONF_STORAGE_BACKEND") {
            match val.trim().to_lowercase().as_str() {
                "local" => self.storage.backend = StorageBackend::Local,
                "gcs" => self.storage.backend = StorageBackend::Gcs,
                other => tracing::warn!("Ignoring unknown storage backend {:?}", other),
            }
        }
        if let Ok(val) = env::var("FOLIO_CONF_STORAGE_LOCAL_PATH") {
            self.storage.local_path = val;
        }

        if let Ok(val) = env::var("FOLIO_CONF_SITE_STATIC_DIR") {
            self.site.static_dir = val;
        }
        if let Ok(val) = env::var("FOLIO_CONF_SITE_TITLE") {
            self.site.title = val;
        }
    }

    /// Apply the credential variables the hosting platform provides
    fn apply_platform_env(&mut self) {
        if let Ok(val) = env::var("FIREBASE_PROJECT_ID") {
            if self.identity.project_id.is_empty() {
                self.identity.project_id = val;
            }
        }
        if let Ok(val) = env::var("FIREBASE_API_KEY") {
            self.identity.api_key = val;
        }
        if let Ok(val) = env::var("FIREBASE_AUTH_DOMAIN") {
            self.identity.auth_domain = val;
        }
        if self.identity.auth_domain.is_empty() && !self.identity.project_id.is_empty() {
            self.identity.auth_domain = format!("{}.firebaseapp.com", self.identity.project_id);
        }
        if let Ok(val) = env::var("FIREBASE_CLIENT_EMAIL") {
            self.storage.client_email = val;
        }
        if let Ok(val) = env::var("FIREBASE_PRIVATE_KEY") {
            self.storage.private_key = expand_newlines(&val);
        }
        if let Ok(val) = env::var("FIREBASE_STORAGE_BUCKET") {
            self.storage.bucket = val;
        }
        if let Ok(val) = env::var("ADMIN_EMAIL") {
            if self.admin.email.is_empty() {
                self.admin.email = val;
            }
        }
        if let Ok(val) = env::var("SECRET_KEY") {
            if self.session.secret.is_empty() {
                self.session.secret = val;
            }
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }

        if self.storage.backend == StorageBackend::Local {
            fs::create_dir_all(&self.storage.local_path)?;
        }

        Ok(())
    }
}

/// Private keys in env vars usually carry literal `\n` sequences
fn expand_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.images.default_quality, 75);
        assert_eq!(config.images.bucket_prefix, "images/");
        assert_eq!(config.storage.backend, StorageBackend::Gcs);
        assert!(!config.storage.has_gcs_credentials());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [admin]
            email = "me@example.com"

            [storage]
            backend = "local"
            local_path = "/tmp/bucket"
            "#,
        )
        .unwrap();
        assert_eq!(config.admin.email, "me@example.com");
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.storage.local_path, "/tmp/bucket");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.expire_hours, 168);
    }

    #[test]
    fn test_expand_newlines() {
        assert_eq!(
            expand_newlines("-----BEGIN\\nabc\\n-----END"),
            "-----BEGIN\nabc\n-----END"
        );
    }
}
