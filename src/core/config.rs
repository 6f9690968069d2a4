use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub rate_limit: RateLimitConfig,
    pub conversion: ConversionConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Fixed-window limiter applied to every conversion request
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Conversions admitted per client per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// How often expired counters are evicted
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Largest decoded source image accepted, in bytes
    pub max_image_bytes: usize,
    /// Codec jobs allowed to run at once on the blocking pool
    pub max_concurrent: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            conversion: ConversionConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    // 10MB image plus base64 expansion and JSON framing
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 16 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RateLimitConfig {
    const DEFAULT_MAX_REQUESTS: u32 = 30;
    const DEFAULT_WINDOW_SECS: u64 = 60;
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300; // 5 minutes

    pub fn from_env() -> Result<Self, String> {
        let max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUESTS.to_string())
            .parse::<u32>()
            .map_err(|_| "RATE_LIMIT_MAX_REQUESTS must be a valid number".to_string())?;
        if max_requests == 0 {
            return Err("RATE_LIMIT_MAX_REQUESTS must be at least 1".to_string());
        }

        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_WINDOW_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_WINDOW_SECS must be a valid number".to_string())?;
        if window_secs == 0 {
            return Err("RATE_LIMIT_WINDOW_SECS must be at least 1".to_string());
        }

        let sweep_interval_secs = env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_SWEEP_INTERVAL_SECS must be a valid number".to_string())?;

        Ok(Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs.max(1)),
        })
    }
}

impl ConversionConfig {
    const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let max_image_bytes = env::var("CONVERSION_MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_IMAGE_BYTES.to_string())
            .parse::<usize>()
            .map_err(|_| "CONVERSION_MAX_IMAGE_BYTES must be a valid number".to_string())?;

        let default_concurrency = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        let max_concurrent = match env::var("CONVERSION_MAX_CONCURRENT") {
            Ok(value) => value
                .parse::<usize>()
                .map_err(|_| "CONVERSION_MAX_CONCURRENT must be a valid number".to_string())?,
            Err(_) => default_concurrency,
        };
        if max_concurrent == 0 {
            return Err("CONVERSION_MAX_CONCURRENT must be at least 1".to_string());
        }

        Ok(Self {
            max_image_bytes,
            max_concurrent,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Image Converter API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Convert images to WebP, ICO, PNG or JPEG".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
