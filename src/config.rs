use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

/// Size limits for uploaded media, in bytes.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Largest stored chunk of a trigger payload.
    pub chunk_size: usize,
    /// Encoded length limit of a trigger image data URL.
    pub max_image_bytes: usize,
    /// Decoded size limit of a trigger audio clip.
    pub max_audio_bytes: usize,
    pub max_profile_photo_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200 * 1024,
            max_image_bytes: 2 * 1024 * 1024,
            max_audio_bytes: 5 * 1024 * 1024,
            max_profile_photo_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let media = MediaConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/vision.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3001"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 500_u64),
            },
            media: MediaConfig {
                chunk_size: positive(env_or_parse("MEDIA_CHUNK_SIZE", media.chunk_size), media.chunk_size),
                max_image_bytes: env_or_parse("MAX_IMAGE_BYTES", media.max_image_bytes),
                max_audio_bytes: env_or_parse("MAX_AUDIO_BYTES", media.max_audio_bytes),
                max_profile_photo_bytes: env_or_parse(
                    "MAX_PROFILE_PHOTO_BYTES",
                    media.max_profile_photo_bytes,
                ),
            },
        }
    }
}

// A zero chunk size would never make progress when splitting.
fn positive(value: usize, default: usize) -> usize {
    if value == 0 {
        tracing::warn!(default, "MEDIA_CHUNK_SIZE must be positive, using default");
        default
    } else {
        value
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
