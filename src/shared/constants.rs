/// Maximum contact form submissions accepted per client within one window
pub const CONTACT_RATE_LIMIT_MAX: u32 = 3;

/// Length of the contact form rate-limit window, in seconds
pub const CONTACT_RATE_LIMIT_WINDOW_SECS: i64 = 60;

/// How often expired rate-limit records are swept, in seconds
pub const RATE_LIMIT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

// =============================================================================
// CACHE
// =============================================================================

/// Tag invalidated by every mutation of the per-category image tables
pub const IMAGES_CACHE_TAG: &str = "images";

/// Tag invalidated by every mutation of the service_images table
pub const SERVICE_IMAGES_CACHE_TAG: &str = "service-images";

/// Fallback expiry for cached image reads, in seconds
pub const IMAGE_CACHE_TTL_SECS: u64 = 3600;

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum portfolio image size in bytes (4MB)
pub const MAX_IMAGE_UPLOAD_SIZE: usize = 4 * 1024 * 1024;
