/// Default number of detections returned by a listing
pub const DEFAULT_DETECTION_LIMIT: usize = 20;

/// Upper bound for the detection listing `limit`
pub const MAX_DETECTION_LIMIT: usize = 100;

/// Default number of tracking entries returned by a listing
pub const DEFAULT_TRACKING_LIMIT: usize = 100;

/// Tracking entries considered by the personality analysis (also the listing cap)
pub const ANALYSIS_WINDOW: usize = 1000;

pub const MAX_TRIGGER_NAME_LEN: usize = 100;

/// Request body limit for ordinary JSON routes
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Request body limit for trigger creation (image + audio data URLs)
pub const TRIGGER_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Header carrying the caller id set by the upstream auth layer
pub const USER_ID_HEADER: &str = "x-user-id";

pub const MAX_USER_ID_LEN: usize = 128;
