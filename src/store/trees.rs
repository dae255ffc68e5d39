pub const TRIGGERS: &str = "triggers";
pub const TRIGGER_CHUNKS: &str = "trigger_chunks";
pub const DETECTIONS: &str = "detections";
pub const TRACKING: &str = "tracking";
pub const PROFILES: &str = "profiles";
pub const CONFIG_VERSIONS: &str = "config_versions";
