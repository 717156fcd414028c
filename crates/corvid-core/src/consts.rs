/// Stored notification preference that delivers everything
pub const NOTIFY_ALL: &str = "ALL";

/// Stored notification preference that suppresses every notification
pub const NOTIFY_NONE: &str = "NONE";
