pub const DEFAULT_THROTTLE_MS: i32 = 100;
pub const DEFAULT_IDLE_MS: i32 = 100;
pub const DEFAULT_DISTANCE_PX: i32 = 500;
pub const FALLBACK_RATE_LIMIT_MS: i32 = 500;


pub const ATTRIBUTE_PREFIX: &str = "infinite-scrollsy";
pub const SCROLL_EVENT: &str = "scroll";
