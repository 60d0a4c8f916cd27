//! Default configuration values
//!
//! Named constants for values that only the config layer needs

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default idle lifetime of a server session, in seconds
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Default URL provider for map links
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "addrpin";
