const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_SHORT_HASH: &str = env!("GIT_SHORT_HASH");

pub fn version() -> String {
    VERSION.to_string()
}

pub fn git_short_hash() -> String {
    GIT_SHORT_HASH.to_string()
}
