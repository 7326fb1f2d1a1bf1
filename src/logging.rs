use std::sync::Once;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // the host process may have installed a subscriber already
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
