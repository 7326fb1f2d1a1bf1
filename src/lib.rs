pub mod app;
pub mod tag;

pub(crate) mod build;
pub(crate) mod logging;

uniffi::setup_scaffolding!();
