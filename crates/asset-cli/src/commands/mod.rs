//! Command implementations for asset-cli

pub mod install;
pub mod sync;
pub mod validate;

pub use install::run_install;
pub use sync::run_sync;
pub use validate::run_validate;
