//! Arithmetic core and the two interactive calculator front-ends.
pub mod expression;
pub mod guided;
pub mod ops;

pub use ops::{CalcError, add, calculate_velocity, divide, multiply, subtract};

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
