use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Route tracing output through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cuentapublica=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
