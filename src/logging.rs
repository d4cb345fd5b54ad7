//! Log subscriber setup for the binary.

/// Directive string used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "vidvault=trace,vv_db=debug,vv_av=debug,vv_storage=debug"
    } else {
        "vidvault=info,vv_db=info,vv_av=info,vv_storage=warn"
    }
}

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise [`default_directives`] applies.
pub fn init_logging(verbose: bool) {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| default_directives(verbose).to_string());

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();
}
