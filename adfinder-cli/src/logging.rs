use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so stdout only carries progress and matches.
/// `RUST_LOG` overrides the default level.
pub fn init_logger(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn filter_for(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_shows_matches() {
        assert_eq!(default_level(false), "info");
        assert_eq!(default_level(true), "debug");
    }
}
