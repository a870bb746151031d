use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "rift_grid=info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the global tracing subscriber.
///
/// `filter` takes precedence over `RUST_LOG`, which takes precedence over
/// the default of `rift_grid=info`. Only the first call has any effect.
pub fn init_logging(filter: Option<&str>) {
    INSTALLED.get_or_init(|| {
        let filter = match filter {
            Some(directive) => EnvFilter::new(directive),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        };

        let tree = HierarchicalLayer::default()
            .with_writer(std::io::stderr)
            .with_indent_lines(true)
            .with_targets(true)
            .with_indent_amount(2);

        // try_init fails if a subscriber is already installed (e.g. by test-log).
        let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(Some("rift_grid=trace"));
        init_logging(None);
        tracing::trace!("still alive");
    }
}
