use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for debug output.
///
/// Does nothing unless `LITSET_LOG` holds a filter such as
/// `litset_check=debug`. With `LITSET_LOG_TREE` set, spans are printed as
/// an indented tree instead of flat lines. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let Ok(filter) = EnvFilter::try_from_env("LITSET_LOG") else {
            return;
        };
        let tree = std::env::var_os("LITSET_LOG_TREE")
            .map(|_| HierarchicalLayer::new(2).with_targets(true));
        let flat = tree
            .is_none()
            .then(|| fmt::layer().with_target(true).with_level(true));
        // Another subscriber may already be installed by the embedding program.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(flat)
            .with(tree)
            .try_init();
    });
}
