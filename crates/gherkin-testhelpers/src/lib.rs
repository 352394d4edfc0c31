//! Test support shared by the gherkin crates.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The kitchen-sink document: comments, tags, descriptions, a background,
/// tables with an empty cell and a text block.
pub const COMPLEX_FEATURE: &str = include_str!("../fixtures/complex.feature");

/// A scenario outline with two tagged and untagged examples blocks.
pub const OUTLINE_FEATURE: &str = include_str!("../fixtures/outline.feature");

/// A document that selects French keywords with a language marker.
pub const FRENCH_FEATURE: &str = include_str!("../fixtures/french.feature");

static INIT: Once = Once::new();

/// Install a `RUST_LOG`-driven subscriber for the current test binary.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
