//! Example: rendering every dashboard view
//!
//! Builds the standard registry over seeded mock data and prints each tab's
//! summary, the way a presentation layer would walk the tab bar.

use bizlens::prelude::*;
use serde_json::Value;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bizlens_core=debug".parse()?),
        )
        .init();

    let config = Config::load_or_default();
    let registry = standard_registry(&config);

    for view in registry.all() {
        println!("== {} ==\n", view.title());
        let output = view.render(Value::Null)?;
        println!("{}\n", output);
    }

    Ok(())
}
