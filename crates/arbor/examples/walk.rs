//! Walk a child list and print its key-paths
//!
//! Run with `RUST_LOG=arbor=debug` to see validation warnings.

use arbor::{Arbor, Config, ElementConfig, Value, children};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arbor=warn".parse()?))
        .init();

    let arbor = Arbor::new(Config::development());

    let items: Vec<Value> = ["apple", "pear", "apple", "plum"]
        .into_iter()
        .map(|name| {
            arbor
                .create_element("li", ElementConfig::new().key(name), vec![Value::from(name)])
                .into()
        })
        .collect();
    let list = arbor.create_element(
        "ul",
        ElementConfig::new(),
        vec![Value::from("Fruit:"), Value::from(items), Value::Null],
    );

    let kids = list.children().cloned().unwrap_or_default();
    println!("children: {}", children::count(&kids)?);
    for child in children::keyed(&kids)? {
        println!("  {:<16} {:?}", child.key, child.value);
    }

    Ok(())
}
