use stock_table::{StockTable, DEFAULT_PATH};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), stock_table::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::temp_dir().join(DEFAULT_PATH);
    let inventory = StockTable::new();
    let mut log = Vec::new();

    inventory.add_logged("apple", 10, &mut log)?;
    inventory.add_logged("banana", -2, &mut log)?;
    // ignored: empty item id
    inventory.add_logged("", 5, &mut log)?;
    inventory.remove("apple", 3)?;
    inventory.remove("orange", 1)?;

    println!("Apple stock: {}", inventory.get_quantity("apple")?);
    println!("Low items: {:?}", inventory.low_stock());
    for line in &log {
        println!("log: {line}");
    }

    inventory.save(&path)?;
    inventory.load(&path)?;
    inventory.report();

    let _ = std::fs::remove_file(&path);
    Ok(())
}
