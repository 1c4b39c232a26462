//! # Stock Report
//!
//! Prints every stocked (item, warehouse) pair with its thresholds and
//! classified state.
//!
//! ## Usage
//! ```bash
//! cargo run -p kardex-db --bin stock-report
//! cargo run -p kardex-db --bin stock-report -- --warehouse main --alerts-only
//! KARDEX_DB_PATH=./data/kardex.db cargo run -p kardex-db --bin stock-report
//! ```

use std::env;

use kardex_db::{init_tracing, Database, DbConfig, StockReportLine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut warehouse: Option<String> = None;
    let mut alerts_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--warehouse" | "-w" => {
                if i + 1 < args.len() {
                    warehouse = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--alerts-only" | "-a" => alerts_only = true,
            "--help" | "-h" => {
                println!("KardexPlus Stock Report");
                println!();
                println!("Usage: stock-report [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: $KARDEX_DB_PATH or ./kardex.db)");
                println!("  -w, --warehouse <ID>     Only this warehouse");
                println!("  -a, --alerts-only        Only rows whose state needs attention");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
            }
        }
        i += 1;
    }

    let db = Database::new(config).await?;

    let lines: Vec<StockReportLine> = db
        .stock()
        .stock_report(warehouse.as_deref())
        .await?
        .into_iter()
        .filter(|line| !alerts_only || line.state.is_alert())
        .collect();

    print_table(&lines);

    db.close().await;
    Ok(())
}

fn cell(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_table(lines: &[StockReportLine]) {
    println!(
        "{:<18} {:<10} {:>8} {:>6} {:>6} {:>7}  {:<26}",
        "ITEM", "WAREHOUSE", "QTY", "MIN", "MAX", "REORDER", "STATE"
    );
    println!("{}", "-".repeat(88));

    for line in lines {
        let t = line.threshold.as_ref();
        println!(
            "{:<18} {:<10} {:>8} {:>6} {:>6} {:>7}  {:<26}",
            line.snapshot.item_id,
            line.snapshot.warehouse_id,
            line.snapshot.quantity,
            cell(t.and_then(|t| t.min_stock)),
            cell(t.and_then(|t| t.max_stock)),
            cell(t.and_then(|t| t.reorder_point)),
            line.state.as_str(),
        );
    }

    let alerts = lines.iter().filter(|l| l.state.is_alert()).count();
    let pending = lines.iter().filter(|l| l.state.is_pending_config()).count();

    println!("{}", "-".repeat(88));
    println!("{} rows, {} alerts, {} pending configuration", lines.len(), alerts, pending);
}
