use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pipeline_core::{PipelineSnapshot, MAX_RENDERED_RECORDS};
use pipeline_dataview::bundle_from_str;

#[derive(Parser, Debug)]
#[command(
    name = "pipeline-cli",
    about = "Dựng snapshot pipeline từ một update payload JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON update payload.
    #[arg(short, long)]
    input: PathBuf,

    /// In snapshot đầy đủ dạng JSON thay vì bản tóm tắt.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let bundle = bundle_from_str(&data)?;
    let snapshot = PipelineSnapshot::build(&bundle.settings, bundle.records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "Generated at: {}\nTitle: {}\nRecords: {} total, {} placed",
        snapshot.generated_at,
        snapshot.title,
        snapshot.total_records,
        snapshot.placed_records()
    );
    if snapshot.truncated {
        println!("Capped at {MAX_RENDERED_RECORDS} rendered records");
    }

    println!("Phases:");
    for column in &snapshot.phases {
        println!("  {}: {} records", column.label, column.records.len());
    }

    println!("Legend:");
    for entry in &snapshot.legend {
        println!("  {} -> {}", entry.category, entry.color);
    }

    Ok(())
}
