//! Rally report CLI binary.
//!
//! Lists or counts Rally objects from the command line.

use clap::Parser;
use rallyapi::cli::{Cli, Command};
use rallyapi::output::{records_table, PrettyPrint};
use rallyapi::{
    get_report, get_report_page, get_report_total_count, RallyClient, Record, ReportQuery,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match RallyClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set RALLY_USERNAME and RALLY_PASSWORD environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &RallyClient, cli: Cli) -> rallyapi::Result<()> {
    match cli.command {
        Command::List {
            object_type,
            query,
            start,
            pagesize,
        } => {
            let query = report_query(object_type, cli.workspace, query);
            if start.is_some() || pagesize.is_some() {
                let start = start.unwrap_or(1);
                let pagesize = pagesize.unwrap_or(rallyapi::DEFAULT_PAGE_SIZE);
                let page = get_report_page(client, &query, start, pagesize).await?;
                if cli.json {
                    // Keep the window, total and has_more alongside the items
                    println!("{}", serde_json::to_string_pretty(&page)?);
                    return Ok(());
                }
                output_records(&page.items, false)
            } else {
                let records = get_report(client, &query).await?;
                output_records(&records, cli.json)
            }
        }
        Command::Count { object_type, query } => {
            let query = report_query(object_type, cli.workspace, query);
            let total = get_report_total_count(client, &query).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "total": total }));
            } else {
                println!("{total}");
            }
            Ok(())
        }
    }
}

fn report_query(
    object_type: String,
    workspace: Option<String>,
    query: Option<String>,
) -> ReportQuery {
    ReportQuery {
        object_type,
        workspace,
        query,
    }
}

fn output_records(records: &[Record], json: bool) -> rallyapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else if let [record] = records {
        println!("{}", record.pretty_print());
    } else {
        println!("{}", records_table(records));
        println!("\n{} objects", records.len());
    }
    Ok(())
}
