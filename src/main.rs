use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use idlectl::aws::{self, CloudWatchMetrics, EbsInventory, Ec2Inventory, RdsInventory};
use idlectl::config::{init_config, ScanConfig};
use idlectl::export;
use idlectl::inventory::ResourceInventory;
use idlectl::pricing::PricingTable;
use idlectl::report;
use idlectl::scan;

#[derive(Parser)]
#[command(name = "idlectl")]
#[command(
    about = "Idle AWS resource scanner and cost-savings reporter",
    long_about = "idlectl scans AWS compute instances, storage volumes, and database\ninstances for idle or underutilized resources and writes a cost-savings\nreport.\n\nChecks:\n  - Stopped EC2 instances and running instances with low CPU\n  - Unattached EBS volumes and attached volumes with negligible I/O\n  - RDS instances with low CPU or low connection counts\n\nThresholds and exclusions are configurable via a TOML file."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for idle resources and write a cost-savings report
    Scan {
        /// AWS region to scan (default: SDK region chain)
        #[arg(long)]
        region: Option<String>,
        /// Output file path
        #[arg(short, long, default_value = "findings.json")]
        output: PathBuf,
        /// Report format (json, html)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Initialize scan configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".idlectl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan {
            region,
            output,
            format,
        } => {
            // Malformed config is fatal before any scan work begins
            let config = ScanConfig::load(cli.config.as_deref())?;
            run_scan_command(config, region, output, format).await?;
        }
        Commands::Init { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

async fn run_scan_command(
    config: ScanConfig,
    region: Option<String>,
    output: PathBuf,
    format: String,
) -> Result<()> {
    let region = region.or_else(|| config.region.clone());
    let sdk_config = aws::load_sdk_config(region).await;
    let region_name = aws::resolved_region(&sdk_config);

    let inventories: Vec<Box<dyn ResourceInventory>> = vec![
        Box::new(Ec2Inventory::new(&sdk_config, region_name.clone())),
        Box::new(EbsInventory::new(&sdk_config, region_name.clone())),
        Box::new(RdsInventory::new(&sdk_config, region_name.clone())),
    ];
    let metrics = CloudWatchMetrics::new(&sdk_config);
    let pricing = PricingTable::new();

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Scanning {} for idle resources...", region_name));

    let kind_results = scan::run_scan(&inventories, &metrics, &pricing, &config).await;

    spinner.finish_and_clear();

    let report = report::aggregate(kind_results, &config);

    // The report is the scan's only product; a write failure is fatal
    export::write_report(&report, &format, &output).context("Failed to write report")?;

    report::print_summary(&report);
    println!();
    println!(
        "  {} {}",
        style("Report saved to:").dim(),
        output.display()
    );

    Ok(())
}
