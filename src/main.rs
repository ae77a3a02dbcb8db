use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use prepay_vs_invest::{calculate_amortization, AmortizationInput};
use simple_logger::SimpleLogger;

/// Compare prepaying a loan against investing the same money
#[derive(Parser)]
#[command(name = "prepay", version)]
struct Cli {
    /// JSON file with the loan, extra payments and alternative return (stdin if omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Decimal places in the printed result
    #[arg(long, default_value_t = 2)]
    decimals: u32,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<AmortizationInput> {
    let contents = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&contents).context("Failed to parse amortization input")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    let input = read_input(cli.input.as_ref())?;
    let result = calculate_amortization(&input).context("Amortization failed")?;
    info!(
        "Paid off in month {} of {}: {:?}",
        result.actual_payoff_month, input.loan.term_months, result.recommendation
    );

    let rounded = result.rounded(cli.decimals);
    let output = if cli.compact {
        serde_json::to_string(&rounded)?
    } else {
        serde_json::to_string_pretty(&rounded)?
    };
    println!("{}", output);

    Ok(())
}
