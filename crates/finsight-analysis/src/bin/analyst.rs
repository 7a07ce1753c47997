//! Command-line entry point for the stock analysis coordinator

use clap::Parser;
use finsight_analysis::{
    AnalysisConfig, GENERIC_ERROR_MESSAGE, apply_market_qualifier, build_coordinator,
};
use finsight_core::{Agent, Context};
use finsight_llm::providers::GroqProvider;
use finsight_runtime::AgentRuntime;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "Multi-agent stock analysis reports", long_about = None)]
struct Args {
    /// The analysis query (e.g. "Compare TCS and Infosys")
    query: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    finsight_utils::init_tracing();

    let args = Args::parse();

    let provider = Arc::new(GroqProvider::from_env()?);
    let runtime = Arc::new(AgentRuntime::builder().provider(provider).build()?);
    let config = Arc::new(AnalysisConfig::default().with_env()?);

    let coordinator = build_coordinator(runtime, config)?;

    info!(query = %args.query, "Generating report");

    let mut context = Context::new().with_market("NSE");
    let prompt = apply_market_qualifier(&args.query);

    match coordinator.process(prompt, &mut context).await {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            eprintln!("{GENERIC_ERROR_MESSAGE}");
            std::process::exit(1);
        }
    }
}
