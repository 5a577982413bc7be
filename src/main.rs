// BreakBridge - TCP to serial forwarder with break on connect
use breakbridge::cli::{execute_command, Args};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
