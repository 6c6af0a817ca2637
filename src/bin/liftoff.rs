//! Liftoff terminal server
//!
//! Runs the round engine and plays it from the terminal: each stdin line
//! is `<chat> <text>` or `<chat> #<button>`, deliveries print to stdout.

use clap::Parser;
use liftoff::engine::Config;
use liftoff::hosting::*;
use liftoff::notify::Console;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "liftoff", about = "Multiplayer crash betting over a chat channel")]
struct Args {
    /// Workers handling inbound intents
    #[arg(long, default_value_t = num_cpus::get())]
    workers: usize,
    /// Inbound intents buffered before input waits
    #[arg(long, default_value_t = liftoff::QUEUE_CAPACITY)]
    capacity: usize,
    /// Seed for crash and speed draws
    #[arg(long)]
    seed: Option<u64>,
    /// Print deliveries as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    liftoff::log();
    liftoff::kys();
    let args = Args::parse();
    let casino = Casino::new(
        Arc::new(Console::new(args.json)),
        Config::default(),
        args.seed,
    );
    let queue = casino.open(args.workers, args.capacity);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    pump(stdin, queue).await?;
    log::info!("[casino] input closed, shutting down");
    Ok(())
}
