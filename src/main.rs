use std::error::Error;

use clap::Parser;
use log::{info, warn};
use rust_cred_iterator::cli::{self, handle_cli};
use std::time::Instant;

// 主函数
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();

    // 初始化日志，没有 log4rs.yaml 时退回 env_logger
    if let Err(e) = log4rs::init_file("log4rs.yaml", Default::default()) {
        let _ = env_logger::try_init();
        warn!("Failed to initialize log4rs ({}), using env_logger", e);
    }

    handle_cli(cli::Cli::parse()).await?;

    info!("Total execution time: {:?}", start_time.elapsed());
    Ok(())
}
