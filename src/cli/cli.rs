use crate::config::EngineConfig;
use crate::errors::Result;
use crate::iterator::{CredentialIterator, Host, IteratorConfig, Pull, count_credentials};
use crate::wordlist::is_password_only_service;
use clap::Parser;
use colored::Colorize;
use log::{debug, info, warn};
use std::error::Error;
use std::path::PathBuf;

// 定义命令行参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 目标地址
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// 目标端口
    #[arg(long, default_value_t = 22)]
    pub port: u16,
    /// 服务名（用于选择默认字典）
    #[arg(short, long, default_value = "ssh")]
    pub service: String,
    /// 用户名或用户名文件 (留空使用默认字典)
    #[arg(short, long, default_value = "")]
    pub user: String,
    /// 密码或密码文件 (留空使用默认字典)
    #[arg(short, long, default_value = "")]
    pub password: String,
    /// user:password 组合或组合文件
    #[arg(short = 'C', long, default_value = "")]
    pub combo: String,
    /// 服务版本提示
    #[arg(long, default_value = "")]
    pub version_hint: String,
    /// 只枚举密码
    #[arg(long)]
    pub password_only: bool,
    /// 未指定密码时只尝试空密码
    #[arg(long)]
    pub empty_password: bool,
    /// 关闭大文件分块
    #[arg(long)]
    pub no_chunking: bool,
    /// 配置文件路径
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
    /// 只输出凭据总数
    #[arg(long)]
    pub count_only: bool,
    /// 最多输出多少组凭据
    #[arg(long)]
    pub limit: Option<u64>,
}

impl Cli {
    /// 加载配置文件并用命令行参数覆盖，命令行参数优先级更高
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut engine = if self.config.is_file() {
            EngineConfig::load_from_file(&self.config)?
        } else {
            debug!(
                "Config file {} not found, using default values",
                self.config.display()
            );
            EngineConfig::default()
        };

        if self.empty_password {
            engine.use_empty_password = true;
        }
        if self.no_chunking {
            engine.chunking.disabled = true;
        }
        Ok(engine)
    }

    /// 生成迭代器配置
    pub fn iterator_config(&self) -> Result<IteratorConfig> {
        let engine = self.engine_config()?;
        let password_only = self.password_only || is_password_only_service(&self.service);
        let config = IteratorConfig::new(
            Host::new(self.host.clone(), self.port, self.service.clone()),
            &self.user,
            &self.password,
            &self.combo,
            &self.version_hint,
            password_only,
        )
        .with_engine(engine);
        debug!("{:?}", config);
        Ok(config)
    }
}

// 逐个输出凭据，返回实际输出的数量
fn print_credentials(config: IteratorConfig, limit: Option<u64>) -> Result<u64> {
    let mut iterator = CredentialIterator::from_config(config);
    let mut produced = 0;

    let outcome = loop {
        if limit.is_some_and(|max| produced >= max) {
            break Ok(());
        }
        match iterator.pull() {
            Pull::Credential(credential) => {
                println!(
                    "{}:{}",
                    credential.username.green(),
                    credential.password.yellow()
                );
                produced += 1;
            }
            Pull::Exhausted => break Ok(()),
            Pull::Failed(e) => break Err(e),
        }
    };

    let closed = iterator.close();
    outcome?;
    closed?;
    Ok(produced)
}

// 处理命令行参数：计数和枚举并发执行
pub async fn handle_cli(cli: Cli) -> std::result::Result<(), Box<dyn Error>> {
    let config = cli.iterator_config()?;

    let count_config = config.clone();
    let counting = tokio::task::spawn_blocking(move || count_credentials(&count_config));

    if cli.count_only {
        let total = counting.await??;
        println!("{}", total);
        return Ok(());
    }

    let limit = cli.limit;
    let listing = tokio::task::spawn_blocking(move || print_credentials(config, limit));
    let (total, produced) = tokio::join!(counting, listing);
    let produced = produced??;

    match total? {
        Ok(total) => {
            info!("Produced {} of {} credentials", produced, total);
            if limit.is_none() && produced != total {
                warn!("Produced {} credentials but expected {}", produced, total);
            }
        }
        Err(e) => warn!("Failed to count credentials: {}", e),
    }
    Ok(())
}

