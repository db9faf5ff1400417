use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duel_server::{run, ServerConfig};
use protocol::GameKind;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("duel_server=debug".parse()?))
        .init();

    let config = parse_args()?;
    info!("对战服务端启动中...");

    run(config).await
}

/// 读取进程参数: [玩法] [监听地址]
fn parse_args() -> Result<ServerConfig> {
    let mut config = ServerConfig::default();
    let mut args = std::env::args().skip(1);

    if let Some(game) = args.next() {
        config.game = GameKind::parse(&game).ok_or_else(|| {
            anyhow::anyhow!("未知玩法: {game} (可选 tictactoe / connectfour)")
        })?;
    }
    if let Some(addr) = args.next() {
        config.listen_addr = addr;
    }

    Ok(config)
}
