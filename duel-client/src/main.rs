//! 终端对战客户端

mod input;
mod render;
mod session;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use protocol::{GameKind, DEFAULT_PORT};

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 服务端地址
    pub server_addr: String,
    /// 玩法，须与服务端一致
    pub game: GameKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: format!("127.0.0.1:{DEFAULT_PORT}"),
            game: GameKind::TicTacToe,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 日志写到 stderr，避免与棋盘渲染混在一起；默认静默，RUST_LOG 打开
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = parse_args()?;
    session::run(config).await
}

/// 读取进程参数: [玩法] [服务端地址]
fn parse_args() -> Result<ClientConfig> {
    let mut config = ClientConfig::default();
    let mut args = std::env::args().skip(1);

    if let Some(game) = args.next() {
        config.game = GameKind::parse(&game).ok_or_else(|| {
            anyhow::anyhow!("未知玩法: {game} (可选 tictactoe / connectfour)")
        })?;
    }
    if let Some(addr) = args.next() {
        config.server_addr = addr;
    }

    Ok(config)
}
