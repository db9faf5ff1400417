//! 服务端主流程

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use protocol::{GameKind, Listener, Role, TcpListener, DEFAULT_PORT};

use crate::assign::assign_roles;
use crate::handler::handler_task;
use crate::peer::PeerConn;
use crate::session::{Coordinator, MatchSession};

/// 服务端配置
///
/// 玩法在建局时显式传入；双端须配置同一玩法。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub listen_addr: String,
    /// 玩法
    pub game: GameKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            game: GameKind::TicTacToe,
        }
    }
}

/// 绑定监听地址并运行一局对战
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("监听失败: {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, game = ?config.game, "等待两位玩家接入");

    serve_match(listener, config.game).await
}

/// 在已绑定的监听器上完成一局对战
///
/// 接入两个对端、分配先手、转入对局循环；双方处理器都退出后
/// 返回，进程随之结束。
pub async fn serve_match(mut listener: TcpListener, game: GameKind) -> anyhow::Result<()> {
    let conn_a = listener.accept().await.context("接受连接失败")?;
    let peer_a = PeerConn::new(conn_a);
    info!(addr = ?peer_a.handle.addr, "玩家 1 已接入");

    let conn_b = listener.accept().await.context("接受连接失败")?;
    let peer_b = PeerConn::new(conn_b);
    info!(addr = ?peer_b.handle.addr, "玩家 2 已接入");

    let mut peers = [peer_a, peer_b];

    info!("开始猜拳分配先手");
    let winner = assign_roles(&mut peers).await.context("先手分配失败")?;

    // 按角色排列：猜拳胜者执先
    let [peer_a, peer_b] = peers;
    let (first, second) = if winner == 0 {
        (peer_a, peer_b)
    } else {
        (peer_b, peer_a)
    };
    let PeerConn {
        reader: first_reader,
        handle: first_handle,
        writer_task: first_writer,
    } = first;
    let PeerConn {
        reader: second_reader,
        handle: second_handle,
        writer_task: second_writer,
    } = second;

    let session = MatchSession::new(game.create(), first_handle, second_handle);
    let coordinator = Arc::new(Coordinator::new(session));

    // 开局：推送初始快照
    coordinator.broadcast_state().await;
    info!("对局开始");

    let handler_first = tokio::spawn(handler_task(
        Role::First,
        first_reader,
        coordinator.clone(),
    ));
    let handler_second = tokio::spawn(handler_task(
        Role::Second,
        second_reader,
        coordinator.clone(),
    ));

    // 两个处理器都退出后进程才结束
    let _ = tokio::join!(handler_first, handler_second);

    // 释放协调器以关闭出站队列，等待写任务排空
    drop(coordinator);
    let _ = tokio::join!(first_writer, second_writer);

    info!("双方处理器均已退出，对局会话销毁");
    Ok(())
}
