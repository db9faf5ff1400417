//! 连接处理器

use std::sync::Arc;

use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use protocol::{ClientMessage, LineReader, ProtocolError, Role};

use crate::session::{Coordinator, MoveOutcome};

/// 运行单个对端的处理器，退出时触发整局终止
pub async fn handler_task(
    role: Role,
    reader: LineReader<OwnedReadHalf>,
    coordinator: Arc<Coordinator>,
) {
    let shutdown = coordinator.subscribe_shutdown();
    read_loop(role, reader, &coordinator, shutdown).await;
    // 任一侧退出即终止整局，另一侧不再停等
    coordinator.end_match();
}

/// 对端读循环
///
/// 合法 move 转交协调器；无法解码的行与当前阶段不该出现的消息
/// 类型记录后忽略；传输错误或对局终止信号则退出。
async fn read_loop(
    role: Role,
    mut reader: LineReader<OwnedReadHalf>,
    coordinator: &Coordinator,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            frame = reader.read_frame::<ClientMessage>() => match frame {
                Ok(ClientMessage::Move { data }) => {
                    match coordinator.submit_move(role, &data).await {
                        MoveOutcome::Applied(state) => {
                            debug!(%role, token = %data, move_count = state.move_count, "走子已应用");
                        }
                        MoveOutcome::Rejected(reason) => {
                            // 安静拒绝：不回发错误，不广播
                            debug!(%role, token = %data, %reason, "走子被拒绝");
                        }
                    }
                }
                Ok(other) => {
                    warn!(%role, ?other, "对局阶段收到异常消息，忽略");
                }
                Err(ProtocolError::Json(e)) => {
                    warn!(%role, error = %e, "无法解码的消息行，忽略");
                }
                Err(e) => {
                    info!(%role, "对端连接终止: {e}");
                    break;
                }
            },
            // wait_for 先检查当前值，订阅晚于终止信号也不会漏掉。
            // 用 async 块即时丢弃返回的 Ref（内含 RwLock 读守卫），
            // 避免其非 Send 类型泄入 select 的聚合 future。
            _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => {
                debug!(%role, "对局已终止，处理器退出");
                break;
            }
        }
    }
}
