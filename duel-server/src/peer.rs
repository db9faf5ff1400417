//! 对端连接管理

use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use protocol::{Connection, LineReader, ServerMessage, TcpConnection};

/// 对端的出站通道
///
/// 发送即入队，由专属写任务异步投递；广播方在临界区内
/// 不等待网络 IO。队列关闭（写任务已退出）时静默丢弃，
/// 该对端视为放弃后续参与。
#[derive(Clone)]
pub struct PeerHandle {
    outbound: mpsc::UnboundedSender<ServerMessage>,
    /// 远端地址（日志用）
    pub addr: Option<String>,
}

impl PeerHandle {
    pub fn new(outbound: mpsc::UnboundedSender<ServerMessage>, addr: Option<String>) -> Self {
        Self { outbound, addr }
    }

    /// 入队一条出站消息，尽力而为
    pub fn send(&self, msg: ServerMessage) {
        let _ = self.outbound.send(msg);
    }
}

/// 一个已接入的对端：独占读端 + 出站队列 + 写任务
pub struct PeerConn {
    pub reader: LineReader<OwnedReadHalf>,
    pub handle: PeerHandle,
    pub writer_task: JoinHandle<()>,
}

impl PeerConn {
    /// 拆分连接并启动写任务
    pub fn new(conn: TcpConnection) -> Self {
        let addr = conn.peer_addr();
        let (reader, mut writer) = conn.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

        let writer_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = writer.write_frame(&msg).await {
                    debug!("对端写入失败，停止投递: {e}");
                    break;
                }
            }
        });

        Self {
            reader,
            handle: PeerHandle::new(tx, addr),
            writer_task,
        }
    }
}
