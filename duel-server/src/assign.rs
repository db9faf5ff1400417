//! 先手分配子协议
//!
//! 开局前双方各出一手猜拳，胜者执先；平局重发请求，不限次数。
//! 此阶段结束前不存在任何对局状态，也不接受任何走子。

use tokio::net::tcp::OwnedReadHalf;
use tokio::time::timeout;
use tracing::{info, warn};

use protocol::{
    ClientMessage, LineReader, ProtocolError, Result, Role, RoundResult, RpsChoice,
    ServerMessage, ASSIGN_TIMEOUT,
};

use crate::peer::PeerConn;

/// 运行完整的先手分配阶段，返回获得先手的对端下标
///
/// 平局重试次数不设上限，但整个阶段受 ASSIGN_TIMEOUT 约束。
pub async fn assign_roles(peers: &mut [PeerConn; 2]) -> Result<usize> {
    timeout(ASSIGN_TIMEOUT, run_rounds(peers))
        .await
        .map_err(|_| ProtocolError::ConnectionTimeout)?
}

async fn run_rounds(peers: &mut [PeerConn; 2]) -> Result<usize> {
    loop {
        // 同时向双方发出出招请求
        for peer in peers.iter() {
            peer.handle.send(ServerMessage::RpsReq);
        }

        let [a, b] = peers;
        let (choice_a, choice_b) =
            tokio::try_join!(read_choice(&mut a.reader), read_choice(&mut b.reader))?;

        if choice_a == choice_b {
            info!(choice = ?choice_a, "猜拳平局，重新出招");
            for peer in peers.iter() {
                peer.handle.send(ServerMessage::RpsResult {
                    res: RoundResult::Draw,
                    role: None,
                });
            }
            continue;
        }

        let winner = if choice_a.beats(choice_b) { 0 } else { 1 };
        peers[winner].handle.send(ServerMessage::RpsResult {
            res: RoundResult::Win,
            role: Some(Role::First),
        });
        peers[1 - winner].handle.send(ServerMessage::RpsResult {
            res: RoundResult::Lose,
            role: Some(Role::Second),
        });
        info!(winner, "先手分配完成");
        return Ok(winner);
    }
}

/// 读取一条合法出招
///
/// 无法解码的行与非出招消息属协议违规：记录后忽略，继续等待；
/// 传输错误直接上抛。
async fn read_choice(reader: &mut LineReader<OwnedReadHalf>) -> Result<RpsChoice> {
    loop {
        match reader.read_frame::<ClientMessage>().await {
            Ok(ClientMessage::Rps { choice }) => return Ok(choice),
            Ok(other) => warn!(?other, "分配阶段收到异常消息，忽略"),
            Err(ProtocolError::Json(e)) => warn!(error = %e, "无法解码的消息行，忽略"),
            Err(e) => return Err(e),
        }
    }
}
