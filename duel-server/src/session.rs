//! 对局会话与协调器

use tokio::sync::{watch, Mutex};

use protocol::{GameEngine, GameError, GameState, Role, ServerMessage};

use crate::peer::PeerHandle;

/// 一局对战：两个对端加一个权威引擎
///
/// 在第二位对端完成先手分配后创建；两个连接处理器都
/// 退出后随协调器一起销毁。
pub struct MatchSession {
    engine: Box<dyn GameEngine>,
    /// 下标 0 为先手，1 为后手
    peers: [PeerHandle; 2],
}

impl MatchSession {
    pub fn new(engine: Box<dyn GameEngine>, first: PeerHandle, second: PeerHandle) -> Self {
        Self {
            engine,
            peers: [first, second],
        }
    }

    /// 把快照推送给双方
    fn broadcast(&self, state: GameState) {
        let msg = ServerMessage::Update { state };
        self.peers[0].send(msg.clone());
        self.peers[1].send(msg);
    }
}

/// 走子提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// 已应用，携带新快照
    Applied(GameState),
    /// 被拒绝；不广播，也不回发错误消息
    Rejected(GameError),
}

/// 对局协调器
///
/// 唯一的状态写入口。互斥锁覆盖校验、应用、终局判定与广播
/// 入队的全过程：两个连接处理器的并发提交严格串行，双方收到
/// 的每次推送都来自同一次原子状态转移。
pub struct Coordinator {
    session: Mutex<MatchSession>,
    shutdown: watch::Sender<bool>,
}

impl Coordinator {
    pub fn new(session: MatchSession) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            session: Mutex::new(session),
            shutdown,
        }
    }

    /// 订阅对局终止信号
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// 广播当前快照（开局时推送初始状态用）
    pub async fn broadcast_state(&self) {
        let session = self.session.lock().await;
        let state = session.engine.state();
        session.broadcast(state);
    }

    /// 提交一步走子
    ///
    /// 拒绝的提交不产生任何可见效果；接受的提交在持锁状态下
    /// 完成应用与广播入队。
    pub async fn submit_move(&self, role: Role, token: &str) -> MoveOutcome {
        let mut session = self.session.lock().await;

        let state = session.engine.state();
        if state.game_over {
            return MoveOutcome::Rejected(GameError::GameOver);
        }
        if state.turn != role {
            return MoveOutcome::Rejected(GameError::NotYourTurn);
        }
        if !session.engine.is_valid_move(token) {
            return MoveOutcome::Rejected(GameError::InvalidMove {
                token: token.to_string(),
            });
        }

        session.engine.apply_move(token, role);
        let new_state = session.engine.state();
        session.broadcast(new_state.clone());
        MoveOutcome::Applied(new_state)
    }

    /// 终止对局
    ///
    /// 任一处理器退出时调用，使幸存方的处理器随之退出，
    /// 而不是永久停等。
    pub fn end_match(&self) {
        let _ = self.shutdown.send(true);
    }
}
