//! 双人对战共享协议库
//!
//! 包含:
//! - 角色、棋盘与对局状态快照
//! - 猜拳先手分配逻辑
//! - 游戏引擎能力契约与具体玩法实现
//! - 消息类型定义 (ClientMessage, ServerMessage)
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 行分隔 JSON 帧编解码

mod constants;
mod engine;
mod error;
mod games;
mod message;
mod rps;
mod state;
mod transport;

pub use constants::*;
pub use engine::{EngineCore, GameEngine, GameKind};
pub use error::{GameError, ProtocolError, Result};
pub use games::{ConnectFour, TicTacToe};
pub use message::{ClientMessage, RoundResult, ServerMessage};
pub use rps::RpsChoice;
pub use state::{GameState, Grid, Role};
pub use transport::{
    Connection, Connector, LineReader, LineWriter, Listener,
    TcpConnection, TcpConnector, TcpListener,
};
