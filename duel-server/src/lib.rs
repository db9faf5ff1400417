//! 双人对战服务端
//!
//! 包含:
//! - 对端连接与出站队列
//! - 猜拳先手分配
//! - 对局协调器（唯一的权威状态写入口）
//! - 连接处理器与状态广播

pub mod assign;
pub mod handler;
pub mod peer;
pub mod server;
pub mod session;

pub use peer::{PeerConn, PeerHandle};
pub use server::{run, serve_match, ServerConfig};
pub use session::{Coordinator, MatchSession, MoveOutcome};
