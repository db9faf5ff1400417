//! 具体玩法实现
//!
//! 每种玩法独立实现 GameEngine 契约，协议核心不依赖其内部规则。

mod connect_four;
mod tictactoe;

pub use connect_four::ConnectFour;
pub use tictactoe::TicTacToe;
