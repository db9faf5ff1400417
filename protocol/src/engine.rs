//! 游戏引擎能力契约
//!
//! 协议层通过该契约驱动具体玩法，不了解其内部规则。

use serde::{Deserialize, Serialize};

use crate::games::{ConnectFour, TicTacToe};
use crate::state::{GameState, Grid, Role};

/// 具体玩法的能力契约
///
/// 服务端持有唯一的权威实例；客户端持有镜像实例，仅用于
/// 发送前的本地预校验与提示文案，权威校验始终在服务端。
pub trait GameEngine: Send {
    /// 生成当前状态快照（纯读取，不产生副作用）
    fn state(&self) -> GameState;

    /// 快速合法性判断，双方均可调用
    fn is_valid_move(&self, input: &str) -> bool;

    /// 面向用户的输入校验，返回可读的拒绝原因
    ///
    /// 仅作发送前的本地提示，服务端仍以 is_valid_move 为准。
    fn validate_client_input(&self, input: &str) -> std::result::Result<(), String>;

    /// 应用一步走子：落子、记录、判定终局，未终局则交换走子方
    ///
    /// 由调用方先用 is_valid_move 把关。
    fn apply_move(&mut self, input: &str, role: Role);

    /// 用服务端推送的快照覆盖本地镜像状态
    fn restore(&mut self, state: &GameState);

    /// 本方回合的输入提示文案
    fn input_prompt(&self) -> String;

    /// 玩法名称（渲染标题用）
    fn name(&self) -> &'static str;
}

/// 各玩法共享的基础状态
///
/// 终局判定由各玩法自行实现，其余状态转移都经由这里。
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub board: Grid,
    pub turn: Role,
    pub winner: Option<Role>,
    pub game_over: bool,
    /// 走子日志，仅权威端累积
    pub moves: Vec<String>,
    move_count: u32,
}

impl EngineCore {
    /// 创建初始状态，先手先走
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            board: Grid::new(rows, cols),
            turn: Role::First,
            winner: None,
            game_over: false,
            moves: Vec::new(),
            move_count: 0,
        }
    }

    /// 生成快照
    pub fn snapshot(&self) -> GameState {
        GameState {
            board: self.board.clone(),
            turn: self.turn,
            winner: self.winner,
            game_over: self.game_over,
            move_count: self.move_count,
        }
    }

    /// 记录一步已接受的走子
    pub fn record(&mut self, role: Role, input: &str) {
        self.moves.push(format!("{role}->{input}"));
        self.move_count += 1;
    }

    /// 进入终局，胜方为 None 表示和棋
    ///
    /// 终局后胜方不再改变。
    pub fn finish(&mut self, winner: Option<Role>) {
        self.winner = winner;
        self.game_over = true;
    }

    /// 未终局时交换走子方
    pub fn flip_turn(&mut self) {
        if !self.game_over {
            self.turn = self.turn.opponent();
        }
    }

    /// 用快照覆盖本地状态（客户端镜像用）
    pub fn restore(&mut self, state: &GameState) {
        self.board = state.board.clone();
        self.turn = state.turn;
        self.winner = state.winner;
        self.game_over = state.game_over;
        self.move_count = state.move_count;
    }
}

/// 可选玩法
///
/// 启动时通过配置显式选择；服务端与客户端须配置一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
}

impl GameKind {
    /// 创建该玩法的引擎实例
    pub fn create(self) -> Box<dyn GameEngine> {
        match self {
            GameKind::TicTacToe => Box::new(TicTacToe::new()),
            GameKind::ConnectFour => Box::new(ConnectFour::new()),
        }
    }

    /// 从配置串解析
    pub fn parse(s: &str) -> Option<GameKind> {
        match s.to_ascii_lowercase().as_str() {
            "tictactoe" | "ttt" => Some(GameKind::TicTacToe),
            "connectfour" | "connect4" | "c4" => Some(GameKind::ConnectFour),
            _ => None,
        }
    }
}
