//! 角色与对局状态快照

use serde::{Deserialize, Serialize};

/// 参与者角色
///
/// 每局开始前通过猜拳分配一次，此后不变；First 执先手。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    First,
    Second,
}

impl Role {
    /// 对方角色
    pub fn opponent(self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// 棋盘落子符号
    pub fn mark(self) -> char {
        match self {
            Role::First => 'X',
            Role::Second => 'O',
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::First => write!(f, "first"),
            Role::Second => write!(f, "second"),
        }
    }
}

/// 通用网格棋盘
///
/// 两种玩法都是网格落子游戏，统一用一种棋盘表示，
/// 客户端渲染无需了解具体玩法的内部结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    /// 按行优先存储的格子，空格为 None
    cells: Vec<Option<Role>>,
}

impl Grid {
    /// 创建空棋盘
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Role> {
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, role: Role) {
        self.cells[row * self.cols + col] = Some(role);
    }

    /// 检查坐标是否在棋盘内
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }
}

/// 对局状态快照
///
/// 由引擎按需生成的不可变自描述结构。协议层只读转发；
/// 客户端将其作为只读缓存，仅通过服务端推送更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    pub board: Grid,
    /// 当前走子方
    pub turn: Role,
    /// 胜方（和棋或未结束为 None）
    pub winner: Option<Role>,
    /// 对局是否结束
    pub game_over: bool,
    /// 已接受的走子数，单调递增
    pub move_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Role::First.opponent(), Role::Second);
        assert_eq!(Role::Second.opponent(), Role::First);
    }

    #[test]
    fn test_grid_cells() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.get(1, 1).is_none());
        assert!(!grid.is_full());

        grid.set(1, 1, Role::First);
        assert_eq!(grid.get(1, 1), Some(Role::First));
        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 3));
    }
}
