//! 四子棋
//!
//! 6×7 棋盘，棋子落入所选列的最低空位，先连成四子者胜。

use crate::engine::{EngineCore, GameEngine};
use crate::state::{GameState, Role};

/// 行数
const ROWS: usize = 6;
/// 列数
const COLS: usize = 7;
/// 连线目标
const CONNECT_N: usize = 4;

/// 连线扫描方向：横、竖、两条斜线
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub struct ConnectFour {
    core: EngineCore,
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            core: EngineCore::new(ROWS, COLS),
        }
    }

    /// 解析 1-7 输入为列下标
    fn parse_col(input: &str) -> Option<usize> {
        let n: usize = input.trim().parse().ok()?;
        (1..=COLS).contains(&n).then(|| n - 1)
    }

    /// 该列最低空行（行 0 为顶部）
    fn drop_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&r| self.core.board.get(r, col).is_none())
    }

    /// 从刚落下的棋子向四个方向双向延伸计数
    fn check_winner_from(&mut self, row: usize, col: usize, role: Role) {
        for (dr, dc) in DIRECTIONS {
            let mut count = 1;
            for sign in [1i32, -1] {
                for k in 1..CONNECT_N as i32 {
                    let nr = row as i32 + dr * k * sign;
                    let nc = col as i32 + dc * k * sign;
                    if self.core.board.in_bounds(nr, nc)
                        && self.core.board.get(nr as usize, nc as usize) == Some(role)
                    {
                        count += 1;
                    } else {
                        break;
                    }
                }
            }
            if count >= CONNECT_N {
                self.core.finish(Some(role));
                return;
            }
        }
        if self.core.board.is_full() {
            self.core.finish(None);
        }
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine for ConnectFour {
    fn state(&self) -> GameState {
        self.core.snapshot()
    }

    fn is_valid_move(&self, input: &str) -> bool {
        match Self::parse_col(input) {
            Some(col) => self.core.board.get(0, col).is_none(),
            None => false,
        }
    }

    fn validate_client_input(&self, input: &str) -> Result<(), String> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err("Input must be a number.".to_string());
        }
        let col = match Self::parse_col(trimmed) {
            Some(col) => col,
            None => return Err(format!("Input must be 1-{COLS}.")),
        };
        if self.core.board.get(0, col).is_some() {
            return Err("Column is full! Please choose another one.".to_string());
        }
        Ok(())
    }

    fn apply_move(&mut self, input: &str, role: Role) {
        let Some(col) = Self::parse_col(input) else {
            return;
        };
        let Some(row) = self.drop_row(col) else {
            return;
        };
        self.core.board.set(row, col, role);
        self.core.record(role, &format!("C{}", col + 1));
        self.check_winner_from(row, col, role);
        self.core.flip_turn();
    }

    fn restore(&mut self, state: &GameState) {
        self.core.restore(state);
    }

    fn input_prompt(&self) -> String {
        format!("Input 1-{COLS} to drop token: ")
    }

    fn name(&self) -> &'static str {
        "Connect Four (Match 4)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_stack_upwards() {
        let mut game = ConnectFour::new();
        game.apply_move("3", Role::First);
        game.apply_move("3", Role::Second);

        let state = game.state();
        assert_eq!(state.board.get(ROWS - 1, 2), Some(Role::First));
        assert_eq!(state.board.get(ROWS - 2, 2), Some(Role::Second));
        assert_eq!(state.move_count, 2);
    }

    #[test]
    fn test_vertical_win() {
        let mut game = ConnectFour::new();
        for _ in 0..3 {
            game.apply_move("3", Role::First);
            game.apply_move("4", Role::Second);
        }
        game.apply_move("3", Role::First);

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Role::First));
        assert_eq!(state.move_count, 7);
    }

    #[test]
    fn test_horizontal_win_from_middle_cell() {
        // 最后一子落在连线中段，向两侧延伸才数得满四连
        let mut game = ConnectFour::new();
        game.apply_move("1", Role::First);
        game.apply_move("7", Role::Second);
        game.apply_move("2", Role::First);
        game.apply_move("7", Role::Second);
        game.apply_move("4", Role::First);
        game.apply_move("7", Role::Second);
        game.apply_move("3", Role::First);

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Role::First));
    }

    #[test]
    fn test_diagonal_win_scans_negative_direction() {
        // 预置一条右下向左上的三连，最后一子落在斜线最高端
        let mut game = ConnectFour::new();
        let b = &mut game.core.board;
        b.set(5, 2, Role::First);
        b.set(5, 3, Role::Second);
        b.set(4, 3, Role::First);
        b.set(5, 4, Role::Second);
        b.set(4, 4, Role::Second);
        b.set(3, 4, Role::First);
        b.set(5, 5, Role::Second);
        b.set(4, 5, Role::First);
        b.set(3, 5, Role::Second);
        game.core.turn = Role::First;

        game.apply_move("6", Role::First);

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Role::First));
        // 落点为 (2, 5)，连线向左下延伸
        assert_eq!(state.board.get(2, 5), Some(Role::First));
    }

    #[test]
    fn test_full_board_draw() {
        // (col + 2*row) % 4 < 2 的填充模式任何方向最多两连
        let mut game = ConnectFour::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                if row == 0 && col == 0 {
                    continue;
                }
                let role = if (col + 2 * row) % 4 < 2 {
                    Role::First
                } else {
                    Role::Second
                };
                game.core.board.set(row, col, role);
            }
        }
        game.core.turn = Role::First;

        // 剩下的顶格 (0, 0) 按同一模式应为 First
        assert!(game.is_valid_move("1"));
        game.apply_move("1", Role::First);

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_full_column_rejected() {
        let mut game = ConnectFour::new();
        for i in 0..ROWS {
            let role = if i % 2 == 0 { Role::First } else { Role::Second };
            game.apply_move("5", role);
        }
        assert!(!game.is_valid_move("5"));
        assert_eq!(
            game.validate_client_input("5"),
            Err("Column is full! Please choose another one.".to_string())
        );
        assert!(game.is_valid_move("4"));
    }

    #[test]
    fn test_invalid_inputs() {
        let game = ConnectFour::new();
        assert!(!game.is_valid_move("0"));
        assert!(!game.is_valid_move("8"));
        assert!(!game.is_valid_move("first"));
        assert_eq!(
            game.validate_client_input("9"),
            Err("Input must be 1-7.".to_string())
        );
        assert_eq!(game.validate_client_input("7"), Ok(()));
    }
}
