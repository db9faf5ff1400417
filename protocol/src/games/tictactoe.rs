//! 圈圈叉叉
//!
//! 3×3 棋盘，格子按 1-9 编号，先连成一线者胜。

use crate::engine::{EngineCore, GameEngine};
use crate::state::{GameState, Role};

/// 棋盘边长
const SIZE: usize = 3;

/// 八条获胜连线（行、列、对角）
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub struct TicTacToe {
    core: EngineCore,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            core: EngineCore::new(SIZE, SIZE),
        }
    }

    /// 解析 1-9 输入为格子下标
    fn parse_cell(input: &str) -> Option<usize> {
        let n: usize = input.trim().parse().ok()?;
        (1..=SIZE * SIZE).contains(&n).then(|| n - 1)
    }

    fn cell(&self, idx: usize) -> Option<Role> {
        self.core.board.get(idx / SIZE, idx % SIZE)
    }

    /// 扫描获胜连线与满盘和棋
    fn check_winner(&mut self) {
        for [x, y, z] in WIN_LINES {
            if let Some(role) = self.cell(x) {
                if self.cell(y) == Some(role) && self.cell(z) == Some(role) {
                    self.core.finish(Some(role));
                    return;
                }
            }
        }
        if self.core.board.is_full() {
            self.core.finish(None);
        }
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine for TicTacToe {
    fn state(&self) -> GameState {
        self.core.snapshot()
    }

    fn is_valid_move(&self, input: &str) -> bool {
        match Self::parse_cell(input) {
            Some(idx) => self.cell(idx).is_none(),
            None => false,
        }
    }

    fn validate_client_input(&self, input: &str) -> Result<(), String> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err("Input must be a number.".to_string());
        }
        let idx = match Self::parse_cell(trimmed) {
            Some(idx) => idx,
            None => return Err("Input must be 1-9.".to_string()),
        };
        if self.cell(idx).is_some() {
            return Err("That cell is already taken!".to_string());
        }
        Ok(())
    }

    fn apply_move(&mut self, input: &str, role: Role) {
        let Some(idx) = Self::parse_cell(input) else {
            return;
        };
        if self.cell(idx).is_some() {
            return;
        }
        self.core.board.set(idx / SIZE, idx % SIZE, role);
        self.core.record(role, input.trim());
        self.check_winner();
        self.core.flip_turn();
    }

    fn restore(&mut self, state: &GameState) {
        self.core.restore(state);
    }

    fn input_prompt(&self) -> String {
        format!("Input 1-9 to place {}: ", self.core.turn.mark())
    }

    fn name(&self) -> &'static str {
        "Tic-Tac-Toe (1-9)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut TicTacToe, moves: &[(&str, Role)]) {
        for &(input, role) in moves {
            assert!(game.is_valid_move(input), "move {input} should be valid");
            game.apply_move(input, role);
        }
    }

    #[test]
    fn test_row_win_with_empty_cells() {
        let mut game = TicTacToe::new();
        play(
            &mut game,
            &[
                ("1", Role::First),
                ("4", Role::Second),
                ("2", Role::First),
                ("5", Role::Second),
                ("3", Role::First),
            ],
        );

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Role::First));
        assert_eq!(state.move_count, 5);
        // 其余格子仍为空
        assert!(state.board.get(2, 0).is_none());
    }

    #[test]
    fn test_diagonal_win() {
        let mut game = TicTacToe::new();
        play(
            &mut game,
            &[
                ("3", Role::First),
                ("1", Role::Second),
                ("5", Role::First),
                ("2", Role::Second),
                ("7", Role::First),
            ],
        );

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Role::First));
    }

    #[test]
    fn test_full_board_draw() {
        // X X O / O O X / X X O：九格摆满且无任何连线
        let mut game = TicTacToe::new();
        play(
            &mut game,
            &[
                ("1", Role::First),
                ("3", Role::Second),
                ("2", Role::First),
                ("4", Role::Second),
                ("6", Role::First),
                ("5", Role::Second),
                ("7", Role::First),
                ("9", Role::Second),
                ("8", Role::First),
            ],
        );

        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, None);
        assert_eq!(state.move_count, 9);
    }

    #[test]
    fn test_turn_alternates_until_terminal() {
        let mut game = TicTacToe::new();
        assert_eq!(game.state().turn, Role::First);

        game.apply_move("5", Role::First);
        assert_eq!(game.state().turn, Role::Second);
        game.apply_move("1", Role::Second);
        assert_eq!(game.state().turn, Role::First);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut game = TicTacToe::new();
        assert!(!game.is_valid_move("0"));
        assert!(!game.is_valid_move("10"));
        assert!(!game.is_valid_move("abc"));

        game.apply_move("5", Role::First);
        assert!(!game.is_valid_move("5"));

        assert_eq!(
            game.validate_client_input("x"),
            Err("Input must be a number.".to_string())
        );
        assert_eq!(
            game.validate_client_input("12"),
            Err("Input must be 1-9.".to_string())
        );
        assert_eq!(
            game.validate_client_input("5"),
            Err("That cell is already taken!".to_string())
        );
        assert_eq!(game.validate_client_input(" 6 "), Ok(()));
    }

    #[test]
    fn test_state_idempotent() {
        let mut game = TicTacToe::new();
        game.apply_move("5", Role::First);
        assert_eq!(game.state(), game.state());
    }
}
