//! 终端渲染
//!
//! 纯展示层：棋盘、状态行、猜拳界面与结算画面，不承载协议逻辑。

use std::io;

use console::Style;
use crossterm::{cursor, execute, terminal};

use protocol::{GameKind, GameState, Role, RoundResult};

fn mark_or_space(cell: Option<Role>) -> char {
    cell.map(Role::mark).unwrap_or(' ')
}

/// 终端渲染器
#[derive(Clone)]
pub struct Renderer {
    kind: GameKind,
    title: &'static str,
}

impl Renderer {
    pub fn new(kind: GameKind) -> Self {
        let title = kind.create().name();
        Self { kind, title }
    }

    /// 清屏并把光标移回左上角
    fn clear(&self) {
        let _ = execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        );
    }

    /// 渲染一次完整画面
    pub fn draw(&self, state: &GameState, my_role: Role) {
        self.clear();
        println!("=== {} ===", self.title);
        println!("You: {} | Turn: {}", my_role.mark(), state.turn.mark());
        println!();

        match self.kind {
            GameKind::TicTacToe => self.draw_cells(state),
            GameKind::ConnectFour => self.draw_columns(state),
        }

        if !state.game_over {
            println!();
            if state.turn == my_role {
                println!("[YOUR TURN]");
            } else {
                println!("[WAITING] Waiting for opponent...");
            }
        }
    }

    /// 九宫格画法：格线分隔
    fn draw_cells(&self, state: &GameState) {
        let board = &state.board;
        for row in 0..board.rows {
            let cells: Vec<String> = (0..board.cols)
                .map(|col| format!(" {} ", mark_or_space(board.get(row, col))))
                .collect();
            println!("{}", cells.join("|"));
            if row + 1 < board.rows {
                println!("{}", vec!["---"; board.cols].join("+"));
            }
        }
    }

    /// 纵列画法：棋子落入列，底部标列号
    fn draw_columns(&self, state: &GameState) {
        let board = &state.board;
        for row in 0..board.rows {
            let mut line = String::from("|");
            for col in 0..board.cols {
                line.push(mark_or_space(board.get(row, col)));
                line.push('|');
            }
            println!("{line}");
        }
        println!("{}", "-".repeat(board.cols * 2 + 1));

        let nums: Vec<String> = (1..=board.cols).map(|c| c.to_string()).collect();
        println!(" {}", nums.join(" "));
    }

    /// 本地输入被拒的提示
    pub fn warn_invalid(&self, reason: &str) {
        println!("{}", Style::new().red().apply_to(format!("[Warning] {reason}")));
    }

    /// 发送后到下一次推送之间的过渡标记
    pub fn waiting_for_server(&self) {
        println!("{}", Style::new().dim().apply_to("Move sent, waiting for server..."));
    }

    pub fn rps_screen(&self) {
        self.clear();
        println!("=== Rock Paper Scissors ===");
    }

    pub fn rps_waiting(&self) {
        println!("Waiting for opponent...");
    }

    pub fn rps_draw(&self) {
        println!(
            "{}",
            Style::new().yellow().apply_to("It's a Draw! Please input again.")
        );
    }

    pub fn rps_outcome(&self, res: RoundResult, role: Role) {
        let verdict = match res {
            RoundResult::Win => "win",
            RoundResult::Lose => "lose",
            RoundResult::Draw => "draw",
        };
        println!("You {verdict}! You will play as {}", role.mark());
    }

    /// 结算画面：胜负、配色与总步数
    pub fn checkout(&self, state: &GameState, my_role: Role) {
        self.clear();
        println!("========================================");
        println!("           GAME OVER - CHECKOUT         ");
        println!("========================================");

        match state.winner {
            Some(winner) => println!("Winner: {}", winner.mark()),
            None => println!("Winner: Draw"),
        }

        let result_line = match state.winner {
            Some(winner) if winner == my_role => Style::new()
                .green()
                .apply_to("Result: YOU WIN! Congratulations!"),
            Some(_) => Style::new()
                .red()
                .apply_to("Result: YOU LOSE. Better luck next time."),
            None => Style::new().yellow().apply_to("Result: Draw Game."),
        };
        println!("{result_line}");

        println!("----------------------------------------");
        println!("Total Moves: {}", state.move_count);
        println!("========================================");
    }

    /// 对端或服务端消失时的收尾
    pub fn connection_lost(&self) {
        println!();
        println!("{}", Style::new().red().apply_to("Connection lost. Match ended."));
    }
}
