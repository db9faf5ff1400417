//! 键盘输入

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// 标准输入行读取器
///
/// 持有进程 stdin 的缓冲读取器；提示符直接写到 stdout。
pub struct InputReader {
    lines: Lines<BufReader<Stdin>>,
}

impl InputReader {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// 打印提示符并读取一行，去除首尾空白
    ///
    /// stdin 关闭时返回 None。
    pub async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new()
    }
}
