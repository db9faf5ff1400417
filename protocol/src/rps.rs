//! 猜拳先手分配逻辑

use serde::{Deserialize, Serialize};

/// 猜拳出招
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    /// 石头胜剪刀，剪刀胜布，布胜石头
    pub fn beats(self, other: RpsChoice) -> bool {
        matches!(
            (self, other),
            (RpsChoice::Rock, RpsChoice::Scissors)
                | (RpsChoice::Scissors, RpsChoice::Paper)
                | (RpsChoice::Paper, RpsChoice::Rock)
        )
    }

    /// 解析用户输入，接受首字母或完整单词
    pub fn from_input(input: &str) -> Option<RpsChoice> {
        match input.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Some(RpsChoice::Rock),
            "p" | "paper" => Some(RpsChoice::Paper),
            "s" | "scissors" => Some(RpsChoice::Scissors),
            _ => None,
        }
    }
}
