//! 消息类型定义
//!
//! 每条消息编码为一行 JSON 记录，带 `type` 判别字段。

use serde::{Deserialize, Serialize};

use crate::rps::RpsChoice;
use crate::state::{GameState, Role};

/// 单轮猜拳结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Lose,
    Draw,
}

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// 猜拳出招
    Rps {
        #[serde(rename = "move")]
        choice: RpsChoice,
    },
    /// 提交走子，data 为玩法自定义的走子串
    Move { data: String },
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// 请求双方出招
    RpsReq,
    /// 单轮猜拳结果，决出胜负时携带分配的角色
    RpsResult {
        res: RoundResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
    },
    /// 权威状态推送
    Update { state: GameState },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Grid;

    #[test]
    fn test_client_wire_format() {
        let msg = ClientMessage::Rps {
            choice: RpsChoice::Rock,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"rps","move":"rock"}"#
        );

        let msg = ClientMessage::Move {
            data: "5".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"move","data":"5"}"#
        );
    }

    #[test]
    fn test_server_wire_format() {
        assert_eq!(
            serde_json::to_string(&ServerMessage::RpsReq).unwrap(),
            r#"{"type":"rps_req"}"#
        );

        // 平局不携带角色字段
        let draw = ServerMessage::RpsResult {
            res: RoundResult::Draw,
            role: None,
        };
        assert_eq!(
            serde_json::to_string(&draw).unwrap(),
            r#"{"type":"rps_result","res":"draw"}"#
        );

        let win = ServerMessage::RpsResult {
            res: RoundResult::Win,
            role: Some(Role::First),
        };
        assert_eq!(
            serde_json::to_string(&win).unwrap(),
            r#"{"type":"rps_result","res":"win","role":"first"}"#
        );
    }

    #[test]
    fn test_update_round_trip() {
        let state = GameState {
            board: Grid::new(3, 3),
            turn: Role::First,
            winner: None,
            game_over: false,
            move_count: 0,
        };
        let msg = ServerMessage::Update {
            state: state.clone(),
        };

        let line = serde_json::to_string(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_non_member_symbol_rejected() {
        let decoded = serde_json::from_str::<ClientMessage>(r#"{"type":"rps","move":"lizard"}"#);
        assert!(decoded.is_err());
    }
}
