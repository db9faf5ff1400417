//! 协议常量定义

use std::time::Duration;

/// 单行消息最大字节数
pub const MAX_LINE_LEN: usize = 65536;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 先手分配阶段总超时（秒）- 平局重试不限次数，但受此时限约束
pub const ASSIGN_TIMEOUT_SECS: u64 = 300;

/// 默认端口
pub const DEFAULT_PORT: u16 = 9527;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);

/// 先手分配超时 Duration
pub const ASSIGN_TIMEOUT: Duration = Duration::from_secs(ASSIGN_TIMEOUT_SECS);
