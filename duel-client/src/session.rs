//! 会话状态机
//!
//! 连接 → 先手分配 → (等待对方 / 本地回合) 循环 → 结算。
//! 对局阶段拆成两个任务：后台监听独占读端，接收权威推送、
//! 重绘并经 watch 通道把快照交给前台；前台独占写端与键盘，
//! 只在本地回合征集输入。快照单向流动，前台从不回写。

use std::time::Duration;

use anyhow::Result;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, warn};

use protocol::{
    ClientMessage, Connector, GameEngine, GameState, LineReader, LineWriter, ProtocolError,
    Role, RoundResult, RpsChoice, ServerMessage, TcpConnector,
};

use crate::input::InputReader;
use crate::render::Renderer;
use crate::ClientConfig;

/// 运行完整会话
pub async fn run(config: ClientConfig) -> Result<()> {
    // 连接失败静默退出，不重试
    let conn = match TcpConnector.connect(&config.server_addr).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(addr = %config.server_addr, "连接服务端失败: {e}");
            return Ok(());
        }
    };

    let (mut reader, mut writer) = conn.split();
    let mut input = InputReader::new();
    let renderer = Renderer::new(config.game);

    let my_role = match assign_phase(&mut reader, &mut writer, &mut input, &renderer).await? {
        Some(role) => role,
        // 分配阶段对端或服务端消失，无局可打
        None => return Ok(()),
    };

    // 对局阶段：监听任务独享读端，快照经 watch 通道单向交接
    let mut engine = config.game.create();
    let (state_tx, mut state_rx) = watch::channel(engine.state());
    let listener = tokio::spawn(listen_updates(
        reader,
        state_tx,
        renderer.clone(),
        my_role,
    ));

    let final_state = match play_loop(
        &mut writer,
        &mut input,
        engine.as_mut(),
        &renderer,
        my_role,
        &mut state_rx,
    )
    .await
    {
        Ok(state) => state,
        Err(e) => {
            debug!("对局阶段传输中断: {e}");
            None
        }
    };
    // 终局或通道关闭时监听任务已自行退出；stdin 提前关闭时仍在
    // 阻塞读推送，主动取消
    listener.abort();
    let _ = listener.await;

    match final_state {
        Some(state) => {
            // 终局棋盘停留片刻再进结算
            sleep(Duration::from_millis(500)).await;
            renderer.checkout(&state, my_role);
        }
        None => renderer.connection_lost(),
    }

    Ok(())
}

/// ROLE_PENDING: 猜拳决定先手，平局自动重来
///
/// 返回 None 表示连接在分配阶段终止（静默收场）。
async fn assign_phase(
    reader: &mut LineReader<OwnedReadHalf>,
    writer: &mut LineWriter<OwnedWriteHalf>,
    input: &mut InputReader,
    renderer: &Renderer,
) -> Result<Option<Role>> {
    loop {
        let msg = match reader.read_frame::<ServerMessage>().await {
            Ok(msg) => msg,
            Err(ProtocolError::Json(e)) => {
                warn!(error = %e, "无法解码的消息行，忽略");
                continue;
            }
            Err(e) => {
                debug!("分配阶段连接终止: {e}");
                return Ok(None);
            }
        };

        match msg {
            ServerMessage::RpsReq => {
                renderer.rps_screen();
                let choice = loop {
                    let line = match input
                        .read_line("Enter (R)ock, (P)aper, (S)cissors: ")
                        .await?
                    {
                        Some(line) => line,
                        None => return Ok(None),
                    };
                    match RpsChoice::from_input(&line) {
                        Some(choice) => break choice,
                        None => renderer.warn_invalid("Please enter R, P or S."),
                    }
                };
                writer.send(&ClientMessage::Rps { choice }).await?;
                renderer.rps_waiting();
            }
            ServerMessage::RpsResult {
                res: RoundResult::Draw,
                ..
            } => {
                renderer.rps_draw();
                sleep(Duration::from_secs(2)).await;
            }
            ServerMessage::RpsResult {
                res,
                role: Some(role),
            } => {
                renderer.rps_outcome(res, role);
                sleep(Duration::from_secs(2)).await;
                return Ok(Some(role));
            }
            other => {
                warn!(?other, "分配阶段收到异常消息，忽略");
            }
        }
    }
}

/// 后台监听：接收权威推送，重绘棋盘，经 watch 通道交给前台
///
/// 收到终局快照或传输错误即退出；通道随任务结束关闭。
async fn listen_updates(
    mut reader: LineReader<OwnedReadHalf>,
    state_tx: watch::Sender<GameState>,
    renderer: Renderer,
    my_role: Role,
) {
    loop {
        match reader.read_frame::<ServerMessage>().await {
            Ok(ServerMessage::Update { state }) => {
                let game_over = state.game_over;
                renderer.draw(&state, my_role);
                if state_tx.send(state).is_err() {
                    break;
                }
                if game_over {
                    break;
                }
            }
            Ok(other) => warn!(?other, "对局阶段收到异常消息，忽略"),
            Err(ProtocolError::Json(e)) => warn!(error = %e, "无法解码的消息行，忽略"),
            Err(e) => {
                debug!("推送通道关闭: {e}");
                break;
            }
        }
    }
}

/// 前台回合循环
///
/// AWAIT_TURN 只等推送；LOCAL_TURN 征集输入，本地预校验通过后
/// 发送并等待下一次推送。返回终局快照；推送通道在终局前关闭时
/// 返回 None。
async fn play_loop(
    writer: &mut LineWriter<OwnedWriteHalf>,
    input: &mut InputReader,
    engine: &mut dyn GameEngine,
    renderer: &Renderer,
    my_role: Role,
    state_rx: &mut watch::Receiver<GameState>,
) -> Result<Option<GameState>, ProtocolError> {
    // 等待开局快照，首屏由监听任务绘制
    if state_rx.changed().await.is_err() {
        return Ok(None);
    }

    loop {
        let state = state_rx.borrow_and_update().clone();
        if state.game_over {
            return Ok(Some(state));
        }

        if state.turn != my_role {
            // AWAIT_TURN
            if state_rx.changed().await.is_err() {
                return Ok(None);
            }
            continue;
        }

        // LOCAL_TURN: 引擎镜像同步到最新快照后做本地预校验
        engine.restore(&state);
        let line = match input.read_line(&engine.input_prompt()).await? {
            Some(line) => line,
            // stdin 关闭，视作放弃
            None => return Ok(None),
        };

        if let Err(reason) = engine.validate_client_input(&line) {
            renderer.warn_invalid(&reason);
            continue;
        }

        writer.send(&ClientMessage::Move { data: line }).await?;
        renderer.waiting_for_server();

        // 等待本步触发的权威推送
        if state_rx.changed().await.is_err() {
            return Ok(None);
        }
    }
}
