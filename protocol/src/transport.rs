//! 传输层抽象
//!
//! 提供 Connector/Connection/Listener traits 使上层协议与具体传输实现解耦。
//! 帧格式为按行分隔的 UTF-8 JSON 记录：一行一条自描述消息。

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{ProtocolError, Result};
use crate::{CONNECT_TIMEOUT, MAX_LINE_LEN};

/// 连接抽象 trait（核心抽象，用于业务层）
#[async_trait]
pub trait Connection: Send + Sync {
    /// 发送消息
    async fn send<M: Serialize + Send + Sync>(&mut self, msg: &M) -> Result<()>;

    /// 接收消息
    async fn recv<M: DeserializeOwned>(&mut self) -> Result<M>;

    /// 关闭连接
    async fn close(&mut self) -> Result<()>;

    /// 获取远端地址
    fn peer_addr(&self) -> Option<String>;
}

/// 连接器 trait（客户端使用）
#[async_trait]
pub trait Connector: Send + Sync {
    type Conn: Connection;

    /// 建立连接
    async fn connect(&self, addr: &str) -> Result<Self::Conn>;
}

/// 监听器 trait（服务端使用）
#[async_trait]
pub trait Listener: Send + Sync + Sized {
    type Conn: Connection;

    /// 绑定地址
    async fn bind(addr: &str) -> Result<Self>;

    /// 接受连接
    async fn accept(&mut self) -> Result<Self::Conn>;

    /// 获取本地地址
    fn local_addr(&self) -> Option<String>;
}

// ============================================================================
// TCP 实现
// ============================================================================

/// TCP 连接器
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Conn = TcpConnection;

    async fn connect(&self, addr: &str) -> Result<Self::Conn> {
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)?
            .map_err(ProtocolError::Io)?;

        stream.set_nodelay(true)?;

        let peer_addr = stream.peer_addr().ok().map(|a| a.to_string());
        let (read_half, write_half) = stream.into_split();

        Ok(TcpConnection {
            reader: LineReader::new(read_half),
            writer: LineWriter::new(write_half),
            peer_addr,
        })
    }
}

/// TCP 连接
pub struct TcpConnection {
    reader: LineReader<OwnedReadHalf>,
    writer: LineWriter<OwnedWriteHalf>,
    peer_addr: Option<String>,
}

impl TcpConnection {
    /// 从 TcpStream 创建（服务端使用）
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr().ok().map(|a| a.to_string());
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: LineReader::new(read_half),
            writer: LineWriter::new(write_half),
            peer_addr,
        })
    }

    /// 分离读写端
    pub fn split(self) -> (LineReader<OwnedReadHalf>, LineWriter<OwnedWriteHalf>) {
        (self.reader, self.writer)
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn send<M: Serialize + Send + Sync>(&mut self, msg: &M) -> Result<()> {
        self.writer.write_frame(msg).await
    }

    async fn recv<M: DeserializeOwned>(&mut self) -> Result<M> {
        self.reader.read_frame().await
    }

    async fn close(&mut self) -> Result<()> {
        // TCP 连接会在 drop 时自动关闭
        Ok(())
    }

    fn peer_addr(&self) -> Option<String> {
        self.peer_addr.clone()
    }
}

/// TCP 监听器
pub struct TcpListener {
    listener: tokio::net::TcpListener,
}

#[async_trait]
impl Listener for TcpListener {
    type Conn = TcpConnection;

    async fn bind(addr: &str) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ProtocolError::Io)?;
        Ok(Self { listener })
    }

    async fn accept(&mut self) -> Result<Self::Conn> {
        let (stream, _addr) = self.listener.accept().await.map_err(ProtocolError::Io)?;
        TcpConnection::from_stream(stream)
    }

    fn local_addr(&self) -> Option<String> {
        self.listener.local_addr().ok().map(|a| a.to_string())
    }
}

// ============================================================================
// 行帧编解码
// ============================================================================

/// 行帧读取器
pub struct LineReader<R> {
    reader: BufReader<R>,
    line: String,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    /// 创建新的行帧读取器
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: String::new(),
        }
    }

    /// 读取并解码一行消息
    ///
    /// 空行跳过；EOF 映射为 ConnectionClosed；超长行与
    /// 无法解码的行分别报 LineTooLong 和 Json，调用方据此
    /// 区分协议违规与传输失败。
    pub async fn read_frame<M: DeserializeOwned>(&mut self) -> Result<M> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .await
                .map_err(ProtocolError::Io)?;
            if n == 0 {
                return Err(ProtocolError::ConnectionClosed);
            }
            if self.line.len() > MAX_LINE_LEN {
                return Err(ProtocolError::LineTooLong {
                    len: self.line.len(),
                    max: MAX_LINE_LEN,
                });
            }

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(serde_json::from_str(trimmed)?);
        }
    }

    /// 接收消息（read_frame 的别名）
    pub async fn recv<M: DeserializeOwned>(&mut self) -> Result<M> {
        self.read_frame().await
    }
}

/// 行帧写入器
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> LineWriter<W> {
    /// 创建新的行帧写入器
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// 编码并写入一行消息
    pub async fn write_frame<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        let mut payload = serde_json::to_string(msg)?;

        if payload.len() > MAX_LINE_LEN {
            return Err(ProtocolError::LineTooLong {
                len: payload.len(),
                max: MAX_LINE_LEN,
            });
        }

        payload.push('\n');
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.flush().await?;

        Ok(())
    }

    /// 发送消息（write_frame 的别名）
    pub async fn send<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        self.write_frame(msg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ClientMessage, ServerMessage};
    use crate::rps::RpsChoice;

    #[tokio::test]
    async fn test_tcp_connection() {
        // 启动监听
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // 客户端连接
        let client_handle = tokio::spawn(async move {
            let connector = TcpConnector;
            let mut conn = connector.connect(&addr).await.unwrap();

            // 发送消息
            conn.send(&ClientMessage::Rps {
                choice: RpsChoice::Rock,
            })
            .await
            .unwrap();

            // 接收响应
            let msg: ServerMessage = conn.recv().await.unwrap();
            assert_eq!(msg, ServerMessage::RpsReq);
        });

        // 服务端接受连接
        let mut conn = listener.accept().await.unwrap();

        // 接收消息
        let msg: ClientMessage = conn.recv().await.unwrap();
        match msg {
            ClientMessage::Rps { choice } => assert_eq!(choice, RpsChoice::Rock),
            _ => panic!("Unexpected message"),
        }

        // 发送响应
        conn.send(&ServerMessage::RpsReq).await.unwrap();

        client_handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_line_is_recoverable() {
        let (client, server) = tokio::io::duplex(1024);
        let mut writer = LineWriter::new(client);
        let mut reader = LineReader::new(server);

        // 先写一行垃圾，再写一条合法消息
        writer.writer.write_all(b"not json\n\n").await.unwrap();
        writer
            .write_frame(&ClientMessage::Move {
                data: "5".to_string(),
            })
            .await
            .unwrap();

        // 垃圾行报 Json 错误，连接仍可继续读取
        let err = reader.read_frame::<ClientMessage>().await.unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));

        let msg: ClientMessage = reader.read_frame().await.unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                data: "5".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_eof_maps_to_connection_closed() {
        let (client, server) = tokio::io::duplex(64);
        drop(client);

        let mut reader = LineReader::new(server);
        let err = reader.read_frame::<ClientMessage>().await.unwrap_err();
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }
}
