use anyhow::{Context, Result, anyhow};
use callwire_core::{SignalingCommand, decode, encode};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

/// Timeout for a single frame from the session (ms).
pub const FRAME_TIMEOUT_MS: u64 = 5000;

/// The remote side of a call, scripted by hand over a plain TCP connection.
pub struct RawPeer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl RawPeer {
    /// Accept one connection from a session that dialed `listener`.
    pub async fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, _) = tokio::time::timeout(
            Duration::from_millis(FRAME_TIMEOUT_MS),
            listener.accept(),
        )
        .await
        .context("session never connected")??;
        Ok(Self::from_stream(stream))
    }

    /// Dial a session that is listening on `port`.
    pub async fn connect(port: u16) -> Result<Self> {
        let stream = TcpStream::connect(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to connect to 127.0.0.1:{port}"))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    pub async fn send(&mut self, command: &SignalingCommand) -> Result<()> {
        self.send_raw(&encode(command)).await
    }

    /// Send one line exactly as given (a newline is appended).
    pub async fn send_raw(&mut self, frame: &str) -> Result<()> {
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next decoded command from the session.
    pub async fn recv(&mut self) -> Result<SignalingCommand> {
        let line = tokio::time::timeout(
            Duration::from_millis(FRAME_TIMEOUT_MS),
            self.lines.next_line(),
        )
        .await
        .context("timed out waiting for a frame")??
        .ok_or_else(|| anyhow!("session closed the connection"))?;
        Ok(decode(&line)?)
    }

    /// Resolves once the session has closed its side of the connection.
    pub async fn wait_closed(&mut self) -> Result<()> {
        loop {
            let line = tokio::time::timeout(
                Duration::from_millis(FRAME_TIMEOUT_MS),
                self.lines.next_line(),
            )
            .await
            .context("session kept the connection open")?;
            match line {
                Ok(Some(_)) => continue,
                Ok(None) | Err(_) => return Ok(()),
            }
        }
    }
}
