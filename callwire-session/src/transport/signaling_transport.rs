use crate::EventSink;
use crate::transport::outgoing_queue::{OutgoingReceiver, OutgoingSender, outgoing_queue};
use crate::transport::{ConnectionOrigin, TransportConfig, TransportError, TransportEvent};
use callwire_core::PeerAddress;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Сигнальный канал поверх одного TCP-соединения с построчным фреймингом.
///
/// `connect` сначала пробует подключиться к пиру, а при неудаче слушает тот же
/// порт и принимает первое входящее соединение. Клонирование дешевое: все
/// клоны управляют одним и тем же соединением.
#[derive(Clone)]
pub struct SignalingTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    config: TransportConfig,
    listener: EventSink<TransportEvent>,
    outgoing_tx: OutgoingSender,
    outgoing_rx: Mutex<Option<OutgoingReceiver>>,
    shutdown_tx: watch::Sender<bool>,
    closed: AtomicBool,
}

enum ReadOutcome {
    PeerClosed,
    Failed(io::Error),
}

impl SignalingTransport {
    pub fn new(config: TransportConfig, listener: EventSink<TransportEvent>) -> Self {
        let (outgoing_tx, outgoing_rx) = outgoing_queue(config.outgoing_queue);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            inner: Arc::new(TransportInner {
                config,
                listener,
                outgoing_tx,
                outgoing_rx: Mutex::new(Some(outgoing_rx)),
                shutdown_tx,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Запускает гонку connect/listen в фоне. Результат приходит событием
    /// `ConnectionEstablished` либо `ConnectionError` + `ConnectionClosed`.
    pub fn connect(&self, address: &PeerAddress) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let outgoing_rx = self
            .inner
            .outgoing_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(TransportError::AlreadyStarted)?;

        let inner = Arc::clone(&self.inner);
        let address = address.clone();
        tokio::spawn(async move {
            inner.run(address, outgoing_rx).await;
        });

        Ok(())
    }

    /// Ставит кадр в очередь. Никогда не ждет сети; кадры уходят в порядке вызовов.
    /// Кадры, поставленные до установления соединения, уйдут сразу после него.
    pub fn send(&self, frame: impl Into<String>) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let frame = frame.into();
        if frame.contains(['\n', '\r']) {
            return Err(TransportError::EmbeddedNewline);
        }

        self.inner.outgoing_tx.push(frame)
    }

    /// Идемпотентно закрывает транспорт. `ConnectionClosed` отправляется
    /// только при первом вызове. Не ждет завершения фоновых задач.
    pub fn disconnect(&self) {
        if self.inner.shutdown() {
            debug!("Signaling transport disconnected locally");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl TransportInner {
    async fn run(self: Arc<Self>, address: PeerAddress, outgoing_rx: OutgoingReceiver) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let established = tokio::select! {
            biased;
            _ = shutdown_rx.wait_for(|closed| *closed) => return,
            res = self.establish(&address) => res,
        };

        let (stream, origin) = match established {
            Ok(v) => v,
            Err(e) => {
                self.fail(format!("could not reach or accept peer {address}: {e}"));
                return;
            }
        };

        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let peer = match stream.peer_addr() {
            Ok(peer) => peer,
            Err(e) => {
                self.fail(format!("connection to {address} lost during setup: {e}"));
                return;
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        info!("Signaling connection established ({:?}) with {}", origin, peer);
        self.listener
            .emit(TransportEvent::ConnectionEstablished { origin, peer });

        let (read_half, write_half) = stream.into_split();

        let mut write_task = tokio::spawn(drain_outgoing(write_half, outgoing_rx));
        let mut read_task = tokio::spawn({
            let inner = Arc::clone(&self);
            async move { inner.read_incoming(read_half).await }
        });

        tokio::select! {
            biased;
            _ = shutdown_rx.wait_for(|closed| *closed) => {}
            res = &mut read_task => match res {
                Ok(ReadOutcome::PeerClosed) => {
                    info!("Peer {} closed the signaling connection", peer);
                    self.shutdown();
                }
                Ok(ReadOutcome::Failed(e)) => self.fail(format!("read error: {e}")),
                Err(e) => self.fail(format!("read task aborted: {e}")),
            },
            res = &mut write_task => match res {
                Ok(Ok(())) => { self.shutdown(); }
                Ok(Err(e)) => self.fail(format!("write error: {e}")),
                Err(e) => self.fail(format!("write task aborted: {e}")),
            },
        }

        read_task.abort();
        write_task.abort();
    }

    async fn establish(&self, address: &PeerAddress) -> io::Result<(TcpStream, ConnectionOrigin)> {
        let connect_timeout = self.config.connect_timeout;

        match timeout(
            connect_timeout,
            TcpStream::connect((address.host(), address.port())),
        )
        .await
        {
            Ok(Ok(stream)) => return Ok((stream, ConnectionOrigin::Outbound)),
            Ok(Err(e)) => debug!("Outbound connect to {} failed: {}", address, e),
            Err(_) => debug!(
                "Outbound connect to {} timed out after {:?}",
                address, connect_timeout
            ),
        }

        let listener = TcpListener::bind((self.config.listen_host, address.port())).await?;
        let local_addr = listener.local_addr()?;
        info!("Waiting for peer on {}", local_addr);
        self.listener.emit(TransportEvent::Listening(local_addr));

        let (stream, _) = listener.accept().await?;
        Ok((stream, ConnectionOrigin::Inbound))
    }

    async fn read_incoming(&self, read_half: OwnedReadHalf) -> ReadOutcome {
        let max_frame = self.config.max_frame_bytes;
        let mut reader = BufReader::new(read_half);
        let mut frame = Vec::new();

        loop {
            frame.clear();

            let read = (&mut reader)
                .take(max_frame as u64 + 1)
                .read_until(b'\n', &mut frame)
                .await;

            match read {
                Ok(0) => return ReadOutcome::PeerClosed,
                Ok(_) => {}
                Err(e) => return ReadOutcome::Failed(e),
            }

            if frame.last() == Some(&b'\n') {
                frame.pop();
            } else if frame.len() > max_frame {
                return ReadOutcome::Failed(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("frame exceeds {max_frame} bytes"),
                ));
            }
            if frame.last() == Some(&b'\r') {
                frame.pop();
            }
            if frame.is_empty() {
                continue;
            }

            let text = match std::str::from_utf8(&frame) {
                Ok(text) => text.to_owned(),
                Err(e) => {
                    warn!("Dropping non UTF-8 signaling frame: {}", e);
                    continue;
                }
            };

            if self.closed.load(Ordering::Acquire) {
                return ReadOutcome::PeerClosed;
            }
            self.listener.emit(TransportEvent::MessageReceived(text));
        }
    }

    fn fail(&self, reason: String) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        warn!("Signaling transport error: {}", reason);
        self.listener.emit(TransportEvent::ConnectionError(reason));
        self.shutdown();
    }

    /// Returns `true` for the call that actually closed the transport.
    fn shutdown(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.shutdown_tx.send_replace(true);
        self.outgoing_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.listener.emit(TransportEvent::ConnectionClosed);
        true
    }
}

async fn drain_outgoing(
    mut write_half: OwnedWriteHalf,
    mut outgoing_rx: OutgoingReceiver,
) -> io::Result<()> {
    while let Some(mut frame) = outgoing_rx.recv().await {
        frame.push('\n');
        write_half.write_all(frame.as_bytes()).await?;
        write_half.flush().await?;
    }
    write_half.shutdown().await
}
