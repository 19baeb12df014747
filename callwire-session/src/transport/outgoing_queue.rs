use crate::transport::{QueueLimit, TransportError};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

pub(crate) enum OutgoingSender {
    Unbounded(mpsc::UnboundedSender<String>),
    Bounded(mpsc::Sender<String>, usize),
}

pub(crate) enum OutgoingReceiver {
    Unbounded(mpsc::UnboundedReceiver<String>),
    Bounded(mpsc::Receiver<String>),
}

pub(crate) fn outgoing_queue(limit: QueueLimit) -> (OutgoingSender, OutgoingReceiver) {
    match limit {
        QueueLimit::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (OutgoingSender::Unbounded(tx), OutgoingReceiver::Unbounded(rx))
        }
        QueueLimit::Bounded(capacity) => {
            let capacity = capacity.max(1);
            let (tx, rx) = mpsc::channel(capacity);
            (
                OutgoingSender::Bounded(tx, capacity),
                OutgoingReceiver::Bounded(rx),
            )
        }
    }
}

impl OutgoingSender {
    /// Never waits: a full bounded queue is reported, not awaited.
    pub(crate) fn push(&self, frame: String) -> Result<(), TransportError> {
        match self {
            OutgoingSender::Unbounded(tx) => tx.send(frame).map_err(|_| TransportError::Closed),
            OutgoingSender::Bounded(tx, capacity) => match tx.try_send(frame) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(TransportError::QueueFull(*capacity)),
                Err(TrySendError::Closed(_)) => Err(TransportError::Closed),
            },
        }
    }
}

impl OutgoingReceiver {
    pub(crate) async fn recv(&mut self) -> Option<String> {
        match self {
            OutgoingReceiver::Unbounded(rx) => rx.recv().await,
            OutgoingReceiver::Bounded(rx) => rx.recv().await,
        }
    }
}
