use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Единственный слушатель событий компонента (транспорта или медиа-движка).
///
/// Доставка синхронная и неблокирующая: события просто кладутся в очередь
/// получателя, поэтому sink можно дергать из любых колбэков.
pub struct EventSink<T> {
    emit: Arc<dyn Fn(T) -> bool + Send + Sync>,
}

impl<T: 'static> EventSink<T> {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn(T) -> bool + Send + Sync + 'static,
    {
        Self {
            emit: Arc::new(emit),
        }
    }

    /// Sink, который пересылает события в канал с более широким типом
    /// события (например, в общий `SessionEvent`).
    pub fn channel<E>(tx: mpsc::UnboundedSender<E>) -> Self
    where
        E: From<T> + Send + 'static,
    {
        Self::new(move |event| tx.send(E::from(event)).is_ok())
    }

    /// Returns `false` once the receiving side is gone.
    pub fn emit(&self, event: T) -> bool {
        (self.emit)(event)
    }
}

impl<T> Clone for EventSink<T> {
    fn clone(&self) -> Self {
        Self {
            emit: Arc::clone(&self.emit),
        }
    }
}

impl<T> fmt::Debug for EventSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}
