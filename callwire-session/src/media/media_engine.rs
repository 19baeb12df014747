use crate::EventSink;
use crate::media::MediaEvent;
use anyhow::Result;
use async_trait::async_trait;
use callwire_core::{CallMode, IceCandidate, SessionDescription};

/// Граница с внешним медиа-движком (захват, кодеки, рендеринг, SDP/ICE).
///
/// Все вызовы делает одна задача сессии, по очереди. Асинхронные события
/// движка (локальные ICE-кандидаты, удаленные потоки, состояние связности)
/// отдаются через sink, переданный в `set_event_sink`, и попадают в ту же
/// очередь событий сессии.
#[async_trait]
pub trait MediaEngine: Send + 'static {
    /// Вызывается один раз, до любых других методов.
    fn set_event_sink(&mut self, sink: EventSink<MediaEvent>);

    /// Готовит локальные треки. Аудио есть всегда, видео только для `AudioVideo`.
    async fn prepare_local_media(&mut self, mode: CallMode) -> Result<()>;

    async fn create_offer(&mut self) -> Result<SessionDescription>;

    async fn create_answer(&mut self) -> Result<SessionDescription>;

    async fn apply_local_description(&mut self, description: SessionDescription) -> Result<()>;

    async fn apply_remote_description(&mut self, description: SessionDescription) -> Result<()>;

    async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> Result<()>;

    fn mute(&mut self);

    fn unmute(&mut self);

    /// Освобождает все ресурсы движка. Должен быть идемпотентным.
    async fn dispose(&mut self);
}
