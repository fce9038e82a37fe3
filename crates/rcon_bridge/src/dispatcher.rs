//! Event dispatch to chat-platform destinations.
//!
//! [`EventDispatcher`] turns classified console events and mirrored log lines
//! into notifications and sends each one to the destination configured for its
//! [`NotificationCategory`]. Destinations are resolved lazily through a
//! [`DestinationCache`] and kept until a send reports the destination gone.
//!
//! Neither entry point returns an error: every failure is logged and the
//! notification is dropped. Failures while mirroring a log line are logged
//! under [`MIRROR_TARGET`], which the log mirror never forwards, so a broken
//! system-log destination cannot feed itself.

use crate::config::EventChannelSettings;
use crate::error::{DispatchError, PlatformError};
use crate::platform::{ChatPlatform, Destination, Notification};
use crate::render;
use crate::types::{ClassifiedEvent, LogEvent, NotificationCategory};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Tracing target for the dispatcher's own log-mirroring diagnostics.
pub const MIRROR_TARGET: &str = "rcon_bridge::mirror";

/// Lazily resolved destination handle per notification category.
#[derive(Debug)]
pub struct DestinationCache {
    settings: EventChannelSettings,
    resolved: DashMap<NotificationCategory, Destination>,
}

impl DestinationCache {
    pub fn new(settings: EventChannelSettings) -> Self {
        Self {
            settings,
            resolved: DashMap::new(),
        }
    }

    pub fn cached(&self, category: NotificationCategory) -> Option<Destination> {
        self.resolved.get(&category).map(|entry| entry.value().clone())
    }

    /// Returns the cached destination for `category`, or resolves and caches it.
    ///
    /// # Arguments
    ///
    /// * `platform` - Chat platform used for the lookup on a cache miss
    /// * `category` - Notification stream whose configured id is looked up
    /// * `timeout` - Upper bound on the platform lookup
    ///
    /// # Returns
    ///
    /// The destination, or [`DispatchError::DestinationNotFound`] when the
    /// platform reports no such destination, fails, or is slower than
    /// `timeout`. Nothing is cached on failure, so the next event retries.
    pub async fn resolve(
        &self,
        platform: &dyn ChatPlatform,
        category: NotificationCategory,
        timeout: Duration,
    ) -> Result<Destination, DispatchError> {
        if let Some(destination) = self.cached(category) {
            return Ok(destination);
        }

        let id = self.settings.destination_id(category);
        let not_found = DispatchError::DestinationNotFound { category, id };

        match tokio::time::timeout(timeout, platform.resolve_destination(id)).await {
            Ok(Ok(Some(destination))) => {
                debug!(target: MIRROR_TARGET, %category, id, name = %destination.name, "Destination resolved");
                self.resolved.insert(category, destination.clone());
                Ok(destination)
            }
            Ok(Ok(None)) => Err(not_found),
            Ok(Err(e)) => {
                debug!(target: MIRROR_TARGET, %category, id, error = %e, "Destination lookup failed");
                Err(not_found)
            }
            Err(_) => {
                debug!(target: MIRROR_TARGET, %category, id, ?timeout, "Destination lookup timed out");
                Err(not_found)
            }
        }
    }

    /// Forgets the destination for `category` so the next event re-resolves it.
    pub fn invalidate(&self, category: NotificationCategory) -> bool {
        self.resolved.remove(&category).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Sends notifications for bridge events.
#[derive(Debug)]
pub struct EventDispatcher {
    platform: Arc<dyn ChatPlatform>,
    cache: DestinationCache,
    platform_timeout: Duration,
}

impl EventDispatcher {
    pub fn new(platform: Arc<dyn ChatPlatform>, settings: EventChannelSettings, platform_timeout: Duration) -> Self {
        Self {
            platform,
            cache: DestinationCache::new(settings),
            platform_timeout,
        }
    }

    pub fn cache(&self) -> &DestinationCache {
        &self.cache
    }

    /// Notifies the destination for a classified console event.
    ///
    /// # Arguments
    ///
    /// * `event` - Output of the classifier for one unsolicited console line
    ///
    /// Nothing is returned to the caller:
    ///
    /// * `Unknown` events are ignored without touching the platform
    /// * While the platform is not connected the notification is dropped with
    ///   a warning
    /// * Lookup and send failures are logged and the notification is dropped;
    ///   other categories are unaffected
    pub async fn on_classified_event(&self, event: &ClassifiedEvent) {
        let Some(category) = event.category() else {
            return;
        };
        let notification = match event {
            ClassifiedEvent::PlayerConnected(player) => render::render_player_connected(player),
            ClassifiedEvent::PlayerDisconnected(player) => render::render_player_disconnected(player),
            ClassifiedEvent::ChatMessage(message) => render::render_chat(message),
            ClassifiedEvent::Unknown { .. } => return,
        };

        if !self.platform.connection_state().is_connected() {
            warn!(%category, "Chat platform is not connected, dropping notification");
            return;
        }

        if let Err(e) = self.deliver(category, notification).await {
            error!(%category, "{}", e);
        }
    }

    /// Mirrors a log line to the system-log destination.
    ///
    /// # Arguments
    ///
    /// * `event` - Log line captured by the log mirror layer
    ///
    /// Dropped silently while the chat platform is not connected. Failures are
    /// logged under [`MIRROR_TARGET`] so they are never mirrored themselves.
    pub async fn on_logged(&self, event: &LogEvent) {
        if !self.platform.connection_state().is_connected() {
            return;
        }

        if let Err(e) = self
            .deliver(NotificationCategory::SystemLog, render::render_log(event))
            .await
        {
            error!(target: MIRROR_TARGET, "{}", e);
        }
    }

    async fn deliver(&self, category: NotificationCategory, notification: Notification) -> Result<(), DispatchError> {
        let destination = self
            .cache
            .resolve(self.platform.as_ref(), category, self.platform_timeout)
            .await?;

        match tokio::time::timeout(self.platform_timeout, self.platform.send(&destination, notification)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => {
                if matches!(source, PlatformError::DestinationGone(_)) {
                    self.cache.invalidate(category);
                }
                Err(DispatchError::Send { category, source })
            }
            Err(_) => Err(DispatchError::SendTimeout {
                category,
                timeout: self.platform_timeout,
            }),
        }
    }
}
