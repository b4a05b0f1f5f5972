//! Desktop notifications via the freedesktop D-Bus service.

use std::collections::HashMap;

use thiserror::Error;
use zbus::zvariant::Value;
use zbus::{Connection, proxy};

/// Application name reported to the notification server.
pub const APP_NAME: &str = "Swirlcap";

/// Icon used when the caller does not pick one.
pub const DEFAULT_ICON: &str = "camera-photo";

const EXPIRE_TIMEOUT_MS: i32 = 3000;

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("session bus unavailable: {0}")]
    Connect(#[source] zbus::Error),
    #[error("notification server rejected the request: {0}")]
    Notify(#[source] zbus::Error),
}

/// Shows a notification and returns the id the server assigned.
///
/// `icon` defaults to [`DEFAULT_ICON`].
pub async fn send_notification(
    summary: &str,
    body: &str,
    icon: Option<&str>,
) -> Result<u32, NotificationError> {
    let connection = Connection::session()
        .await
        .map_err(NotificationError::Connect)?;
    let server = NotificationsProxy::new(&connection)
        .await
        .map_err(NotificationError::Connect)?;

    server
        .notify(
            APP_NAME,
            0,
            icon.unwrap_or(DEFAULT_ICON),
            summary,
            body,
            Vec::new(),
            HashMap::new(),
            EXPIRE_TIMEOUT_MS,
        )
        .await
        .map_err(NotificationError::Notify)
}

/// Fire-and-forget variant for the synchronous event loop; failures are logged.
pub fn send_notification_async(
    runtime_handle: &tokio::runtime::Handle,
    summary: String,
    body: String,
    icon: Option<String>,
) {
    runtime_handle.spawn(async move {
        match send_notification(&summary, &body, icon.as_deref()).await {
            Ok(id) => log::debug!("Notification {} shown: {}", id, summary),
            Err(e) => log::warn!("{}", e),
        }
    });
}
