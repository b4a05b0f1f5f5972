//! Non-interactive full-screen grab through xdg-desktop-portal.

use std::collections::HashMap;

use futures::StreamExt;
use zbus::zvariant::{OwnedValue, Value};
use zbus::{Connection, proxy};

use super::types::CaptureError;

#[proxy(
    interface = "org.freedesktop.portal.Screenshot",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
trait Screenshot {
    async fn screenshot(
        &self,
        parent_window: &str,
        options: HashMap<String, Value<'_>>,
    ) -> zbus::Result<zbus::zvariant::OwnedObjectPath>;
}

/// The portal answers on a per-call Request object.
#[proxy(
    interface = "org.freedesktop.portal.Request",
    default_service = "org.freedesktop.portal.Desktop"
)]
trait Request {
    #[zbus(signal)]
    fn response(&self, response: u32, results: HashMap<String, OwnedValue>) -> zbus::Result<()>;
}

/// Portal response codes.
const RESPONSE_SUCCESS: u32 = 0;
const RESPONSE_CANCELLED: u32 = 1;

/// Grabs the whole screen and returns the URI of the file the portal wrote.
///
/// The caller crops the region it needs out of it.
pub async fn capture_via_portal() -> Result<String, CaptureError> {
    let connection = Connection::session()
        .await
        .map_err(CaptureError::DBusError)?;
    let screenshot = ScreenshotProxy::new(&connection)
        .await
        .map_err(CaptureError::DBusError)?;

    let request_path = screenshot
        .screenshot("", portal_options())
        .await
        .map_err(|e| {
            let text = e.to_string();
            if text.contains("Cancelled") || text.contains("denied") {
                CaptureError::PermissionDenied
            } else {
                CaptureError::DBusError(e)
            }
        })?;
    log::debug!("Portal screenshot request {:?}", request_path);

    let request = RequestProxy::builder(&connection)
        .path(request_path)
        .map_err(CaptureError::DBusError)?
        .build()
        .await
        .map_err(CaptureError::DBusError)?;
    let mut responses = request
        .receive_response()
        .await
        .map_err(CaptureError::DBusError)?;

    let signal = responses
        .next()
        .await
        .ok_or_else(|| CaptureError::InvalidResponse("No Response signal received".into()))?;
    let args = signal
        .args()
        .map_err(|e| CaptureError::InvalidResponse(format!("Unreadable response: {}", e)))?;

    let uri = interpret_response(args.response, &args.results)?;
    log::info!("Portal wrote screenshot to {}", uri);
    Ok(uri)
}

/// Maps a Response signal to the URI it carries, or to the matching error.
fn interpret_response(
    code: u32,
    results: &HashMap<String, OwnedValue>,
) -> Result<String, CaptureError> {
    match code {
        RESPONSE_SUCCESS => {
            let value = results
                .get("uri")
                .ok_or_else(|| CaptureError::InvalidResponse("Response has no uri".into()))?;
            let uri: &str = value
                .downcast_ref()
                .map_err(|e| CaptureError::InvalidResponse(format!("uri is not a string: {}", e)))?;
            Ok(uri.to_string())
        }
        RESPONSE_CANCELLED => Err(CaptureError::PermissionDenied),
        other => Err(CaptureError::InvalidResponse(format!(
            "Portal returned error code {}",
            other
        ))),
    }
}

fn portal_options() -> HashMap<String, Value<'static>> {
    HashMap::from([
        ("modal".to_string(), Value::from(false)),
        ("interactive".to_string(), Value::from(false)),
    ])
}
