use chrono::{DateTime, Duration, Utc};
use jamii_shared::Property;
use tracing::{debug, warn};

/// How long the "copied" acknowledgement stays visible.
pub const COPIED_ACK_WINDOW: Duration = Duration::seconds(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareMessage {
    pub fn for_property(property: &Property, url: impl Into<String>) -> Self {
        Self {
            title: property.title.clone(),
            text: format!(
                "Check out {} in {} on Jamii!",
                property.title, property.location
            ),
            url: url.into(),
        }
    }

    /// What goes on the clipboard when native sharing is unavailable.
    pub fn clipboard_text(&self) -> String {
        format!("{} {}", self.text, self.url)
    }
}

/// Deep link to a listing's detail view.
pub fn listing_link(base_url: &str, property_id: &str) -> String {
    format!(
        "{}/property/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(property_id)
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("share dismissed")]
    Cancelled,
    #[error("native share not supported")]
    Unsupported,
    #[error("share failed: {0}")]
    Platform(String),
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}

/// Host capabilities used by the share button.
pub trait SharePlatform {
    fn supports_native_share(&self) -> bool;

    fn native_share(&self, message: &ShareMessage) -> Result<(), ShareError>;

    fn write_clipboard(&self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiedAck {
    pub shown_at: DateTime<Utc>,
}

impl CopiedAck {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now >= self.shown_at && now - self.shown_at < COPIED_ACK_WINDOW
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the native sheet.
    Cancelled,
    Copied(CopiedAck),
    Failed(ShareError),
}

/// Shares natively when the host supports it, otherwise copies the message
/// to the clipboard. Never returns an error.
pub fn share_property(
    platform: &dyn SharePlatform,
    message: &ShareMessage,
    now: DateTime<Utc>,
) -> ShareOutcome {
    if platform.supports_native_share() {
        match platform.native_share(message) {
            Ok(()) => return ShareOutcome::Shared,
            Err(ShareError::Cancelled) => {
                debug!(url = %message.url, "native share dismissed");
                return ShareOutcome::Cancelled;
            }
            Err(ShareError::Unsupported) => {
                debug!("native share refused, copying instead");
            }
            Err(err) => {
                warn!(error = %err, "native share failed");
                return ShareOutcome::Failed(err);
            }
        }
    }

    match platform.write_clipboard(&message.clipboard_text()) {
        Ok(()) => ShareOutcome::Copied(CopiedAck { shown_at: now }),
        Err(err) => {
            warn!(error = %err, "clipboard write failed");
            ShareOutcome::Failed(err)
        }
    }
}
