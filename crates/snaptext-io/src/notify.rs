use notify_rust::Notification;
use tracing::debug;

/// Fire-and-forget completion notice. Implementations must never fail the
/// extraction over a notification problem.
pub trait NotificationSink: Send + Sync {
    fn show(&self, summary: &str, body: &str);
}

pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn show(&self, summary: &str, body: &str) {
        if let Err(err) = Notification::new().summary(summary).body(body).show() {
            debug!(%err, "notification backend unavailable");
        }
    }
}
