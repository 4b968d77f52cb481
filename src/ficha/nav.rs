//! External collaborator seams.
//!
//! The core is headless: screen transitions, the camera scanner, and the
//! submission target are consumed through the traits below and nothing
//! else. Production implementations live with the presentation layer;
//! tests use recording doubles.

use crate::value::Value;
use async_trait::async_trait;

/// Screen-to-screen traversal, as narrow as the core needs it.
pub trait Navigator {
    fn navigate(&mut self, screen: &str, params: serde_json::Value);
    fn go_back(&mut self);
}

/// One-shot barcode capture.
///
/// A scan session ends after a single decode; the scanning screen is
/// expected to dismiss itself. `scan` resolves to `None` when the operator
/// backs out or permission is denied.
#[async_trait]
pub trait BarcodeScanner {
    fn has_permission(&self) -> bool;

    /// Asks the device for camera permission; returns whether it was
    /// granted.
    async fn request_permission(&mut self) -> bool;

    async fn scan(&mut self) -> Option<String>;
}

/// Where a validated snapshot goes on submit. No acknowledgment format is
/// defined; the session clears the draft after `accept` returns.
#[async_trait]
pub trait SubmissionSink {
    async fn accept(&mut self, data: Value);
}
