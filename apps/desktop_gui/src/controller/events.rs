//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ControllerSnapshot;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Snapshot(ControllerSnapshot),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

pub fn classify_startup_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("invalid store base url") || lower.contains("must use http or https") {
        format!(
            "Store URL is not usable; pass --store-url or set APP__STORE_BASE_URL and relaunch. ({message})"
        )
    } else if lower.contains("http client") || lower.contains("tls") {
        format!("Could not initialize networking; check local TLS setup and relaunch. ({message})")
    } else {
        format!("Backend worker startup failure: {message}")
    }
}

/// Problems with the bridge itself. Store failures travel inside snapshots instead.
#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Startup failures leave no backend to talk to.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_store_url_gets_actionable_guidance() {
        let text = classify_startup_failure("invalid store base url 'nope': relative URL without a base");
        assert!(text.starts_with("Store URL is not usable"));
        assert!(text.contains("nope"));
    }

    #[test]
    fn unknown_startup_failures_keep_the_original_message() {
        assert_eq!(
            classify_startup_failure("disk on fire"),
            "Backend worker startup failure: disk on fire"
        );
    }

    #[test]
    fn only_startup_errors_are_fatal() {
        assert!(UiError::new(UiErrorContext::BackendStartup, "x").is_fatal());
        assert!(!UiError::new(UiErrorContext::CommandQueue, "x").is_fatal());
    }
}
