//! Sharing a dashboard link.
//!
//! A share goes to the native share facility when one is configured, and
//! otherwise copies the link to the clipboard so the caller can tell the
//! user right away. Either path is fire-and-forget: failures are logged and
//! reported as an outcome, never retried.

use std::process::{Command, Stdio};

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Notice shown when the clipboard fallback was used.
pub const CLIPBOARD_FALLBACK_NOTICE: &str = "Web share not supported. URL copied to clipboard.";

/// Path segment that marks a shared dashboard link.
pub const SHARED_PATH_SEGMENT: &str = "shared-dashboard";

/// What to share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDetails {
    /// Link to the shared view.
    pub url: String,
    /// Short title.
    pub title: String,
    /// Descriptive text.
    pub text: String,
}

/// Errors raised by share backends.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The native share command could not be started.
    #[error("Failed to run share command '{command}'")]
    Spawn {
        /// Command that failed to start.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The clipboard could not be opened or written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// How a share request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the native share facility.
    Shared,
    /// Native sharing unavailable; the URL is on the clipboard.
    CopiedToClipboard,
    /// Sharing failed; the message has been logged.
    Failed(String),
}

/// A platform share facility.
pub trait NativeShare {
    /// Shares `details`.
    fn share(&self, details: &ShareDetails) -> Result<(), ShareError>;
}

/// Somewhere text can be copied to.
pub trait ClipboardWriter {
    /// Replaces the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Native share through a user-configured shell command.
///
/// The command runs via `sh -c` with `WDASH_SHARE_URL`, `WDASH_SHARE_TITLE`
/// and `WDASH_SHARE_TEXT` set. It is spawned detached and not awaited.
#[derive(Debug, Clone)]
pub struct CommandShare {
    command: String,
}

impl CommandShare {
    /// Wraps a share command. Returns `None` for a blank command.
    pub fn new(command: &str) -> Option<Self> {
        let command = command.trim();
        if command.is_empty() {
            None
        } else {
            Some(Self {
                command: command.to_string(),
            })
        }
    }
}

impl NativeShare for CommandShare {
    fn share(&self, details: &ShareDetails) -> Result<(), ShareError> {
        tracing::debug!("running share command: {}", self.command);
        Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("WDASH_SHARE_URL", &details.url)
            .env("WDASH_SHARE_TITLE", &details.title)
            .env("WDASH_SHARE_TEXT", &details.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|source| ShareError::Spawn {
                command: self.command.clone(),
                source,
            })
    }
}

/// The system clipboard via `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ShareError::Clipboard(e.to_string()))
    }
}

/// Shares `details` natively when possible, otherwise copies the URL.
///
/// A failing native share does not fall back to the clipboard.
pub fn share(
    native: Option<&dyn NativeShare>,
    clipboard: &mut dyn ClipboardWriter,
    details: &ShareDetails,
) -> ShareOutcome {
    if let Some(native) = native {
        return match native.share(details) {
            Ok(()) => {
                tracing::info!("shared {}", details.url);
                ShareOutcome::Shared
            }
            Err(e) => {
                tracing::warn!("couldn't share: {}", e);
                ShareOutcome::Failed(e.to_string())
            }
        };
    }

    match clipboard.write_text(&details.url) {
        Ok(()) => {
            tracing::info!("copied share link to clipboard: {}", details.url);
            ShareOutcome::CopiedToClipboard
        }
        Err(e) => {
            tracing::warn!("clipboard error: {}", e);
            ShareOutcome::Failed(e.to_string())
        }
    }
}

/// Builds `{origin}/shared-dashboard/{username}/{dashboard_id}`.
///
/// Segments are percent-encoded; any path on `origin` is replaced.
pub fn share_url(origin: &Url, username: &str, dashboard_id: &str) -> Option<Url> {
    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .ok()?
        .clear()
        .extend([SHARED_PATH_SEGMENT, username, dashboard_id]);
    Some(url)
}

/// Recovers `(username, dashboard_id)` from a shared dashboard link.
pub fn parse_share_url(link: &str) -> Option<(String, String)> {
    let url = Url::parse(link).ok()?;
    let segments = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .collect::<Option<Vec<String>>>()?;
    match segments.as_slice() {
        [marker, username, dashboard_id] if marker == SHARED_PATH_SEGMENT => {
            Some((username.clone(), dashboard_id.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingShare {
        fail: bool,
        shared: RefCell<Vec<String>>,
    }

    impl NativeShare for RecordingShare {
        fn share(&self, details: &ShareDetails) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::Clipboard("share cancelled".to_string()));
            }
            self.shared.borrow_mut().push(details.url.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        fail: bool,
        text: Option<String>,
    }

    impl ClipboardWriter for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::Clipboard("no display".to_string()));
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn details() -> ShareDetails {
        ShareDetails {
            url: "http://localhost:3000/shared-dashboard/user3/dash-1".to_string(),
            title: "Sales".to_string(),
            text: "Check out this dashboard".to_string(),
        }
    }

    #[test]
    fn test_native_share_is_preferred() {
        let native = RecordingShare {
            fail: false,
            shared: RefCell::new(Vec::new()),
        };
        let mut clipboard = MemoryClipboard::default();
        let outcome = share(Some(&native), &mut clipboard, &details());
        assert_eq!(outcome, ShareOutcome::Shared);
        assert_eq!(native.shared.borrow().as_slice(), [details().url]);
        assert!(clipboard.text.is_none());
    }

    #[test]
    fn test_failing_native_share_does_not_fall_back() {
        let native = RecordingShare {
            fail: true,
            shared: RefCell::new(Vec::new()),
        };
        let mut clipboard = MemoryClipboard::default();
        let outcome = share(Some(&native), &mut clipboard, &details());
        assert!(matches!(outcome, ShareOutcome::Failed(msg) if msg.contains("cancelled")));
        assert!(clipboard.text.is_none());
    }

    #[test]
    fn test_clipboard_fallback_copies_url() {
        let mut clipboard = MemoryClipboard::default();
        let outcome = share(None, &mut clipboard, &details());
        assert_eq!(outcome, ShareOutcome::CopiedToClipboard);
        assert_eq!(clipboard.text.as_deref(), Some(details().url.as_str()));
    }

    #[test]
    fn test_clipboard_failure_is_reported() {
        let mut clipboard = MemoryClipboard {
            fail: true,
            text: None,
        };
        let outcome = share(None, &mut clipboard, &details());
        assert!(matches!(outcome, ShareOutcome::Failed(_)));
    }

    #[test]
    fn test_blank_share_command_is_unavailable() {
        assert!(CommandShare::new("").is_none());
        assert!(CommandShare::new("   ").is_none());
        assert!(CommandShare::new("xdg-open \"$WDASH_SHARE_URL\"").is_some());
    }

    #[test]
    fn test_share_url_shape() {
        let origin = Url::parse("https://dash.example.com").expect("origin");
        let url = share_url(&origin, "user3", "dash-1").expect("url");
        assert_eq!(
            url.as_str(),
            "https://dash.example.com/shared-dashboard/user3/dash-1"
        );
    }

    #[test]
    fn test_share_url_replaces_origin_path_and_encodes() {
        let origin = Url::parse("http://localhost:3000/dashboard/abc?x=1").expect("origin");
        let url = share_url(&origin, "jane doe", "a/b").expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/shared-dashboard/jane%20doe/a%2Fb"
        );
    }

    #[test]
    fn test_parse_share_url_round_trips_encoded_segments() {
        let origin = Url::parse("http://localhost:3000").expect("origin");
        let cases = [
            ("jane doe", "a/b"),
            ("a+b", "d&1"),
            ("a&b", "x=y"),
            ("k=v", "50%+off"),
        ];
        for (username, dashboard_id) in cases {
            let url = share_url(&origin, username, dashboard_id).expect("url");
            assert_eq!(
                parse_share_url(url.as_str()),
                Some((username.to_string(), dashboard_id.to_string())),
                "round trip through {url}"
            );
        }
    }

    #[test]
    fn test_parse_share_url_keeps_plus_and_ampersand_literal() {
        assert_eq!(
            parse_share_url("http://localhost:3000/shared-dashboard/a+b/c&d=e"),
            Some(("a+b".to_string(), "c&d=e".to_string()))
        );
        assert_eq!(
            parse_share_url("http://localhost:3000/shared-dashboard/jane%20doe/a%2Fb"),
            Some(("jane doe".to_string(), "a/b".to_string()))
        );
    }

    #[test]
    fn test_parse_share_url_rejects_invalid_utf8() {
        assert_eq!(
            parse_share_url("http://localhost:3000/shared-dashboard/user3/%FF"),
            None
        );
    }

    #[test]
    fn test_parse_share_url_rejects_other_paths() {
        assert_eq!(parse_share_url("http://localhost:3000/dashboard/abc"), None);
        assert_eq!(parse_share_url("http://localhost:3000/shared-dashboard/user3"), None);
        assert_eq!(parse_share_url("not a url"), None);
    }
}
