//! Wire types for the stdio event protocol.
//!
//! The host feeds the worker line-delimited JSON events (install, activate,
//! fetch, message); the worker answers with one JSON reply line each.
//! Response bodies cross the text protocol as base64.

use serde::{Deserialize, Serialize};

/// The control message type that triggers immediate activation.
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// An intercepted request, as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// HTTP method; anything other than GET is passed through untouched.
    pub method: String,

    /// Root-relative path (resolved against the configured origin) or an
    /// absolute http(s) URL.
    pub url: String,

    /// Accept header, if the request carried one.
    #[serde(default)]
    pub accept: Option<String>,
}

/// Out-of-band control payload from the host pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Lifecycle and request events consumed by the worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch {
        #[serde(default)]
        id: Option<u64>,
        request: FetchRequest,
    },
    Message {
        data: ControlMessage,
    },
}

/// Where a fetch reply was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    Network,
    Cache,
}

/// Replies emitted on stdout, one JSON line each.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum WorkerReply {
    Installed {
        precached: usize,
    },
    InstallFailed {
        error: String,
    },
    Activated {
        removed_buckets: Vec<String>,
    },
    ActivateFailed {
        error: String,
    },
    Fetched {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        source: FetchSource,
        status: u16,
        content_type: Option<String>,
        /// Base64-encoded response body.
        body: String,
        url: String,
    },
    FetchFailed {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        error: String,
    },
    /// Non-GET request: not intercepted, default handling applies.
    Passthrough {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
    /// Unrecognized control message.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_install() {
        let event: WorkerEvent = serde_json::from_str(r#"{"event":"install"}"#).unwrap();
        assert!(matches!(event, WorkerEvent::Install));
    }

    #[test]
    fn test_deserialize_fetch() {
        let event: WorkerEvent = serde_json::from_str(
            r#"{"event":"fetch","id":7,"request":{"method":"GET","url":"/styles.css","accept":"text/css"}}"#,
        )
        .unwrap();
        match event {
            WorkerEvent::Fetch { id, request } => {
                assert_eq!(id, Some(7));
                assert_eq!(request.method, "GET");
                assert_eq!(request.url, "/styles.css");
                assert_eq!(request.accept.as_deref(), Some("text/css"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_fetch_without_accept() {
        let event: WorkerEvent = serde_json::from_str(
            r#"{"event":"fetch","request":{"method":"GET","url":"/manifest.json"}}"#,
        )
        .unwrap();
        match event {
            WorkerEvent::Fetch { id, request } => {
                assert_eq!(id, None);
                assert!(request.accept.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_message() {
        let event: WorkerEvent =
            serde_json::from_str(r#"{"event":"message","data":{"type":"SKIP_WAITING"}}"#).unwrap();
        match event {
            WorkerEvent::Message { data } => assert_eq!(data.kind, SKIP_WAITING),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_fetched_reply() {
        let reply = WorkerReply::Fetched {
            id: Some(7),
            source: FetchSource::Cache,
            status: 200,
            content_type: Some("text/css".into()),
            body: "Ym9keQ==".into(),
            url: "http://menu.local/styles.css".into(),
        };
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["reply"], "fetched");
        assert_eq!(value["source"], "cache");
        assert_eq!(value["status"], 200);
    }

    #[test]
    fn test_serialize_passthrough_omits_missing_id() {
        let reply = WorkerReply::Passthrough { id: None };
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["reply"], "passthrough");
        assert!(value.get("id").is_none());
    }
}
