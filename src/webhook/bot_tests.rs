//! Tests for `WebhookClient`.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::params::{self, Params};
use super::{
    AuditError, AuditRecord, AuditSink, HttpClient, HttpError, HttpRequest, HttpResponse,
    WebhookClient, WebhookError, WebhookResponse, sign,
};
use crate::time::Clock;

/// What the mock transport answers with.
#[derive(Debug, Clone)]
enum Reply {
    Body(http::StatusCode, &'static [u8]),
    Timeout,
    Refused,
}

/// Mock HTTP client that records requests and returns a fixed reply.
#[derive(Debug)]
struct MockClient {
    reply: Reply,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn replying(body: &'static [u8]) -> Arc<Self> {
        Self::new(Reply::Body(http::StatusCode::OK, body))
    }

    fn ok() -> Arc<Self> {
        Self::replying(br#"{"errcode":0,"errmsg":"ok"}"#)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn sent_bodies(&self) -> Vec<Value> {
        self.captured_requests()
            .iter()
            .map(|req| serde_json::from_slice(req.body.as_deref().unwrap()).unwrap())
            .collect()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        match &self.reply {
            Reply::Body(status, body) => Ok(HttpResponse::new(
                *status,
                http::HeaderMap::new(),
                body.to_vec(),
            )
            .with_elapsed(Duration::from_millis(15))),
            Reply::Timeout => Err(HttpError::Timeout),
            Reply::Refused => Err(HttpError::Connection(Box::new(std::io::Error::other(
                "connection refused",
            )))),
        }
    }
}

/// Clock pinned to a fixed Unix second.
struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.0)
    }
}

/// Audit sink forwarding records into a channel.
struct ChannelSink {
    tx: mpsc::UnboundedSender<AuditRecord>,
}

impl AuditSink for ChannelSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.tx.send(record).map_err(|e| AuditError(Box::new(e)))
    }
}

fn hello() -> Params {
    params::from_value(json!({"msg_type": "text", "content": {"text": "hello"}}))
}

fn keys_of(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

mod construction {
    use super::*;

    #[test]
    fn new_uses_default_base_url_and_disables_audit() {
        let client = WebhookClient::new(MockClient::ok(), "bot-key");

        assert_eq!(client.key(), "bot-key");
        assert_eq!(client.base_url(), "https://open.feishu.cn");
        assert!(!client.is_audit_enabled());
    }

    #[test]
    fn endpoint_appends_hook_path_and_key() {
        let client = WebhookClient::new(MockClient::ok(), "bot-key");

        assert_eq!(
            client.endpoint(),
            "https://open.feishu.cn/open-apis/bot/v2/hook/bot-key"
        );
    }

    #[test]
    fn endpoint_ignores_trailing_slash_on_base_url() {
        let client = WebhookClient::new(MockClient::ok(), "k")
            .with_base_url("https://open.larksuite.com/");

        assert_eq!(
            client.endpoint(),
            "https://open.larksuite.com/open-apis/bot/v2/hook/k"
        );
    }

    #[test]
    fn empty_key_is_accepted() {
        let client = WebhookClient::new(MockClient::ok(), "");

        assert_eq!(client.key(), "");
        assert!(client.endpoint().ends_with("/hook/"));
    }

    #[test]
    fn with_audit_enables_auditing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = WebhookClient::new(MockClient::ok(), "k").with_audit(ChannelSink { tx });

        assert!(client.is_audit_enabled());
        assert!(!client.with_audit_enabled(false).is_audit_enabled());
    }

    #[test]
    fn debug_redacts_key() {
        let client = WebhookClient::new(MockClient::ok(), "very-secret-key");
        let debug = format!("{client:?}");

        assert!(debug.contains("WebhookClient"));
        assert!(!debug.contains("very-secret-key"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebhookClient<Arc<MockClient>>>();
    }
}

mod send {
    use super::*;

    #[tokio::test]
    async fn posts_json_to_hook_endpoint() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        client.send(hello()).await.unwrap();

        let requests = transport.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(
            requests[0].url.as_str(),
            "https://open.feishu.cn/open-apis/bot/v2/hook/bot-key"
        );
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn posts_params_verbatim() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        client.send(hello()).await.unwrap();

        assert_eq!(
            transport.sent_bodies()[0],
            json!({"msg_type": "text", "content": {"text": "hello"}})
        );
    }

    #[tokio::test]
    async fn empty_params_post_empty_object() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        client.send(Params::new()).await.unwrap();

        assert_eq!(transport.sent_bodies()[0], json!({}));
    }

    #[tokio::test]
    async fn decodes_reply_and_keeps_raw_body() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport, "bot-key");

        let sent = client.send(hello()).await.unwrap();

        assert_eq!(sent.result.error_code, 0);
        assert_eq!(sent.result.error_message, "ok");
        assert_eq!(sent.body, br#"{"errcode":0,"errmsg":"ok"}"#.to_vec());
        assert_eq!(sent.http.status, http::StatusCode::OK);
        assert_eq!(sent.http.elapsed, Duration::from_millis(15));
    }

    #[tokio::test]
    async fn platform_error_is_returned_as_decoded_result() {
        let transport = MockClient::replying(br#"{"errcode":19001,"errmsg":"param invalid"}"#);
        let client = WebhookClient::new(transport, "bot-key");

        let sent = client.send(hello()).await.unwrap();

        assert_eq!(sent.result.error_code, 19001);
        assert!(!sent.result.is_success());
    }

    #[tokio::test]
    async fn non_success_status_is_still_decoded() {
        let transport = MockClient::new(Reply::Body(
            http::StatusCode::BAD_REQUEST,
            br#"{"code":9499,"msg":"Bad Request"}"#,
        ));
        let client = WebhookClient::new(transport, "bot-key");

        let sent = client.send(hello()).await.unwrap();

        assert_eq!(sent.http.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(sent.result.error_code, 9499);
        assert_eq!(sent.result.error_message, "Bad Request");
    }

    #[tokio::test]
    async fn decode_failure_keeps_raw_body_and_response() {
        let transport = MockClient::replying(b"not-json");
        let client = WebhookClient::new(transport, "bot-key");

        let error = client.send(hello()).await.unwrap_err();

        assert!(matches!(error, WebhookError::Decode { .. }));
        let partial = error.partial().unwrap();
        assert_eq!(partial.result, WebhookResponse::default());
        assert_eq!(partial.body, b"not-json".to_vec());
        assert_eq!(partial.http.status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn decode_error_message_leaves_cause_to_source() {
        use std::error::Error;

        let client = WebhookClient::new(MockClient::replying(b"not-json"), "bot-key");

        let error = client.send(hello()).await.unwrap_err();

        assert_eq!(error.to_string(), "Failed to decode webhook response");
        let cause = error.source().unwrap().to_string();
        assert!(!cause.is_empty());
        assert!(!error.to_string().contains(&cause));
    }

    #[tokio::test]
    async fn transport_failure_is_returned_unchanged() {
        let transport = MockClient::new(Reply::Timeout);
        let client = WebhookClient::new(transport.clone(), "bot-key");

        let error = client.send(hello()).await.unwrap_err();

        assert!(matches!(error, WebhookError::Transport(HttpError::Timeout)));
        assert!(error.partial().is_none());
        assert_eq!(transport.captured_requests().len(), 1);
    }

    #[tokio::test]
    async fn connection_failure_preserves_source() {
        let transport = MockClient::new(Reply::Refused);
        let client = WebhookClient::new(transport, "bot-key");

        let error = client.send(hello()).await.unwrap_err();

        assert!(matches!(
            error,
            WebhookError::Transport(HttpError::Connection(_))
        ));
        assert!(error.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn invalid_base_url_fails_before_request() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key").with_base_url("not a url");

        let error = client.send(hello()).await.unwrap_err();

        assert!(matches!(
            error,
            WebhookError::Transport(HttpError::InvalidUrl(_))
        ));
        assert!(!error.to_string().contains("bot-key"));
        assert!(transport.captured_requests().is_empty());
    }

    #[tokio::test]
    async fn repeated_sends_produce_identical_results() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        let first = client.send(hello()).await.unwrap();
        let second = client.send(hello()).await.unwrap();

        assert_eq!(first, second);
        let bodies = transport.sent_bodies();
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sends_are_independent() {
        let transport = MockClient::ok();
        let client = Arc::new(WebhookClient::new(transport.clone(), "bot-key"));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.send(params::text(&format!("msg {i}"))).await })
            })
            .collect();

        for handle in handles {
            let sent = handle.await.unwrap().unwrap();
            assert!(sent.result.is_success());
        }

        let mut texts: Vec<String> = transport
            .sent_bodies()
            .iter()
            .map(|body| body["content"]["text"].as_str().unwrap().to_string())
            .collect();
        texts.sort();
        let mut expected: Vec<String> = (0..16).map(|i| format!("msg {i}")).collect();
        expected.sort();
        assert_eq!(texts, expected);
    }
}

mod send_signed {
    use super::*;

    #[tokio::test]
    async fn adds_exactly_timestamp_and_sign() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        client.send(hello()).await.unwrap();
        client.send_signed("abc", hello()).await.unwrap();

        let bodies = transport.sent_bodies();
        let plain = keys_of(&bodies[0]);
        let signed = keys_of(&bodies[1]);
        assert_eq!(signed.len(), plain.len() + 2);
        assert!(signed.contains(&"timestamp".to_string()));
        assert!(signed.contains(&"sign".to_string()));
        assert_eq!(bodies[1]["content"], bodies[0]["content"]);
        assert_eq!(bodies[1]["msg_type"], bodies[0]["msg_type"]);
    }

    #[tokio::test]
    async fn timestamp_is_current_unix_seconds() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        let before = crate::time::SystemClock.unix_timestamp();
        client.send_signed("abc", hello()).await.unwrap();
        let after = crate::time::SystemClock.unix_timestamp();

        let stamped = transport.sent_bodies()[0]["timestamp"].as_u64().unwrap();
        assert!((before..=after).contains(&stamped));
    }

    #[tokio::test]
    async fn sign_matches_signer_for_stamped_timestamp() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key")
            .with_clock(FixedClock(1_599_360_473));

        client.send_signed("abc", hello()).await.unwrap();

        let body = &transport.sent_bodies()[0];
        assert_eq!(body["timestamp"], json!(1_599_360_473_u64));
        assert_eq!(body["sign"], "cgtpJzI2j6bUDggbdGYjskCK3FPgKpTkwosfWsMzKqM=");
        assert_eq!(body["sign"], sign("abc", "1599360473").unwrap().as_str());
    }

    #[tokio::test]
    async fn overwrites_caller_supplied_signature_fields() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key")
            .with_clock(FixedClock(1_700_000_000));
        let mut params = hello();
        params.insert("timestamp".to_string(), json!("stale"));
        params.insert("sign".to_string(), json!("forged"));

        client.send_signed("secret", params).await.unwrap();

        let body = &transport.sent_bodies()[0];
        assert_eq!(body["timestamp"], json!(1_700_000_000_u64));
        assert_eq!(body["sign"], "fiWS2+gh28DOydAv7hzONH/mDn9+b1Y4Y5ivXWXy8vA=");
    }

    #[tokio::test]
    async fn signed_send_with_empty_params_carries_only_signature() {
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport.clone(), "bot-key");

        client.send_signed("abc", Params::new()).await.unwrap();

        assert_eq!(keys_of(&transport.sent_bodies()[0]), vec!["sign", "timestamp"]);
    }

    #[tokio::test]
    async fn transport_failure_is_returned_unchanged() {
        let transport = MockClient::new(Reply::Timeout);
        let client = WebhookClient::new(transport, "bot-key");

        let error = client.send_signed("abc", hello()).await.unwrap_err();

        assert!(matches!(error, WebhookError::Transport(HttpError::Timeout)));
    }

    #[tokio::test]
    async fn decode_failure_keeps_raw_body() {
        let transport = MockClient::replying(b"<html>gateway</html>");
        let client = WebhookClient::new(transport, "bot-key");

        let error = client.send_signed("abc", hello()).await.unwrap_err();

        let partial = error.into_partial().unwrap();
        assert_eq!(partial.result, WebhookResponse::default());
        assert_eq!(partial.body, b"<html>gateway</html>".to_vec());
    }
}

mod audit {
    use super::*;

    #[tokio::test]
    async fn enabled_audit_receives_redacted_exchange() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport, "bot-key").with_audit(ChannelSink { tx });

        client.send(hello()).await.unwrap();

        let record = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            record.url,
            "https://open.feishu.cn/open-apis/bot/v2/hook/***"
        );
        assert_eq!(record.status, http::StatusCode::OK);
        assert_eq!(record.response_body, br#"{"errcode":0,"errmsg":"ok"}"#.to_vec());
        let sent: Value = serde_json::from_slice(&record.request_body).unwrap();
        assert_eq!(sent["content"]["text"], "hello");
    }

    #[tokio::test]
    async fn audit_runs_even_when_decoding_fails() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = MockClient::replying(b"not-json");
        let client = WebhookClient::new(transport, "bot-key").with_audit(ChannelSink { tx });

        assert!(client.send(hello()).await.is_err());

        let record = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.response_body, b"not-json".to_vec());
    }

    #[tokio::test]
    async fn disabled_audit_dispatches_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = MockClient::ok();
        let client = WebhookClient::new(transport, "bot-key")
            .with_audit(ChannelSink { tx })
            .with_audit_enabled(false);

        client.send(hello()).await.unwrap();
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn transport_failure_dispatches_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = MockClient::new(Reply::Refused);
        let client = WebhookClient::new(transport, "bot-key").with_audit(ChannelSink { tx });

        assert!(client.send(hello()).await.is_err());
        tokio::task::yield_now().await;

        assert!(rx.try_recv().is_err());
    }
}
