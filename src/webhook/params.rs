//! Request parameters and message body builders.
//!
//! A webhook body is a flat JSON object. [`Params`] is that object; the
//! builders below produce the common bot message shapes so callers do not
//! have to assemble the nested `content` objects by hand.

use serde_json::{Map, Value, json};

/// JSON object sent as the webhook request body.
pub type Params = Map<String, Value>;

/// Key the signed send uses for the Unix timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Key the signed send uses for the computed signature.
pub const SIGN_KEY: &str = "sign";

/// Converts a `json!` object literal into [`Params`].
///
/// Non-object values yield empty parameters.
#[must_use]
pub fn from_value(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Builds a plain text message.
#[must_use]
pub fn text(text: &str) -> Params {
    from_value(json!({
        "msg_type": "text",
        "content": { "text": text },
    }))
}

/// Builds a rich text (`post`) message in the `zh_cn` locale.
///
/// Each line becomes one paragraph containing a single text element.
#[must_use]
pub fn post<I, S>(title: &str, lines: I) -> Params
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let paragraphs: Vec<Value> = lines
        .into_iter()
        .map(|line| json!([{ "tag": "text", "text": line.as_ref() }]))
        .collect();

    from_value(json!({
        "msg_type": "post",
        "content": {
            "post": {
                "zh_cn": {
                    "title": title,
                    "content": paragraphs,
                }
            }
        },
    }))
}

/// Builds an image message from an uploaded image key.
#[must_use]
pub fn image(image_key: &str) -> Params {
    from_value(json!({
        "msg_type": "image",
        "content": { "image_key": image_key },
    }))
}

/// Builds a group business card message.
#[must_use]
pub fn share_chat(chat_id: &str) -> Params {
    from_value(json!({
        "msg_type": "share_chat",
        "content": { "share_chat_id": chat_id },
    }))
}

/// Builds an interactive card message from a card JSON object.
#[must_use]
pub fn interactive(card: Value) -> Params {
    from_value(json!({
        "msg_type": "interactive",
        "card": card,
    }))
}
