//! Datastructures for parsing the response of `GetData`.
//!
//! The HTTP body is `{ "d": "<base64>" }`, where the base64 payload is a
//! compressed JSON document.

use crate::error::{DsbError, Result};
use base64::{engine::general_purpose, Engine as _};
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use log::debug;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// The status part of a response, read before the menu.
#[derive(Debug, Deserialize)]
struct ResultStatus {
    #[serde(rename = "Resultcode", alias = "ResultCode")]
    result_code: i64,
    #[serde(rename = "ResultStatusInfo", default)]
    result_status_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// 0 on success. The server spells it `Resultcode`.
    #[serde(rename = "Resultcode", alias = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultStatusInfo", default)]
    pub result_status_info: Option<String>,
    #[serde(rename = "ResultMenuItems", default, deserialize_with = "null_as_empty")]
    pub result_menu_items: Vec<MenuNode>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<MenuNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MenuNode>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the server's menu.
///
/// Pages put their content under `Root`, content nodes under `Childs`.
/// `Childs` is sometimes a single node and sometimes a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuNode {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    /// Document URL on leaves
    #[serde(rename = "Detail", default)]
    pub detail: Option<String>,
    #[serde(rename = "Root", default)]
    pub root: Option<Box<MenuNode>>,
    #[serde(rename = "Childs", default)]
    pub childs: Option<Childs>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Childs {
    Many(Vec<MenuNode>),
    One(Box<MenuNode>),
}

/// A menu node with the shape of `Childs` resolved.
#[derive(Debug, PartialEq)]
pub enum NodeShape<'a> {
    /// No children, carries a document URL.
    Leaf(&'a str),
    /// Children in source order (`Root` first).
    Branch(Vec<&'a MenuNode>),
    /// No children and no document.
    Empty,
}

impl MenuNode {
    pub fn shape(&self) -> NodeShape<'_> {
        let mut children: Vec<&MenuNode> = self.root.iter().map(|r| r.as_ref()).collect();
        match &self.childs {
            Some(Childs::Many(nodes)) => children.extend(nodes.iter()),
            Some(Childs::One(node)) => children.push(node.as_ref()),
            None => {}
        }

        if !children.is_empty() {
            return NodeShape::Branch(children);
        }

        match self.detail.as_deref() {
            Some(detail) if !detail.is_empty() => NodeShape::Leaf(detail),
            _ => NodeShape::Empty,
        }
    }
}

/// Decode the raw HTTP body of a `GetData` response.
///
/// Fails with [`DsbError::Decode`] on malformed payloads and with
/// [`DsbError::Api`] when the server reports a non-zero result code.
pub fn decode(raw_body: &str) -> Result<ResponseEnvelope> {
    let outer: serde_json::Value = serde_json::from_str(raw_body)
        .map_err(|e| DsbError::Decode(format!("Response body is not JSON: {}", e)))?;
    let payload = outer["d"]
        .as_str()
        .ok_or(DsbError::Decode("Response has no `d` field".to_string()))?;

    let compressed = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DsbError::Decode(format!("Payload is not base64: {}", e)))?;
    let json = inflate(&compressed)?;
    debug!("Decoded response payload ({} bytes)", json.len());

    let value: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| DsbError::Decode(format!("Payload is not JSON: {}", e)))?;

    // 先看结果码，失败时菜单可能是 null
    let status = ResultStatus::deserialize(&value)
        .map_err(|e| DsbError::Decode(format!("Payload has no result code: {}", e)))?;
    if status.result_code != 0 {
        return Err(DsbError::Api {
            message: status.result_status_info.unwrap_or_default(),
        });
    }

    ResponseEnvelope::deserialize(&value)
        .map_err(|e| DsbError::Decode(format!("Payload is not a valid response: {}", e)))
}

/// Decompress gzip, zlib or raw deflate data, picking the format from the
/// header bytes.
fn inflate(data: &[u8]) -> Result<String> {
    let mut out = String::new();
    let result = match data {
        [0x1f, 0x8b, ..] => GzDecoder::new(data).read_to_string(&mut out),
        [cmf, flg, ..] if cmf & 0x0f == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0 => {
            ZlibDecoder::new(data).read_to_string(&mut out)
        }
        _ => DeflateDecoder::new(data).read_to_string(&mut out),
    };
    result.map_err(|e| DsbError::Decode(format!("Cannot decompress payload: {}", e)))?;

    Ok(out)
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    /// Wrap a JSON document the way the server does.
    pub fn server_body(payload: &serde_json::Value) -> String {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(payload.to_string().as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        serde_json::json!({ "d": general_purpose::STANDARD.encode(compressed) }).to_string()
    }

    fn ok_payload() -> serde_json::Value {
        serde_json::json!({
            "Resultcode": 0,
            "ResultStatusInfo": "",
            "ResultMenuItems": [{
                "Title": "Inhalte",
                "Childs": [{
                    "Title": "Pläne",
                    "Root": { "Childs": [
                        { "Childs": { "Detail": "https://example.com/a/subst_001.htm" } }
                    ]}
                }]
            }]
        })
    }

    #[test]
    fn decodes_gzip_payload() {
        let envelope = decode(&server_body(&ok_payload())).unwrap();
        assert_eq!(envelope.result_code, 0);
        assert_eq!(envelope.result_menu_items.len(), 1);
        assert_eq!(envelope.result_menu_items[0].title.as_deref(), Some("Inhalte"));
    }

    #[test]
    fn inflate_accepts_all_deflate_wrappers() {
        let text = "{\"Resultcode\":0}";

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(text.as_bytes()).unwrap();
        assert_eq!(inflate(&zlib.finish().unwrap()).unwrap(), text);

        let mut raw = DeflateEncoder::new(Vec::new(), Compression::default());
        raw.write_all(text.as_bytes()).unwrap();
        assert_eq!(inflate(&raw.finish().unwrap()).unwrap(), text);
    }

    #[test]
    fn nonzero_result_code_is_api_error() {
        let payload = serde_json::json!({
            "Resultcode": 1,
            "ResultStatusInfo": "Invalid credentials",
            "ResultMenuItems": []
        });
        match decode(&server_body(&payload)) {
            Err(DsbError::Api { message }) => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn null_menu_on_failure_keeps_server_message() {
        let payload = serde_json::json!({
            "Resultcode": 1,
            "ResultStatusInfo": "Invalid credentials",
            "ResultMenuItems": null
        });
        match decode(&server_body(&payload)) {
            Err(DsbError::Api { message }) => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected api error, got {:?}", other),
        }

        let payload = serde_json::json!({ "Resultcode": 0, "ResultMenuItems": null });
        assert!(decode(&server_body(&payload)).unwrap().result_menu_items.is_empty());
    }

    #[test]
    fn accepts_result_code_alias() {
        let payload = serde_json::json!({ "ResultCode": 0, "ResultMenuItems": [] });
        let envelope = decode(&server_body(&payload)).unwrap();
        assert!(envelope.result_menu_items.is_empty());
        assert_eq!(envelope.result_status_info, None);
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        assert!(matches!(decode("not json"), Err(DsbError::Decode(_))));
        assert!(matches!(decode("{}"), Err(DsbError::Decode(_))));
        assert!(matches!(decode(r#"{"d":"***"}"#), Err(DsbError::Decode(_))));

        let garbage = general_purpose::STANDARD.encode(b"\x1f\x8bnot really gzip");
        let body = serde_json::json!({ "d": garbage }).to_string();
        assert!(matches!(decode(&body), Err(DsbError::Decode(_))));

        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"[1, 2").unwrap();
        let body = serde_json::json!({ "d": general_purpose::STANDARD.encode(enc.finish().unwrap()) });
        assert!(matches!(decode(&body.to_string()), Err(DsbError::Decode(_))));
    }

    #[test]
    fn node_shape_normalizes_childs() {
        let one: MenuNode =
            serde_json::from_value(serde_json::json!({ "Childs": { "Detail": "x.htm" } })).unwrap();
        let NodeShape::Branch(children) = one.shape() else {
            panic!("single child should be a branch");
        };
        assert_eq!(children[0].shape(), NodeShape::Leaf("x.htm"));

        let empty_list: MenuNode =
            serde_json::from_value(serde_json::json!({ "Childs": [], "Detail": "y.jpg" })).unwrap();
        assert_eq!(empty_list.shape(), NodeShape::Leaf("y.jpg"));

        let nothing: MenuNode =
            serde_json::from_value(serde_json::json!({ "Childs": null, "Detail": "" })).unwrap();
        assert_eq!(nothing.shape(), NodeShape::Empty);
    }
}
