//! The outgoing `GetData` request: auth parameters and their envelope.

use crate::error::{DsbError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Constant client metadata the server expects to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub app_version: String,
    pub language: String,
    pub os_version: String,
    pub device: String,
    pub bundle_id: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            app_version: "2.5.9".to_string(),
            language: "de".to_string(),
            os_version: "28 8.0".to_string(),
            device: "SM-G930F".to_string(),
            bundle_id: "de.heinekingmedia.dsbmobile".to_string(),
        }
    }
}

/// Source of the per-request `AppId`.
pub trait AppIdProvider: Send + Sync {
    fn app_id(&self) -> String;
}

/// Random UUID v4, a fresh one per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAppId;

impl AppIdProvider for RandomAppId {
    fn app_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Source of the `Date`/`LastUpdate` timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Login parameters sent with every data request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthRequest {
    pub user_id: String,
    pub user_pw: String,
    pub app_version: String,
    pub language: String,
    pub os_version: String,
    pub app_id: String,
    pub device: String,
    pub bundle_id: String,
    pub date: String,
    pub last_update: String,
}

impl AuthRequest {
    pub fn new(
        username: &str,
        password: &str,
        profile: &DeviceProfile,
        ids: &dyn AppIdProvider,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now().format(TIME_FMT).to_string();

        Self {
            user_id: username.to_string(),
            user_pw: password.to_string(),
            app_version: profile.app_version.clone(),
            language: profile.language.clone(),
            os_version: profile.os_version.clone(),
            app_id: ids.app_id(),
            device: profile.device.clone(),
            bundle_id: profile.bundle_id.clone(),
            date: now.clone(),
            last_update: now,
        }
    }
}

/// `{ Data, DataType }` as found under `req` in the POST body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompressedEnvelope {
    pub data: String,
    pub data_type: u8,
}

impl CompressedEnvelope {
    /// The complete JSON body of the `GetData` POST.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "req": self })
    }
}

pub fn encode(request: &AuthRequest) -> Result<CompressedEnvelope> {
    let json = serde_json::to_string(request)?;

    Ok(CompressedEnvelope {
        data: general_purpose::STANDARD.encode(json),
        data_type: 1,
    })
}

/// Reverse of [`encode`].
pub fn decode_request(envelope: &CompressedEnvelope) -> Result<serde_json::Value> {
    let raw = general_purpose::STANDARD
        .decode(&envelope.data)
        .map_err(|e| DsbError::Decode(format!("Request data is not base64: {}", e)))?;

    serde_json::from_slice(&raw).map_err(|e| DsbError::Decode(format!("Request data is not JSON: {}", e)))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    pub struct FixedId;
    impl AppIdProvider for FixedId {
        fn app_id(&self) -> String {
            "00000000-0000-4000-8000-000000000000".to_string()
        }
    }

    pub struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 3, 4, 7, 30, 15).unwrap()
        }
    }

    fn sample() -> AuthRequest {
        AuthRequest::new("299761", "secret", &DeviceProfile::default(), &FixedId, &FixedClock)
    }

    #[test]
    fn request_fields_are_filled() {
        let req = sample();
        assert_eq!(req.user_id, "299761");
        assert_eq!(req.language, "de");
        assert_eq!(req.date, "2024-03-04T07:30:15Z");
        assert_eq!(req.date, req.last_update);
        assert_eq!(req.app_id, "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["UserId"], "299761");
        assert_eq!(json["UserPw"], "secret");
        assert_eq!(json["BundleId"], "de.heinekingmedia.dsbmobile");
        assert_eq!(json["OsVersion"], "28 8.0");
        assert_eq!(json["LastUpdate"], "2024-03-04T07:30:15Z");
    }

    #[test]
    fn envelope_round_trips() {
        let req = sample();
        let envelope = encode(&req).unwrap();
        assert_eq!(envelope.data_type, 1);

        let back = decode_request(&envelope).unwrap();
        assert_eq!(back, serde_json::to_value(&req).unwrap());
    }

    #[test]
    fn body_wraps_envelope_in_req() {
        let body = encode(&sample()).unwrap().to_body();
        assert_eq!(body["req"]["DataType"], 1);
        assert!(body["req"]["Data"].is_string());
    }

    #[test]
    fn random_ids_look_like_uuid_v4() {
        let id = RandomAppId.app_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(id, RandomAppId.app_id());
    }
}
