// Boundary Protocol
// JSON requests tagged by `action`, answered with `{ success, data?, settings?, error? }`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::error::ServiceError;
use crate::models::{Alert, DetectionResult, Settings};

pub const KNOWN_ACTIONS: [&str; 7] = [
    "analyzePage",
    "getDetectionData",
    "updateDetectionData",
    "addSecurityAlert",
    "getSettings",
    "updateSettings",
    "clearData",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    AnalyzePage {
        /// Raw analysis string; bypasses document extraction.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    GetDetectionData,
    UpdateDetectionData {
        data: DetectionResult,
    },
    AddSecurityAlert {
        alert: Alert,
    },
    GetSettings,
    UpdateSettings {
        settings: Settings,
    },
    ClearData,
}

impl Request {
    pub fn analyze_attached() -> Self {
        Request::AnalyzePage {
            text: None,
            path: None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::AnalyzePage { .. } => "analyzePage",
            Request::GetDetectionData => "getDetectionData",
            Request::UpdateDetectionData { .. } => "updateDetectionData",
            Request::AddSecurityAlert { .. } => "addSecurityAlert",
            Request::GetSettings => "getSettings",
            Request::UpdateSettings { .. } => "updateSettings",
            Request::ClearData => "clearData",
        }
    }
}

/// Unknown or missing actions are rejected before payload validation.
pub fn parse_request(value: Value) -> Result<Request, ServiceError> {
    let action = value.get("action").and_then(Value::as_str).unwrap_or_default();
    if !KNOWN_ACTIONS.contains(&action) {
        return Err(ServiceError::UnknownAction(action.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ServiceError::InvalidRequest(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn with_data<T: Serialize>(data: &T) -> Result<Self, ServiceError> {
        Ok(Self {
            success: true,
            data: Some(serde_json::to_value(data)?),
            ..Self::default()
        })
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            success: true,
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Error message of a failed response, or `ScanFailed` with `fallback`.
    pub fn into_result(self, fallback: &str) -> Result<Self, ServiceError> {
        if self.success {
            Ok(self)
        } else {
            Err(ServiceError::ScanFailed(
                self.error.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

impl From<ServiceError> for Response {
    fn from(err: ServiceError) -> Self {
        Response::failure(err.to_string())
    }
}
