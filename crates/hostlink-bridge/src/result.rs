//! Classification of host resolution payloads.
//!
//! The host answers a command with a serialized `Result`, which serde writes
//! as an externally tagged `{"Ok": value}` or `{"Err": value}`. Anything else
//! is a raw value returned as-is.

use hostlink_common::BridgeError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    Ok(Value),
    Err(Value),
    Raw(Value),
}

impl ResultEnvelope {
    /// Classify a resolution payload.
    ///
    /// Any object carrying an `Ok` key is a success, even with extra keys.
    /// Otherwise an `Err` key makes it a failure.
    pub fn classify(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::Raw(value);
        };

        if let Some(ok) = map.remove("Ok") {
            Self::Ok(ok)
        } else if let Some(err) = map.remove("Err") {
            Self::Err(err)
        } else {
            Self::Raw(Value::Object(map))
        }
    }

    pub fn into_result(self) -> Result<Value, BridgeError> {
        match self {
            Self::Ok(value) | Self::Raw(value) => Ok(value),
            Self::Err(value) => Err(BridgeError::HostReported(value)),
        }
    }
}
