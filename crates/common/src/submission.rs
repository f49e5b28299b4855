//! The value emitted when the user confirms the pairing form

use serde::{Deserialize, Serialize};

/// A confirmed pairing request: the composed address and the pairing code
///
/// Built once per confirmation and consumed once by whoever holds the
/// receiving end of the submission channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingSubmission {
    /// Host and port as composed by the active [`AddressJoin`](crate::AddressJoin)
    pub addr: String,
    /// Pairing code as typed
    pub pairing_code: String,
}

impl PairingSubmission {
    pub fn new(addr: impl Into<String>, pairing_code: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            pairing_code: pairing_code.into(),
        }
    }
}

impl std::fmt::Display for PairingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.addr, "*".repeat(self.pairing_code.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let submission = PairingSubmission::new("192.168.1.5:8080", "123456");
        let json = serde_json::to_string(&submission).unwrap();
        assert_eq!(json, r#"{"addr":"192.168.1.5:8080","pairingCode":"123456"}"#);
    }

    #[test]
    fn test_display_masks_code() {
        let submission = PairingSubmission::new("10.0.0.2:37000", "987654");
        assert_eq!(submission.to_string(), "10.0.0.2:37000 (code ******)");
    }
}
