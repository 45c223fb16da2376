//! Client platform identification sent with game-API requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Platform details the game API expects in the `X-Riot-ClientPlatform`
/// header, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    #[serde(rename = "platformType")]
    pub platform_type: String,
    #[serde(rename = "platformOS")]
    pub os: String,
    #[serde(rename = "platformOSVersion")]
    pub os_version: String,
    #[serde(rename = "platformChipset")]
    pub chipset: String,
}

impl PlatformInfo {
    /// The platform the API is known to accept.
    pub fn supported_example() -> Self {
        Self {
            platform_type: "PC".into(),
            os: "Windows".into(),
            os_version: "10.0.19042.1.256.64bit".into(),
            chipset: "Unknown".into(),
        }
    }

    /// Base64-encoded JSON form, as sent on the wire.
    #[must_use]
    pub fn encoded(&self) -> String {
        // Serialization of this struct cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(json)
    }
}
