//! Client fingerprint captured when a visitor opens a session.

use serde::{Deserialize, Serialize};

/// Browser and page details reported by the embedding widget.
///
/// Every field is optional; widgets report what the browser exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMetadata {
    /// Browser user agent string.
    pub user_agent: Option<String>,
    /// Preferred language tag.
    pub language: Option<String>,
    /// All accepted language tags, comma separated.
    pub languages: Option<String>,
    /// Operating system platform.
    pub platform: Option<String>,
    /// Browser vendor.
    pub vendor: Option<String>,
    /// Screen resolution, for example `1920x1080`.
    pub screen_resolution: Option<String>,
    /// Viewport size, for example `1280x720`.
    pub viewport_size: Option<String>,
    /// IANA timezone name.
    pub timezone: Option<String>,
    /// Offset from UTC in minutes.
    pub timezone_offset: Option<i32>,
    /// Whether cookies are enabled.
    pub cookie_enabled: Option<bool>,
    /// Referring page.
    pub referrer: Option<String>,
    /// Page the widget was opened on.
    pub current_url: Option<String>,
}
