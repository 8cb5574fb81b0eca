//! HTTP header name constants used by the security posture check.

/// HTTP Strict Transport Security header
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
/// Content Security Policy header
pub const HEADER_CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
/// X-Frame-Options header
pub const HEADER_X_FRAME_OPTIONS: &str = "X-Frame-Options";
/// X-Content-Type-Options header
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";

/// Security headers recorded in the check details.
pub const SECURITY_HEADERS: &[&str] = &[
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
    HEADER_X_CONTENT_TYPE_OPTIONS,
    HEADER_CONTENT_SECURITY_POLICY,
];

/// Headers that disclose server software, with the label used in findings.
pub const DISCLOSURE_HEADERS: &[(&str, &str)] = &[
    ("Server", "Server Version Disclosed"),
    ("X-Powered-By", "Tech Stack Disclosed"),
    ("X-AspNet-Version", "ASP.NET Version Disclosed"),
];
