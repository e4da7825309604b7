pub mod admin;
pub mod email_change;
pub mod password_reset;
pub mod signup;

/// Acknowledgement for enumeration-sensitive OTP sends. Byte-identical
/// whether or not the identity exists, by design.
pub const OTP_SENT_GENERIC: &str = "If the email is registered, a verification code has been sent.";

/// Acknowledgement for sends whose preconditions already disclose existence
/// (signup, email change).
pub const OTP_SENT: &str = "Verification code sent.";
