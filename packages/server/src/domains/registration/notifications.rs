//! OTP message templates

use crate::kernel::EmailMessage;

pub const OTP_EMAIL_SUBJECT: &str = "Your OTP for Vendor Registration";

pub fn otp_email(to: &str, code: &str, ttl_minutes: i64) -> EmailMessage {
    let text = format!(
        "Your OTP for vendor registration is: {code}. This OTP is valid for {ttl_minutes} minutes and can be used only once."
    );
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e0e0e0; border-radius: 5px;">
  <h2 style="color: #333;">Vendor Registration OTP</h2>
  <p>Thank you for registering as a vendor. Please use the following OTP to verify your email address:</p>
  <div style="background-color: #f5f5f5; padding: 10px; text-align: center; font-size: 24px; letter-spacing: 5px; font-weight: bold; margin: 20px 0;">{code}</div>
  <p>This OTP is valid for {ttl_minutes} minutes and can be used only once.</p>
  <p>If you did not request this OTP, please ignore this email.</p>
</div>"#
    );

    EmailMessage {
        to: to.to_string(),
        subject: OTP_EMAIL_SUBJECT.to_string(),
        html,
        text,
    }
}

pub fn otp_sms(code: &str, ttl_minutes: i64) -> String {
    format!("Your OTP for registration is: {code}. It is valid for {ttl_minutes} minutes.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_carries_code_in_both_bodies() {
        let message = otp_email("v@x.com", "482913", 15);
        assert_eq!(message.to, "v@x.com");
        assert_eq!(message.subject, OTP_EMAIL_SUBJECT);
        assert!(message.text.contains("482913"));
        assert!(message.text.contains("15 minutes"));
        assert!(message.html.contains("482913"));
    }

    #[test]
    fn sms_body_starts_with_code() {
        assert!(otp_sms("482913", 10).starts_with("Your OTP for registration is: 482913"));
    }
}
