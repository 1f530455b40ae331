use html_escape::{encode_double_quoted_attribute, encode_text};

use super::FeedbackInvite;
use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[must_use]
pub fn submission_link(base: &str, token: &str) -> String {
    format!("{}/submit/{token}", base.trim_end_matches('/'))
}

/// Renders the invitation sent to a candidate when a request is issued.
#[must_use]
pub fn render_invitation(invite: &FeedbackInvite, mail: &MailConfig) -> RenderedEmail {
    let link = submission_link(&mail.feedback_url_base, &invite.token);
    let name = invite
        .candidate_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("applicant");
    let sender = encode_text(&mail.sender_name);

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 30px; line-height: 1.6;">
  <p style="font-size: 16px;"><strong>Dear {name},</strong></p>
  <p style="font-size: 15px;">You have been invited to give feedback on your recent interview. If you wish, please fill in the form behind the link below:</p>
  <p style="margin: 25px 0;"><a href="{href}"><strong>Go to form</strong></a></p>
  <p style="font-size: 14px;">This link is personal and can be used once.</p>
  <p style="font-size: 14px;">Thank you for your time.</p>
  <p style="font-size: 14px;">Best regards,<br/>{sender}</p>
  <hr style="margin-top: 40px; border: none; border-top: 1px solid #ccc;" />
  <p style="font-size: 12px; color: #666;">This is an automated message, please do not reply.</p>
</div>"#,
        name = encode_text(name),
        href = encode_double_quoted_attribute(&link),
    );

    RenderedEmail {
        subject: mail.subject.clone(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(name: Option<&str>) -> FeedbackInvite {
        FeedbackInvite {
            candidate_email: "jane@example.com".to_string(),
            candidate_name: name.map(ToString::to_string),
            token: "abc123".to_string(),
        }
    }

    #[test]
    fn greets_by_name_and_links_to_submission_page() {
        let mail = MailConfig {
            feedback_url_base: "https://jobs.example.org/".to_string(),
            ..MailConfig::default()
        };
        let email = render_invitation(&invite(Some("Jane")), &mail);

        assert_eq!(email.subject, mail.subject);
        assert!(email.html.contains("Dear Jane,"));
        assert!(email.html.contains("href=\"https://jobs.example.org/submit/abc123\""));
    }

    #[test]
    fn falls_back_to_applicant() {
        let email = render_invitation(&invite(None), &MailConfig::default());
        assert!(email.html.contains("Dear applicant,"));

        let email = render_invitation(&invite(Some("   ")), &MailConfig::default());
        assert!(email.html.contains("Dear applicant,"));
    }

    #[test]
    fn escapes_candidate_name() {
        let email = render_invitation(
            &invite(Some("<script>alert(1)</script>")),
            &MailConfig::default(),
        );
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
    }
}
