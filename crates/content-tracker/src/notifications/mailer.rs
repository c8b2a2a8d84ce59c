use serde::Serialize;
use tracing::info;

use super::templates::RenderedEmail;
use crate::config::MailConfig;

/// A fully addressed message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    /// Address `rendered` to `to`, copying the team lead unless they are the
    /// recipient.
    pub fn compose(config: &MailConfig, to: &str, rendered: RenderedEmail) -> Self {
        let to = to.trim().to_string();
        let cc = if to.eq_ignore_ascii_case(&config.team_lead) {
            None
        } else {
            Some(config.team_lead.clone())
        };

        Self {
            from: config.sender.clone(),
            to,
            cc,
            subject: rendered.subject,
            html: rendered.html,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// Outbound e-mail hook. Implementations decide how a message leaves the
/// process.
pub trait Mailer: Send + Sync {
    fn deliver(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("recipient {recipient} rejected: {reason}")]
    Rejected { recipient: String, reason: String },
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Transport that records each message as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn deliver(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        if !email.to.contains('@') {
            return Err(MailError::Rejected {
                recipient: email.to.clone(),
                reason: "not an e-mail address".to_string(),
            });
        }

        let message_id = uuid::Uuid::new_v4().to_string();
        info!(
            %message_id,
            from = %email.from,
            to = %email.to,
            cc = email.cc.as_deref().unwrap_or("-"),
            subject = %email.subject,
            bytes = email.html.len(),
            "email dispatched"
        );
        Ok(DeliveryReceipt { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered() -> RenderedEmail {
        RenderedEmail {
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[test]
    fn team_lead_is_copied_on_other_recipients() {
        let config = MailConfig::default();
        let email = OutgoingEmail::compose(&config, "daniel@m51.no", rendered());
        assert_eq!(email.cc.as_deref(), Some("emma@m51.no"));
        assert_eq!(email.from, config.sender);
    }

    #[test]
    fn team_lead_is_not_copied_on_own_mail() {
        let config = MailConfig::default();
        let email = OutgoingEmail::compose(&config, "EMMA@m51.no", rendered());
        assert!(email.cc.is_none());
    }

    #[test]
    fn tracing_mailer_rejects_malformed_addresses() {
        let config = MailConfig::default();
        let email = OutgoingEmail::compose(&config, "not-an-address", rendered());
        assert!(matches!(
            TracingMailer.deliver(&email),
            Err(MailError::Rejected { .. })
        ));

        let email = OutgoingEmail::compose(&config, "asgeir@m51.no", rendered());
        let receipt = TracingMailer.deliver(&email).expect("delivered");
        assert!(!receipt.message_id.is_empty());
    }
}
