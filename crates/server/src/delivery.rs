//! Outbound email delivery.
//!
//! The batch only depends on the [`Delivery`] trait so tests can swap in a recording
//! implementation; production uses lettre's async SMTP transport.

use std::future::Future;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::DeliveryError;

/// A rendered email in both of its forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailBody {
    pub text: String,
    pub html: String,
}

/// Sends one message to one recipient.
pub trait Delivery: Send + Sync {
    fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &EmailBody,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|e: lettre::address::AddressError| DeliveryError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug)]
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpDelivery {
    /// Build the transport. No connection is opened until the first send.
    pub fn from_config(smtp: &SmtpConfig) -> Result<Self, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.server)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: parse_mailbox(&smtp.from)?,
        })
    }

    fn build_message(
        &self,
        recipient: &str,
        subject: &str,
        body: &EmailBody,
    ) -> Result<Message, DeliveryError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(subject)
            .header(lettre::message::header::MIME_VERSION_1_0)
            .message_id(None)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(body.html.clone()),
                    ),
            )
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }
}

impl Delivery for SmtpDelivery {
    fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &EmailBody,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        async move {
            let message = self.build_message(recipient, subject, body)?;
            self.transport
                .send(message)
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
            Ok(())
        }
    }
}
