use crate::core::Notifier;
use crate::domain::model::Digest;
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Port for SMTP over implicit TLS; any other port negotiates STARTTLS.
pub const SMTPS_PORT: u16 = 465;

#[derive(Clone)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

pub struct SmtpNotifier {
    from: Mailbox,
    to: Mailbox,
    recipient: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: &MailSettings) -> Result<Self> {
        let from: Mailbox = settings.from.parse()?;
        let to: Mailbox = settings.to.parse()?;

        let builder = if settings.smtp_port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
        };

        // 帳號即寄件人地址
        let transport = builder
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.from.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            from,
            to,
            recipient: settings.to.clone(),
            transport,
        })
    }

    fn build_message(&self, digest: &Digest) -> Result<Message> {
        build_message(&self.from, &self.to, digest)
    }
}

fn build_message(from: &Mailbox, to: &Mailbox, digest: &Digest) -> Result<Message> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(digest.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(digest.body.clone())?;
    Ok(message)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn recipient(&self) -> &str {
        &self.recipient
    }

    async fn deliver(&self, digest: &Digest) -> Result<()> {
        let message = self.build_message(digest)?;
        tracing::debug!("Sending '{}' to {}", digest.subject, self.recipient);
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Prints the digest instead of sending it. Used by `--dry-run`.
pub struct ConsoleNotifier {
    recipient: String,
}

impl ConsoleNotifier {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn recipient(&self) -> &str {
        &self.recipient
    }

    async fn deliver(&self, digest: &Digest) -> Result<()> {
        println!("To: {}", self.recipient);
        println!("Subject: {}", digest.subject);
        println!();
        print!("{}", digest.body);
        Ok(())
    }
}
