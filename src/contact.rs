//! Contactformulier zonder backend.
//!
//! Versturen wacht een vaste tijd en meldt daarna altijd succes. Alleen de
//! controles aan de clientkant (verplichte velden, e-mailvorm, dubbel
//! versturen) kunnen falen.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gesimuleerde verzendtijd.
pub const SUBMIT_DELAY_MS: u32 = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Zoek een veld op aan de hand van zijn formuliernaam.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("veld `{}` is verplicht", .0.name())]
    MissingField(ContactField),
    #[error("`{0}` is geen geldig e-mailadres")]
    InvalidEmail(String),
    #[error("er wordt al een bericht verstuurd")]
    AlreadySubmitting,
}

impl ContactMessage {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            (ContactField::Name, &self.name),
            (ContactField::Email, &self.email),
            (ContactField::Message, &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }

        if !looks_like_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }
}

/// Zelfde eisen als een `type="email"` invoerveld: één `@`, niets leegs
/// eromheen en geen witruimte.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
}

/// Bevestiging van een (gesimuleerde) verzending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub name: String,
    pub delay_ms: u32,
}

/// Wachtmechanisme voor de gesimuleerde verzendtijd.
pub trait SubmitDelay {
    type Wait: Future<Output = ()>;

    fn wait(&self, duration_ms: u32) -> Self::Wait;
}

/// Wacht niet; voor tests en native gebruik.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateDelay;

impl SubmitDelay for ImmediateDelay {
    type Wait = std::future::Ready<()>;

    fn wait(&self, _duration_ms: u32) -> Self::Wait {
        std::future::ready(())
    }
}

/// Wacht met `setTimeout` in de browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerDelay;

#[cfg(target_arch = "wasm32")]
impl SubmitDelay for TimerDelay {
    type Wait = gloo::timers::future::TimeoutFuture;

    fn wait(&self, duration_ms: u32) -> Self::Wait {
        gloo::timers::future::TimeoutFuture::new(duration_ms)
    }
}

/// Verstuur een bericht. Na validatie slaagt dit altijd.
pub async fn submit_message<D: SubmitDelay>(
    message: ContactMessage,
    delay: &D,
) -> Result<SubmitReceipt, ContactError> {
    message.validate()?;
    log::debug!("contactbericht van `{}` wordt verstuurd", message.name);

    delay.wait(SUBMIT_DELAY_MS).await;

    log::info!(
        "contactbericht ontvangen: {} <{}> ({} tekens)",
        message.name,
        message.email,
        message.message.chars().count()
    );
    Ok(SubmitReceipt {
        name: message.name,
        delay_ms: SUBMIT_DELAY_MS,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
}

/// Formuliertoestand: concept-bericht en verzendstatus.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    draft: ContactMessage,
    status: SubmitStatus,
}

impl ContactForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draft(&self) -> &ContactMessage {
        &self.draft
    }

    #[must_use]
    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
    }

    /// Controleer het concept en markeer het formulier als bezig.
    pub fn begin_submit(&mut self) -> Result<ContactMessage, ContactError> {
        if self.status == SubmitStatus::Submitting {
            return Err(ContactError::AlreadySubmitting);
        }
        self.draft.validate()?;
        self.status = SubmitStatus::Submitting;
        Ok(self.draft.clone())
    }

    /// Leeg het formulier na een afgeronde verzending.
    pub fn finish_submit(&mut self) {
        self.draft = ContactMessage::default();
        self.status = SubmitStatus::Idle;
    }

    pub async fn submit<D: SubmitDelay>(&mut self, delay: &D) -> Result<SubmitReceipt, ContactError> {
        let message = self.begin_submit()?;
        let receipt = submit_message(message, delay).await;
        self.finish_submit();
        receipt
    }
}
