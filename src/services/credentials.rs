//! Weekly rotation of the shared passwords.

use rand::Rng;

use crate::domain::credential::{Credential, CredentialKey};
use crate::domain::types::NonEmptyString;
use crate::models::config::RotationConfig;
use crate::models::zmq::ZmqEmailMessage;
use crate::repository::CredentialWriter;
use crate::services::ServiceResult;

pub const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

pub const ROTATION_SUBJECT: &str = "🔐 Nuevas Contraseñas Semanales - Link Energy";

/// Outbound channel for notification emails.
pub trait EmailSender {
    fn send_email(&self, message: &ZmqEmailMessage) -> ServiceResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedPasswords {
    pub manager: String,
    pub commercial: String,
}

/// Draws `length` characters uniformly from [`PASSWORD_CHARSET`].
pub fn generate_password<G>(rng: &mut G, length: usize) -> String
where
    G: Rng + ?Sized,
{
    (0..length)
        .map(|_| char::from(PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())]))
        .collect()
}

fn password_card(title: &str, password: &str, background: &str, color: &str) -> String {
    // `&` is the only markup-significant character in the charset.
    let password = password.replace('&', "&amp;");
    format!(
        r#"<div style="background: {background}; padding: 20px; border-radius: 8px; text-align: center; min-width: 200px;">
<span style="font-size: 14px; color: {color}; text-transform: uppercase; font-weight: bold;">{title}</span><br/>
<strong style="font-size: 24px; color: {color}; letter-spacing: 1px;">{password}</strong>
</div>"#
    )
}

pub fn rotation_email(recipients: &[String], passwords: &RotatedPasswords) -> ZmqEmailMessage {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; color: #333;">
<h2 style="color: #4f46e5;">Rotación Semanal de Contraseñas</h2>
<p>Hola,</p>
<p>Las contraseñas de acceso han sido actualizadas:</p>
<div style="display: flex; gap: 20px; flex-wrap: wrap; justify-content: center; margin: 30px 0;">
{manager}
{commercial}
</div>
<p style="font-size: 12px; color: #6b7280; text-align: center;">Válidas hasta el próximo lunes a las 9:00 AM.</p>
</div>"#,
        manager = password_card("Gerente", &passwords.manager, "#f3f4f6", "#4f46e5"),
        commercial = password_card("Comerciales", &passwords.commercial, "#ecfeff", "#0e7490"),
    );

    ZmqEmailMessage {
        recipients: recipients.to_vec(),
        subject: ROTATION_SUBJECT.to_string(),
        html,
    }
}

/// Generates both passwords, stores them in one transaction and emails them.
///
/// The email goes out only after the store accepted the new values.
pub fn rotate_credentials<R, S, G>(
    repo: &R,
    sender: &S,
    rng: &mut G,
    config: &RotationConfig,
) -> ServiceResult<RotatedPasswords>
where
    R: CredentialWriter + ?Sized,
    S: EmailSender + ?Sized,
    G: Rng + ?Sized,
{
    let passwords = RotatedPasswords {
        manager: generate_password(rng, config.manager_password_length),
        commercial: generate_password(rng, config.commercial_password_length),
    };

    let credentials = [
        Credential::new(
            CredentialKey::ManagerPassword,
            NonEmptyString::new(passwords.manager.as_str())?,
        ),
        Credential::new(
            CredentialKey::CommercialPassword,
            NonEmptyString::new(passwords.commercial.as_str())?,
        ),
    ];

    repo.upsert_credentials(&credentials).map_err(|err| {
        log::error!("Failed to store rotated passwords: {err}");
        err
    })?;
    log::info!("Stored rotated passwords");

    sender
        .send_email(&rotation_email(&config.rotation_recipients, &passwords))
        .map_err(|err| {
            log::error!("Failed to send the rotation email: {err}");
            err
        })?;
    log::info!(
        "Rotation email queued for {} recipient(s)",
        config.rotation_recipients.len()
    );

    Ok(passwords)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use crate::services::ServiceError;

    #[derive(Default)]
    struct Store {
        saved: RefCell<Vec<Credential>>,
        fail: bool,
    }

    impl CredentialWriter for Store {
        fn upsert_credentials(&self, credentials: &[Credential]) -> RepositoryResult<()> {
            if self.fail {
                return Err(RepositoryError::ConnectionError("locked".into()));
            }
            self.saved.replace(credentials.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: RefCell<Vec<ZmqEmailMessage>>,
    }

    impl EmailSender for Outbox {
        fn send_email(&self, message: &ZmqEmailMessage) -> ServiceResult<()> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    fn config() -> RotationConfig {
        RotationConfig {
            database_url: ":memory:".into(),
            zmq_emailer_pub: "tcp://127.0.0.1:5557".into(),
            rotation_recipients: vec!["boss@example.com".into()],
            manager_password_length: 10,
            commercial_password_length: 8,
        }
    }

    #[test]
    fn generated_passwords_use_the_charset() {
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate_password(&mut rng, 64);
        assert_eq!(password.len(), 64);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn rotation_stores_then_emails_both_passwords() {
        let store = Store::default();
        let outbox = Outbox::default();
        let mut rng = StdRng::seed_from_u64(42);

        let passwords =
            rotate_credentials(&store, &outbox, &mut rng, &config()).expect("rotation succeeds");
        assert_eq!(passwords.manager.len(), 10);
        assert_eq!(passwords.commercial.len(), 8);

        let saved = store.saved.borrow();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].key, CredentialKey::ManagerPassword);
        assert!(saved[0].matches(&passwords.manager));
        assert!(saved[1].matches(&passwords.commercial));

        let sent = outbox.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, ROTATION_SUBJECT);
        assert_eq!(sent[0].recipients, vec!["boss@example.com".to_string()]);
        assert!(sent[0].html.contains(&passwords.manager.replace('&', "&amp;")));
        assert!(sent[0].html.contains(&passwords.commercial.replace('&', "&amp;")));
    }

    #[test]
    fn failed_store_sends_nothing() {
        let store = Store {
            fail: true,
            ..Store::default()
        };
        let outbox = Outbox::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = rotate_credentials(&store, &outbox, &mut rng, &config());
        assert!(matches!(result, Err(ServiceError::Repository(_))));
        assert!(outbox.sent.borrow().is_empty());
    }
}
