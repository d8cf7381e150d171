use crate::{SendError, WeeklyRoutine};

#[allow(async_fn_in_trait)]
pub trait NotificationService {
    async fn send_notification(&self, notification: Notification) -> Result<(), SendError>;

    fn validate_recipient(&self, recipient: &str) -> Result<String, RecipientError> {
        validate_recipient(recipient)
    }
}

#[allow(async_fn_in_trait)]
pub trait NotificationRepository {
    async fn send_notification(&self, notification: Notification) -> Result<(), SendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    #[must_use]
    pub fn routine_summary(recipient: String, routine: &WeeklyRoutine) -> Self {
        let mut body = format!("Tu rutina \"{}\" está lista.\n", routine.name);
        for day in &routine.days {
            body.push_str(&format!("\n{} ({})\n", day.weekday, day.focus));
            if day.exercises.is_empty() {
                body.push_str("  Descanso activo\n");
            }
            for exercise in &day.exercises {
                body.push_str(&format!(
                    "  - {}: {} x {}\n",
                    exercise.name, exercise.sets, exercise.reps
                ));
            }
        }
        Self {
            recipient,
            subject: format!("Nueva rutina: {}", routine.name),
            body,
        }
    }
}

pub fn validate_recipient(recipient: &str) -> Result<String, RecipientError> {
    let recipient = recipient.trim();

    if recipient.is_empty() {
        return Err(RecipientError::Empty);
    }

    match recipient.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !recipient.contains(char::is_whitespace) =>
        {
            Ok(recipient.to_string())
        }
        _ => Err(RecipientError::Invalid(recipient.to_string())),
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecipientError {
    #[error("Recipient must not be empty")]
    Empty,
    #[error("Invalid email address \"{0}\"")]
    Invalid(String),
}
