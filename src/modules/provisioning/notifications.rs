//! Credentials email sent once an account has been committed.

use schoolhub_config::EmailConfig;
use schoolhub_models::User;
use schoolhub_observability::track_credentials_mail;
use tracing::{info, warn};

use crate::utils::email::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Student,
    Staff,
    Driver,
    Parent,
}

impl AccountKind {
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Student => "Student",
            AccountKind::Staff => "Staff",
            AccountKind::Driver => "Driver",
            AccountKind::Parent => "Parent",
        }
    }

    /// Metric label.
    pub fn metric_name(self) -> &'static str {
        match self {
            AccountKind::Student => "student",
            AccountKind::Staff => "staff",
            AccountKind::Driver => "driver",
            AccountKind::Parent => "parent",
        }
    }

    pub fn subject(self) -> String {
        format!("Your {} Portal Credentials - SMS", self.label())
    }

    fn signature(self) -> &'static str {
        match self {
            AccountKind::Driver => "School Transport Dept",
            _ => "School Administration",
        }
    }
}

pub fn credentials_body(
    kind: AccountKind,
    first_name: &str,
    username: &str,
    password: &str,
) -> String {
    let mut body = format!(
        "Dear {},\n\n\
         Welcome to School Management System!\n\n\
         Your account has been created. Please log in using the credentials below:\n\n\
         Username: {}\n\
         Password: {}\n\n",
        first_name, username, password
    );

    if kind == AccountKind::Student {
        body.push_str("Please change your password after your first login.\n\n");
    }

    body.push_str("Best Regards,\n");
    body.push_str(kind.signature());
    body
}

/// Outcome of the credentials email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsDelivery {
    pub sent: bool,
    pub warning: Option<String>,
}

/// Mails the generated credentials to the user.
///
/// Never fails: the account already exists, so a delivery problem becomes a
/// warning for the administrator.
pub async fn send_credentials(
    mailer: &dyn Mailer,
    email_config: &EmailConfig,
    kind: AccountKind,
    user: &User,
    password: &str,
) -> CredentialsDelivery {
    let Some(email) = user.email_on_file() else {
        track_credentials_mail(false);
        return CredentialsDelivery {
            sent: false,
            warning: Some(format!(
                "{} created but email failed: no email address on file",
                kind.label()
            )),
        };
    };

    let body = credentials_body(kind, &user.first_name, &user.username, password);

    let delivery = match mailer
        .send(
            &kind.subject(),
            &body,
            &email_config.from_address(),
            vec![email.to_string()],
        )
        .await
    {
        Ok(()) => {
            info!(user_id = %user.id, kind = kind.metric_name(), "Credentials sent");
            CredentialsDelivery {
                sent: true,
                warning: None,
            }
        }
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Credentials email failed");
            CredentialsDelivery {
                sent: false,
                warning: Some(format!("{} created but email failed: {}", kind.label(), e)),
            }
        }
    };

    track_credentials_mail(delivery.sent);
    delivery
}
