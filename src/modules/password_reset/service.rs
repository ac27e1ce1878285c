use std::time::Duration;

use schoolhub_cache::{SessionStore, keys};
use schoolhub_config::EmailConfig;
use schoolhub_core::credentials::{generate_otp, mask_email};
use schoolhub_core::{AccountError, AppError, hash_password};
use schoolhub_models::{ForgotPasswordResponse, MessageResponse, ResetPasswordRequest, User};
use schoolhub_observability::track_password_reset;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::workflow::ResetState;
use crate::modules::users::service::USER_COLUMNS;
use crate::utils::email::Mailer;

pub const OTP_SUBJECT: &str = "Password Reset OTP";

pub fn otp_body(otp: u32) -> String {
    format!("Your OTP to reset your password is {}.", otp)
}

/// Reset state storage for one session id.
pub struct ResetSession<'a> {
    store: &'a dyn SessionStore,
    key: String,
    ttl: Duration,
}

impl<'a> ResetSession<'a> {
    pub fn new(store: &'a dyn SessionStore, session_id: &str, ttl: Duration) -> Self {
        Self {
            store,
            key: keys::password_reset(session_id),
            ttl,
        }
    }

    /// Current state. Missing, expired or unreadable entries count as `Idle`.
    pub async fn load(&self) -> Result<ResetState, AppError> {
        let raw = self.store.load(&self.key).await?;
        Ok(Self::decode(raw))
    }

    /// Current state, removing it from the store. At most one concurrent
    /// caller gets a non-`Idle` state back.
    pub async fn take(&self) -> Result<ResetState, AppError> {
        let raw = self.store.take(&self.key).await?;
        Ok(Self::decode(raw))
    }

    fn decode(raw: Option<String>) -> ResetState {
        let Some(raw) = raw else {
            return ResetState::Idle;
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable password reset session");
            ResetState::Idle
        })
    }

    /// Persists `state`. `Idle` is stored as the absence of an entry.
    pub async fn save(&self, state: &ResetState) -> Result<(), AppError> {
        if *state == ResetState::Idle {
            self.store.remove(&self.key).await?;
            return Ok(());
        }

        let raw = serde_json::to_string(state).map_err(AppError::internal)?;
        self.store.store(&self.key, raw, self.ttl).await?;
        Ok(())
    }

    /// Restores a state removed by [`take`](Self::take). `Idle` needs no
    /// entry, so nothing is written for it.
    pub async fn put_back(&self, state: &ResetState) -> Result<(), AppError> {
        if *state == ResetState::Idle {
            return Ok(());
        }
        self.save(state).await
    }
}

pub struct PasswordResetService;

impl PasswordResetService {
    /// Sends an OTP to the email on file for `username`.
    ///
    /// Any failure leaves the session `Idle`.
    #[instrument(skip(db, session, mailer, email_config))]
    pub async fn request_reset(
        db: &PgPool,
        session: &ResetSession<'_>,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        username: &str,
    ) -> Result<ForgotPasswordResponse, AppError> {
        let result = Self::send_otp(db, mailer, email_config, username).await;

        let (state, outcome) = match result {
            Ok((state, masked_email)) => (
                state,
                Ok(ForgotPasswordResponse {
                    message: format!("OTP sent to your registered email ({}).", masked_email),
                    masked_email,
                }),
            ),
            Err(err) => (ResetState::Idle, Err(err)),
        };

        session.save(&state).await?;
        track_password_reset("request", if outcome.is_ok() { "success" } else { "failure" });
        outcome
    }

    async fn send_otp(
        db: &PgPool,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        username: &str,
    ) -> Result<(ResetState, String), AppError> {
        let username = username.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(&username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccountError::NotFound("User".to_string()))?;

        Self::deliver_otp(mailer, email_config, &user).await
    }

    /// Mails a fresh OTP to `user` and returns the state to persist along
    /// with the masked address it went to.
    pub async fn deliver_otp(
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        user: &User,
    ) -> Result<(ResetState, String), AppError> {
        let email = user.email_on_file().ok_or(AccountError::NoEmailOnFile)?;

        let otp = generate_otp();

        mailer
            .send(
                OTP_SUBJECT,
                &otp_body(otp),
                &email_config.from_address(),
                vec![email.to_string()],
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to deliver password reset OTP");
                AccountError::MailDeliveryFailure(e.to_string())
            })?;

        info!(user_id = %user.id, "Password reset OTP sent");
        Ok((ResetState::otp_sent(user.username.clone(), otp), mask_email(email)))
    }

    #[instrument(skip(session, code))]
    pub async fn verify_otp(
        session: &ResetSession<'_>,
        code: &str,
    ) -> Result<MessageResponse, AppError> {
        let (state, outcome) = session.load().await?.verify(code);
        session.save(&state).await?;

        track_password_reset("verify", if outcome.is_ok() { "success" } else { "failure" });
        outcome?;

        Ok(MessageResponse::new(
            "OTP verified. You can now set a new password.",
        ))
    }

    /// Stores the new password and ends the flow.
    ///
    /// The session entry is taken out of the store first, so of two
    /// concurrent submissions only one reaches the database. Rejected input
    /// and a failed write put the previous state back for a retry.
    #[instrument(skip(db, session, dto))]
    pub async fn complete_reset(
        db: &PgPool,
        session: &ResetSession<'_>,
        dto: ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let current = session.take().await?;
        let (state, outcome) = current
            .clone()
            .complete(&dto.new_password, &dto.confirm_password);

        let username = match outcome {
            Ok(username) => username,
            Err(err) => {
                session.put_back(&state).await?;
                track_password_reset("complete", "failure");
                return Err(err.into());
            }
        };

        let updated = match Self::store_password(db, &username, &dto.new_password).await {
            Ok(updated) => updated,
            Err(err) => {
                session.put_back(&current).await?;
                track_password_reset("complete", "failure");
                return Err(err);
            }
        };

        // The account may have been deleted mid-flow; the session is spent either way.
        if updated == 0 {
            track_password_reset("complete", "failure");
            return Err(AccountError::NotFound("User".to_string()).into());
        }

        info!(username = %username, "Password reset completed");
        track_password_reset("complete", "success");

        Ok(MessageResponse::new(
            "Password reset successful. You can now login.",
        ))
    }

    /// Number of users updated: 0 when `username` no longer exists.
    async fn store_password(
        db: &PgPool,
        username: &str,
        new_password: &str,
    ) -> Result<u64, AppError> {
        let hashed_password = hash_password(new_password)?;

        let updated = sqlx::query(
            "UPDATE users SET password = $1, updated_at = NOW() WHERE username = $2",
        )
        .bind(&hashed_password)
        .bind(username)
        .execute(db)
        .await?
        .rows_affected();

        Ok(updated)
    }
}
