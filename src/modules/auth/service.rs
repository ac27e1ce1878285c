use schoolhub_auth::create_access_token;
use schoolhub_config::JwtConfig;
use schoolhub_core::{AccountError, AppError, verify_password};
use schoolhub_models::{LoginRequest, LoginResponse, User, UserCredentials};
use schoolhub_observability::{track_jwt_issued, track_user_login_failure, track_user_login_success};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    /// Checks the password and issues an access token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let username = dto.username.trim().to_lowercase();

        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(&username)
        .fetch_optional(db)
        .await?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_user");
            return Err(AccountError::InvalidCredentials.into());
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_user_login_failure("bad_password");
            return Err(AccountError::InvalidCredentials.into());
        }

        let access_token = create_access_token(
            credentials.id.into_inner(),
            &credentials.username,
            &credentials.role,
            jwt_config,
        )?;
        track_jwt_issued();
        track_user_login_success(&credentials.role);

        let user: User = UserService::get_user(db, credentials.id).await?;

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            user,
        })
    }
}
