use std::env;

#[derive(Clone, Debug)]
pub struct EmailConfig {
    /// When false, mail is written to the log instead of sent over SMTP.
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@schoolhub.local".to_string(),
            from_name: "School Management System".to_string(),
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: env::var("SMTP_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.enabled),
            smtp_host: env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smtp_port),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or(defaults.smtp_username),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or(defaults.smtp_password),
            from_email: env::var("FROM_EMAIL").unwrap_or(defaults.from_email),
            from_name: env::var("FROM_NAME").unwrap_or(defaults.from_name),
        }
    }

    /// `From` header value, e.g. `School Management System <noreply@schoolhub.local>`.
    pub fn from_address(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}
