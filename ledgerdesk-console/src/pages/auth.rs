//! Login and registration

use super::Page;
use crate::context::ConsoleContext;
use crate::view::{Alert, AuthForm};
use async_trait::async_trait;
use ledgerdesk_client::Route;
use ledgerdesk_core::{
    validation_error, AdminAccount, AdminCredentials, AdminInfo, ErrorContext, LedgerError,
    LedgerResult,
};
use tracing::info;

pub const REGISTRATION_SUCCESS_MESSAGE: &str =
    "Registration successful! You can now login with your credentials.";

pub struct AuthPage {
    ctx: ConsoleContext,
}

impl AuthPage {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self { ctx }
    }

    pub fn show_login(&self) {
        self.ctx.view().show_form(AuthForm::Login);
    }

    pub fn show_register(&self) {
        self.ctx.view().show_form(AuthForm::Register);
    }

    /// Create an admin account. Mismatched passwords never reach the backend.
    pub async fn register(
        &self,
        name: &str,
        password: &str,
        confirm_password: &str,
    ) -> LedgerResult<AdminAccount> {
        if password != confirm_password {
            let error = validation_error!("Passwords do not match!", "confirm_password", "auth_page");
            self.ctx.view().show_alert(Alert::danger("Passwords do not match!"));
            return Err(error);
        }

        let credentials = AdminCredentials {
            name: name.to_string(),
            password: password.to_string(),
        };
        let account = self.ctx.reported(
            self.ctx.api().register_admin(&credentials).await,
            "Registration failed",
        )?;

        info!(admin = %account.name, "Admin registered");
        self.ctx.notify_success(REGISTRATION_SUCCESS_MESSAGE);
        self.show_login();
        Ok(account)
    }

    /// Sign in. The store is written only when the backend returned both a
    /// token and the admin identity.
    pub async fn login(&self, name: &str, password: &str) -> LedgerResult<AdminInfo> {
        let credentials = AdminCredentials {
            name: name.to_string(),
            password: password.to_string(),
        };
        let response = self.ctx.reported(
            self.ctx.api().login_admin(&credentials).await,
            "Invalid credentials",
        )?;

        let (token, admin) = match (response.access_token, response.admin) {
            (Some(token), Some(admin)) if !token.is_empty() => (token, admin),
            _ => {
                let error = LedgerError::InvalidResponse {
                    message: "Login response is missing the token or admin".to_string(),
                    source: None,
                    context: ErrorContext::new("auth_page").with_operation("login"),
                };
                self.ctx.report(&error, "Invalid credentials");
                return Err(error);
            }
        };

        self.ctx
            .reported(self.ctx.session().establish(&token, &admin), "Login failed")?;
        self.ctx.session().navigator().navigate(Route::Dashboard);
        Ok(admin)
    }
}

#[async_trait]
impl Page for AuthPage {
    fn route(&self) -> Route {
        Route::Login
    }

    /// An existing session skips the login form.
    async fn load(&self) -> LedgerResult<()> {
        if !self.ctx.session().redirect_if_authenticated() {
            self.show_login();
        }
        Ok(())
    }
}
