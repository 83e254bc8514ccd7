//! Session commands: login, reset-password

use rollcall_core::SessionProfile;
use rollcall_domain::{Result, RollcallError};

use super::render_record;
use crate::context::AppContext;

/// Sign in and restore the profile for the signed-in identity.
pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<String> {
    let identity = ctx.auth.sign_in_with_password(email, password).await?;
    let header = format!("Signed in as {}", identity.email);

    match ctx.session.restore().await {
        SessionProfile::Ready(record) => Ok(format!("{header}\n{}", render_record(&record))),
        SessionProfile::Unavailable(placeholder) => {
            Ok(format!("{header}\n[{}]", placeholder.indicator()))
        }
        SessionProfile::Failed(err) => Err(err),
        SessionProfile::SignedOut | SessionProfile::Loading => Err(RollcallError::Auth(
            "session was not established after sign-in".into(),
        )),
    }
}

pub async fn reset_password(ctx: &AppContext, email: &str) -> Result<String> {
    ctx.auth.recover(email).await?;
    Ok(format!("Password reset email sent to {email}."))
}
