//! Profile commands: register, lookup, exists, check

use rollcall_domain::{DegradedProfile, Result};
use rollcall_infra::SignUpOutcome;
use tracing::info;

use super::render_record;
use crate::cli::RegisterArgs;
use crate::context::AppContext;

/// Create a profile, signing the account up first when a password is given.
///
/// A refused sign-up stops before any profile is written.
pub async fn register(ctx: &AppContext, args: &RegisterArgs) -> Result<String> {
    let mut lines = Vec::new();

    if let Some(password) = &args.password {
        match ctx.auth.sign_up(&args.email, password).await? {
            SignUpOutcome::SignedIn(identity) => {
                lines.push(format!("Account created and signed in ({}).", identity.subject));
            }
            SignUpOutcome::ConfirmationRequired { email } => {
                lines.push(format!("Check {email} to confirm your account."));
            }
        }
    }

    let record = ctx.profiles.create(args.to_request()).await?;
    info!(email = %record.email, "profile registered");

    lines.push(format!("Profile created for {}.", record.full_name()));
    lines.push(render_record(&record));
    Ok(lines.join("\n"))
}

/// Show the stored profile, or the placeholder when none exists.
pub async fn lookup(ctx: &AppContext, email: &str) -> Result<String> {
    match ctx.profiles.lookup_by_email(email).await.into_result()? {
        Some(record) => Ok(render_record(&record)),
        None => {
            let placeholder = DegradedProfile::new(email);
            Ok(format!("{}\n[{}]", placeholder.email, placeholder.indicator()))
        }
    }
}

/// Advisory only; an unreachable store answers "not registered".
pub async fn exists(ctx: &AppContext, email: &str) -> String {
    if ctx.profiles.exists_by_email(email).await {
        format!("{email} is registered")
    } else {
        format!("{email} is not registered")
    }
}

pub async fn check(ctx: &AppContext) -> Result<String> {
    let count = ctx.profiles.check_connection().await?;
    Ok(format!("Profile store reachable ({count} profiles)"))
}
