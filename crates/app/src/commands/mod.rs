//! Command handlers
//!
//! Each handler returns the text to print on success. [`run`] adds timing,
//! structured logging and the user-facing error message.

pub mod profile;
pub mod session;

use std::time::Instant;

use rollcall_domain::{ProfileRecord, Result as DomainResult};

use crate::cli::Command;
use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Dispatch a parsed command.
pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<String> {
    let start = Instant::now();

    let (name, result) = match command {
        Command::Register(args) => ("profile::register", profile::register(ctx, &args).await),
        Command::Lookup { email } => ("profile::lookup", profile::lookup(ctx, &email).await),
        Command::Exists { email } => ("profile::exists", Ok(profile::exists(ctx, &email).await)),
        Command::Check => ("profile::check", profile::check(ctx).await),
        Command::Login { email, password } => {
            ("session::login", session::login(ctx, &email, &password).await)
        }
        Command::ResetPassword { email } => {
            ("session::reset_password", session::reset_password(ctx, &email).await)
        }
    };

    log_command_execution(name, start.elapsed(), result.as_ref().err());
    into_cli_result(result)
}

/// Attach the user-facing message to a failed command.
fn into_cli_result(result: DomainResult<String>) -> anyhow::Result<String> {
    result.map_err(|err| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })
}

/// Render a profile as aligned `label: value` lines.
pub fn render_record(record: &ProfileRecord) -> String {
    let id = record.id.map(|id| id.to_string()).unwrap_or_else(|| "(pending)".to_string());
    [
        format!("id:             {id}"),
        format!("email:          {}", record.email),
        format!("name:           {}", record.full_name()),
        format!("group:          {}", record.group),
        format!("year:           {}", record.year),
        format!("specialization: {}", record.specialization),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use rollcall_domain::{ProfileCreationRequest, ProfileId, RollcallError};

    use super::*;

    #[test]
    fn failed_command_carries_user_message() {
        let err = into_cli_result(Err(RollcallError::DuplicateProfile("a@x.com".into())))
            .unwrap_err();

        assert_eq!(err.to_string(), "This email is already registered.");
        assert!(err.root_cause().to_string().contains("a@x.com"));
    }

    #[test]
    fn renders_pending_id() {
        let record = ProfileRecord::unpersisted(ProfileCreationRequest {
            email: "a@x.com".into(),
            last_name: "Pop".into(),
            first_name: "Ana".into(),
            group: "311".into(),
            year: 2,
            specialization: "CS".into(),
        });

        let text = render_record(&record);
        assert!(text.contains("(pending)"));
        assert!(text.contains("Ana Pop"));

        let persisted = ProfileRecord { id: Some(ProfileId(4)), ..record };
        assert!(render_record(&persisted).contains("id:             4"));
    }
}
