//! Offline helpers: input checks and error messages.

use nexus_accounts_core::{Email, check_password, error_message as message_for};

use super::CommandError;

#[allow(clippy::print_stdout)]
pub fn email(value: &str) -> Result<(), CommandError> {
    let email = Email::parse(value).map_err(|e| CommandError::Invalid(e.to_string()))?;
    println!("{email} is valid");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn password(value: &str) -> Result<(), CommandError> {
    check_password(value).map_err(|e| CommandError::Invalid(e.to_string()))?;
    println!("Password meets the strength rules");
    Ok(())
}

#[allow(clippy::print_stdout, clippy::unnecessary_wraps)]
pub fn error_message(code: &str) -> Result<(), CommandError> {
    println!("{}", message_for(code));
    Ok(())
}
