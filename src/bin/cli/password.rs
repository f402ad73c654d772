//! Password handling for CLI operations.

use rpassword::prompt_password;
use zipsession::Password;

/// Returns the provided password, or prompts for one when `prompt` is set.
///
/// An empty answer yields `None`, which opens the archive unencrypted.
pub fn get_password(provided: Option<String>, prompt: bool) -> Option<Password> {
    if let Some(pwd) = provided {
        return Some(Password::new(pwd));
    }

    if !prompt {
        return None;
    }

    match prompt_password("Enter password: ") {
        Ok(pwd) if !pwd.is_empty() => Some(Password::new(pwd)),
        _ => None,
    }
}

/// Prompts for password confirmation (for creating encrypted archives)
pub fn confirm_password() -> Option<Password> {
    let pwd1 = match prompt_password("Enter password: ") {
        Ok(pwd) => Password::new(pwd),
        Err(_) => return None,
    };

    if pwd1.is_empty() {
        eprintln!("Password cannot be empty");
        return None;
    }

    let pwd2 = match prompt_password("Confirm password: ") {
        Ok(pwd) => Password::new(pwd),
        Err(_) => return None,
    };

    if pwd1.as_str() == pwd2.as_str() {
        Some(pwd1)
    } else {
        eprintln!("Passwords do not match");
        None
    }
}

/// Returns the provided password, or asks for one twice when `prompt` is set.
pub fn get_or_confirm_password(provided: Option<String>, prompt: bool) -> Option<Password> {
    match provided {
        Some(pwd) => Some(Password::new(pwd)),
        None if prompt => confirm_password(),
        None => None,
    }
}
