#![deny(clippy::all, clippy::pedantic)]

use std::io::Write;

use cbot::config::{CredentialPrompt, CredentialStore, Credentials};

use crate::client::CliError;

pub fn show<W: Write>(credentials: &Credentials, out: &mut W) -> Result<(), CliError> {
    credentials.write_profile(out)?;
    Ok(())
}

/// Prompt for a full new profile, save it, then echo it back.
pub fn reconfigure<P, W>(store: &CredentialStore, prompt: &mut P, out: &mut W) -> Result<(), CliError>
where
    P: CredentialPrompt + ?Sized,
    W: Write,
{
    let credentials = store.update(prompt)?;
    writeln!(out)?;
    show(&credentials, out)
}
