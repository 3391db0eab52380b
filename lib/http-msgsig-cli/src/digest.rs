use crate::util::{highlight, Outcome};
use miette::{IntoDiagnostic, WrapErr};
use std::{fs, path::Path};

pub fn do_it(file: &Path) -> miette::Result<()> {
    let body = fs::read(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {} {}", file.display(), Outcome::Invalid))?;

    println!(
        "{}: {}",
        highlight("Digest"),
        http_msgsig::digest::calculate(&body)
    );

    Ok(())
}
