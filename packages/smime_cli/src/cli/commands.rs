//! Subcommand handlers

use super::io::{credential, read_input, write_output};
use super::EXIT_INVALID_SIGNATURE;
use cryypt_smime::{Smime, SmimeResult, VerificationResult};
use std::path::PathBuf;
use std::process::ExitCode;

pub async fn handle_decrypt(
    smime: &Smime,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    password: Option<String>,
) -> SmimeResult<ExitCode> {
    let cipher = read_input(input.as_deref())?;
    let credential = credential(password)?;

    let plain = smime.decrypt(&cipher, credential).await?;
    write_output(output.as_deref(), &plain)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn handle_sign(
    smime: &Smime,
    signers: Vec<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    password: Option<String>,
) -> SmimeResult<ExitCode> {
    let text = read_input(input.as_deref())?;
    let credential = credential(password)?;

    let signature = smime.sign(&text, signers.as_slice(), credential).await?;
    write_output(output.as_deref(), &signature)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn handle_encrypt(
    smime: &Smime,
    recipients: Vec<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> SmimeResult<ExitCode> {
    let plain = read_input(input.as_deref())?;

    let cipher = smime.encrypt(&plain, recipients.as_slice()).await?;
    write_output(output.as_deref(), &cipher)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn handle_verify(
    smime: &Smime,
    content: PathBuf,
    signature: Option<PathBuf>,
    use_json: bool,
) -> SmimeResult<ExitCode> {
    let text = std::fs::read(&content)?;
    let signature = read_input(signature.as_deref())?;

    let result = smime.verify(&text, &signature).await?;
    print_verification(&result, use_json)?;

    if result.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INVALID_SIGNATURE))
    }
}

fn print_verification(result: &VerificationResult, use_json: bool) -> SmimeResult<()> {
    if use_json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "Signature valid: {}",
        if result.valid { "yes" } else { "no" }
    );
    if result.signers.is_empty() {
        println!("No signer could be matched to a certificate");
    }
    for signer in &result.signers {
        println!(
            "Signer: {} (issuer: {}, serial: {})",
            signer.subject, signer.issuer, signer.serial
        );
    }
    Ok(())
}
