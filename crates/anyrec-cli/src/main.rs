//! anyrec: recover an encrypted storage artifact with an account seed phrase
//!
//! Usage:
//!   anyrec <encrypted-file> <output-file> [--mnemonic "<12 words>"]
//!
//! The seed phrase may also come from ANYREC_MNEMONIC; with neither set it
//! is prompted for without echo. Set ANYREC_LOG (tracing syntax, e.g.
//! "anyrec_crypto=debug") for per-attempt detail.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use anyrec_crypto::{attempt, derive_candidates, ProbeError};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "anyrec",
    version,
    about = "Recover an encrypted storage artifact with an account seed phrase",
    long_about = "anyrec: derive the plausible symmetric keys for a seed phrase, probe the \
                  encrypted file under each supported cipher mode, and write the first \
                  plausible plaintext"
)]
struct Cli {
    /// Encrypted input file
    input: PathBuf,

    /// Destination path for the recovered plaintext
    output: PathBuf,

    /// Account seed phrase (12 words); prompted without echo when omitted
    #[arg(long, env = "ANYREC_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let phrase = read_phrase(cli.mnemonic)?;
    let ciphertext = fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    println!("File size: {} bytes", ciphertext.len());
    println!("First bytes: {}", hex_preview(&ciphertext, 32));

    let candidates = derive_candidates(&phrase)
        .context("key derivation failed; the seed phrase itself is unusable")?;
    tracing::debug!(count = candidates.len(), "derived candidate keys");
    println!("Derived {} candidate key(s)", candidates.len());

    match attempt(&ciphertext, &candidates) {
        Ok(plaintext) => {
            report_recovered(&plaintext);
            fs::write(&cli.output, &plaintext)
                .with_context(|| format!("writing {}", cli.output.display()))?;
            println!("File decrypted successfully: {}", cli.output.display());
            Ok(())
        }
        Err(ProbeError::Exhausted { rejections }) => {
            eprintln!("All decryption attempts failed:");
            for rejection in &rejections {
                eprintln!("  ✗ {rejection}");
            }
            eprintln!();
            eprintln!("Possible reasons:");
            eprintln!("  - the file is encrypted with a space-specific key");
            eprintln!("  - the file uses a different encryption algorithm");
            eprintln!("  - the file is a different kind of application data");
            bail!("no candidate key and cipher mode combination produced plausible plaintext");
        }
    }
}

// ── Seed phrase input ─────────────────────────────────────────────────────────

/// Flag/env value if present, interactive no-echo prompt otherwise. Only
/// non-emptiness is checked here; the engine validates the mnemonic itself.
fn read_phrase(flag: Option<String>) -> Result<String> {
    let phrase = match flag {
        Some(phrase) => phrase,
        None => rpassword::prompt_password("Seed phrase: ")
            .context("reading seed phrase from terminal")?,
    };

    let phrase = phrase.trim().to_string();
    if phrase.is_empty() {
        bail!("seed phrase is empty");
    }
    Ok(phrase)
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

fn report_recovered(plaintext: &[u8]) {
    println!();
    println!("Recovered data:");
    println!("  size: {} bytes", plaintext.len());
    println!("  hex:  {}", hex_preview(plaintext, 32));
    println!("  text: {}", ascii_preview(plaintext, 64));
}

/// Hex rendering of the leading bytes (no external dep needed, just a loop)
fn hex_preview(data: &[u8], limit: usize) -> String {
    let mut out = String::with_capacity(limit * 2);
    for byte in data.iter().take(limit) {
        out.push_str(&format!("{byte:02x}"));
    }
    if data.len() > limit {
        out.push('…');
    }
    out
}

/// Leading bytes as text: printable ASCII verbatim, everything else \xNN
fn ascii_preview(data: &[u8], limit: usize) -> String {
    let mut out = String::new();
    for &byte in data.iter().take(limit) {
        if (0x20..=0x7e).contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("\\x{byte:02x}"));
        }
    }
    if data.len() > limit {
        out.push('…');
    }
    out
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ANYREC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
