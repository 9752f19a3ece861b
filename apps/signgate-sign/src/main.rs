//! SignGate Sign - generate signed links for the gateway.
//!
//! Prints the `?sig=...&exp=...` query string (or, with `--url`, the full
//! URL) that grants access to one object until `now + expiration_seconds`.
//!
//! # Usage
//!
//! ```text
//! SIGNATURE_SECRET=... signgate-sign audio/intro.mp3 600 https://cdn.example.com
//! ```
//!
//! The origin must be exactly what the gateway sees (scheme, host and
//! non-default port), or the link will not verify.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIGNATURE_SECRET` | *(required)* | Shared HMAC secret |
//! | `SIGNGATE_PUBLIC_ORIGIN` | `http://localhost:8787` | Origin when none is given |

use anyhow::{Context, Result, bail};
use clap::Parser;

use signgate_auth::{UrlSigner, epoch_seconds};

/// Origin used when neither the argument nor `SIGNGATE_PUBLIC_ORIGIN` is set.
const DEFAULT_ORIGIN: &str = "http://localhost:8787";

/// Generate a signed link for a SignGate object.
#[derive(Parser, Debug)]
#[command(name = "signgate-sign", version)]
#[command(about = "Generate signed links for the SignGate gateway")]
struct Args {
    /// Object path, e.g. `audio/intro.mp3` (a leading `/` is added if missing)
    file_path: String,

    /// Seconds until the link expires
    #[arg(default_value_t = 3600)]
    expiration_seconds: u64,

    /// Origin the gateway is reached at, e.g. `https://cdn.example.com`
    origin: Option<String>,

    /// Print the full URL instead of the query string
    #[arg(long)]
    url: bool,
}

/// Build the output line for `args` at time `now`.
fn run(args: &Args, lookup: impl Fn(&str) -> Option<String>, now: u64) -> Result<String> {
    let secret = lookup("SIGNATURE_SECRET")
        .filter(|s| !s.is_empty())
        .context("SIGNATURE_SECRET environment variable is not set")?;

    let origin = args
        .origin
        .clone()
        .or_else(|| lookup("SIGNGATE_PUBLIC_ORIGIN").filter(|s| !s.is_empty()))
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
    let origin = origin.trim_end_matches('/');
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        bail!("origin must start with http:// or https://, got {origin:?}");
    }

    let path = normalize_path(&args.file_path);
    let expiration = now
        .checked_add(args.expiration_seconds)
        .context("expiration overflows")?;

    let link = UrlSigner::new(secret)
        .sign_link(origin, &path, expiration)
        .context("failed to sign link")?;

    Ok(if args.url {
        link.url(origin)
    } else {
        link.query()
    })
}

/// Prefix `path` with `/` unless it already starts with one.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let line = run(&args, |name| std::env::var(name).ok(), epoch_seconds())?;
    println!("{line}");
    Ok(())
}
