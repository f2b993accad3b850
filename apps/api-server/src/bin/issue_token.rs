//! Print a signed bearer token for local development.
//!
//! Usage: `issue-token <user-id> [email]`. Reads the same JWT_* variables as
//! the server, so the token is accepted by a locally running instance.

use anyhow::{Context, bail};

use parley_core::ports::TokenService;
use parley_infra::{JwtConfig, JwtTokenService};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let Some(user_id) = args.next() else {
        bail!("usage: issue-token <user-id> [email]");
    };
    let email = args.next().unwrap_or_default();

    let service = JwtTokenService::new(JwtConfig::from_env());
    let token = service
        .generate_token(&user_id, &email)
        .context("failed to sign token")?;

    println!("{token}");
    eprintln!("expires in {}s", service.expiration_seconds());
    Ok(())
}
