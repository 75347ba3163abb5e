//! Create an administrative account in the configured database.
//!
//! The password is read from `--password`, then `RECIPES_SUPERUSER_PASSWORD`,
//! then the first line of standard input.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, BufRead};
use std::sync::Arc;

use backend::domain::ports::NewAccount;
use backend::domain::{Email, Password, UserAccountsService, UserName};
use backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "RECIPES_SUPERUSER_PASSWORD";
const DATABASE_URL_ENV: &str = "RECIPES_DATABASE_URL";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff account with every permission",
    version
)]
struct CliArgs {
    /// Login email; stored lower-cased.
    #[arg(long, value_name = "email")]
    email: String,
    /// Optional display name.
    #[arg(long, value_name = "name", default_value = "")]
    name: String,
    /// Password; prefer the environment or standard input.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    /// Database connection URL. Falls back to `RECIPES_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending migrations first.
    #[arg(long)]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = args
        .database_url
        .clone()
        .or_else(|| env::var(DATABASE_URL_ENV).ok())
        .ok_or_else(|| eyre!("pass --database-url or set {DATABASE_URL_ENV}"))?;
    let account = parse_account(&args, read_password(args.password.clone())?)?;

    if !args.skip_migrations {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("failed to create database pool")?;
    let accounts = UserAccountsService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAuthTokenRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    let user = accounts
        .create_superuser(account)
        .await
        .map_err(|error| eyre!("failed to create superuser: {error}"))?;
    println!("created superuser {}", user.email());
    Ok(())
}

fn read_password(flag: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(password) = flag.or_else(|| env::var(PASSWORD_ENV).ok()) {
        return Ok(Zeroizing::new(password));
    }
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("failed to read password from standard input")?;
    Ok(Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned()))
}

fn parse_account(args: &CliArgs, password: Zeroizing<String>) -> Result<NewAccount> {
    Ok(NewAccount {
        email: Email::new(&args.email).map_err(|error| eyre!("invalid email: {error}"))?,
        password: Password::new(password.as_str())
            .map_err(|error| eyre!("invalid password: {error}"))?,
        name: UserName::new(&args.name).map_err(|error| eyre!("invalid name: {error}"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(email: &str, name: &str) -> CliArgs {
        CliArgs::try_parse_from(["create-superuser", "--email", email, "--name", name])
            .expect("arguments parse")
    }

    #[rstest]
    fn account_fields_are_validated() {
        let account = parse_account(
            &args("Admin@Example.COM", "Admin"),
            Zeroizing::new("s3cret".to_owned()),
        )
        .expect("valid account");

        assert_eq!(account.email.as_ref(), "admin@example.com");
    }

    #[rstest]
    fn short_passwords_are_accepted_from_the_command_line() {
        let account = parse_account(
            &args("admin@example.com", ""),
            Zeroizing::new("1111".to_owned()),
        )
        .expect("valid account");

        assert_eq!(account.password.expose(), "1111");
    }

    #[rstest]
    #[case("not-an-email", "s3cret")]
    #[case("admin@example.com", "")]
    fn invalid_input_is_reported(#[case] email: &str, #[case] password: &str) {
        let result = parse_account(&args(email, ""), Zeroizing::new(password.to_owned()));

        assert!(result.is_err());
    }

    #[rstest]
    fn flag_password_wins() {
        let password = read_password(Some("from-flag".to_owned())).expect("password");

        assert_eq!(password.as_str(), "from-flag");
    }
}
