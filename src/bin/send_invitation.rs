//! Send a registration invitation from the command line.
//!
//! Uses the server's configuration, so the mail backend and frontend URL
//! match what the running API would use.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetops::{
    config::CONFIG,
    db::{self, repositories::UserRepository},
    services::{AuthService, mail_service::mailer_from_config},
};

#[derive(Parser)]
#[command(name = "send-invitation")]
#[command(about = "Invite a new user to register with FleetOps")]
struct Cli {
    /// Address to invite
    email: String,

    /// Existing admin or owner recorded as the inviter
    #[arg(long, env = "INVITED_BY")]
    invited_by: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let pool = db::create_pool(&CONFIG.database).await?;
    db::run_migrations(&pool).await?;

    let inviter = UserRepository::find_by_email(&pool, &cli.invited_by.to_lowercase())
        .await?
        .filter(|u| u.role().is_admin())
        .ok_or_else(|| anyhow::anyhow!("{} is not an admin or owner", cli.invited_by))?;

    let mailer = mailer_from_config(&CONFIG.mail);
    match AuthService::invite(
        &pool,
        mailer.as_ref(),
        &CONFIG,
        &cli.email.trim().to_lowercase(),
        &inviter.id,
    )
    .await
    {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "Invitation sent");
            println!("Invitation sent to {}", user.email);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to send invitation");
            Err(e.into())
        }
    }
}
