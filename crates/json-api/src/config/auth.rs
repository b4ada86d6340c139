//! Session Config

use clap::Args;

/// Session token signing settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,
}
