use clap::{Args, Subcommand};

mod create_seller;

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    /// Provision a seller account
    CreateSeller(create_seller::CreateSellerArgs),
}

pub(crate) async fn run(command: AccountCommand) -> Result<(), String> {
    match command.command {
        AccountSubcommand::CreateSeller(args) => create_seller::run(args).await,
    }
}
