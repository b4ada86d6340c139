use bazaar_app::{
    database::{self, Db},
    domain::accounts::{AccountsService, PgAccountsService, data::NewAccount},
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateSellerArgs {
    /// Display name, also used as the shipper name
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long, env = "SELLER_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    phone: String,

    /// Pickup address
    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    province: Option<String>,

    #[arg(long)]
    postal_code: Option<String>,

    /// Shipping aggregator area id of the pickup address
    #[arg(long)]
    area_id: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateSellerArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAccountsService::new(Db::new(pool));

    let account = service
        .create_seller(NewAccount {
            name: args.name,
            email: args.email,
            password: args.password,
            phone: args.phone,
            address: args.address,
            city: args.city,
            province: args.province,
            postal_code: args.postal_code,
            area_id: args.area_id,
        })
        .await
        .map_err(|error| format!("failed to create seller: {error}"))?;

    println!("account_uuid: {}", account.uuid);
    println!("email: {}", account.email);
    println!("role: {}", account.role);

    Ok(())
}
