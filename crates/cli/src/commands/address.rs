//! Address commands.
//!
//! # Usage
//!
//! ```bash
//! nx-accounts address add -e maria@example.com --label Casa \
//!     --street-address "Calle 10 # 43-12" --city Medellín --country Colombia --default
//! nx-accounts address list -e maria@example.com
//! nx-accounts address delete -e maria@example.com --id 12
//! ```

use clap::Args;
use nexus_accounts_core::{AddressId, NewAddress};

use super::{Client, CommandError, SignIn, print_json, sign_in};

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Short name, e.g. `Casa` or `Oficina`
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub street_address: Option<String>,
    #[arg(long)]
    pub apartment_number: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Mark as the default address
    #[arg(long = "default")]
    pub is_default: bool,
}

impl From<AddressArgs> for NewAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            label: args.label,
            street_address: args.street_address,
            apartment_number: args.apartment_number,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
            phone: args.phone,
            is_default: args.is_default,
        }
    }
}

pub async fn add(
    client: &Client,
    credentials: &SignIn,
    args: AddressArgs,
) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    let address = client
        .add_user_address(session.user.id, &args.into())
        .await?;
    tracing::info!(address_id = %address.id, "Address added");
    print_json(&address)
}

pub async fn list(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    let addresses = client.user_addresses(session.user.id).await?;
    print_json(&addresses)
}

pub async fn delete(client: &Client, credentials: &SignIn, id: i64) -> Result<(), CommandError> {
    sign_in(client, credentials).await?;
    client.delete_user_address(AddressId::new(id)).await?;
    tracing::info!(address_id = id, "Address deleted");
    Ok(())
}
