//! Profile and preferences commands.
//!
//! # Usage
//!
//! ```bash
//! nx-accounts profile get -e maria@example.com
//! nx-accounts profile update -e maria@example.com --bio "Amante de la tecnología" --city Medellín
//! nx-accounts preferences update -e maria@example.com --theme dark --newsletter true
//! ```

use clap::Args;
use nexus_accounts_core::{PreferencesUpdate, ProfileUpdate};

use super::{Client, CommandError, SignIn, print_json, sign_in};

/// Profile fields to change. Omitted flags leave the stored value alone.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub avatar_url: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            full_name: args.full_name,
            phone: args.phone,
            avatar_url: args.avatar_url,
            bio: args.bio,
            city: args.city,
            country: args.country,
        }
    }
}

/// Preference fields to change. Omitted flags leave the stored value alone.
#[derive(Debug, Args)]
pub struct PreferencesArgs {
    /// UI theme, e.g. `light` or `dark`
    #[arg(long)]
    pub theme: Option<String>,
    /// Language code, e.g. `es`
    #[arg(long)]
    pub language: Option<String>,
    /// Currency code, e.g. `COP`
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub notifications_email: Option<bool>,
    #[arg(long)]
    pub notifications_push: Option<bool>,
    #[arg(long)]
    pub notifications_sms: Option<bool>,
    #[arg(long)]
    pub newsletter: Option<bool>,
}

impl From<PreferencesArgs> for PreferencesUpdate {
    fn from(args: PreferencesArgs) -> Self {
        Self {
            theme: args.theme,
            language: args.language,
            currency: args.currency,
            notifications_email: args.notifications_email,
            notifications_push: args.notifications_push,
            notifications_sms: args.notifications_sms,
            newsletter_subscribed: args.newsletter,
        }
    }
}

pub async fn show_profile(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    let profile = client.user_profile(session.user.id).await?;
    print_json(&profile)
}

pub async fn update_profile(
    client: &Client,
    credentials: &SignIn,
    args: ProfileArgs,
) -> Result<(), CommandError> {
    let update = ProfileUpdate::from(args);
    if update.is_empty() {
        return Err(CommandError::Invalid(
            "Nothing to update: pass at least one field".to_string(),
        ));
    }

    let session = sign_in(client, credentials).await?;
    let profile = client.update_user_profile(session.user.id, &update).await?;
    print_json(&profile)
}

pub async fn show_preferences(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    let preferences = client.user_preferences(session.user.id).await?;
    print_json(&preferences)
}

pub async fn update_preferences(
    client: &Client,
    credentials: &SignIn,
    args: PreferencesArgs,
) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    let preferences = client
        .update_user_preferences(session.user.id, &args.into())
        .await?;
    print_json(&preferences)
}
