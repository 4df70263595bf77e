//! Meroghar CLI - Database migrations and record management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! mg-cli migrate
//!
//! # Create a staff account
//! mg-cli user create -u admin -e admin@example.com -p 'long passphrase' --staff
//!
//! # Create an owner profile for user 1
//! mg-cli owner create --user-id 1 --phone 555-1234
//!
//! # Record a home for owner 1
//! mg-cli home create --owner-id 1 --street "1 Main St" --city Springfield \
//!     --state IL --postal-code 62701 --country USA
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Create accounts, reset passwords, delete accounts
//! - `owner create` - Create owner profiles
//! - `home create` - Record homes

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use meroghar_core::{AddressType, MaritalStatus, OwnershipPercentage};

mod commands;

#[derive(Parser)]
#[command(name = "mg-cli")]
#[command(author, version, about = "Meroghar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage owner profiles
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },
    /// Manage homes
    Home {
        #[command(subcommand)]
        action: HomeAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        /// Unique username
        #[arg(short, long)]
        username: String,

        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Initial password
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(long)]
        first: Option<String>,

        /// Last name
        #[arg(long)]
        last: Option<String>,

        /// Allow access to the admin surface
        #[arg(long)]
        staff: bool,
    },
    /// Replace an account's password
    SetPassword {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
    /// Delete an account with its owner profile and homes
    Delete {
        /// Login email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum OwnerAction {
    /// Create the owner profile of an existing user
    Create {
        /// ID of the user account
        #[arg(long)]
        user_id: i32,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,

        /// Occupation
        #[arg(long)]
        occupation: Option<String>,

        /// Marital status (Single, Married, Divorced, Widowed, Separated)
        #[arg(long, default_value = "Single")]
        marital_status: MaritalStatus,

        /// Spouse name
        #[arg(long)]
        spouse_name: Option<String>,

        /// ID of the owner's residential address
        #[arg(long)]
        address_id: Option<i32>,
    },
}

#[derive(Subcommand)]
enum HomeAction {
    /// Record a home for an owner
    Create {
        /// ID of the owner
        #[arg(long)]
        owner_id: i32,

        /// Street address
        #[arg(long)]
        street: String,

        /// City
        #[arg(long)]
        city: String,

        /// State or province
        #[arg(long)]
        state: String,

        /// Postal code
        #[arg(long)]
        postal_code: String,

        /// Country
        #[arg(long)]
        country: String,

        /// Address type (Home, Office, Mailing, Rental, Other)
        #[arg(long = "type", default_value = "Home")]
        address_type: AddressType,

        /// Store the address without a type
        #[arg(long, conflicts_with = "address_type")]
        untyped: bool,

        /// Date of purchase (YYYY-MM-DD)
        #[arg(long)]
        purchased: Option<NaiveDate>,

        /// Ownership share in percent
        #[arg(long, default_value = "100")]
        percentage: OwnershipPercentage,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
                first,
                last,
                staff,
            } => {
                commands::user::create(
                    &username,
                    &email,
                    &password,
                    first.as_deref(),
                    last.as_deref(),
                    staff,
                )
                .await?;
            }
            UserAction::SetPassword { email, password } => {
                commands::user::set_password(&email, &password).await?;
            }
            UserAction::Delete { email } => commands::user::delete(&email).await?,
        },
        Commands::Owner { action } => match action {
            OwnerAction::Create {
                user_id,
                phone,
                dob,
                occupation,
                marital_status,
                spouse_name,
                address_id,
            } => {
                let args = commands::owner::OwnerArgs {
                    user_id,
                    phone_number: phone,
                    date_of_birth: dob,
                    occupation,
                    marital_status,
                    spouse_name,
                    address_id,
                };
                commands::owner::create(&args).await?;
            }
        },
        Commands::Home { action } => match action {
            HomeAction::Create {
                owner_id,
                street,
                city,
                state,
                postal_code,
                country,
                address_type,
                untyped,
                purchased,
                percentage,
            } => {
                let args = commands::home::HomeArgs {
                    owner_id,
                    street_address: street,
                    city,
                    state,
                    postal_code,
                    country,
                    address_type: (!untyped).then_some(address_type),
                    date_of_purchase: purchased,
                    ownership_percentage: percentage,
                };
                commands::home::create(&args).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_home_create_defaults() {
        let cli = Cli::try_parse_from([
            "mg-cli", "home", "create", "--owner-id", "1", "--street", "1 Main St", "--city",
            "Springfield", "--state", "IL", "--postal-code", "62701", "--country", "USA",
        ]);
        let Ok(Cli {
            command: Commands::Home { action: HomeAction::Create { address_type, untyped, percentage, .. } },
        }) = cli
        else {
            panic!("expected home create");
        };
        assert_eq!(address_type, AddressType::Home);
        assert!(!untyped);
        assert_eq!(percentage, OwnershipPercentage::default());
    }

    #[test]
    fn test_parse_rejects_bad_marital_status() {
        let cli = Cli::try_parse_from([
            "mg-cli", "owner", "create", "--user-id", "1", "--phone", "555", "--marital-status",
            "engaged",
        ]);
        assert!(cli.is_err());
    }
}
