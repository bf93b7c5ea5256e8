//! Kangaroo CLI - drive the storefront cart from a terminal.
//!
//! The cart is persisted under `KANGAROO_STORAGE_DIR` with the same keys the
//! web storefront uses, so every invocation continues the same cart.
//!
//! # Usage
//!
//! ```bash
//! # Add two Naruto shirts, size G, black
//! kangaroo cart add camisa-naruto --color Preto --size G --qty 2
//!
//! # Configure a custom shirt
//! kangaroo cart custom -d "Canguru surfando" --material premium --size GG --color Branco
//!
//! # Apply a coupon and look at the totals
//! kangaroo coupon apply naruto12
//! kangaroo cart show
//!
//! # Share the cart, or load one someone shared
//! kangaroo share export
//! kangaroo share import "https://kangaroowear.com.br/carrinho.html?cart=..."
//!
//! # Produce the WhatsApp order
//! kangaroo checkout --name "Ana Souza" --document 123.456.789-00 --street "Rua A" \
//!     --number 10 --district Centro --city Manaus --state AM --postal-code 69000-000
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use kangaroo_storefront::storage::{CartStorage, FileStore};
use kangaroo_storefront::{CartSession, StorefrontConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "kangaroo")]
#[command(author, version, about = "Kangaroo Wear cart tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Apply or remove a coupon
    Coupon {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Share the cart as a link, or import a shared one
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Print the order message and the WhatsApp link
    Checkout(CheckoutArgs),
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show items and totals
    Show,
    /// Add a catalog product
    Add {
        /// Product id (see `catalog list`)
        product: String,

        #[arg(short, long)]
        color: String,

        #[arg(short, long)]
        size: String,

        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Add a custom shirt from the configurator
    Custom {
        /// What should be printed on the shirt
        #[arg(short, long)]
        description: String,

        /// Cotton tier (`padrao`, `premium`)
        #[arg(short, long, default_value = "padrao")]
        material: String,

        /// PP, P, M, G, GG, XG or XXG
        #[arg(short, long, default_value = "M")]
        size: String,

        /// Preto, Branco or Cinza
        #[arg(short, long, default_value = "Preto")]
        color: String,

        /// Reference images will be sent over WhatsApp
        #[arg(long)]
        reference: bool,
    },
    /// Remove a line
    Remove {
        /// Line identifier as shown by `cart show`
        identifier: String,
    },
    /// Set a line's quantity (zero or less removes it)
    Qty {
        identifier: String,

        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Empty the cart and drop the coupon
    Clear,
}

#[derive(Subcommand)]
enum CouponAction {
    /// Apply a coupon code
    Apply { code: String },
    /// Remove the applied coupon
    Remove,
    /// List published coupons
    List,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Print a link carrying the cart
    Export,
    /// Replace the cart with a shared one (link or raw blob)
    Import { link_or_blob: String },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    name: String,

    /// CPF or CNPJ
    #[arg(long)]
    document: String,

    #[arg(long)]
    birth_date: Option<String>,

    #[arg(long)]
    street: String,

    #[arg(long)]
    number: String,

    #[arg(long)]
    district: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    postal_code: String,

    /// Payer name, when someone else pays
    #[arg(long)]
    payer_name: Option<String>,

    /// Payer CPF, when someone else pays
    #[arg(long)]
    payer_document: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kangaroo_storefront=info,kangaroo_cli=info".into());

    // Logs go to stderr; stdout carries command output
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn open_session(config: &StorefrontConfig) -> kangaroo_storefront::Result<CartSession> {
    let catalog = config.load_catalog()?;
    let coupons = config.load_coupons()?;
    let storage = match FileStore::open(&config.storage_dir) {
        Ok(store) => CartStorage::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "Cart storage unavailable; changes will not be saved");
            CartStorage::memory_only()
        }
    };
    Ok(CartSession::open(
        Arc::new(catalog),
        Arc::new(coupons),
        config.pricing,
        storage,
    ))
}

fn run(cli: Cli) -> kangaroo_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let mut session = open_session(&config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session),
            CartAction::Add {
                product,
                color,
                size,
                qty,
            } => commands::cart::add(&mut session, &product, &color, &size, qty)?,
            CartAction::Custom {
                description,
                material,
                size,
                color,
                reference,
            } => commands::cart::custom(
                &mut session,
                description,
                &material,
                &size,
                &color,
                reference,
            )?,
            CartAction::Remove { identifier } => commands::cart::remove(&mut session, &identifier)?,
            CartAction::Qty {
                identifier,
                quantity,
            } => commands::cart::set_quantity(&mut session, &identifier, &quantity)?,
            CartAction::Clear => commands::cart::clear(&mut session),
        },
        Commands::Coupon { action } => match action {
            CouponAction::Apply { code } => commands::coupon::apply(&mut session, &code)?,
            CouponAction::Remove => commands::coupon::remove(&mut session),
            CouponAction::List => commands::coupon::list(&session),
        },
        Commands::Share { action } => match action {
            ShareAction::Export => commands::share::export(&session, &config.store_url)?,
            ShareAction::Import { link_or_blob } => {
                commands::share::import(&mut session, &link_or_blob)?;
            }
        },
        Commands::Checkout(args) => {
            commands::checkout::run(&session, &config.whatsapp_number, &args.into_contact())?;
        }
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&session),
        },
    }
    Ok(())
}

impl CheckoutArgs {
    /// Payer fields default to the customer's.
    fn into_contact(self) -> kangaroo_storefront::checkout::OrderContact {
        kangaroo_storefront::checkout::OrderContact {
            payer_name: self.payer_name.unwrap_or_else(|| self.name.clone()),
            payer_document: self.payer_document.unwrap_or_else(|| self.document.clone()),
            customer_name: self.name,
            customer_document: self.document,
            birth_date: self.birth_date,
            street: self.street,
            number: self.number,
            district: self.district,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
        }
    }
}
