//! CLI administration tool for golinks.
//!
//! Manages short links directly against the database; there is no HTTP
//! management API.
//!
//! # Usage
//!
//! ```bash
//! # Create links (missing arguments are prompted for)
//! golinks-admin link create gh https://github.com
//! golinks-admin link create docs/ https://docs.rs --jump-type prefix
//!
//! # Change, toggle and delete by id
//! golinks-admin link edit 3 --destination https://github.com/rust-lang
//! golinks-admin link toggle 3
//! golinks-admin link delete 3 --yes
//!
//! # Browse
//! golinks-admin link list --search docs
//! golinks-admin stats
//!
//! # Database
//! golinks-admin db check
//! golinks-admin db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use golinks::application::services::LinkService;
use golinks::config::Config;
use golinks::domain::entities::{JumpType, LinkPatch, NewShortLink, ShortLink};
use golinks::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Select};
use sqlx::PgPool;
use std::sync::Arc;

type Service = LinkService<PgLinkRepository>;

/// CLI tool for managing golinks.
#[derive(Parser)]
#[command(name = "golinks-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show link and click totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Slug without the /go/ prefix (prefix slugs end with '/')
        slug: Option<String>,

        /// Destination URI, e.g. https://example.com or mailto:team@example.com
        destination: Option<String>,

        /// simple, forward, prefix or prefix-forward
        #[arg(short, long)]
        jump_type: Option<JumpType>,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Create the link disabled
        #[arg(long)]
        inactive: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Change fields of an existing link
    Edit {
        id: i64,

        #[arg(short, long)]
        slug: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(short, long)]
        jump_type: Option<JumpType>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a link
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Enable a disabled link or disable an enabled one
    Toggle { id: i64 },

    /// List links, newest first
    List {
        /// Case-insensitive filter on slug, destination and description
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let service = LinkService::new(Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))));

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &service, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &Service) -> Result<()> {
    match action {
        LinkAction::Create {
            slug,
            destination,
            jump_type,
            description,
            inactive,
            yes,
        } => {
            let mut new_link = prompt_new_link(slug, destination, jump_type)?;
            new_link.description = description;
            new_link.is_active = !inactive;
            create_link(service, new_link, yes).await?;
        }
        LinkAction::Edit {
            id,
            slug,
            destination,
            jump_type,
            description,
            active,
        } => {
            let patch = LinkPatch {
                slug,
                destination,
                jump_type,
                description,
                is_active: active,
            };
            edit_link(service, id, patch).await?;
        }
        LinkAction::Delete { id, yes } => delete_link(service, id, yes).await?,
        LinkAction::Toggle { id } => toggle_link(service, id).await?,
        LinkAction::List { search } => list_links(service, search.as_deref()).await?,
    }

    Ok(())
}

/// Fills in missing create arguments interactively.
fn prompt_new_link(
    slug: Option<String>,
    destination: Option<String>,
    jump_type: Option<JumpType>,
) -> Result<NewShortLink> {
    let slug = match slug {
        Some(s) => s,
        None => Input::new().with_prompt("Slug").interact_text()?,
    };

    let destination = match destination {
        Some(d) => d,
        None => Input::new().with_prompt("Destination").interact_text()?,
    };

    let jump_type = match jump_type {
        Some(j) => j,
        None => {
            let index = Select::new()
                .with_prompt("Jump type")
                .items(&JumpType::ALL)
                .default(0)
                .interact()?;
            JumpType::ALL[index]
        }
    };

    Ok(NewShortLink::new(slug, destination, jump_type))
}

async fn create_link(service: &Service, new_link: NewShortLink, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();
    println!("  Slug:        {}", new_link.slug.cyan());
    println!("  Destination: {}", new_link.destination.bright_white());
    println!("  Jump type:   {}", new_link.jump_type.to_string().yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create_link(new_link)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", describe(&e)))?;

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    print_link(&link);

    Ok(())
}

async fn edit_link(service: &Service, id: i64, patch: LinkPatch) -> Result<()> {
    let link = service
        .update_link(id, patch)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", describe(&e)))?;

    println!("{}", "✅ Link updated".green().bold());
    print_link(&link);

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &Service, id: i64, skip_confirm: bool) -> Result<()> {
    let link = service
        .get_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", describe(&e)))?;

    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", describe(&e)))?;

    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

async fn toggle_link(service: &Service, id: i64) -> Result<()> {
    let link = service
        .toggle_active(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to toggle link: {}", describe(&e)))?;

    let state = if link.is_active {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!("  {} is now {}", link.short_path().cyan(), state);

    Ok(())
}

/// Lists links in a table.
///
/// ```text
///   ID  Slug                 Type            Clicks   Status    Destination
///   ───────────────────────────────────────────────────────────────────────
///   2   docs/                prefix          17       ACTIVE    https://docs.rs
/// ```
async fn list_links(service: &Service, search: Option<&str>) -> Result<()> {
    println!("{}", "📋 Short Links".bright_blue().bold());
    println!();

    let links = service
        .list_links(search)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", describe(&e)))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<20} {:<15} {:<8} {:<9} {}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Type".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        let status = if link.is_active {
            "ACTIVE".green()
        } else {
            "DISABLED".red()
        };

        println!(
            "  {:<5} {:<20} {:<15} {:<8} {:<9} {}",
            link.id.to_string().bright_black(),
            link.slug.cyan(),
            link.jump_type.to_string(),
            link.click_count,
            status,
            link.destination
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = service
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", describe(&e)))?;

    println!(
        "  Links:        {}",
        summary.total_links.to_string().bright_green().bold()
    );
    println!(
        "  Active links: {}",
        summary.active_links.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, service: &Service, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            service
                .health_check()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", describe(&e)))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

fn print_link(link: &ShortLink) {
    println!();
    println!("  ID:          {}", link.id.to_string().bright_black());
    println!("  Path:        {}", link.short_path().cyan());
    println!("  Destination: {}", link.destination.bright_white());
    println!("  Jump type:   {}", link.jump_type.to_string().yellow());
    if !link.description.is_empty() {
        println!("  Description: {}", link.description);
    }
    println!(
        "  Status:      {}",
        if link.is_active {
            "ACTIVE".green()
        } else {
            "DISABLED".red()
        }
    );
    println!();
}

/// Error message with the offending field, when there is one.
fn describe(error: &golinks::AppError) -> String {
    let info = error.to_error_info();
    match info.details.get("field").and_then(|f| f.as_str()) {
        Some(field) => format!("{} ({})", info.message, field),
        None => info.message,
    }
}
