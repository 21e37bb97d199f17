//! Admin utilities for Brigade: bootstrap organizations and users, and
//! feed spreadsheet exports (CSV) into the catalog importers.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, ImportRow};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "brigade_admin")]
#[command(about = "Admin utilities for Brigade (bootstrap organizations/users, CSV imports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./brigade.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Org(Org),
    User(User),
    Ingredients(Ingredients),
    Prepared(Prepared),
}

#[derive(Args, Debug)]
struct Org {
    #[command(subcommand)]
    command: OrgCommand,
}

#[derive(Subcommand, Debug)]
enum OrgCommand {
    Create(OrgCreateArgs),
}

#[derive(Args, Debug)]
struct OrgCreateArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    /// Organization id the user belongs to.
    #[arg(long)]
    organization: Uuid,
}

#[derive(Args, Debug)]
struct Ingredients {
    #[command(subcommand)]
    command: ImportCommand,
}

#[derive(Args, Debug)]
struct Prepared {
    #[command(subcommand)]
    command: ImportCommand,
}

#[derive(Subcommand, Debug)]
enum ImportCommand {
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Organization id to import into.
    #[arg(long)]
    organization: Uuid,
    /// CSV file with a header row matching the import template.
    #[arg(long)]
    csv: PathBuf,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn read_rows(path: &PathBuf) -> Result<Vec<ImportRow>, Box<dyn Error + Send + Sync>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: ImportRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::Org(Org {
            command: OrgCommand::Create(args),
        }) => {
            let id = Uuid::new_v4();
            let org = engine::organizations::ActiveModel {
                id: Set(id),
                name: Set(args.name.clone()),
            };
            engine::organizations::Entity::insert(org).exec(&db).await?;
            println!("created organization {}: {id}", args.name);
        }
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if engine::users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }
            if engine::organizations::Entity::find_by_id(args.organization)
                .one(&db)
                .await?
                .is_none()
            {
                eprintln!("organization not found: {}", args.organization);
                std::process::exit(1);
            }

            let user = engine::users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(args.password),
                organization_id: Set(args.organization),
            };
            engine::users::Entity::insert(user).exec(&db).await?;
            println!("created user: {}", args.username);
        }
        Command::Ingredients(Ingredients {
            command: ImportCommand::Import(args),
        }) => {
            let rows = read_rows(&args.csv)?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            let applied = engine
                .import_master_ingredients(args.organization, &rows)
                .await?;
            println!("imported {applied} master ingredients");
        }
        Command::Prepared(Prepared {
            command: ImportCommand::Import(args),
        }) => {
            let rows = read_rows(&args.csv)?;
            let engine = Engine::builder().database(db.clone()).build().await?;
            let applied = engine
                .import_prepared_items(args.organization, &rows)
                .await?;
            println!("imported {applied} prepared items");
        }
    }

    Ok(())
}
