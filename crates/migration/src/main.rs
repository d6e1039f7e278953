use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "usage: migration [up [N] | down [N] | fresh | refresh | reset | status]";

fn steps(raw: Option<String>) -> Result<Option<u32>, String> {
    raw.map(|n| n.parse::<u32>().map_err(|_| format!("invalid step count: {n}")))
        .transpose()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| String::from("up"));
    let steps = match steps(args.next()) {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| String::from("sqlite:./hangover.db?mode=rwc"));
    let db = Database::connect(&url).await?;

    match command.as_str() {
        "up" => migration::Migrator::up(&db, steps).await?,
        // Without a count only the latest migration is reverted.
        "down" => migration::Migrator::down(&db, Some(steps.unwrap_or(1))).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "refresh" => migration::Migrator::refresh(&db).await?,
        "reset" => migration::Migrator::reset(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command {other}\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
