use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "hangover_admin")]
#[command(about = "Admin utilities for Hangover Club (bootstrap users/groups)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./hangover.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Group(Group),
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
    /// Display name, defaults to the username.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
}

const PASSWORD_ATTEMPTS: usize = 3;

/// Raw terminal mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Typed,
    Erased,
    Ignored,
    Submit,
    Cancel,
}

/// Apply one key press to the hidden input buffer.
fn apply_key(buf: &mut String, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Esc => KeyOutcome::Cancel,
        KeyCode::Char('c') if ctrl => KeyOutcome::Cancel,
        KeyCode::Backspace if buf.pop().is_some() => KeyOutcome::Erased,
        KeyCode::Char(ch) if !ctrl => {
            buf.push(ch);
            KeyOutcome::Typed
        }
        _ => KeyOutcome::Ignored,
    }
}

fn notice(out: &mut impl Write, message: &str) -> std::io::Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message)
    )
}

fn read_hidden(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    notice(&mut out, prompt)?;

    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut buf, key) {
            KeyOutcome::Typed => execute!(out, Print("*"))?,
            KeyOutcome::Erased => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?
            }
            KeyOutcome::Ignored => {}
            KeyOutcome::Submit => {
                execute!(out, Print("\r\n"))?;
                return Ok(buf);
            }
            KeyOutcome::Cancel => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
        }
        out.flush()?;
    }
}

/// Why a password pair was refused, if it was.
fn rejection(first: &str, second: &str) -> Option<&'static str> {
    if first.is_empty() {
        Some("Password must not be empty.")
    } else if first != second {
        Some("Passwords do not match. Try again.")
    } else {
        None
    }
}

fn read_new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..PASSWORD_ATTEMPTS {
        let first = read_hidden("Password: ")?;
        let second = if first.is_empty() {
            String::new()
        } else {
            read_hidden("Confirm password: ")?
        };
        match rejection(&first, &second) {
            None => return Ok(first),
            Some(reason) => notice(&mut out, &format!("{reason}\r\n"))?,
        }
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = read_new_password()?;
            let name = args.name.as_deref().unwrap_or(&args.username);

            match engine.register_user(&args.username, name, &password).await {
                Ok(user) => println!("created user: {}", user.username),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Group(Group {
            command: GroupCommand::Create(args),
        }) => {
            match engine
                .create_group(&args.name, args.description.as_deref(), &args.owner)
                .await
            {
                Ok(group) => println!("created group: {} ({})", group.name, group.id),
                Err(EngineError::KeyNotFound(_)) => {
                    eprintln!("user not found: {}", args.owner);
                    std::process::exit(1);
                }
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("{} already owns a group named {}", args.owner, args.name);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_edit_the_hidden_buffer() {
        let mut buf = String::new();
        assert_eq!(apply_key(&mut buf, key(KeyCode::Char('a'))), KeyOutcome::Typed);
        assert_eq!(apply_key(&mut buf, key(KeyCode::Char('b'))), KeyOutcome::Typed);
        assert_eq!(apply_key(&mut buf, key(KeyCode::Backspace)), KeyOutcome::Erased);
        assert_eq!(buf, "a");
        assert_eq!(apply_key(&mut buf, key(KeyCode::Left)), KeyOutcome::Ignored);
        assert_eq!(apply_key(&mut buf, key(KeyCode::Enter)), KeyOutcome::Submit);
        assert_eq!(buf, "a");
    }

    #[test]
    fn backspace_on_empty_input_is_ignored() {
        let mut buf = String::new();
        assert_eq!(apply_key(&mut buf, key(KeyCode::Backspace)), KeyOutcome::Ignored);
    }

    #[test]
    fn ctrl_c_cancels() {
        let mut buf = String::from("secret");
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut buf, ctrl_c), KeyOutcome::Cancel);
        assert_eq!(buf, "secret");
    }

    #[test]
    fn password_pairs_are_checked() {
        assert_eq!(rejection("", ""), Some("Password must not be empty."));
        assert_eq!(
            rejection("secret", "secrte"),
            Some("Passwords do not match. Try again.")
        );
        assert_eq!(rejection("secret", "secret"), None);
    }
}
