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
use engine::{Engine, EngineError, Role};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "pavilion_admin")]
#[command(about = "Admin utilities for Pavilion (bootstrap users, run profit distributions)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./pavilion.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Profit(Profit),
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
    /// `admin` or `readonly`.
    #[arg(long, default_value = "readonly", value_parser = parse_role)]
    role: Role,
}

#[derive(Args, Debug)]
struct Profit {
    #[command(subcommand)]
    command: ProfitCommand,
}

#[derive(Subcommand, Debug)]
enum ProfitCommand {
    /// Split the profit of a sold vehicle among its investors.
    Distribute(ProfitArgs),
    /// Delete the distributions of a vehicle so it can be distributed again.
    Reset(ProfitArgs),
}

#[derive(Args, Debug)]
struct ProfitArgs {
    #[arg(long)]
    vehicle_id: i32,
    /// Admin user the operation is performed as.
    #[arg(long)]
    as_user: String,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn print_line(message: &str) -> CliResult<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    out.flush()?;
    Ok(())
}

/// Read a password in raw mode, echoing `*` for each character.
fn prompt_password(prompt: &str) -> CliResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => break,
            KeyCode::Backspace if buf.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(buf)
}

fn prompt_new_password() -> CliResult<String> {
    for _ in 0..3 {
        let password = prompt_password("Password: ")?;
        if password.is_empty() {
            print_line("Password must not be empty.")?;
            continue;
        }
        if prompt_password("Confirm password: ")? == password {
            return Ok(password);
        }
        print_line("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: &Engine, command: Command) -> CliResult<()> {
    match command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            let user = engine.new_user(&args.username, &password, args.role).await?;
            println!("created user: {} ({})", user.username, user.role.as_str());
        }
        Command::Profit(Profit {
            command: ProfitCommand::Distribute(args),
        }) => {
            let result = engine
                .distribute_profit(args.vehicle_id, &args.as_user)
                .await?;
            for row in &result.distributions {
                println!(
                    "investor {:>5}  {:>8.4}%  {:>14.2}",
                    row.investor_id, row.percentage, row.amount
                );
            }
            println!(
                "distributed {:.2} to {} investors for vehicle {}",
                result.total_distributed,
                result.distributions_count(),
                result.vehicle_id
            );
        }
        Command::Profit(Profit {
            command: ProfitCommand::Reset(args),
        }) => {
            let deleted = engine
                .delete_distributions(args.vehicle_id, &args.as_user)
                .await?;
            println!(
                "deleted {deleted} distributions for vehicle {}",
                args.vehicle_id
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    let outcome = run(&engine, cli.command).await;
    engine.close().await?;

    match outcome {
        Err(err) => match err.downcast_ref::<EngineError>() {
            Some(EngineError::ExistingKey(_) | EngineError::Forbidden(_)) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
            Some(_) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
            None => Err(err),
        },
        Ok(()) => Ok(()),
    }
}
