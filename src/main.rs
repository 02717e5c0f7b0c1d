//! Generic server entry point.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use generic_server::config::{Environment, Settings};
use generic_server::db::Database;
use generic_server::server;

/// Generic JSON HTTP server.
#[derive(Parser, Debug)]
#[command(name = "generic-server")]
#[command(about = "Generic JSON HTTP server with environment-based configuration")]
#[command(version)]
struct Args {
    /// Configuration to use (development, production, testing). Overrides FLASK_ENV.
    #[arg(short, long, global = true)]
    env: Option<Environment>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Bind address. Overrides HOST.
        #[arg(long)]
        host: Option<String>,

        /// Bind port. Overrides PORT.
        #[arg(short, long)]
        port: Option<u16>,

        /// Expose Prometheus metrics at /metrics.
        #[arg(long)]
        metrics: bool,
    },

    /// Initialize the database.
    InitDb,

    /// Drop all database tables.
    DropDb {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.env).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(&settings, args.verbose);

    match args.command {
        Some(Command::Serve {
            host,
            port,
            metrics,
        }) => cmd_serve(settings, host, port, metrics).await,
        Some(Command::InitDb) => cmd_init_db(&settings).await,
        Some(Command::DropDb { yes }) => cmd_drop_db(&settings, yes).await,
        Some(Command::CheckConfig) => cmd_check_config(&settings),
        None => cmd_serve(settings, None, None, false).await,
    }
}

/// Development gets readable output, production gets JSON lines, tests
/// get nothing. `RUST_LOG` wins when set.
fn init_tracing(settings: &Settings, verbose: bool) {
    if settings.testing {
        return;
    }

    let default_filter = if verbose || settings.debug {
        "generic_server=debug,tower_http=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if settings.environment == Environment::Production {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Run the HTTP server until shutdown.
async fn cmd_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
    enable_metrics: bool,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    server::run(settings, enable_metrics).await.map_err(|e| {
        error!("Server error: {}", e);
        e.into()
    })
}

/// Initialize the database.
async fn cmd_init_db(settings: &Settings) -> anyhow::Result<()> {
    let db = Database::connect(settings).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    let created = db.create_all().await?;
    db.close().await;

    for table in created {
        println!("  {}", table);
    }
    println!("Database initialized!");
    Ok(())
}

/// Drop all database tables after confirmation.
async fn cmd_drop_db(settings: &Settings, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm("Are you sure you want to drop all tables? (yes/no): ")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let db = Database::connect(settings).await?;
    db.drop_all().await?;
    db.close().await;

    println!("Database tables dropped!");
    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

/// Print the resolved configuration.
fn cmd_check_config(settings: &Settings) -> anyhow::Result<()> {
    let addr = server::bind_addr(settings)?;

    println!("======================================================================");
    println!("GENERIC SERVER - CONFIGURATION CHECK");
    println!("======================================================================");
    println!("  Environment: {}", settings.environment);
    println!("  Debug: {}", settings.debug);
    println!("  Secret Key: {}", settings.masked_secret());
    println!("  CORS Origins: {}", settings.cors_origins.join(", "));
    println!("  Database URL: {}", settings.database_url);
    println!("  SQL Echo: {}", settings.sql_echo);
    println!("  Max Request Size: {} bytes", settings.max_content_length);
    println!("  Timezone: {}", settings.timezone);
    println!("  Bind Address: {}", addr);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");
    Ok(())
}
