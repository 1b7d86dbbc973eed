//! CarePanel CLI
//!
//! Command-line front end for the admin dashboard core:
//! - Sign in / sign out / register accounts
//! - Show dashboard statistics
//! - Search, filter and export the patient directory
//! - Manage the theme preference
//!
//! The session persists in the configured data directory between invocations.

use anyhow::{bail, Context};
use carepanel::{
    export_csv, generate_default_config, guard, Account, App, BackendKind, Config,
    DashboardData, GuardDecision, LoggingConfig, Patient, PatientFilter, PatientStatus,
    RegisteredAccount, Route, Theme,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "carepanel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Healthcare back-office admin dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Register a new admin account (does not sign in)
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Show dashboard statistics
    Stats,

    /// List or export patients
    Patients {
        /// Search name, id or assigned doctor
        #[arg(short, long)]
        search: Option<String>,
        /// Status filter (active, recovered, critical)
        #[arg(long)]
        status: Option<PatientStatus>,
        /// Write CSV to this file ("-" for stdout)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show account settings and appearance
    Settings,

    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Check where navigating to a path would land
    Navigate {
        /// Path such as /patients or /login
        path: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Set the theme
    Set { theme: Theme },
    /// Switch between dark and light
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, load_error) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::try_load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
        config.storage.backend = BackendKind::File;
    }

    init_logging(&config.logging);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "Ignoring config file, using defaults");
    }

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let app = App::new(config);
    if app.store.is_degraded() {
        eprintln!("Warning: storage unavailable, session will not be saved");
    }

    run(&app, cli.command, cli.format).await
}

async fn run(app: &App, command: Commands, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let account = app.auth.login(&email, &password).await?;
            match format {
                OutputFormat::Table => println!("Signed in as {} <{}>", account.name, account.email),
                OutputFormat::Json => print_json(&account)?,
            }
        }

        Commands::Logout => {
            app.auth.logout();
            if format == OutputFormat::Table {
                println!("Signed out");
            }
        }

        Commands::Whoami => match (app.auth.current_account(), format) {
            (Some(account), OutputFormat::Table) => print_account(&account),
            (Some(account), OutputFormat::Json) => print_json(&account)?,
            (None, OutputFormat::Table) => println!("Not signed in"),
            (None, OutputFormat::Json) => println!("null"),
        },

        Commands::Register {
            name,
            email,
            password,
            avatar,
        } => {
            if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
                bail!("Name, email and password are required");
            }

            let id = format!("u_{}", uuid::Uuid::new_v4().simple());
            let mut account = Account::new(id, name, email);
            account.avatar = avatar;

            app.auth.register(RegisteredAccount::new(account.clone(), password));
            match format {
                OutputFormat::Table => println!("Registered {} <{}>", account.name, account.email),
                OutputFormat::Json => print_json(&account)?,
            }
        }

        Commands::Stats => {
            require_access(app, Route::Dashboard)?;
            let data = app.dashboard.ensure_loaded().await?;
            match format {
                OutputFormat::Table => print_stats(&data),
                OutputFormat::Json => print_json(&data)?,
            }
        }

        Commands::Patients {
            search,
            status,
            export,
        } => {
            require_access(app, Route::Patients)?;
            let data = app.dashboard.ensure_loaded().await?;

            let mut filter = PatientFilter::new();
            if let Some(text) = search {
                filter = filter.search(text);
            }
            if let Some(status) = status {
                filter = filter.status(status);
            }
            let patients = filter.apply(&data.recent_patients);

            match export {
                Some(path) if path.as_os_str() == "-" => {
                    export_csv(patients, std::io::stdout().lock())?;
                }
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {:?}", path))?;
                    let rows = export_csv(patients, file)?;
                    if format == OutputFormat::Table {
                        println!("Exported {} patients to {:?}", rows, path);
                    }
                }
                None => match format {
                    OutputFormat::Table => print_patients(&patients),
                    OutputFormat::Json => print_json(&patients)?,
                },
            }
        }

        Commands::Settings => {
            require_access(app, Route::Settings)?;
            let account = app.auth.current_account();
            let theme = app.themes.load();
            match format {
                OutputFormat::Table => {
                    match &account {
                        Some(account) => print_account(account),
                        None => println!("Not signed in"),
                    }
                    println!("Theme:  {}", theme);
                }
                OutputFormat::Json => print_json(&serde_json::json!({
                    "account": account,
                    "theme": theme,
                }))?,
            }
        }

        Commands::Theme { action } => {
            let theme = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => app.themes.load(),
                ThemeAction::Set { theme } => {
                    app.themes.set(theme);
                    theme
                }
                ThemeAction::Toggle => app.themes.toggle(),
            };
            match format {
                OutputFormat::Table => println!("{}", theme),
                OutputFormat::Json => print_json(&theme)?,
            }
        }

        Commands::Navigate { path } => {
            let decision = guard(app.auth.is_authenticated(), &path);
            match format {
                OutputFormat::Json => print_json(&decision)?,
                OutputFormat::Table => match decision {
                    GuardDecision::Allow { route } => println!("allow {} ({})", path, route),
                    GuardDecision::Redirect { to, from } => match from {
                        Some(from) => println!("redirect {} (from {})", to.path(), from),
                        None => println!("redirect {}", to.path()),
                    },
                },
            }
        }

        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

/// Apply the route guard for a view-backed command
fn require_access(app: &App, route: Route) -> anyhow::Result<()> {
    match guard(app.auth.is_authenticated(), route.path()) {
        GuardDecision::Allow { .. } => Ok(()),
        GuardDecision::Redirect { to, .. } => {
            bail!("Sign in required to view {} (redirected to {})", route, to.path())
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("carepanel={}", config.level)));

    let json = config.format.eq_ignore_ascii_case("json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let pretty_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_account(account: &Account) {
    println!("Name:   {}", account.name);
    println!("Email:  {}", account.email);
    println!("Role:   {}", account.role);
    if let Some(avatar) = &account.avatar {
        println!("Avatar: {}", avatar);
    }
}

fn print_stats(data: &DashboardData) {
    let stats = &data.stats;
    println!("{:<20} {:>8}", "Total patients", stats.total_patients);
    println!("{:<20} {:>8}", "Total doctors", stats.total_doctors);
    println!("{:<20} {:>8}", "Appointments", stats.total_appointments);
    println!("{:<20} {:>8}", "Active clinics", stats.active_clinics);
    println!();
    println!("Recent patients by status:");
    for (status, count) in data.status_counts() {
        println!("  {:<18} {:>8}", status, count);
    }
}

fn print_patients(patients: &[&Patient]) {
    if patients.is_empty() {
        println!("No patients match");
        return;
    }

    println!(
        "{:<6} {:<16} {:<10} {:<16} {:<10}",
        "ID", "NAME", "STATUS", "DOCTOR", "LAST VISIT"
    );
    for p in patients {
        println!(
            "{:<6} {:<16} {:<10} {:<16} {:<10}",
            p.id,
            p.name,
            p.status.to_string(),
            p.assigned_doctor,
            p.last_visit.to_string()
        );
    }
}
