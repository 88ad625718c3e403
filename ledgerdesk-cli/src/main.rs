//! ledgerdesk CLI - command-line admin console for the ledger backend
//!
//! Every command runs one console page. Rendered pages are written as HTML to
//! stdout (or `--output`); alerts, prompts and logs go to stderr.

mod terminal;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ledgerdesk_client::{
    Clients, EntityResource, FileStore, KeyValueStore, Navigator, RecordingNavigator, Route,
    Users,
};
use ledgerdesk_console::{
    AuthPage, ClientsPage, ConsoleContext, ConsoleEntity, DashboardPage, EntityPage, Page,
    UsersPage,
};
use ledgerdesk_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success, performance,
    ClientTransaction, ClientUpdate, ConsoleConfig, LedgerResult, NewClient, NewUser,
    UserTransaction,
};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::TerminalView;
use tracing::info;

#[derive(Parser)]
#[command(name = "ledgerdesk")]
#[command(about = "Admin console for the ledger bookkeeping backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend API root, overrides the configuration file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file, overrides the configuration file
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Write the rendered page here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },

    /// Drop the stored session
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Summary counters and recent activity
    Dashboard {
        /// Keep refreshing on the configured interval
        #[arg(long)]
        watch: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage clients
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Operations both entity pages support
#[derive(Subcommand)]
enum ListCommands {
    /// Table of records with their balances
    List,
    /// Sidebar list of names
    Names,
    /// Credit and debit history of one record
    Records { id: i64 },
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(flatten)]
    Common(ListCommands),
    /// Add a user
    Add(NewUserArgs),
    /// Enable a user
    Enable { id: i64 },
    /// Disable a user
    Disable { id: i64 },
    /// Record a payment to a user
    Credit {
        id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "0")]
        round_off: f64,
    },
    /// Record produce bought from a user
    Debit {
        id: i64,
        #[arg(long)]
        bags: i64,
        #[arg(long)]
        product_type: String,
        #[arg(long)]
        kg: f64,
        #[arg(long, default_value = "0")]
        cut_weight: f64,
        #[arg(long)]
        amount_per_kg: f64,
    },
}

#[derive(Args)]
struct NewUserArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    mobile: String,
    #[arg(long)]
    location: String,
}

#[derive(Subcommand)]
enum ClientCommands {
    #[command(flatten)]
    Common(ListCommands),
    /// Add a client
    Add(NewClientArgs),
    /// Change a client's name, location or phone number
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Record a payment received from a client
    Credit {
        id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long, allow_hyphen_values = true)]
        profit_loss: Option<f64>,
    },
    /// Record goods sold to a client
    Debit {
        id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long, allow_hyphen_values = true)]
        profit_loss: Option<f64>,
    },
}

#[derive(Args)]
struct NewClientArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    phone: String,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init,
    /// Check the effective configuration
    Validate,
}

/// Console wiring for one command.
struct Console {
    ctx: ConsoleContext,
    view: Arc<TerminalView>,
    navigator: Arc<RecordingNavigator>,
    output: Option<PathBuf>,
}

impl Console {
    fn build(config: ConsoleConfig, yes: bool, output: Option<PathBuf>) -> anyhow::Result<Self> {
        let session_file = config.storage.resolved_session_file();
        info!(session_file = %session_file.display(), "Using session store");

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&session_file));
        let navigator = Arc::new(RecordingNavigator::new());
        let view = Arc::new(TerminalView::new(yes));
        let ctx = ConsoleContext::new(
            config,
            store,
            navigator.clone() as Arc<dyn Navigator>,
            view.clone(),
        )
        .context("Failed to set up console")?;

        Ok(Self {
            ctx,
            view,
            navigator,
            output,
        })
    }

    /// Write out whatever the command rendered and explain redirects.
    fn finish(&self, title: &str) -> anyhow::Result<()> {
        if self.view.has_regions() {
            self.view
                .write_page(title, self.output.as_deref())
                .context("Failed to write page")?;
        }
        if self.navigator.last() == Some(Route::Login) {
            eprintln!("🔒 Not signed in. Run 'ledgerdesk login' first.");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if cli.verbose {
        config.logging = config.logging.verbose();
    }
    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
    }
    if let Some(session_file) = &cli.session_file {
        config.storage.session_file = session_file.to_string_lossy().into_owned();
    }

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting ledgerdesk v{}", env!("CARGO_PKG_VERSION"));

    let command = match cli.command {
        Commands::Config { command } => {
            return handle_config(&command, cli.config.as_ref(), &config)
        }
        command => command,
    };

    config.validate().context("Invalid configuration")?;
    let console = Console::build(config, cli.yes, cli.output)?;

    let (title, result) = match command {
        Commands::Register {
            name,
            password,
            confirm_password,
        } => {
            let page = AuthPage::new(console.ctx.clone());
            let result = page
                .register(&name, &password, &confirm_password)
                .await
                .map(|_| ());
            ("Register", result)
        }
        Commands::Login { name, password } => {
            log_operation_start!("login", name = %name);
            let page = AuthPage::new(console.ctx.clone());
            let result = page.login(&name, &password).await.map(|admin| {
                log_operation_success!("login", admin = %admin.name);
                println!("✅ Signed in as {}", admin.name);
            });
            ("Login", result)
        }
        Commands::Logout => {
            console.ctx.session().clear();
            println!("👋 Signed out");
            return Ok(());
        }
        Commands::Whoami => {
            match console.ctx.session().load() {
                Some(session) => println!("{} ({})", session.admin.name, session.admin.uuid),
                None => println!("Not signed in"),
            }
            return Ok(());
        }
        Commands::Dashboard { watch } => {
            ("Dashboard", handle_dashboard(&console, watch).await)
        }
        Commands::Users { command } => ("Users", handle_users(&console, command).await),
        Commands::Clients { command } => ("Clients", handle_clients(&console, command).await),
        Commands::Config { .. } => return Ok(()),
    };

    console.finish(title)?;

    if let Err(e) = result {
        log_operation_error!("command", e, page = title);
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(config_path: Option<&PathBuf>) -> anyhow::Result<ConsoleConfig> {
    if let Some(path) = config_path {
        return ConsoleConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path));
    }

    for path in ConsoleConfig::default_locations() {
        if path.exists() {
            return ConsoleConfig::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {:?}", path));
        }
    }

    Ok(ConsoleConfig::default())
}

fn handle_config(
    command: &ConfigCommands,
    config_path: Option<&PathBuf>,
    config: &ConsoleConfig,
) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("📋 Current configuration:");
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigCommands::Init => {
            let path = match config_path {
                Some(path) => path.clone(),
                None => dirs::config_dir()
                    .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
                    .context("No configuration directory available")?
                    .join("ledgerdesk")
                    .join("config.toml"),
            };
            ConsoleConfig::default().save_to_file(&path)?;
            println!("✅ Configuration initialized at: {:?}", path);
        }
        ConfigCommands::Validate => match config.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => {
                println!("❌ Configuration validation failed: {}", e);
                return Err(e.into());
            }
        },
    }
    Ok(())
}

async fn handle_dashboard(console: &Console, watch: bool) -> LedgerResult<()> {
    let page = DashboardPage::new(console.ctx.clone());
    if !watch {
        return performance::measure_async("dashboard", page.load()).await;
    }

    page.watch(None, |summary| {
        info!(total_users = summary.total_users, "Dashboard refreshed");
        // Errors from failed ticks were already printed; the fresh data supersedes them
        console.view.clear_alerts();
        if let Err(e) = console
            .view
            .write_page("Dashboard", console.output.as_deref())
        {
            tracing::warn!(error = %e, "Failed to write dashboard page");
        }
    })
    .await
    .map(|_| ())
}

async fn handle_list<R: ConsoleEntity>(page: &EntityPage<R>, command: ListCommands) -> LedgerResult<()> {
    match command {
        ListCommands::List => performance::measure_async(R::PLURAL, page.load()).await,
        ListCommands::Names => page.load_panel().await.map(|_| ()),
        ListCommands::Records { id } => page.view_records(id).await.map(|_| ()),
    }
}

async fn handle_users(console: &Console, command: UserCommands) -> LedgerResult<()> {
    let page = UsersPage::new(console.ctx.clone());
    log_operation_start!("users", entity = Users::PLURAL);

    match command {
        UserCommands::Common(command) => handle_list(&page, command).await,
        UserCommands::Add(args) => {
            page.open_add_form();
            page.submit_new(&NewUser {
                first_name: args.first_name,
                last_name: args.last_name,
                mobile: args.mobile,
                location: args.location,
            })
            .await
            .map(|_| ())
        }
        UserCommands::Enable { id } => page.set_status(id, true).await.map(|_| ()),
        UserCommands::Disable { id } => page.set_status(id, false).await.map(|_| ()),
        UserCommands::Credit {
            id,
            amount,
            round_off,
        } => {
            page.open_transaction_form();
            page.submit_transaction(
                id,
                &UserTransaction::Credit {
                    credit_amount: amount,
                    round_off,
                },
            )
            .await
        }
        UserCommands::Debit {
            id,
            bags,
            product_type,
            kg,
            cut_weight,
            amount_per_kg,
        } => {
            page.open_transaction_form();
            page.submit_transaction(
                id,
                &UserTransaction::Debit {
                    bags,
                    product_type,
                    kg,
                    cut_weight,
                    amount_per_kg,
                },
            )
            .await
        }
    }
}

async fn handle_clients(console: &Console, command: ClientCommands) -> LedgerResult<()> {
    let page = ClientsPage::new(console.ctx.clone());
    log_operation_start!("clients", entity = Clients::PLURAL);

    match command {
        ClientCommands::Common(command) => handle_list(&page, command).await,
        ClientCommands::Add(args) => {
            page.open_add_form();
            page.submit_new(&NewClient {
                name: args.name,
                username: args.username,
                location: args.location,
                phone_number: args.phone,
            })
            .await
            .map(|_| ())
        }
        ClientCommands::Update {
            id,
            name,
            location,
            phone,
        } => {
            page.open_update_form();
            page.submit_update(
                id,
                &ClientUpdate {
                    name,
                    location,
                    phone_number: phone,
                },
            )
            .await
            .map(|_| ())
        }
        ClientCommands::Credit {
            id,
            amount,
            profit_loss,
        } => {
            page.open_transaction_form();
            page.submit_transaction(
                id,
                &ClientTransaction::Credit {
                    credit_amount: amount,
                    profit_loss,
                },
            )
            .await
        }
        ClientCommands::Debit {
            id,
            amount,
            profit_loss,
        } => {
            page.open_transaction_form();
            page.submit_transaction(
                id,
                &ClientTransaction::Debit {
                    debit_amount: amount,
                    profit_loss,
                },
            )
            .await
        }
    }
}
