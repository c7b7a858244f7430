pub mod auth;
pub mod contacts;
pub mod export;
pub mod groups;
pub mod import;
pub mod merge;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{ArgGroup, Args, Parser, Subcommand};
use contactbook_common::config::Config;
use contactbook_common::error::ApiError;
use contactbook_common::models::{ExportFormat, SortOrder};
use contactbook_common::ports::{ContactsApi, SessionStore};
use contactbook_core::api::HttpContactsApi;
use contactbook_core::auth::AuthError;
use contactbook_core::contacts::{ContactsError, FieldEdit};
use contactbook_core::export::ExportError;
use contactbook_core::groups::GroupsError;
use contactbook_core::merge::MergeError;
use contactbook_core::session::FileSessionStore;

use import::ColumnOverride;

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(about = "Manage your address book from the terminal.", version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less decoration (-q drops headers, -qq prints results only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Base URL of the contacts API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "CONTACTBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the session token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List contacts
    #[command(alias = "ls")]
    List {
        /// Filter by name, email, phone, company or job title
        #[arg(short, long)]
        search: Option<String>,
        /// Only members of this group (id or name)
        #[arg(short, long)]
        group: Option<String>,
        /// name-asc, name-desc, newest, oldest or company; remembered for next time
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Show every field of a contact
    Show { id: i64 },
    /// Create a contact
    Add(NewContactArgs),
    /// Change fields of a contact
    Edit {
        id: i64,
        /// field=value, repeatable; an empty value clears the field
        #[arg(short = 'f', long = "field", required = true, value_name = "FIELD=VALUE")]
        fields: Vec<FieldEdit>,
    },
    /// Delete one or more contacts
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage groups
    #[command(subcommand)]
    Groups(GroupsCommand),
    /// Add contacts to a group
    Assign {
        group: String,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Remove contacts from a group
    Unassign {
        group: String,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Import contacts from a CSV, TSV, Excel or vCard file
    Import {
        file: PathBuf,
        /// header=field, repeatable; use `skip` as the field to ignore a column
        #[arg(short = 'm', long = "map", value_name = "HEADER=FIELD")]
        mappings: Vec<ColumnOverride>,
        /// Parse and map without creating anything
        #[arg(long)]
        dry_run: bool,
        /// Concurrent requests per batch
        #[arg(long)]
        batch_size: Option<usize>,
        /// Skip unknown columns instead of asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Print or save an import template
    #[command(group(ArgGroup::new("kind").args(["json", "csv"])))]
    Template {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        csv: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Download the address book as csv, xlsx or vcard
    Export {
        format: ExportFormat,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Merge the secondary contact into the primary and delete the secondary
    Merge {
        primary: i64,
        secondary: i64,
        /// Override a merged value: field=value, repeatable
        #[arg(short = 's', long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<FieldEdit>,
        /// Apply without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// List likely duplicate contacts
    #[command(alias = "dups")]
    Duplicates,
}

#[derive(Args)]
pub struct NewContactArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub job_title: Option<String>,
    /// Any other field: field=value, repeatable
    #[arg(short = 'f', long = "field", value_name = "FIELD=VALUE")]
    pub fields: Vec<FieldEdit>,
}

#[derive(Subcommand)]
pub enum GroupsCommand {
    /// List groups
    #[command(alias = "ls")]
    List,
    /// Create a group
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename a group
    Rename {
        group: String,
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a group (its contacts are kept)
    Delete {
        group: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// List the contacts of a group
    Members { group: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Shared handles built once per invocation.
pub struct Context {
    pub config: Config,
    pub api: Arc<dyn ContactsApi>,
    pub session: Arc<dyn SessionStore>,
}

impl Context {
    pub fn new(cli: &CommandLine) -> anyhow::Result<Self> {
        let mut config = Config::load().context("failed to load configuration")?;
        if let Some(url) = &cli.api_url {
            config.set_api_url(url).context("invalid --api-url")?;
        }
        config.quiet = cli.quiet;

        let session: Arc<dyn SessionStore> = Arc::new(
            FileSessionStore::open(&config.session_path).context("failed to open session file")?,
        );
        let api: Arc<dyn ContactsApi> = Arc::new(
            HttpContactsApi::new(config.api_url.clone(), config.timeout, session.clone())
                .context("failed to build HTTP client")?,
        );

        Ok(Self {
            config,
            api,
            session,
        })
    }
}

pub async fn run(cli: CommandLine, ctx: Context) -> anyhow::Result<()> {
    match cli.command {
        Commands::Login { email, password } => auth::login(&ctx, email, password).await,
        Commands::Logout => auth::logout(&ctx).await,
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::List {
            search,
            group,
            sort,
        } => contacts::list(&ctx, search, group, sort).await,
        Commands::Show { id } => contacts::show(&ctx, id).await,
        Commands::Add(args) => contacts::add(&ctx, args).await,
        Commands::Edit { id, fields } => contacts::edit(&ctx, id, &fields).await,
        Commands::Delete { ids, yes } => contacts::delete(&ctx, ids, yes).await,
        Commands::Groups(command) => groups::run(&ctx, command).await,
        Commands::Assign { group, ids } => groups::assign(&ctx, &group, ids).await,
        Commands::Unassign { group, ids } => groups::unassign(&ctx, &group, ids).await,
        Commands::Import {
            file,
            mappings,
            dry_run,
            batch_size,
            yes,
        } => {
            let options = import::ImportOptions {
                mappings,
                dry_run,
                batch_size: batch_size.unwrap_or(ctx.config.batch_size),
                assume_yes: yes,
            };
            import::import(&ctx, &file, options).await
        }
        Commands::Template { json, csv: _, out } => import::template(json, out.as_deref()),
        Commands::Export { format, out } => export::export(&ctx, format, out).await,
        Commands::Merge {
            primary,
            secondary,
            overrides,
            yes,
        } => merge::merge(&ctx, primary, secondary, &overrides, yes).await,
        Commands::Duplicates => merge::duplicates(&ctx).await,
    }
}

/// True when any error in the chain is a rejected or expired session.
pub fn session_expired(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized)
            || cause
                .downcast_ref::<AuthError>()
                .is_some_and(AuthError::is_unauthorized)
            || cause
                .downcast_ref::<ContactsError>()
                .is_some_and(ContactsError::is_unauthorized)
            || cause
                .downcast_ref::<GroupsError>()
                .is_some_and(GroupsError::is_unauthorized)
            || cause
                .downcast_ref::<ExportError>()
                .is_some_and(ExportError::is_unauthorized)
            || cause
                .downcast_ref::<MergeError>()
                .is_some_and(MergeError::is_unauthorized)
    })
}
