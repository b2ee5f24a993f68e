use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use inkwell_core::VERSION;

/// Inkwell - a passphrase-encrypted personal journal
#[derive(Parser)]
#[command(name = "inkwell")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the journal database
    #[arg(short, long, global = true, env = "INKWELL_PATH")]
    pub journal: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Key derivation algorithm choice for `init`
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KdfChoice {
    Pbkdf2Sha256,
    Argon2id,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the journal database will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Key derivation algorithm for new entries
    #[arg(long, value_enum)]
    pub kdf: Option<KdfChoice>,

    /// Iteration count for the key derivation function
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Enable completion feedback in the written config
    #[arg(long)]
    pub feedback: bool,

    /// Config path override
    #[arg(long)]
    pub config_path: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry title
    #[arg(long)]
    pub title: Option<String>,

    /// Entry body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Time window (e.g., "7d", "12h")
    #[arg(long)]
    pub last: Option<String>,

    /// Start date (RFC 3339)
    #[arg(long)]
    pub since: Option<String>,

    /// End date (RFC 3339)
    #[arg(long)]
    pub until: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include completion feedback for each entry
    #[arg(long)]
    pub feedback: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include completion feedback
    #[arg(long)]
    pub feedback: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Entry ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New title (keeps the current one if omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// New body (overrides stdin/editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Entry ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new journal
    Init(InitArgs),

    /// Add a new entry
    Add(AddArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Show a specific entry by ID
    Show(ShowArgs),

    /// Edit an entry's title and body
    Edit(EditArgs),

    /// Delete an entry
    Delete(DeleteArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
