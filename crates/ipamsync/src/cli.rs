//! Clap derive structures for the `ipamsync` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ipamsync_core::Source;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ipamsync -- import cloud network inventories into Infoblox IPAM
#[derive(Debug, Parser)]
#[command(
    name = "ipamsync",
    version,
    about = "Import cloud network inventories into Infoblox IPAM",
    long_about = "Reads network exports from AWS, Azure, GCP, Alibaba Cloud, property\n\
        sheets, or custom CSV/Excel files, compares them with the networks in an\n\
        Infoblox network view, and creates or updates what differs.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Grid Master profile to use
    #[arg(long, short = 'p', env = "IPAMSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Grid Master URL or host (overrides profile)
    #[arg(long, short = 'g', env = "INFOBLOX_GRID_MASTER", global = true)]
    pub grid_master: Option<String>,

    /// WAPI username (overrides profile)
    #[arg(long, short = 'u', env = "INFOBLOX_USERNAME", global = true)]
    pub username: Option<String>,

    /// WAPI password
    #[arg(long, env = "INFOBLOX_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// WAPI version (overrides profile)
    #[arg(long, env = "INFOBLOX_WAPI_VERSION", global = true)]
    pub wapi_version: Option<String>,

    /// Network view to operate on (overrides profile)
    #[arg(long, short = 'n', env = "INFOBLOX_NETWORK_VIEW", global = true)]
    pub network_view: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IPAMSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "INFOBLOX_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "INFOBLOX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Inventory source, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Aws,
    Azure,
    Gcp,
    Alibaba,
    Properties,
    Custom,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Aws => Self::Aws,
            SourceArg::Azure => Self::Azure,
            SourceArg::Gcp => Self::Gcp,
            SourceArg::Alibaba => Self::Alibaba,
            SourceArg::Properties => Self::Properties,
            SourceArg::Custom => Self::Custom,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import networks from a CSV or Excel inventory
    #[command(alias = "import-networks")]
    Import(ImportArgs),

    /// Write a starter attribute mapping file
    #[command(alias = "generate-mapping-template")]
    MappingTemplate(MappingTemplateArgs),

    /// Check that the Grid Master is reachable with the configured credentials
    TestConnection,

    /// List extensible attribute definitions
    ListEas,

    /// List networks in the active network view
    ListNetworks(ListNetworksArgs),

    /// List network views
    ListViews,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IMPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Network file to import (.csv, .xlsx, .xls)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: PathBuf,

    /// Where the inventory was exported from
    #[arg(long, short = 's')]
    pub source: SourceArg,

    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt (same as --yes)
    #[arg(long)]
    pub no_confirm: bool,

    /// Attribute mapping file (JSON)
    #[arg(long, short = 'm', value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Pause between Grid Master calls, in milliseconds (overrides profile)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAPPING TEMPLATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MappingTemplateArgs {
    /// Source to tailor the template for
    #[arg(long, short = 's')]
    pub source: Option<SourceArg>,

    /// Where to write the template ("-" for stdout)
    #[arg(long, short = 'f', value_name = "PATH", default_value = "ea_mappings.json")]
    pub file: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LISTING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListNetworksArgs {
    /// Max networks to fetch (defaults to the profile's max_results)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., "grid_master", "network_view")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the WAPI password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
