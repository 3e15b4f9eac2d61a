use std::path::PathBuf;

use clap::{Args, Subcommand};

use atpins::model::{FilterType, SortKey, ViewMode};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Store the PDS, account and access token to use
    Login(LoginArgs),

    /// Forget the stored access token
    Logout,

    /// Show or change local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List pinned files and orphan blobs
    #[command(name = "ls", alias = "list")]
    Ls(LsArgs),

    /// Show one pin by record key
    Show(ShowArgs),

    /// Upload files and pin them
    Upload(UploadArgs),

    /// Download a blob by content id
    Get(GetArgs),

    /// Delete pin records (blobs stay in the repository)
    #[command(name = "rm")]
    Rm(RmArgs),
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Print the current configuration
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Change settings
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    /// PDS base URL, e.g. https://bsky.social
    #[arg(long)]
    pub(crate) pds: String,
    /// Repository owner DID
    #[arg(long)]
    pub(crate) did: String,
    /// Access token (app password session JWT)
    #[arg(long)]
    pub(crate) token: String,
    #[arg(long)]
    pub(crate) handle: Option<String>,
}

#[derive(Args)]
pub(crate) struct ConfigSetArgs {
    #[arg(long)]
    pub(crate) max_upload_bytes: Option<u64>,
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,
    /// Default listing layout (grid|list)
    #[arg(long = "view")]
    pub(crate) view_mode: Option<ViewMode>,
}

/// Filter, search and sort shared by listing and bulk selection.
#[derive(Args, Clone)]
pub(crate) struct ViewArgs {
    /// all|images|videos|documents|other
    #[arg(long, default_value_t = FilterType::All)]
    pub(crate) filter: FilterType,
    /// Case-insensitive match on filename, content id or MIME type
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args)]
pub(crate) struct LsArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,
    /// newest|oldest|largest|smallest|name-asc|name-desc
    #[arg(long, default_value_t = SortKey::Newest)]
    pub(crate) sort: SortKey,
    /// grid|list (defaults to the remembered choice)
    #[arg(long = "view")]
    pub(crate) view_mode: Option<ViewMode>,
    /// Look up type and size of orphan blobs (one HEAD request each)
    #[arg(long)]
    pub(crate) probe: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    pub(crate) record_key: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct UploadArgs {
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// MIME type for every file (inferred from the extension otherwise)
    #[arg(long)]
    pub(crate) mime: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct GetArgs {
    pub(crate) content_id: String,
    /// Destination file, or `-` for stdout (defaults to the pinned filename)
    #[arg(long, short = 'o')]
    pub(crate) output: Option<PathBuf>,
    /// Overwrite an existing destination
    #[arg(long)]
    pub(crate) force: bool,
}

#[derive(Args)]
pub(crate) struct RmArgs {
    /// Content ids of pinned files
    pub(crate) content_ids: Vec<String>,
    /// Select every pinned file matching --filter/--search
    #[arg(long)]
    pub(crate) all: bool,
    #[command(flatten)]
    pub(crate) view: ViewArgs,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
