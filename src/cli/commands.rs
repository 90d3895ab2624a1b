use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hd", about = concat!("hrdesk v", env!("CARGO_PKG_VERSION"), " - checklists, boards and pipelines for HR"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different desk directory
    #[arg(short = 'C', long = "desk-dir", global = true)]
    pub desk_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a sample desk in the current directory
    Init(InitArgs),
    /// Print the navigation tree
    Nav(NavArgs),
    /// List pages with their progress
    Pages,
    /// Show a page's categories or columns
    Show(ShowArgs),
    /// Show per-category and overall progress of a page
    Progress(PageArg),
    /// Show the next item to work on in a page
    Next(PageArg),
    /// List overdue items across pages
    Overdue(OverdueArgs),
    /// Search items by regex
    Search(SearchArgs),
    /// Validate desk integrity
    Check,
}

#[derive(Args)]
pub struct InitArgs {
    /// Desk name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if hrdesk/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct NavArgs {
    /// Expand every node
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Page key
    pub page: String,
    /// Only items with this status key
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct PageArg {
    /// Page key
    pub page: String,
}

#[derive(Args)]
pub struct OverdueArgs {
    /// Reference date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern
    pub pattern: String,
    /// Limit to one page
    #[arg(long)]
    pub page: Option<String>,
}
