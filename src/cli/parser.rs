use clap::{Parser, Subcommand};

/// Command-line interface definition for mealsheet
/// Telegram bot recording daily meal counts into a Google Sheet
#[derive(Parser)]
#[command(
    name = "mealsheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "A Telegram bot that records `meal <n>` messages into a Google Sheet",
    long_about = None
)]
pub struct Cli {
    /// Override the configuration directory (useful for tests or multiple bots)
    #[arg(global = true, long = "home", value_name = "DIR")]
    pub home: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration, state file and audit database
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start the bot: poll Telegram and record meal messages
    Run,

    /// Point the bot at a Google Sheet (local equivalent of the /update chat command)
    Link {
        /// Google Sheet link, e.g. https://docs.google.com/spreadsheets/d/<id>/edit
        link: String,
    },

    /// Show which Google Sheet is currently targeted
    Status,

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
