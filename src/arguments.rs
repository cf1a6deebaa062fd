use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;

use crate::bump::Increment;
use crate::init::InitOptions;
use crate::processor::{LineEndings, WriteMode};
use crate::propagation::PropagateOptions;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, bin_name = "version")]
pub struct Arguments {
    /// Project folder holding .versionFilesList.json
    #[arg(long, short = 'C', global = true, default_value = "./")]
    pub path: String,
    #[arg(long, short, global = true)]
    pub debug: bool,
    /// Prints the current version when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize folder with standard file list, or edit an existing one
    Init(InitArguments),
    /// Echo all files currently in filesList
    List {
        /// Echo also current version of the project
        #[arg(long)]
        current: bool,
    },
    /// Update version number
    Update(UpdateArguments),
}

#[derive(Debug, Args)]
pub struct InitArguments {
    /// Re-init overwriting current file list
    #[arg(long, short)]
    pub force: bool,
    /// Custom version number prefix for non json files
    #[arg(long, short)]
    pub prefix: Option<String>,
    /// Comma separated files to add, optionally as `file:type`
    #[arg(long, short, value_delimiter = ',')]
    pub add: Vec<String>,
    /// Comma separated files to remove
    #[arg(long, short, value_delimiter = ',')]
    pub remove: Vec<String>,
    #[arg(long)]
    pub project_name: Option<String>,
    #[arg(long)]
    pub current_version: Option<String>,
}

impl From<InitArguments> for InitOptions {
    fn from(args: InitArguments) -> Self {
        InitOptions {
            force: args.force,
            prefix: args.prefix,
            add: args.add,
            remove: args.remove,
            name: args.project_name,
            current_version: args.current_version,
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateArguments {
    pub new_version: Option<String>,
    /// Increase major version number (X+N.0.0)
    #[arg(long, short = 'M', value_name = "HOW_MANY", num_args = 0..=1, default_missing_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub major: Option<u64>,
    /// Increase minor version number (x.X+N.0)
    #[arg(long, short = 'm', value_name = "HOW_MANY", num_args = 0..=1, default_missing_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub minor: Option<u64>,
    /// Increase patch version number (x.x.X+N)
    #[arg(long, short = 'p', value_name = "HOW_MANY", num_args = 0..=1, default_missing_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub patch: Option<u64>,
    /// Search for wrong version numbers
    #[arg(long)]
    pub analyze: bool,
    /// Log lines with wrong version numbers when used with --analyze
    #[arg(long)]
    pub verbose: bool,
    /// Fix wrong version numbers when used with --analyze
    #[arg(long)]
    pub fix: bool,
    #[arg(long, value_enum, ignore_case = true, default_value_t = LineEndings::Normalize)]
    pub line_endings: LineEndings,
    /// Write each file through a temporary file and rename it into place
    #[arg(long)]
    pub staged: bool,
    #[arg(long, value_enum, ignore_case = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl UpdateArguments {
    pub fn increment(&self) -> Increment {
        Increment { major: self.major, minor: self.minor, patch: self.patch }
    }

    pub fn propagate_options(&self) -> PropagateOptions {
        PropagateOptions {
            analyze: self.analyze,
            verbose: self.verbose,
            fix: self.fix,
            line_endings: self.line_endings,
            write_mode: if self.staged { WriteMode::Staged } else { WriteMode::InPlace },
        }
    }
}
