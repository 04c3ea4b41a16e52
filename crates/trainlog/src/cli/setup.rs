use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "trainlog",
    bin_name = "trainlog",
    version,
    disable_help_subcommand = true,
    after_help = "Routes address the hierarchy: p/<period>/b/<block>/w/<week>/d/<day>/e/<exercise>\nEntries can also be given as keys: <period>|<block>|<week>|<day>|<exercise>"
)]
#[command(about = "Training log: a coach's plan with your own notes layered on top", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,

    /// Config file (default: trainlog.toml in the OS config directory)
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one entry
    #[command(alias = "v", display_order = 1)]
    Show {
        /// Entry route or key
        entry: String,
    },

    /// Change your own fields of an entry
    #[command(alias = "e", display_order = 2)]
    Edit {
        /// Entry route or key
        entry: String,

        /// Sets and reps, e.g. 5x5
        #[arg(long)]
        work: Option<String>,

        /// Video link (repeat for several); replaces the current list
        #[arg(long = "video", value_name = "URL")]
        videos: Vec<String>,

        /// Remove all videos
        #[arg(long, conflicts_with = "videos")]
        clear_videos: bool,

        /// Your comment
        #[arg(long)]
        lifter: Option<String>,

        /// Coach's comment
        #[arg(long)]
        coach: Option<String>,
    },

    /// Drop local edits for one entry, or all of them
    #[command(display_order = 3)]
    #[command(group(ArgGroup::new("target").required(true).args(["entry", "all"])))]
    Revert {
        /// Entry route or key
        entry: Option<String>,

        /// Drop every local edit
        #[arg(long)]
        all: bool,
    },

    /// One exercise across a period
    #[command(alias = "h", display_order = 4)]
    History {
        /// Period id or p/<id>
        period: String,

        /// Exercise name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Search names, work and comments
    #[command(alias = "s", display_order = 5)]
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Outline of the hierarchy
    #[command(alias = "ls", display_order = 6)]
    Tree {
        /// Only this branch
        route: Option<String>,
    },

    /// Add a period, block, week, day or exercise
    #[command(display_order = 10)]
    Add {
        #[command(subcommand)]
        what: AddCommands,
    },

    /// Rename a period (its id stays the same)
    #[command(display_order = 11)]
    Rename {
        /// Period id or p/<id>
        period: String,

        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Remove a node and everything under it
    #[command(alias = "rm", display_order = 12)]
    Remove {
        /// Route or entry key
        route: String,
    },

    /// Write the base document with your edits folded in
    #[command(display_order = 20)]
    Export {
        /// Output file (stdout when omitted)
        file: Option<PathBuf>,

        /// Also make the result your base and clear local edits
        #[arg(long)]
        bake: bool,
    },

    /// Replace the base document (clears local edits)
    #[command(display_order = 21)]
    Import {
        file: PathBuf,
    },

    /// Go back to the configured source document
    #[command(display_order = 22)]
    Reset {
        /// Also drop local edits
        #[arg(long)]
        clear_edits: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    Period {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Block {
        /// Parent period route, e.g. p/serie-1-2026
        period: String,
        number: String,
    },
    Week {
        /// Parent block route
        block: String,
        number: String,
    },
    Day {
        /// Parent week route
        week: String,
        number: String,

        /// Day label, e.g. Lower
        #[arg(long)]
        label: Option<String>,
    },
    Exercise {
        /// Parent day route
        day: String,

        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn edit_collects_repeated_videos() {
        let cli = parse(&[
            "trainlog",
            "edit",
            "p/a/b/1/w/1/d/1/e/squat",
            "--video",
            "https://youtu.be/1",
            "--video",
            "https://youtu.be/2",
        ]);
        match cli.command {
            Commands::Edit { videos, .. } => assert_eq!(videos.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn clear_videos_conflicts_with_video() {
        assert!(Cli::try_parse_from([
            "trainlog",
            "edit",
            "x",
            "--video",
            "u",
            "--clear-videos"
        ])
        .is_err());
    }

    #[test]
    fn revert_needs_target() {
        assert!(Cli::try_parse_from(["trainlog", "revert"]).is_err());
        assert!(Cli::try_parse_from(["trainlog", "revert", "x", "--all"]).is_err());
        parse(&["trainlog", "revert", "--all"]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["trainlog", "tree", "--output", "json", "-v"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.verbose);
    }
}
