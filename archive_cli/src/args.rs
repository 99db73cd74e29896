use std::path::PathBuf;

use archive_core::criteria::{choice, FilterCriteria};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "koyomi")]
#[command(about = "Browse the Koyomi encounter archive", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./koyomi.toml when present)
    #[arg(long, env = "KOYOMI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Feed URL or CSV path, overriding the config
    #[arg(long, env = "KOYOMI_FEED", global = true)]
    pub feed: Option<String>,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "warn", global = true)]
    pub log_level: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable member colours
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encounters newest first
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Only this date (YYYY/MM/DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// One day's encounters grouped by member (latest day by default)
    Latest {
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Dates with encounters, by month
    Dates,

    /// Members in birth order with encounter counts
    Members,

    /// Interactive browser reading commands from stdin
    Browse,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Family member (the wildcard label or "all" matches everyone)
    #[arg(long)]
    pub member: Option<String>,

    #[arg(long)]
    pub season: Option<String>,

    #[arg(long)]
    pub platform: Option<String>,

    /// Substring of resident name, reading, or player handle
    #[arg(long)]
    pub resident: Option<String>,

    /// Substring of the attribute tag or its reading
    #[arg(long)]
    pub attribute: Option<String>,

    /// Substring of resident, handle, location, note, or attribute
    #[arg(long)]
    pub keyword: Option<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self, wildcard: &str) -> FilterCriteria {
        FilterCriteria {
            member: self.member.as_deref().and_then(|v| choice(v, wildcard)),
            season: self.season.as_deref().and_then(|v| choice(v, wildcard)),
            platform: self.platform.as_deref().and_then(|v| choice(v, wildcard)),
            resident_query: self.resident.clone().unwrap_or_default(),
            attribute_query: self.attribute.clone().unwrap_or_default(),
            keyword: self.keyword.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args_to_criteria() {
        let cli = Cli::parse_from([
            "koyomi", "list", "--member", "全員", "--platform", "YouTube", "--resident", "al", "--limit", "5",
        ]);
        match cli.command {
            Commands::List { filters, limit, date } => {
                let criteria = filters.to_criteria("全員");
                assert_eq!(criteria.member, None);
                assert_eq!(criteria.platform.as_deref(), Some("YouTube"));
                assert_eq!(criteria.resident_query, "al");
                assert_eq!(limit, Some(5));
                assert_eq!(date, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["koyomi", "dates", "--json", "--feed", "feed.csv"]);
        assert!(cli.json);
        assert_eq!(cli.feed.as_deref(), Some("feed.csv"));
    }
}
