use std::io;
use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::api::Role;
use crate::browse::{CATEGORY_OPTIONS, LOCATION_OPTIONS, TAG_OPTIONS};

#[derive(Parser)]
#[command(name = "replay")]
#[command(about = "Campus theatre marketplace client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the issued token
    Login {
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "REPLAY_PASSWORD", hide_env_values = true)]
        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and store the issued token
    Signup {
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "REPLAY_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account role: USER or ADMIN
        #[arg(long, default_value = "USER", value_parser = parse_role)]
        role: Role,

        /// Code required for ADMIN accounts
        #[arg(long)]
        admin_code: Option<String>,

        /// School the account belongs to
        #[arg(long)]
        school_id: u64,

        /// Club the account belongs to
        #[arg(long)]
        club_id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out on the server, then forget the local token
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the profile header: name, role, school and club
    #[command(visible_alias = "me")]
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List schools
    Schools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the clubs of a school
    Clubs {
        /// School ID
        school_id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search marketplace listings
    Browse {
        /// JSON file with the listings (bare array or wrapped)
        #[arg(long)]
        items: PathBuf,

        /// Fuzzy search over title, school, category and tags
        #[arg(short, long)]
        query: Option<String>,

        /// Category to filter by
        #[arg(short, long, value_parser = PossibleValuesParser::new(CATEGORY_OPTIONS.iter().copied()))]
        category: Option<String>,

        /// Tag the listing must carry (can be repeated)
        #[arg(short, long = "tag", value_parser = PossibleValuesParser::new(TAG_OPTIONS.iter().copied()))]
        tags: Vec<String>,

        /// Distance band
        #[arg(short, long, value_parser = PossibleValuesParser::new(LOCATION_OPTIONS.iter().copied()))]
        location: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key: api.base_url, api.timeout, api.connect_timeout or auth.token
        key: String,

        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    match s.parse::<Role>() {
        Ok(role @ (Role::User | Role::Admin)) => Ok(role),
        _ => Err(format!("invalid role '{s}'. Must be one of: USER, ADMIN")),
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "replay", &mut io::stdout());
}
