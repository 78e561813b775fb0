use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use replay::cli::{Cli, Commands, ConfigAction, generate_completions};
use replay::commands::{
    BrowseOptions, SignupOptions, cmd_browse, cmd_clubs, cmd_config_set, cmd_config_show,
    cmd_login, cmd_logout, cmd_profile, cmd_schools, cmd_signup,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login {
            email,
            password,
            json,
        } => cmd_login(&email, &password, json).await,
        Commands::Signup {
            email,
            password,
            name,
            role,
            admin_code,
            school_id,
            club_id,
            json,
        } => {
            cmd_signup(
                SignupOptions {
                    email,
                    password,
                    name,
                    role,
                    admin_code,
                    school_id,
                    club_id,
                },
                json,
            )
            .await
        }
        Commands::Logout { json } => cmd_logout(json).await,
        Commands::Profile { json } => cmd_profile(json).await,

        Commands::Schools { json } => cmd_schools(json).await,
        Commands::Clubs { school_id, json } => cmd_clubs(school_id, json).await,

        Commands::Browse {
            items,
            query,
            category,
            tags,
            location,
            json,
        } => cmd_browse(
            BrowseOptions {
                items,
                query,
                category,
                tags,
                location,
            },
            json,
        ),

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
        },

        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(status = ?e.status(), "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
