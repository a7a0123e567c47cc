use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use toonify::avatar::DEFAULT_STYLE_ID;
use toonify::commands::{self, SaveTarget};
use toonify::{Config, Toonify};

/// toonify - cartoonify photos and generate avatars
///
/// Keys are read from the environment or a `.env` file in the current
/// directory: DEEPAI_API_KEY for cartoonify, RAPIDAPI_KEY for avatars.
///
/// Examples:
///   toonify cartoonify photo.jpg --save
///   toonify avatar create DM1670714VMJWTG --style 60
#[derive(Parser, Debug)]
#[command(author, version = env!("TOONIFY_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Per-request timeout in milliseconds (overrides API_TIMEOUT)
    #[arg(long, value_name = "MS", global = true)]
    timeout: Option<u64>,

    /// Total attempts per request (overrides MAX_RETRIES)
    #[arg(long, value_name = "N", global = true)]
    max_retries: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Turn a photo into a cartoon
    Cartoonify(CartoonifyArgs),

    /// Create or fetch a DoppelMe avatar
    #[command(subcommand)]
    Avatar(AvatarCommands),

    /// List the available avatar styles
    Styles,

    /// Show which features are configured
    Status,
}

#[derive(clap::Args, Debug)]
struct CartoonifyArgs {
    /// Image to upload (JPEG, PNG, GIF or WebP)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    #[command(flatten)]
    save: SaveArgs,
}

#[derive(clap::Subcommand, Debug)]
enum AvatarCommands {
    /// Create an avatar in the given style
    Create {
        #[arg(value_name = "AVATAR_ID")]
        avatar_id: String,

        /// Style id (see `toonify styles`)
        #[arg(long, short = 's', default_value = DEFAULT_STYLE_ID)]
        style: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Fetch an existing avatar
    Get {
        #[arg(value_name = "AVATAR_ID")]
        avatar_id: String,

        #[command(flatten)]
        save: SaveArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SaveArgs {
    /// Download the result into the current directory
    #[arg(long)]
    save: bool,

    /// Download the result to this path
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
}

impl SaveArgs {
    fn target(self) -> SaveTarget {
        SaveTarget::from_args(self.save, self.output)
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(ms) = cli.timeout {
        config.timeout = std::time::Duration::from_millis(ms);
    }
    if let Some(n) = cli.max_retries {
        config.max_retries = n;
    }
    config.check()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // The style catalog is static and works without any configuration.
    if matches!(cli.command, Commands::Styles) {
        commands::styles();
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Styles => {}
        Commands::Status => {
            if !commands::status(&config) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Cartoonify(args) => {
            let client = Toonify::new(config)?;
            commands::cartoonify(&client, &args.image, &args.save.target()).await?
        }
        Commands::Avatar(AvatarCommands::Create {
            avatar_id,
            style,
            save,
        }) => {
            let client = Toonify::new(config)?;
            commands::create_avatar(&client, &avatar_id, &style, &save.target()).await?
        }
        Commands::Avatar(AvatarCommands::Get { avatar_id, save }) => {
            let client = Toonify::new(config)?;
            commands::get_avatar(&client, &avatar_id, &save.target()).await?
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_cartoonify_parsing() {
        let cli = Cli::try_parse_from(["toonify", "cartoonify", "photo.jpg", "--save"]).unwrap();
        match cli.command {
            Commands::Cartoonify(args) => {
                assert_eq!(args.image, PathBuf::from("photo.jpg"));
                assert_eq!(args.save.target(), SaveTarget::DefaultName);
            }
            _ => panic!("Expected Cartoonify command"),
        }
    }

    #[test]
    fn test_cli_avatar_create_default_style() {
        let cli = Cli::try_parse_from(["toonify", "avatar", "create", "DM1"]).unwrap();
        match cli.command {
            Commands::Avatar(AvatarCommands::Create {
                avatar_id,
                style,
                save,
            }) => {
                assert_eq!(avatar_id, "DM1");
                assert_eq!(style, "59");
                assert_eq!(save.target(), SaveTarget::None);
            }
            _ => panic!("Expected Avatar Create command"),
        }
    }

    #[test]
    fn test_cli_avatar_get_with_output() {
        let cli =
            Cli::try_parse_from(["toonify", "avatar", "get", "DM1", "-o", "/tmp/a.png"]).unwrap();
        match cli.command {
            Commands::Avatar(AvatarCommands::Get { avatar_id, save }) => {
                assert_eq!(avatar_id, "DM1");
                assert_eq!(save.target(), SaveTarget::Path(PathBuf::from("/tmp/a.png")));
            }
            _ => panic!("Expected Avatar Get command"),
        }
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::try_parse_from([
            "toonify",
            "styles",
            "--timeout",
            "5000",
            "--max-retries",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.timeout, Some(5000));
        assert_eq!(cli.max_retries, Some(5));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["toonify", "photo.jpg"]).is_err());
    }
}
