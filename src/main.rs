use biologreen::{
    protocol::CustomFields, ApiClient, AuthResult, Config, FsPhotoReader, PhotoReader,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "biologreen")]
#[command(about = "Face login and signup against the BioLogreen API")]
struct Cli {
    /// Verbose logging with file/line/thread information
    #[arg(long, global = true)]
    dev: bool,

    /// Config file (defaults to $BIOLOGREEN_CONFIG, ./biologreen.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an already captured face photo
    Login {
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Sign up a new user with a face photo
    Signup {
        #[arg(short, long)]
        image: PathBuf,
        /// Custom field stored with the user, as key=value (repeatable)
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Print the resolved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.dev);

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let options = config.sdk_options();

    match cli.command {
        Commands::Login { image } => {
            let client = ApiClient::new(&options)?;
            let image_base64 = read_photo(&image).await?;
            let result = client.login(image_base64).await?;
            print_result(&result)?;
        }
        Commands::Signup { image, fields } => {
            let client = ApiClient::new(&options)?;
            let image_base64 = read_photo(&image).await?;
            let custom_fields = (!fields.is_empty())
                .then(|| fields.into_iter().collect::<CustomFields>());
            let result = client.signup(image_base64, custom_fields).await?;
            print_result(&result)?;
        }
        Commands::ShowConfig => {
            println!("base_url:        {}", options.resolved_base_url());
            println!("api_key:         {}", mask_key(&options.api_key));
            println!("debounce:        {} ms", options.debounce.as_millis());
            println!("camera_position: {:?}", options.camera_position);
            match options.request_timeout {
                Some(timeout) => println!("request_timeout: {} s", timeout.as_secs()),
                None => println!("request_timeout: none"),
            }
        }
    }

    Ok(())
}

/// Checks the file is a decodable image, then base64-encodes its raw bytes.
async fn read_photo(path: &Path) -> Result<String> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("{} is not a readable image", path.display()))?;
    tracing::info!("Sending {} ({}x{})", path.display(), width, height);
    Ok(FsPhotoReader.read_base64(path).await?)
}

fn print_result(result: &AuthResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn parse_field(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {raw}"));
    }
    // Bare JSON literals (numbers, booleans, objects) keep their type; anything else is a string.
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn setup_logging(dev_mode: bool) {
    if dev_mode {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }
}
