//! mxpost - Post into Matrix rooms from the command line.
//!
//! # Usage
//!
//! ```bash
//! mxpost --config config.yaml text '!room:example.org' "Hello" --html "<b>Hello</b>"
//! mxpost --config config.yaml file '!room:example.org' ./report.pdf
//! mxpost --config config.yaml video '!room:example.org' ./clip.mp4 --thumb ./clip.png
//! mxpost --config config.yaml typing '!room:example.org' --timeout 30
//! mxpost --config config.yaml typing '!room:example.org' --timeout 0
//! ```
//!
//! Every command prints the identifier returned by the homeserver, if any.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//! - `MXPOST_MATRIX__*` - Override the configuration file, see [`mxpost::config`]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use mxpost::{MatrixClient, MessageOptions, NoVideoProbe, config::Config};

/// Command-line arguments of mxpost.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Values can be overridden with `MXPOST_` environment variables,
    /// e.g. `MXPOST_MATRIX__ACCESS_TOKEN`.
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Post an m.text message
    Text(TextArgs),
    /// Post an m.emote message
    Emote(TextArgs),
    /// Post an m.notice message
    Notice(TextArgs),
    /// Upload a file and post it
    File {
        room_id: String,
        path: PathBuf,
        #[arg(long)]
        thread: Option<String>,
    },
    /// Upload a video, and optionally its thumbnail, and post it
    Video {
        room_id: String,
        path: PathBuf,
        #[arg(long)]
        thumb: Option<PathBuf>,
        #[arg(long)]
        thread: Option<String>,
        /// Skip ffprobe and post the video without dimensions and duration
        #[arg(long)]
        no_probe: bool,
    },
    /// Post an m.location message
    Location {
        room_id: String,
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        label: String,
        #[arg(long)]
        thread: Option<String>,
    },
    /// Redact an event
    Redact { room_id: String, event_id: String },
    /// Start the typing notification for 120 seconds by default, or stop it with a zero timeout
    Typing {
        room_id: String,
        /// Timeout in seconds, 0 stops the notification
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
    /// List recent m.text messages (experimental)
    Messages {
        room_id: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(clap::Args, Debug)]
struct TextArgs {
    room_id: String,
    body: String,
    /// HTML rendition of the body
    #[arg(long)]
    html: Option<String>,
    /// Root event of the thread
    #[arg(long)]
    thread: Option<String>,
}

impl TextArgs {
    fn options(&self) -> MessageOptions {
        let mut options = MessageOptions::new();
        if let Some(html) = &self.html {
            options = options.formatted_body(html);
        }
        if let Some(thread) = &self.thread {
            options = options.thread_id(thread);
        }
        options
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config file {}", args.config.display()))?;

    info!("mxpost {} on {}", env!("CARGO_PKG_VERSION"), config.matrix.base_url);

    let client = MatrixClient::from_config(&config.matrix);

    match args.command {
        Command::Text(text) => {
            let event_id = client
                .post_message(&text.room_id, &text.body, &text.options())
                .await?;
            println!("{}", event_id);
        }
        Command::Emote(text) => {
            let event_id = client
                .emote(&text.room_id, &text.body, &text.options())
                .await?;
            println!("{}", event_id);
        }
        Command::Notice(text) => {
            let event_id = client
                .notice(&text.room_id, &text.body, &text.options())
                .await?;
            println!("{}", event_id);
        }
        Command::File {
            room_id,
            path,
            thread,
        } => {
            let event_id = client
                .post_file(&room_id, &path, thread.as_deref())
                .await?;
            println!("{}", event_id);
        }
        Command::Video {
            room_id,
            path,
            thumb,
            thread,
            no_probe,
        } => {
            let event_id = if no_probe {
                client
                    .with_video_probe(NoVideoProbe)
                    .post_video(&room_id, &path, thumb.as_deref(), thread.as_deref())
                    .await?
            } else {
                client
                    .post_video(&room_id, &path, thumb.as_deref(), thread.as_deref())
                    .await?
            };
            println!("{}", event_id);
        }
        Command::Location {
            room_id,
            latitude,
            longitude,
            label,
            thread,
        } => {
            let event_id = client
                .post_location(&room_id, latitude, longitude, &label, thread.as_deref())
                .await?;
            println!("{}", event_id);
        }
        Command::Redact { room_id, event_id } => {
            let redaction_id = client.delete_message(&room_id, &event_id).await?;
            println!("{}", redaction_id);
        }
        Command::Typing { room_id, timeout } => {
            client.set_typing_indicator(&room_id, timeout).await?;
        }
        Command::Messages { room_id, limit } => {
            for message in client.list_recent_messages(&room_id, limit).await? {
                println!(
                    "{} {}: {}",
                    message.created_at().to_rfc3339(),
                    message.sender().username(),
                    message.body()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_starts_by_default() {
        let args =
            Args::try_parse_from(["mxpost", "--config", "config.yaml", "typing", "!room:example.org"])
                .unwrap();

        match args.command {
            Command::Typing { room_id, timeout } => {
                assert_eq!(room_id, "!room:example.org");
                assert_eq!(timeout, 120);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_typing_zero_timeout() {
        let args = Args::try_parse_from([
            "mxpost",
            "--config",
            "config.yaml",
            "typing",
            "!room:example.org",
            "--timeout",
            "0",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Typing { timeout: 0, .. }));
    }
}
