use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use file_manager::{FileManager, FileManagerOptions, Flow};

#[derive(Parser)]
#[command(name = "file-manager")]
#[command(about = "An interactive, shell-like file manager")]
#[command(version)]
struct Cli {
    /// Name used in the welcome and goodbye messages
    #[arg(long = "username", default_value = "Anonymous")]
    username: String,

    /// Directory to start in (default: home directory)
    #[arg(long = "cwd")]
    cwd: Option<PathBuf>,

    /// Log verbosity for diagnostics written to stderr
    #[arg(long = "log-level", default_value = "warn")]
    log_level: tracing::Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut manager = match FileManager::new(FileManagerOptions { cwd: cli.cwd }).await {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: Cannot start file manager: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = tokio::io::stdout();
    let mut stderr = tokio::io::stderr();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let welcome = format!("Welcome to the File Manager, {}!\n", cli.username);
    if let Err(e) = write_flush(&mut stdout, &welcome).await {
        tracing::error!(error = %e, "stdout closed");
        std::process::exit(1);
    }

    loop {
        if let Err(e) = write_flush(&mut stdout, &manager.prompt()).await {
            tracing::error!(error = %e, "stdout closed");
            break;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "cannot read from stdin");
                break;
            }
        };

        if manager.exec(&line, &mut stdout, &mut stderr).await == Flow::Exit {
            break;
        }
        // Output of the command must be visible before the next prompt
        if let Err(e) = stdout.flush().await {
            tracing::error!(error = %e, "stdout closed");
            break;
        }
        if let Err(e) = stderr.flush().await {
            tracing::error!(error = %e, "stderr closed");
        }
    }

    let goodbye = format!("\nThank you for using File Manager, {}, goodbye!\n", cli.username);
    if let Err(e) = write_flush(&mut stdout, &goodbye).await {
        tracing::error!(error = %e, "stdout closed");
    }
}

async fn write_flush(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}
