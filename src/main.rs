use std::process::ExitCode;
use todo_app::commands::{error_message, exit_code, Cli};
use todo_app::libs::messages::macros::is_debug_mode;
use todo_app::msg_error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_writer(std::io::stderr)
            .init();
    }

    match Cli::menu() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            msg_error!(error_message(&e));
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}
