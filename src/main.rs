use std::process::ExitCode;

use vespa_cli::{bootstrap::bootstrap, invocation::Invocation};

#[tokio::main]
pub async fn main() -> ExitCode {
    bootstrap(Invocation::process()).await
}
