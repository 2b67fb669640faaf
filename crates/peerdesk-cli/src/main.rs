//! Entrypoint for the `peerdesk` binary.

#[tokio::main]
async fn main() {
    std::process::exit(peerdesk_cli::run().await);
}
