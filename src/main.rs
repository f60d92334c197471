use i18n_lens::rpc::Transport;
use i18n_lens::server::Server;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut server = Server::new(Transport::stdio());
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "fatal error");
        process::exit(1);
    }
}
