use shardfs::config::NodeConfig;
use shardfs::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} --node <n1|n2|n3|n4> --bind <addr:port> [--root <dir>] [--peer <node>=<addr:port>]...",
            args[0]
        );
        eprintln!("Example: {} --node n2 --bind 127.0.0.1:7002", args[0]);
        eprintln!(
            "Example: {} --node n1 --bind 127.0.0.1:7001 --peer n2=127.0.0.1:7002 --peer n3=127.0.0.1:7003 --peer n4=127.0.0.1:7004",
            args[0]
        );
        std::process::exit(1);
    }

    let config = NodeConfig::from_args(&args[1..])?;

    tracing::info!("starting node {}", config.id);
    if config.id.is_front_door() {
        tracing::info!("front door dials {} backends", config.peers.len());
    }

    server::run(config).await
}
