//! Interactive client for the file store.
//!
//! Connects once to the front door and sends one framed command per input
//! line. Syntax is validated locally before anything touches the socket;
//! a rejected line costs no network traffic. Downloads land in the current
//! directory under the requested basename; archives land as
//! `<type>files.tar`.

use std::io::{BufRead, Write};

use shardfs::dispatch::command::ClientCommand;
use shardfs::protocol::frame::{Frame, FrameStream};
use shardfs::protocol::status::Status;
use shardfs::routing::rewrite::basename;
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <front-door-addr:port>", args[0]);
        eprintln!("Example: {} 127.0.0.1:7001", args[0]);
        std::process::exit(1);
    }

    let stream = TcpStream::connect(&args[1]).await?;
    let mut frames = FrameStream::new(stream);
    println!("connected to {}", args[1]);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match ClientCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == ClientCommand::Exit {
            let _ = frames.write(&command.to_frame(Vec::new())).await;
            break;
        }

        let payload = match &command {
            ClientCommand::Upload { local, .. } => match std::fs::read(local) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("cannot read {}: {}", local, e);
                    continue;
                }
            },
            _ => Vec::new(),
        };

        frames.write(&command.to_frame(payload)).await?;
        let reply = match frames.read().await? {
            Some(reply) => reply,
            None => {
                eprintln!("server closed the connection");
                break;
            }
        };
        report(&command, &reply)?;
    }

    Ok(())
}

/// Prints one line per reply: a confirmation on success, a diagnostic on
/// anything else.
fn report(command: &ClientCommand, reply: &Frame) -> anyhow::Result<()> {
    if reply.as_status() != Some(Status::Ok) {
        let detail = String::from_utf8_lossy(&reply.payload);
        if detail.is_empty() {
            eprintln!("error: {}", reply.keyword);
        } else {
            eprintln!("error: {}", detail);
        }
        return Ok(());
    }

    match command {
        ClientCommand::Upload { local, .. } => println!("uploaded {}", local),
        ClientCommand::Download { path } => {
            let name = basename(path);
            std::fs::write(name, &reply.payload)?;
            println!("saved {} ({} bytes)", name, reply.payload.len());
        }
        ClientCommand::Remove { path } => println!("removed {}", path),
        ClientCommand::Tar { ftype } => {
            let name = format!("{}files.tar", ftype);
            std::fs::write(&name, &reply.payload)?;
            println!("saved {} ({} bytes)", name, reply.payload.len());
        }
        ClientCommand::List { .. } => {
            let text = String::from_utf8_lossy(&reply.payload);
            if text.is_empty() {
                println!("(no files)");
            } else {
                println!("{}", text);
            }
        }
        ClientCommand::Exit => {}
    }
    Ok(())
}
