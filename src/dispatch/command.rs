use crate::error::ShardError;
use crate::protocol::frame::{
    Frame, CMD_DOWNLOAD, CMD_EXIT, CMD_LIST_NAMES, CMD_REMOVE, CMD_TAR, CMD_UPLOAD,
};
use crate::routing::types::FileType;

/// A validated client command.
///
/// The same grammar is enforced twice: by the client binary before any bytes
/// are sent, and by the dispatcher on every frame it receives (the wire is
/// not trusted to carry only what the client binary produces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// `uploadf <localfile> [destpath]`
    Upload { local: String, dest: Option<String> },
    /// `downlf <logicalpath>`
    Download { path: String },
    /// `removef <logicalpath>`
    Remove { path: String },
    /// `downltar <type>`
    Tar { ftype: FileType },
    /// `dispfnames [dirpath]`
    List { dir: Option<String> },
    /// `exit`
    Exit,
}

impl ClientCommand {
    /// Parses one whitespace-delimited command line.
    pub fn parse(line: &str) -> Result<ClientCommand, ShardError> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| ShardError::MalformedCommand("empty command".to_string()))?;
        let args: Vec<&str> = tokens.collect();
        Self::from_parts(keyword, &args)
    }

    /// Interprets a received frame as a command.
    pub fn from_frame(frame: &Frame) -> Result<ClientCommand, ShardError> {
        let args: Vec<&str> = frame.args.iter().map(String::as_str).collect();
        Self::from_parts(&frame.keyword, &args)
    }

    fn from_parts(keyword: &str, args: &[&str]) -> Result<ClientCommand, ShardError> {
        match keyword {
            CMD_UPLOAD => {
                if args.is_empty() || args.len() > 2 {
                    return Err(arity(keyword, "<localfile> [destpath]"));
                }
                // The type check happens here so an unsupported file never
                // leaves the client machine.
                FileType::of(args[0])?;
                Ok(ClientCommand::Upload {
                    local: args[0].to_string(),
                    dest: args.get(1).map(|s| s.to_string()),
                })
            }
            CMD_DOWNLOAD => {
                if args.len() != 1 {
                    return Err(arity(keyword, "<logicalpath>"));
                }
                FileType::of(args[0])?;
                Ok(ClientCommand::Download {
                    path: args[0].to_string(),
                })
            }
            CMD_REMOVE => {
                if args.len() != 1 {
                    return Err(arity(keyword, "<logicalpath>"));
                }
                FileType::of(args[0])?;
                Ok(ClientCommand::Remove {
                    path: args[0].to_string(),
                })
            }
            CMD_TAR => {
                if args.len() != 1 {
                    return Err(arity(keyword, "<type>"));
                }
                // `zip` passes validation; the front door rejects it later,
                // before any backend traffic.
                let ftype = FileType::parse(args[0])
                    .ok_or_else(|| ShardError::UnsupportedType(args[0].to_string()))?;
                Ok(ClientCommand::Tar { ftype })
            }
            CMD_LIST_NAMES => {
                if args.len() > 1 {
                    return Err(arity(keyword, "[dirpath]"));
                }
                Ok(ClientCommand::List {
                    dir: args.first().map(|s| s.to_string()),
                })
            }
            CMD_EXIT => {
                if !args.is_empty() {
                    return Err(arity(keyword, ""));
                }
                Ok(ClientCommand::Exit)
            }
            other => Err(ShardError::MalformedCommand(format!(
                "unknown command: {}",
                other
            ))),
        }
    }

    /// Encodes this command as a request frame. `payload` is only meaningful
    /// for uploads; every other command sends an empty payload.
    pub fn to_frame(&self, payload: Vec<u8>) -> Frame {
        match self {
            ClientCommand::Upload { local, dest } => {
                let mut args = vec![local.clone()];
                if let Some(dest) = dest {
                    args.push(dest.clone());
                }
                Frame::with_payload(CMD_UPLOAD, args, payload)
            }
            ClientCommand::Download { path } => Frame::new(CMD_DOWNLOAD, vec![path.clone()]),
            ClientCommand::Remove { path } => Frame::new(CMD_REMOVE, vec![path.clone()]),
            ClientCommand::Tar { ftype } => Frame::new(CMD_TAR, vec![ftype.to_string()]),
            ClientCommand::List { dir } => {
                Frame::new(CMD_LIST_NAMES, dir.iter().cloned().collect())
            }
            ClientCommand::Exit => Frame::new(CMD_EXIT, Vec::new()),
        }
    }
}

fn arity(keyword: &str, usage: &str) -> ShardError {
    ShardError::MalformedCommand(format!("usage: {} {}", keyword, usage.trim()))
}
