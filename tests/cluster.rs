//! End-to-end cluster tests.
//!
//! Boots all four nodes on ephemeral ports with throwaway roots and drives
//! the documented client scenarios through real sockets: type-based routing,
//! path rewriting, unified listings, archives, and concurrent clients.

use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;
use std::net::SocketAddr;

use shardfs::config::NodeConfig;
use shardfs::protocol::frame::{Frame, FrameStream, CMD_LIST_NAMES, CMD_TAR, CMD_UPLOAD};
use shardfs::protocol::status::Status;
use shardfs::routing::types::NodeId;
use shardfs::server;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};

// ============================================================================
// Shared test setup
// ============================================================================

struct Cluster {
    front: SocketAddr,
    roots: HashMap<NodeId, TempDir>,
}

impl Cluster {
    fn root(&self, id: NodeId) -> &std::path::Path {
        self.roots[&id].path()
    }
}

/// Binds four ephemeral listeners, wires the front door to the other three,
/// and spawns every node. Roots are tempdirs owned by the returned handle.
async fn spawn_cluster() -> Cluster {
    let mut listeners = Vec::new();
    let mut addrs: HashMap<NodeId, SocketAddr> = HashMap::new();
    for id in NodeId::ALL {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        addrs.insert(id, listener.local_addr().unwrap());
        listeners.push((id, listener));
    }

    let mut roots = HashMap::new();
    for (id, listener) in listeners {
        let dir = tempfile::tempdir().unwrap();
        let peers = if id.is_front_door() {
            addrs
                .iter()
                .filter(|(peer, _)| !peer.is_front_door())
                .map(|(peer, addr)| (*peer, *addr))
                .collect()
        } else {
            HashMap::new()
        };
        let config = NodeConfig {
            id,
            bind: addrs[&id],
            root: dir.path().to_path_buf(),
            peers,
        };
        roots.insert(id, dir);
        tokio::spawn(async move {
            let _ = server::run_with_listener(listener, config).await;
        });
    }

    Cluster {
        front: addrs[&NodeId::N1],
        roots,
    }
}

async fn connect(cluster: &Cluster) -> FrameStream<TcpStream> {
    FrameStream::new(TcpStream::connect(cluster.front).await.unwrap())
}

async fn request(session: &mut FrameStream<TcpStream>, frame: Frame) -> Frame {
    session.write(&frame).await.unwrap();
    session.read().await.unwrap().expect("one reply per command")
}

fn upload_frame(local: &str, dest: Option<&str>, bytes: &[u8]) -> Frame {
    let mut args = vec![local.to_string()];
    if let Some(dest) = dest {
        args.push(dest.to_string());
    }
    Frame::with_payload(CMD_UPLOAD, args, bytes.to_vec())
}

fn tar_members(bytes: &[u8]) -> BTreeSet<String> {
    let mut archive = tar::Archive::new(Cursor::new(bytes));
    archive
        .entries()
        .expect("tar entries")
        .map(|entry| {
            let entry = entry.expect("tar entry");
            entry.path().expect("member path").display().to_string()
        })
        .collect()
}

// ============================================================================
// Routing and round trips
// ============================================================================

#[tokio::test]
async fn test_upload_routes_by_type_and_round_trips() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    // A txt file must land on N3, not on the front door.
    let reply = request(&mut session, upload_frame("note.txt", None, b"hello")).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert!(cluster.root(NodeId::N3).join("note.txt").is_file());
    assert!(!cluster.root(NodeId::N1).join("note.txt").exists());

    // A c file stays on the front door; no backend sees it.
    let reply = request(&mut session, upload_frame("src.c", None, b"int main(){}")).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert!(cluster.root(NodeId::N1).join("src.c").is_file());

    // Download through the same logical name returns the original bytes.
    let reply = request(
        &mut session,
        Frame::new("downlf", vec!["note.txt".to_string()]),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert_eq!(reply.payload, b"hello");
}

#[tokio::test]
async fn test_nested_destination_creates_parents_on_backend() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    let reply = request(
        &mut session,
        upload_frame("report.pdf", Some("~/S1/a/b/c"), b"%PDF"),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert!(cluster.root(NodeId::N2).join("a/b/c/report.pdf").is_file());

    // The download path mirrors the upload destination exactly.
    let reply = request(
        &mut session,
        Frame::new("downlf", vec!["~/S1/a/b/c/report.pdf".to_string()]),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert_eq!(reply.payload, b"%PDF");
}

#[tokio::test]
async fn test_remove_then_download_is_not_found() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    request(&mut session, upload_frame("gone.txt", None, b"x")).await;
    let reply = request(
        &mut session,
        Frame::new("removef", vec!["gone.txt".to_string()]),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::Ok));

    let reply = request(
        &mut session,
        Frame::new("downlf", vec!["gone.txt".to_string()]),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::NotFound));
}

// ============================================================================
// Unified listings
// ============================================================================

#[tokio::test]
async fn test_dispfnames_is_class_ordered_and_non_recursive() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    request(&mut session, upload_frame("note.txt", None, b"hello")).await;
    request(&mut session, upload_frame("src.c", None, b"int main(){}")).await;
    request(
        &mut session,
        upload_frame("report.pdf", Some("~/S1/a/b/c"), b"%PDF"),
    )
    .await;

    let reply = request(&mut session, Frame::new(CMD_LIST_NAMES, Vec::new())).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    // The nested pdf must not appear: listings are non-recursive.
    assert_eq!(String::from_utf8_lossy(&reply.payload), "src.c\nnote.txt");
}

#[tokio::test]
async fn test_dispfnames_skips_nodes_without_the_directory() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    // Only N3 ends up with the `only` directory.
    request(
        &mut session,
        upload_frame("alone.txt", Some("~/S1/only"), b"x"),
    )
    .await;

    let reply = request(
        &mut session,
        Frame::new(CMD_LIST_NAMES, vec!["~/S1/only".to_string()]),
    )
    .await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    assert_eq!(String::from_utf8_lossy(&reply.payload), "alone.txt");
}

// ============================================================================
// Archives
// ============================================================================

#[tokio::test]
async fn test_downltar_collects_every_file_of_the_type() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    request(&mut session, upload_frame("n3.txt", None, b"3")).await;
    request(&mut session, upload_frame("n1.txt", Some("~/S1/a"), b"1")).await;
    request(&mut session, upload_frame("n2.txt", Some("~/S1/a/b"), b"2")).await;
    // Files of other types must stay out of the archive.
    request(&mut session, upload_frame("src.c", None, b"c")).await;

    let reply = request(&mut session, Frame::new(CMD_TAR, vec!["txt".to_string()])).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    let expected: BTreeSet<String> = ["n3.txt", "a/n1.txt", "a/b/n2.txt"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(tar_members(&reply.payload), expected);
}

#[tokio::test]
async fn test_downltar_c_is_served_locally() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    request(&mut session, upload_frame("one.c", None, b"1")).await;
    request(&mut session, upload_frame("two.c", Some("~/S1/src"), b"2")).await;

    let reply = request(&mut session, Frame::new(CMD_TAR, vec!["c".to_string()])).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    let expected: BTreeSet<String> = ["one.c", "src/two.c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(tar_members(&reply.payload), expected);
}

#[tokio::test]
async fn test_downltar_zip_is_rejected_at_the_front_door() {
    let cluster = spawn_cluster().await;
    let mut session = connect(&cluster).await;

    let reply = request(&mut session, Frame::new(CMD_TAR, vec!["zip".to_string()])).await;
    assert_eq!(reply.as_status(), Some(Status::Unsupported));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_unreachable_backend_is_reported_and_never_cached() {
    // Hand-built topology: n4's address points at a port nobody listens on.
    let front_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let front_addr = front_listener.local_addr().unwrap();

    let mut roots = Vec::new();
    let mut peers: HashMap<NodeId, SocketAddr> = HashMap::new();
    for id in [NodeId::N2, NodeId::N3] {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        peers.insert(id, listener.local_addr().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            id,
            bind: listener.local_addr().unwrap(),
            root: dir.path().to_path_buf(),
            peers: HashMap::new(),
        };
        roots.push(dir);
        tokio::spawn(async move {
            let _ = server::run_with_listener(listener, config).await;
        });
    }
    let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);
    peers.insert(NodeId::N4, dead_addr);

    let front_dir = tempfile::tempdir().unwrap();
    let config = NodeConfig {
        id: NodeId::N1,
        bind: front_addr,
        root: front_dir.path().to_path_buf(),
        peers,
    };
    tokio::spawn(async move {
        let _ = server::run_with_listener(front_listener, config).await;
    });

    let mut session = FrameStream::new(TcpStream::connect(front_addr).await.unwrap());
    let reply = request(&mut session, upload_frame("a.zip", None, b"z")).await;
    assert_eq!(reply.as_status(), Some(Status::Unavailable));

    // No caching, no retry: the second attempt fails the same way.
    let reply = request(&mut session, upload_frame("a.zip", None, b"z")).await;
    assert_eq!(reply.as_status(), Some(Status::Unavailable));

    drop(roots);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_clients_with_disjoint_uploads_all_succeed() {
    let cluster = spawn_cluster().await;

    let mut tasks = Vec::new();
    for i in 0..4 {
        let front = cluster.front;
        tasks.push(tokio::spawn(async move {
            let mut session = FrameStream::new(TcpStream::connect(front).await.unwrap());
            for j in 0..3 {
                let name = format!("client{}-{}.txt", i, j);
                let body = format!("payload {} {}", i, j);
                session
                    .write(&upload_frame(&name, None, body.as_bytes()))
                    .await
                    .unwrap();
                let reply = session.read().await.unwrap().expect("reply");
                assert_eq!(reply.as_status(), Some(Status::Ok));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // The global file set is the union of every client's writes.
    let mut session = connect(&cluster).await;
    let reply = request(&mut session, Frame::new(CMD_LIST_NAMES, Vec::new())).await;
    assert_eq!(reply.as_status(), Some(Status::Ok));
    let listed: BTreeSet<String> = String::from_utf8_lossy(&reply.payload)
        .lines()
        .map(str::to_string)
        .collect();
    let expected: BTreeSet<String> = (0..4)
        .flat_map(|i| (0..3).map(move |j| format!("client{}-{}.txt", i, j)))
        .collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn test_reader_is_unaffected_by_a_large_concurrent_upload() {
    let cluster = spawn_cluster().await;

    let mut setup = connect(&cluster).await;
    request(&mut setup, upload_frame("note.txt", None, b"hello")).await;

    let front = cluster.front;
    let writer = tokio::spawn(async move {
        let big = vec![0x42u8; 4 * 1024 * 1024];
        let mut session = FrameStream::new(TcpStream::connect(front).await.unwrap());
        session
            .write(&upload_frame("big.pdf", None, &big))
            .await
            .unwrap();
        let reply = session.read().await.unwrap().expect("reply");
        assert_eq!(reply.as_status(), Some(Status::Ok));
    });
    let reader = tokio::spawn(async move {
        let mut session = FrameStream::new(TcpStream::connect(front).await.unwrap());
        session
            .write(&Frame::new("downlf", vec!["note.txt".to_string()]))
            .await
            .unwrap();
        let reply = session.read().await.unwrap().expect("reply");
        assert_eq!(reply.as_status(), Some(Status::Ok));
        assert_eq!(reply.payload, b"hello");
    });

    writer.await.unwrap();
    reader.await.unwrap();
}
