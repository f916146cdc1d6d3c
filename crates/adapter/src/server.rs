//! TCP lobby server.
//!
//! Serves the line protocol from [`crate::protocol`]: channel listing
//! and membership, chat relay, and the shared high-score table backed
//! by the flat-file store. One reader task per connection; outbound
//! lines travel over an unbounded channel drained by a writer task so
//! a slow client never blocks the lobby lock.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::protocol::{valid_name, LobbyReply, LobbyRequest};
use crate::store::{ScoreBoard, ScoreEntry};

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scores_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7160,
            scores_path: PathBuf::from("scoreList.txt"),
        }
    }
}

impl ServerConfig {
    /// Build from `GRIDFALL_HOST`, `GRIDFALL_PORT` and
    /// `GRIDFALL_SCORES`, falling back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("GRIDFALL_HOST").unwrap_or(defaults.host);
        let port = env::var("GRIDFALL_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let scores_path = env::var("GRIDFALL_SCORES")
            .map(PathBuf::from)
            .unwrap_or(defaults.scores_path);

        Self {
            host,
            port,
            scores_path,
        }
    }
}

struct User {
    nick: String,
    channel: Option<String>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared lobby state behind one lock.
struct Lobby {
    next_id: usize,
    users: HashMap<usize, User>,
    channels: BTreeMap<String, Vec<usize>>,
    scores: ScoreBoard,
    scores_path: PathBuf,
}

impl Lobby {
    fn new(scores: ScoreBoard, scores_path: PathBuf) -> Self {
        Self {
            next_id: 0,
            users: HashMap::new(),
            channels: BTreeMap::new(),
            scores,
            scores_path,
        }
    }

    fn send_to(&self, id: usize, reply: &LobbyReply) {
        if let Some(user) = self.users.get(&id) {
            let _ = user.tx.send(reply.encode());
        }
    }

    fn send_to_channel(&self, channel: &str, reply: &LobbyReply) {
        let line = reply.encode();
        if let Some(members) = self.channels.get(channel) {
            for id in members {
                if let Some(user) = self.users.get(id) {
                    let _ = user.tx.send(line.clone());
                }
            }
        }
    }

    fn send_to_all(&self, reply: &LobbyReply) {
        let line = reply.encode();
        for user in self.users.values() {
            let _ = user.tx.send(line.clone());
        }
    }

    fn channel_nicks(&self, channel: &str) -> Vec<String> {
        self.channels
            .get(channel)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.users.get(id).map(|u| u.nick.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push the membership list to everyone in the channel.
    fn broadcast_users(&self, channel: &str) {
        let users = LobbyReply::Users(self.channel_nicks(channel));
        self.send_to_channel(channel, &users);
    }

    /// Remove a user from their channel, dropping the channel when it
    /// empties. Returns the channel name if one was left.
    fn leave_channel(&mut self, id: usize) -> Option<String> {
        let channel = self.users.get_mut(&id)?.channel.take()?;
        if let Some(members) = self.channels.get_mut(&channel) {
            members.retain(|&m| m != id);
            if members.is_empty() {
                self.channels.remove(&channel);
                log::info!("channel {channel} emptied and was dropped");
            }
        }
        Some(channel)
    }

    fn join_channel(&mut self, id: usize, channel: &str) {
        if let Some(user) = self.users.get_mut(&id) {
            user.channel = Some(channel.to_string());
        }
        self.channels
            .entry(channel.to_string())
            .or_default()
            .push(id);
    }

    fn handle(&mut self, id: usize, request: LobbyRequest) {
        match request {
            LobbyRequest::List => {
                let names = self.channels.keys().cloned().collect();
                self.send_to(id, &LobbyReply::Channels(names));
            }
            LobbyRequest::Create(name) => {
                if !valid_name(&name) {
                    self.send_to(id, &LobbyReply::Error(format!("bad channel name {name}")));
                } else if self.channels.contains_key(&name) {
                    self.send_to(id, &LobbyReply::Error(format!("channel {name} exists")));
                } else {
                    if let Some(previous) = self.leave_channel(id) {
                        self.broadcast_users(&previous);
                    }
                    self.join_channel(id, &name);
                    log::info!("user {id} created channel {name}");
                    self.send_to(id, &LobbyReply::Joined(name.clone()));
                    self.broadcast_users(&name);
                }
            }
            LobbyRequest::Join(name) => {
                if !self.channels.contains_key(&name) {
                    self.send_to(id, &LobbyReply::Error(format!("no channel {name}")));
                } else {
                    if let Some(previous) = self.leave_channel(id) {
                        self.broadcast_users(&previous);
                    }
                    self.join_channel(id, &name);
                    log::info!("user {id} joined channel {name}");
                    self.send_to(id, &LobbyReply::Joined(name.clone()));
                    self.broadcast_users(&name);
                }
            }
            LobbyRequest::Part => {
                if let Some(channel) = self.leave_channel(id) {
                    self.send_to(id, &LobbyReply::Parted);
                    self.broadcast_users(&channel);
                } else {
                    self.send_to(id, &LobbyReply::Error("not in a channel".to_string()));
                }
            }
            LobbyRequest::Nick(name) => {
                if !valid_name(&name) {
                    self.send_to(id, &LobbyReply::Error(format!("bad nickname {name}")));
                    return;
                }
                let channel = if let Some(user) = self.users.get_mut(&id) {
                    user.nick = name.clone();
                    user.channel.clone()
                } else {
                    None
                };
                self.send_to(id, &LobbyReply::Nick(name));
                if let Some(channel) = channel {
                    self.broadcast_users(&channel);
                }
            }
            LobbyRequest::Msg(text) => {
                let Some(channel) = self.users.get(&id).and_then(|u| u.channel.clone()) else {
                    self.send_to(id, &LobbyReply::Error("not in a channel".to_string()));
                    return;
                };
                let from = self
                    .users
                    .get(&id)
                    .map(|u| u.nick.clone())
                    .unwrap_or_default();
                self.send_to_channel(&channel, &LobbyReply::Chat { from, text });
            }
            LobbyRequest::Start => {
                let Some(channel) = self.users.get(&id).and_then(|u| u.channel.clone()) else {
                    self.send_to(id, &LobbyReply::Error("not in a channel".to_string()));
                    return;
                };
                log::info!("user {id} started a game in {channel}");
                self.send_to_channel(&channel, &LobbyReply::Started);
            }
            LobbyRequest::HiScores => {
                self.send_to(id, &LobbyReply::HiScores(self.scores.entries().to_vec()));
            }
            LobbyRequest::SubmitScore(entry) => {
                self.record_score(entry);
            }
        }
    }

    fn record_score(&mut self, entry: ScoreEntry) {
        log::info!("score submitted: {} {}", entry.name, entry.score);
        if self.scores.submit(entry.clone()) {
            if let Err(err) = self.scores.save(&self.scores_path) {
                log::warn!("failed to persist scores: {err:#}");
            }
            self.send_to_all(&LobbyReply::HiScore(entry));
        }
    }

    fn disconnect(&mut self, id: usize) {
        if let Some(channel) = self.leave_channel(id) {
            self.users.remove(&id);
            self.broadcast_users(&channel);
        } else {
            self.users.remove(&id);
        }
        log::info!("user {id} disconnected");
    }
}

/// Run the lobby server until the listener fails.
///
/// With `port: 0` the OS picks a free port; the bound address is
/// reported through `ready` before the first accept.
pub async fn run_server(
    config: ServerConfig,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let scores = ScoreBoard::load(&config.scores_path)
        .with_context(|| format!("loading scores from {}", config.scores_path.display()))?;
    let lobby = Arc::new(Mutex::new(Lobby::new(scores, config.scores_path.clone())));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let local_addr = listener.local_addr().context("reading bound address")?;
    log::info!("lobby listening on {local_addr}");
    if let Some(ready) = ready {
        let _ = ready.send(local_addr);
    }

    loop {
        let (stream, peer) = listener.accept().await.context("accepting connection")?;
        log::info!("connection from {peer}");
        let lobby = Arc::clone(&lobby);
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, peer, lobby).await {
                log::warn!("connection {peer} ended with error: {err:#}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    lobby: Arc<Mutex<Lobby>>,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let id = {
        let mut lobby = lobby.lock().await;
        let id = lobby.next_id;
        lobby.next_id += 1;
        lobby.users.insert(
            id,
            User {
                nick: format!("guest{id}"),
                channel: None,
                tx,
            },
        );
        id
    };

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
            if write_half.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    let outcome = loop {
        match lines.next_line().await {
            Ok(Some(line)) => match LobbyRequest::parse(&line) {
                Ok(request) => {
                    log::debug!("{peer} -> {request:?}");
                    lobby.lock().await.handle(id, request);
                }
                Err(err) => {
                    let lobby = lobby.lock().await;
                    lobby.send_to(id, &LobbyReply::Error(err.to_string()));
                }
            },
            Ok(None) => break Ok(()),
            Err(err) => break Err(err).context("reading request line"),
        }
    };

    lobby.lock().await.disconnect(id);
    writer.abort();
    outcome
}
