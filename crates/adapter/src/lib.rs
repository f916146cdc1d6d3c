//! Lobby adapter - multiplayer lobby server over TCP with a line-based
//! text protocol, plus flat-file score persistence.
//!
//! # Protocol Overview
//!
//! One message per line, a leading verb followed by an optional payload:
//!
//! 1. **Connection**: client connects to the TCP socket (default: 127.0.0.1:7160)
//! 2. **Discovery**: `LIST` answers with `CHANNELS a,b,c`
//! 3. **Membership**: `CREATE <name>` / `JOIN <name>` / `PART`, with
//!    `USERS a,b,c` pushed to the channel on every change
//! 4. **Chat**: `MSG <text>` relayed to the channel as `MSG <nick>:<text>`
//! 5. **Games**: `START` broadcast to the channel
//! 6. **Scores**: `HISCORES` returns the table, `HISCORE <name>:<score>`
//!    submits an entry and broadcasts it when it makes the top ten
//!
//! Malformed lines are answered with `ERROR <text>`; the connection
//! stays open.
//!
//! # Environment Variables
//!
//! - `GRIDFALL_HOST`: bind address (default: "127.0.0.1")
//! - `GRIDFALL_PORT`: port number (default: 7160)
//! - `GRIDFALL_SCORES`: score file path (default: "scoreList.txt")
//!
//! # Testing
//!
//! Connect with netcat for manual poking:
//!
//! ```bash
//! nc 127.0.0.1 7160
//! LIST
//! CREATE arcade
//! MSG hello
//! ```

pub mod protocol;
pub mod server;
pub mod store;

pub use protocol::{valid_name, LobbyReply, LobbyRequest, ProtocolError};
pub use server::{run_server, ServerConfig};
pub use store::{load_best, save_best, ScoreBoard, ScoreEntry};
