//! Lobby wire protocol - line-based text messages.
//!
//! One message per line, a leading verb followed by an optional
//! payload. Each line is parsed once into a tagged variant; handlers
//! match on the variant, never on substrings. Malformed input is a
//! recoverable [`ProtocolError`] answered on the wire with
//! `ERROR <text>`.

use std::fmt;

use crate::store::ScoreEntry;

/// A request from a lobby client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyRequest {
    /// `LIST` - ask for the channel list.
    List,
    /// `CREATE <name>` - create a channel and join it.
    Create(String),
    /// `JOIN <name>` - join an existing channel.
    Join(String),
    /// `PART` - leave the current channel.
    Part,
    /// `NICK <name>` - change nickname.
    Nick(String),
    /// `MSG <text>` - chat to the current channel.
    Msg(String),
    /// `START` - ask the channel to start a game.
    Start,
    /// `HISCORES` - ask for the high-score table.
    HiScores,
    /// `HISCORE <name>:<score>` - submit a score.
    SubmitScore(ScoreEntry),
}

/// A reply or push from the lobby server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyReply {
    /// `CHANNELS <a,b,c>`
    Channels(Vec<String>),
    /// `JOIN <name>` - confirmation of a join.
    Joined(String),
    /// `PART` - confirmation of leaving.
    Parted,
    /// `NICK <name>` - confirmation of a nickname change.
    Nick(String),
    /// `MSG <nick>:<text>` - a chat line.
    Chat { from: String, text: String },
    /// `USERS <a,b,c>` - current channel membership.
    Users(Vec<String>),
    /// `START` - the channel host started a game.
    Started,
    /// `HISCORES <name:score,...>` - the high-score table.
    HiScores(Vec<ScoreEntry>),
    /// `HISCORE <name>:<score>` - a newly recorded score.
    HiScore(ScoreEntry),
    /// `ERROR <text>`
    Error(String),
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    EmptyLine,
    UnknownVerb(String),
    MissingPayload(&'static str),
    BadScore(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::EmptyLine => write!(f, "empty line"),
            ProtocolError::UnknownVerb(verb) => write!(f, "unknown verb {verb}"),
            ProtocolError::MissingPayload(verb) => write!(f, "{verb} needs a payload"),
            ProtocolError::BadScore(raw) => write!(f, "bad score entry {raw}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Split a line into its verb and the rest of the line.
fn split_verb(line: &str) -> (&str, Option<&str>) {
    match line.split_once(' ') {
        Some((verb, rest)) => (verb, Some(rest.trim())),
        None => (line, None),
    }
}

fn require<'a>(payload: Option<&'a str>, verb: &'static str) -> Result<&'a str, ProtocolError> {
    match payload {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ProtocolError::MissingPayload(verb)),
    }
}

fn parse_entry(raw: &str) -> Result<ScoreEntry, ProtocolError> {
    let (name, score) = raw
        .split_once(':')
        .ok_or_else(|| ProtocolError::BadScore(raw.to_string()))?;
    let name = name.trim();
    // The score file is comma-delimited and HISCORES replies join
    // entries with commas, so names must obey the same rules as
    // nicknames or the entry cannot survive a round trip.
    if !valid_name(name) {
        return Err(ProtocolError::BadScore(raw.to_string()));
    }
    let score = score
        .trim()
        .parse::<u32>()
        .map_err(|_| ProtocolError::BadScore(raw.to_string()))?;
    Ok(ScoreEntry::new(name, score))
}

fn encode_names(names: &[String]) -> String {
    names.join(",")
}

fn parse_names(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

impl LobbyRequest {
    /// Parse a client line.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::EmptyLine);
        }
        let (verb, payload) = split_verb(line);
        match verb {
            "LIST" => Ok(LobbyRequest::List),
            "CREATE" => Ok(LobbyRequest::Create(require(payload, "CREATE")?.to_string())),
            "JOIN" => Ok(LobbyRequest::Join(require(payload, "JOIN")?.to_string())),
            "PART" => Ok(LobbyRequest::Part),
            "NICK" => Ok(LobbyRequest::Nick(require(payload, "NICK")?.to_string())),
            "MSG" => Ok(LobbyRequest::Msg(require(payload, "MSG")?.to_string())),
            "START" => Ok(LobbyRequest::Start),
            "HISCORES" => Ok(LobbyRequest::HiScores),
            "HISCORE" => Ok(LobbyRequest::SubmitScore(parse_entry(require(
                payload, "HISCORE",
            )?)?)),
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }

    /// Encode for the wire (client side).
    pub fn encode(&self) -> String {
        match self {
            LobbyRequest::List => "LIST".to_string(),
            LobbyRequest::Create(name) => format!("CREATE {name}"),
            LobbyRequest::Join(name) => format!("JOIN {name}"),
            LobbyRequest::Part => "PART".to_string(),
            LobbyRequest::Nick(name) => format!("NICK {name}"),
            LobbyRequest::Msg(text) => format!("MSG {text}"),
            LobbyRequest::Start => "START".to_string(),
            LobbyRequest::HiScores => "HISCORES".to_string(),
            LobbyRequest::SubmitScore(entry) => {
                format!("HISCORE {}:{}", entry.name, entry.score)
            }
        }
    }
}

impl LobbyReply {
    /// Encode for the wire (server side).
    pub fn encode(&self) -> String {
        match self {
            LobbyReply::Channels(names) => format!("CHANNELS {}", encode_names(names)),
            LobbyReply::Joined(name) => format!("JOIN {name}"),
            LobbyReply::Parted => "PART".to_string(),
            LobbyReply::Nick(name) => format!("NICK {name}"),
            LobbyReply::Chat { from, text } => format!("MSG {from}:{text}"),
            LobbyReply::Users(names) => format!("USERS {}", encode_names(names)),
            LobbyReply::Started => "START".to_string(),
            LobbyReply::HiScores(entries) => {
                let list = entries
                    .iter()
                    .map(|e| format!("{}:{}", e.name, e.score))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("HISCORES {list}")
            }
            LobbyReply::HiScore(entry) => format!("HISCORE {}:{}", entry.name, entry.score),
            LobbyReply::Error(text) => format!("ERROR {text}"),
        }
    }

    /// Parse a server line (client side).
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::EmptyLine);
        }
        let (verb, payload) = split_verb(line);
        match verb {
            "CHANNELS" => Ok(LobbyReply::Channels(parse_names(payload.unwrap_or("")))),
            "JOIN" => Ok(LobbyReply::Joined(require(payload, "JOIN")?.to_string())),
            "PART" => Ok(LobbyReply::Parted),
            "NICK" => Ok(LobbyReply::Nick(require(payload, "NICK")?.to_string())),
            "MSG" => {
                let raw = require(payload, "MSG")?;
                let (from, text) = raw
                    .split_once(':')
                    .ok_or(ProtocolError::MissingPayload("MSG"))?;
                Ok(LobbyReply::Chat {
                    from: from.to_string(),
                    text: text.to_string(),
                })
            }
            "USERS" => Ok(LobbyReply::Users(parse_names(payload.unwrap_or("")))),
            "START" => Ok(LobbyReply::Started),
            "HISCORES" => {
                let raw = payload.unwrap_or("");
                let mut entries = Vec::new();
                for item in raw.split(',').filter(|s| !s.trim().is_empty()) {
                    entries.push(parse_entry(item.trim())?);
                }
                Ok(LobbyReply::HiScores(entries))
            }
            "HISCORE" => Ok(LobbyReply::HiScore(parse_entry(require(
                payload, "HISCORE",
            )?)?)),
            "ERROR" => Ok(LobbyReply::Error(payload.unwrap_or("").to_string())),
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }
}

/// Whether a nickname or channel name is acceptable on the wire: list
/// replies are comma-separated, so names must not contain commas (or
/// whitespace, which would split the verb payload ambiguously).
pub fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(',') && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trips() {
        let requests = [
            LobbyRequest::List,
            LobbyRequest::Create("arcade".to_string()),
            LobbyRequest::Join("arcade".to_string()),
            LobbyRequest::Part,
            LobbyRequest::Nick("ada".to_string()),
            LobbyRequest::Msg("good luck: have fun".to_string()),
            LobbyRequest::Start,
            LobbyRequest::HiScores,
            LobbyRequest::SubmitScore(ScoreEntry::new("ada", 1280)),
        ];
        for request in requests {
            let line = request.encode();
            assert_eq!(LobbyRequest::parse(&line).unwrap(), request, "{line}");
        }
    }

    #[test]
    fn test_reply_round_trips() {
        let replies = [
            LobbyReply::Channels(vec!["arcade".to_string(), "casual".to_string()]),
            LobbyReply::Joined("arcade".to_string()),
            LobbyReply::Parted,
            LobbyReply::Nick("ada".to_string()),
            LobbyReply::Chat {
                from: "ada".to_string(),
                text: "nice clear".to_string(),
            },
            LobbyReply::Users(vec!["ada".to_string(), "brian".to_string()]),
            LobbyReply::Started,
            LobbyReply::HiScores(vec![
                ScoreEntry::new("ada", 1280),
                ScoreEntry::new("brian", 640),
            ]),
            LobbyReply::HiScore(ScoreEntry::new("ada", 1280)),
            LobbyReply::Error("no such channel".to_string()),
        ];
        for reply in replies {
            let line = reply.encode();
            assert_eq!(LobbyReply::parse(&line).unwrap(), reply, "{line}");
        }
    }

    #[test]
    fn test_chat_text_may_contain_colons() {
        let parsed = LobbyReply::parse("MSG ada:score: 50 points").unwrap();
        assert_eq!(
            parsed,
            LobbyReply::Chat {
                from: "ada".to_string(),
                text: "score: 50 points".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_verb_is_an_error() {
        assert!(matches!(
            LobbyRequest::parse("QUIT now"),
            Err(ProtocolError::UnknownVerb(_))
        ));
    }

    #[test]
    fn test_missing_payload_is_an_error() {
        assert!(matches!(
            LobbyRequest::parse("JOIN"),
            Err(ProtocolError::MissingPayload("JOIN"))
        ));
        assert!(matches!(
            LobbyRequest::parse("MSG   "),
            Err(ProtocolError::MissingPayload("MSG"))
        ));
    }

    #[test]
    fn test_bad_score_is_an_error() {
        assert!(matches!(
            LobbyRequest::parse("HISCORE ada:lots"),
            Err(ProtocolError::BadScore(_))
        ));
        assert!(matches!(
            LobbyRequest::parse("HISCORE ada"),
            Err(ProtocolError::BadScore(_))
        ));
    }

    #[test]
    fn test_score_names_follow_the_nickname_rules() {
        // A comma would collide with the score-file format and the
        // comma-joined HISCORES reply.
        assert!(matches!(
            LobbyRequest::parse("HISCORE a,b:500"),
            Err(ProtocolError::BadScore(_))
        ));
        assert!(matches!(
            LobbyRequest::parse("HISCORE two words:500"),
            Err(ProtocolError::BadScore(_))
        ));
        assert!(matches!(
            LobbyRequest::parse("HISCORE :500"),
            Err(ProtocolError::BadScore(_))
        ));
        assert!(LobbyRequest::parse("HISCORE ada:500").is_ok());
    }

    #[test]
    fn test_accepted_score_entry_survives_both_round_trips() {
        let entry = match LobbyRequest::parse("HISCORE ada:1280").unwrap() {
            LobbyRequest::SubmitScore(entry) => entry,
            other => panic!("unexpected parse: {other:?}"),
        };
        let reply = LobbyReply::HiScores(vec![entry.clone()]);
        assert_eq!(LobbyReply::parse(&reply.encode()).unwrap(), reply);
        assert_eq!(
            LobbyReply::parse(&LobbyReply::HiScore(entry.clone()).encode()).unwrap(),
            LobbyReply::HiScore(entry)
        );
    }

    #[test]
    fn test_empty_channel_list() {
        assert_eq!(LobbyReply::parse("CHANNELS ").unwrap(), LobbyReply::Channels(vec![]));
        assert_eq!(LobbyReply::Channels(vec![]).encode(), "CHANNELS ");
    }

    #[test]
    fn test_valid_name_rules() {
        assert!(valid_name("arcade"));
        assert!(!valid_name(""));
        assert!(!valid_name("two words"));
        assert!(!valid_name("a,b"));
    }
}
