/// Track reference domain type
use crate::error::{GrooveError, Result};
use crate::types::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when a row carries no author
pub const UNKNOWN_AUTHOR: &str = "Unknown artist";

/// Location of a track's audio resource in the storage bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioLocator(String);

impl AudioLocator {
    /// Create a new locator
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playable track as handed out by the catalog
///
/// Immutable once loaded. The queue only ever stores the [`TrackId`]; the
/// full reference lives in the catalog (and the player's track cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackRef")]
pub struct TrackRef {
    id: TrackId,
    title: String,
    author: String,
    audio: AudioLocator,
    owner: Option<UserId>,
}

impl TrackRef {
    /// Create a validated track reference
    ///
    /// Id, title and audio path must be non-blank. A blank author is
    /// replaced with [`UNKNOWN_AUTHOR`].
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        audio: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let title = title.into();
        let author = author.into();
        let audio = audio.into();

        if id.trim().is_empty() {
            return Err(GrooveError::invalid_track("<blank>", "missing id"));
        }
        if title.trim().is_empty() {
            return Err(GrooveError::invalid_track(&id, "missing title"));
        }
        if audio.trim().is_empty() {
            return Err(GrooveError::invalid_track(&id, "missing audio path"));
        }

        let author = if author.trim().is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            author.trim().to_string()
        };

        Ok(Self {
            id: TrackId::new(id),
            title: title.trim().to_string(),
            author,
            audio: AudioLocator::new(audio),
            owner: None,
        })
    }

    /// Attach the uploading user
    #[must_use]
    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn audio(&self) -> &AudioLocator {
        &self.audio
    }

    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }
}

/// Wire shape of [`TrackRef`]; deserialized values go through validation
#[derive(Deserialize)]
struct RawTrackRef {
    id: String,
    title: String,
    #[serde(default)]
    author: String,
    audio: String,
    #[serde(default)]
    owner: Option<UserId>,
}

impl TryFrom<RawTrackRef> for TrackRef {
    type Error = GrooveError;

    fn try_from(raw: RawTrackRef) -> Result<Self> {
        let track = TrackRef::new(raw.id, raw.title, raw.author, raw.audio)?;
        Ok(match raw.owner {
            Some(owner) => track.with_owner(owner),
            None => track,
        })
    }
}

/// Raw `songs` row as returned by the hosted database
///
/// Every field is optional on the wire; [`TrackRef::try_from`] decides what
/// is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRow {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub song_path: Option<String>,
    pub image_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TrackRow {
    /// Parse a JSON array of rows
    pub fn parse_many(json: &str) -> Result<Vec<TrackRow>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<TrackRow> for TrackRef {
    type Error = GrooveError;

    fn try_from(row: TrackRow) -> Result<Self> {
        let track = TrackRef::new(
            row.id.unwrap_or_default(),
            row.title.unwrap_or_default(),
            row.author.unwrap_or_default(),
            row.song_path.unwrap_or_default(),
        )?;

        Ok(match row.user_id.filter(|u| !u.trim().is_empty()) {
            Some(owner) => track.with_owner(UserId::new(owner)),
            None => track,
        })
    }
}
