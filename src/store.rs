//! Where finished works go.
//!
//! Capture code (the canvas, the camera) only ever sees the [`ContentStore`] trait:
//! hand it the encoded bytes plus a little metadata, get back the stored record
//! with a URL that can be opened later. [`FsContentStore`] keeps everything in a
//! directory: `<id>.png` next to a `<id>.json` record.
//!
//! Records read back from storage are untrusted. [`ContentRecord::from_json`]
//! accepts the loose field spellings older clients wrote and rejects anything it
//! cannot make sense of before it reaches the rest of the app.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::export::{PNG_MIME, encode_png};
use crate::types::FrameBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Drawing,
    Photo,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        PNG_MIME
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drawing" => Some(ContentType::Drawing),
            "photo" => Some(ContentType::Photo),
            _ => None,
        }
    }
}

/// Who a work belongs to. Account ids and child-profile ids live in different
/// id spaces and are kept apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OwnerId {
    Account(String),
    Profile(String),
}

/// What the caller knows about a work before it is stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewContent {
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub owner: OwnerId,
}

impl NewContent {
    pub fn new(title: impl Into<String>, content_type: ContentType, owner: OwnerId) -> Self {
        Self { title: title.into(), description: None, content_type, owner }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trimmed copy; empty titles are rejected, empty descriptions dropped.
    pub fn validate(&self) -> Result<NewContent> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidRecord("title must not be empty".into()));
        }
        Ok(NewContent {
            title: title.to_string(),
            description: normalize_text(self.description.as_deref()),
            content_type: self.content_type,
            owner: self.owner.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_url: String,
    pub content_type: ContentType,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    /// Validate a loosely typed record. Accepts snake_case and camelCase keys and
    /// the legacy owner fields; anything missing or contradictory is an error.
    pub fn from_json(value: &Value) -> Result<ContentRecord> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::InvalidRecord("record is not an object".into()))?;
        let field = |keys: &[&str]| keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()));
        let text = |keys: &[&str]| field(keys).and_then(Value::as_str).map(str::to_string);

        let id = text(&["id"])
            .and_then(|s| Uuid::parse_str(&s).ok())
            .ok_or_else(|| Error::InvalidRecord("missing or malformed id".into()))?;

        let title = normalize_text(text(&["title"]).as_deref())
            .ok_or_else(|| Error::InvalidRecord(format!("{id}: missing title")))?;

        let content_url = normalize_text(text(&["content_url", "contentUrl"]).as_deref())
            .ok_or_else(|| Error::InvalidRecord(format!("{id}: missing content url")))?;

        let content_type = text(&["content_type", "contentType"])
            .ok_or_else(|| Error::InvalidRecord(format!("{id}: missing content type")))
            .and_then(|s| {
                ContentType::parse(&s)
                    .ok_or_else(|| Error::InvalidRecord(format!("{id}: unsupported content type {s:?}")))
            })?;

        let created_at = text(&["created_at", "createdAt"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| Error::InvalidRecord(format!("{id}: missing or malformed created_at")))?;

        let owner = match field(&["owner"]) {
            Some(v) => serde_json::from_value::<OwnerId>(v.clone())
                .map_err(|e| Error::InvalidRecord(format!("{id}: bad owner: {e}")))?,
            None => legacy_owner(&text, id)?,
        };

        Ok(ContentRecord {
            id,
            title,
            description: normalize_text(text(&["description"]).as_deref()),
            content_url,
            content_type,
            owner,
            created_at,
        })
    }
}

// Old records named the owner with one of several keys. Profile keys and account
// keys are different id spaces; a record carrying both is ambiguous.
fn legacy_owner(text: &dyn Fn(&[&str]) -> Option<String>, id: Uuid) -> Result<OwnerId> {
    let profile = text(&["child_profile_id", "selectedChildProfileId"]);
    let account = text(&["user_id", "selectedChildId"]);
    match (profile, account) {
        (Some(_), Some(_)) => Err(Error::InvalidRecord(format!(
            "{id}: both a profile id and an account id are present"
        ))),
        (Some(p), None) => Ok(OwnerId::Profile(p)),
        (None, Some(a)) => Ok(OwnerId::Account(a)),
        (None, None) => Err(Error::InvalidRecord(format!("{id}: missing owner"))),
    }
}

fn normalize_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Persists an encoded work plus its metadata.
pub trait ContentStore {
    /// Store `blob` and its record. On error nothing usable was stored.
    fn save(&mut self, blob: &[u8], meta: &NewContent) -> Result<ContentRecord>;

    /// Every valid record belonging to `owner`, oldest first.
    fn list(&self, owner: &OwnerId) -> Result<Vec<ContentRecord>>;
}

pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Use (and create if needed) `root` as the storage directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentStore for FsContentStore {
    fn save(&mut self, blob: &[u8], meta: &NewContent) -> Result<ContentRecord> {
        let meta = meta.validate()?;
        let id = Uuid::new_v4();
        let image_path = self.root.join(format!("{id}.png"));
        let record_path = self.root.join(format!("{id}.json"));

        fs::write(&image_path, blob)?;

        let record = ContentRecord {
            id,
            title: meta.title,
            description: meta.description,
            content_url: format!("file://{}", image_path.display()),
            content_type: meta.content_type,
            owner: meta.owner,
            created_at: Utc::now(),
        };

        let written = serde_json::to_vec_pretty(&record)
            .map_err(Error::from)
            .and_then(|json| fs::write(&record_path, json).map_err(Error::from));
        if let Err(e) = written {
            // an image without a record is invisible; don't leave it behind
            let _ = fs::remove_file(&image_path);
            return Err(e);
        }

        info!(
            id = %record.id,
            kind = ?record.content_type,
            mime = record.content_type.mime(),
            bytes = blob.len(),
            "work saved"
        );
        Ok(record)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<ContentRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read(&path)
                .map_err(Error::from)
                .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(Error::from))
                .and_then(|value| ContentRecord::from_json(&value));
            match parsed {
                Ok(record) if &record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

/// Export the canvas and hand it to the store. A failure leaves the canvas and
/// its history exactly as they were, so saving can simply be tried again.
pub fn save_drawing<S: ContentStore + ?Sized>(
    canvas: &Canvas,
    store: &mut S,
    meta: &NewContent,
) -> Result<ContentRecord> {
    let png = canvas.export_image()?;
    store.save(&png, meta)
}

/// Same as [`save_drawing`] for a camera still.
pub fn save_photo<S: ContentStore + ?Sized>(
    photo: &FrameBuffer,
    store: &mut S,
    meta: &NewContent,
) -> Result<ContentRecord> {
    let png = encode_png(photo)?;
    store.save(&png, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kid() -> OwnerId {
        OwnerId::Profile("p-1".into())
    }

    #[test]
    fn validate_trims_and_normalizes() {
        let meta = NewContent::new("  Rocket  ", ContentType::Drawing, kid()).with_description("   ");
        let clean = meta.validate().unwrap();
        assert_eq!(clean.title, "Rocket");
        assert_eq!(clean.description, None);

        let empty = NewContent::new("   ", ContentType::Drawing, kid());
        assert!(matches!(empty.validate(), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn from_json_accepts_camel_case_and_legacy_profile_owner() {
        let v = json!({
            "id": "6f1c2d1e-8a8b-4b7e-9c55-0d7e3c7a1b20",
            "title": "Cat",
            "contentUrl": "file:///tmp/cat.png",
            "contentType": "Photo",
            "createdAt": "2024-05-01T10:00:00Z",
            "selectedChildProfileId": "p-9",
            "description": ""
        });
        let r = ContentRecord::from_json(&v).unwrap();
        assert_eq!(r.content_type, ContentType::Photo);
        assert_eq!(r.owner, OwnerId::Profile("p-9".into()));
        assert_eq!(r.description, None);
    }

    #[test]
    fn null_field_falls_through_to_its_alias() {
        let v = json!({
            "id": "6f1c2d1e-8a8b-4b7e-9c55-0d7e3c7a1b20",
            "title": "Boat",
            "content_url": null,
            "contentUrl": "file:///x",
            "content_type": null,
            "contentType": "drawing",
            "created_at": "2024-05-01T10:00:00Z",
            "user_id": "u-1"
        });
        let r = ContentRecord::from_json(&v).unwrap();
        assert_eq!(r.content_url, "file:///x");
        assert_eq!(r.content_type, ContentType::Drawing);
    }

    #[test]
    fn both_kinds_of_work_are_png() {
        assert_eq!(ContentType::Drawing.mime(), "image/png");
        assert_eq!(ContentType::Photo.mime(), PNG_MIME);
    }

    #[test]
    fn from_json_keeps_account_and_profile_ids_apart() {
        let base = json!({
            "id": "6f1c2d1e-8a8b-4b7e-9c55-0d7e3c7a1b20",
            "title": "Cat",
            "content_url": "file:///tmp/cat.png",
            "content_type": "drawing",
            "created_at": "2024-05-01T10:00:00Z",
        });

        let mut account = base.clone();
        account["selectedChildId"] = json!("u-3");
        assert_eq!(ContentRecord::from_json(&account).unwrap().owner, OwnerId::Account("u-3".into()));

        let mut both = account.clone();
        both["child_profile_id"] = json!("p-3");
        assert!(matches!(ContentRecord::from_json(&both), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn from_json_rejects_malformed_records() {
        assert!(ContentRecord::from_json(&json!([1, 2])).is_err());
        assert!(ContentRecord::from_json(&json!({"id": "nope"})).is_err());
        let audio = json!({
            "id": "6f1c2d1e-8a8b-4b7e-9c55-0d7e3c7a1b20",
            "title": "Song",
            "content_url": "file:///tmp/a.webm",
            "content_type": "audio",
            "created_at": "2024-05-01T10:00:00Z",
            "user_id": "u-1"
        });
        assert!(ContentRecord::from_json(&audio).is_err());
    }

    #[test]
    fn serialized_record_reads_back_through_the_boundary() {
        let record = ContentRecord {
            id: Uuid::new_v4(),
            title: "Sun".into(),
            description: Some("big and yellow".into()),
            content_url: "file:///tmp/sun.png".into(),
            content_type: ContentType::Drawing,
            owner: kid(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().with_timezone(&Utc),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(ContentRecord::from_json(&value).unwrap(), record);
    }
}
