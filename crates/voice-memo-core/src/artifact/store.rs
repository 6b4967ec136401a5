use crate::{AudioError, CoreResult, artifact::PendingArtifact, audio::AudioCodec};

use std::{
    collections::HashSet,
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeZone};
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// `strftime` pattern for artifact names (`HH:mm:ss`).
pub const ARTIFACT_TIME_FORMAT: &str = "%H:%M:%S";

/// Recordings directory and the artifact names handed out from it.
///
/// Names come from the wall clock with one-second resolution, so two
/// recordings in the same second would collide. The store resolves that by
/// appending `-1`, `-2`, ... to the time stamp until the name is free both
/// on disk and among names already issued by this process. Only the names
/// issued in the most recent second are remembered; older ones can no
/// longer collide with the clock.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    issued_stem: String,
    issued: HashSet<String>,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. The directory is created on first allocation.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            issued_stem: String::new(),
            issued: HashSet::new(),
        }
    }

    /// Recordings directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a name for a recording started now.
    #[track_caller]
    pub fn allocate(&mut self, codec: AudioCodec) -> CoreResult<PendingArtifact> {
        self.allocate_at(&Local::now(), codec)
    }

    /// Reserve a name for a recording stamped with `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::StorageUnavailable`] if the directory cannot be created.
    #[track_caller]
    #[instrument(skip(self, timestamp), fields(dir = ?self.dir))]
    pub fn allocate_at<Tz>(
        &mut self,
        timestamp: &DateTime<Tz>,
        codec: AudioCodec,
    ) -> CoreResult<PendingArtifact>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let location = Location::caller();

        fs::create_dir_all(&self.dir).map_err(|e| AudioError::StorageUnavailable {
            reason: format!("Failed to create {:?}: {}", self.dir, e),
            location: ErrorLocation::from(location),
        })?;

        let stem = timestamp.format(ARTIFACT_TIME_FORMAT).to_string();
        let extension = codec.extension();

        if stem != self.issued_stem {
            self.issued.clear();
            self.issued_stem.clone_from(&stem);
        }

        let mut id = format!("{}.{}", stem, extension);
        let mut counter = 0u32;
        while self.issued.contains(&id) || self.dir.join(&id).exists() {
            counter += 1;
            id = format!("{}-{}.{}", stem, counter, extension);
        }

        if counter > 0 {
            debug!(artifact_id = %id, collisions = counter, "Artifact name disambiguated");
        }

        self.issued.insert(id.clone());
        let path = self.dir.join(&id);

        Ok(PendingArtifact { id, path })
    }
}
