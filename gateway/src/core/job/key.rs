use uuid::Uuid;

/// Folder every rendered file is stored under
pub const DEFAULT_KEY_PREFIX: &str = "kokoro_audio";

fn random_suffix() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    hex
}

/// Derive the object key for a job's audio.
///
/// With both a project and a chapter the key is deterministic, so re-rendering
/// a chapter overwrites the previous file. Otherwise the key ends in 8 random
/// hex characters.
pub fn storage_key(prefix: &str, user_id: &str, project_id: &str, chapter_id: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if !project_id.is_empty() && !chapter_id.is_empty() {
        format!("{prefix}/{user_id}/project_{project_id}_chapter_{chapter_id}.wav")
    } else {
        format!("{prefix}/{user_id}/audio_{}.wav", random_suffix())
    }
}
