use super::AudioClip;

/// Final product of one submission. Owned by its generation record; a new
/// submission in the same mode supersedes the old asset, it never merges.
#[derive(Debug, Clone)]
pub enum GeneratedAsset {
    Video(Vec<u8>),
    Image(Vec<u8>),
    Audio(AudioClip),
}

impl GeneratedAsset {
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratedAsset::Video(_) => "video",
            GeneratedAsset::Image(_) => "image",
            GeneratedAsset::Audio(_) => "audio",
        }
    }
}
