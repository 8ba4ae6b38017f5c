use serde::Deserialize;

/// Response of `GET /api/v1/videos/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub files: Vec<VideoFile>,
    #[serde(default)]
    pub streaming_playlists: Vec<StreamingPlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFile {
    pub file_url: Option<String>,
    pub resolution: Option<Resolution>,
    pub fps: Option<f32>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Resolution {
    pub id: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPlaylist {
    pub playlist_url: Option<String>,
    #[serde(default)]
    pub files: Vec<VideoFile>,
}
