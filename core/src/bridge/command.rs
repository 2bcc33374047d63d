use serde::Deserialize;

/// A request from the front end, validated at the boundary.
///
/// Wire form is `{"command": "<name>", "args": {...}}`. Names outside this enum fail to
/// deserialize, so nothing is ever forwarded by a free-form name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "kebab-case")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    SaveImage { file_name: String, data_url: String },
    #[serde(rename_all = "camelCase")]
    ReadImage { relative_path: String },
    ListImages,
    #[serde(rename_all = "camelCase")]
    DeleteImage { relative_path: String },
    GetAppInfo,
    #[serde(rename_all = "camelCase")]
    SaveDataFile { default_name: String, data: String },
    LoadDataFile,
    OpenImagesFolder,
    ChooseImagesFolder,
}

impl Command {
    pub const NAMES: [&'static str; 9] = [
        "save-image",
        "read-image",
        "list-images",
        "delete-image",
        "get-app-info",
        "save-data-file",
        "load-data-file",
        "open-images-folder",
        "choose-images-folder",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::SaveImage { .. } => "save-image",
            Command::ReadImage { .. } => "read-image",
            Command::ListImages => "list-images",
            Command::DeleteImage { .. } => "delete-image",
            Command::GetAppInfo => "get-app-info",
            Command::SaveDataFile { .. } => "save-data-file",
            Command::LoadDataFile => "load-data-file",
            Command::OpenImagesFolder => "open-images-folder",
            Command::ChooseImagesFolder => "choose-images-folder",
        }
    }
}
