//! Structured results returned to the front end.

use serde::Serialize;

use crate::error::{ErrorCode, ShellError};

use super::Picked;

/// Uniform result shape: `{ success, ...payload, canceled?, error?, code? }`.
///
/// "File not found" and "user canceled" stay distinguishable from generic failures through
/// `code` and `canceled` respectively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "is_false")]
    pub canceled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> Reply<T> {
    pub fn ok(payload: T) -> Self {
        Self { success: true, payload: Some(payload), canceled: false, error: None, code: None }
    }

    pub fn canceled() -> Self {
        Self { success: false, payload: None, canceled: true, error: None, code: None }
    }

    pub fn failed(err: &ShellError) -> Self {
        Self {
            success: false,
            payload: None,
            canceled: false,
            error: Some(err.to_string()),
            code: Some(err.code()),
        }
    }

    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(err) => Self::failed(&err),
        }
    }

    pub fn from_picked(result: crate::Result<Picked<T>>) -> Self {
        match result {
            Ok(Picked::Chosen(payload)) => Self::ok(payload),
            Ok(Picked::Canceled) => Self::canceled(),
            Err(err) => Self::failed(&err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Some(ErrorCode::NotFound)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Payload for replies that carry nothing beyond `success`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub data_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageList {
    pub files: Vec<String>,
}

/// A user-chosen location on disk (data file or images folder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedPath {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedData {
    pub data: String,
}

/// Read-only snapshot returned by `get-app-info`; never wrapped in a [`Reply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub images_path: String,
}

/// Reply for any [`super::Command`], serialized without a discriminant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    SaveImage(Reply<SavedImage>),
    ReadImage(Reply<ImageData>),
    ListImages(Reply<ImageList>),
    DeleteImage(Reply<Empty>),
    AppInfo(AppInfo),
    SaveDataFile(Reply<SavedPath>),
    LoadDataFile(Reply<LoadedData>),
    OpenImagesFolder(Reply<Empty>),
    ChooseImagesFolder(Reply<SavedPath>),
}

impl Response {
    /// `success` flag of the wrapped reply; app info always succeeds.
    pub fn success(&self) -> bool {
        match self {
            Response::SaveImage(reply) => reply.success,
            Response::ReadImage(reply) => reply.success,
            Response::ListImages(reply) => reply.success,
            Response::DeleteImage(reply) | Response::OpenImagesFolder(reply) => reply.success,
            Response::AppInfo(_) => true,
            Response::SaveDataFile(reply) | Response::ChooseImagesFolder(reply) => reply.success,
            Response::LoadDataFile(reply) => reply.success,
        }
    }

    /// Failure message, if the command failed; cancellations carry none.
    pub fn error(&self) -> Option<&str> {
        let error = match self {
            Response::SaveImage(reply) => &reply.error,
            Response::ReadImage(reply) => &reply.error,
            Response::ListImages(reply) => &reply.error,
            Response::DeleteImage(reply) | Response::OpenImagesFolder(reply) => &reply.error,
            Response::AppInfo(_) => return None,
            Response::SaveDataFile(reply) | Response::ChooseImagesFolder(reply) => &reply.error,
            Response::LoadDataFile(reply) => &reply.error,
        };
        error.as_deref()
    }
}
