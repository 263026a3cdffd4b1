//! Multipart upload extractors.
//!
//! Text parts are collected by name and deserialized into a validated
//! struct; the `profile_picture` part is kept as raw bytes. No content-type
//! or size checks are applied to the picture.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use super::validated_form::format_validation_errors;
use crate::errors::{AppError, AppResult};

/// Name of the multipart part carrying the picture bytes
pub const PICTURE_FIELD: &str = "profile_picture";

/// Multipart body with validated text fields and a required picture.
pub struct RegistrationUpload<T> {
    pub fields: T,
    pub picture: Vec<u8>,
}

/// Multipart body carrying only a required picture.
pub struct PhotoUpload(pub Vec<u8>);

/// Raw parts of a multipart upload
struct UploadParts {
    fields: Map<String, Value>,
    picture: Option<Vec<u8>>,
}

impl UploadParts {
    async fn read<S: Send + Sync>(req: Request, state: &S) -> AppResult<Self> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let mut fields = Map::new();
        let mut picture = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PICTURE_FIELD {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                picture = Some(bytes.to_vec());
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.body_text()))?;
                fields.insert(name, Value::String(text));
            }
        }

        Ok(Self { fields, picture })
    }

    fn require_picture(&mut self) -> AppResult<Vec<u8>> {
        self.picture
            .take()
            .ok_or_else(|| AppError::validation(format!("{} is required", PICTURE_FIELD)))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for RegistrationUpload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut parts = UploadParts::read(req, state).await?;
        let picture = parts.require_picture()?;

        let fields: T = serde_json::from_value(Value::Object(parts.fields))
            .map_err(|e| AppError::validation(e.to_string()))?;
        fields
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(Self { fields, picture })
    }
}

#[async_trait]
impl<S> FromRequest<S> for PhotoUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut parts = UploadParts::read(req, state).await?;
        Ok(Self(parts.require_picture()?))
    }
}
