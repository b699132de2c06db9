use axum::{
    extract::{multipart::Field, FromRequest, Multipart, Request, State},
    Form, Json,
};
use serde_json::{json, Value};

use crate::config::UploadConfig;
use crate::http::request::media_type;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::order::{validate, OrderFields, PhotoAttachment, PhotoSpool};

/// `POST /api/sendOrder`: validate the submission and notify the operator.
pub async fn send_order(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let (fields, photo) = read_submission(request, &state.config.uploads).await?;

    let order = validate(fields, photo, &state.config.orders).map_err(|e| {
        tracing::warn!(missing = ?e.missing, "Rejected incomplete order");
        ApiError::from(e)
    })?;
    let with_photo = order.photo.is_some();

    state.notifier.notify(order).await.map_err(|e| {
        tracing::error!(error = %e, with_photo, "Failed to send order");
        ApiError::from(e)
    })?;

    tracing::info!(with_photo, "Order forwarded");
    Ok(Json(json!({ "ok": true })))
}

async fn read_submission(
    request: Request,
    uploads: &UploadConfig,
) -> Result<(OrderFields, Option<PhotoAttachment>), ApiError> {
    match media_type(&request).as_str() {
        "multipart/form-data" => {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|r| ApiError::from_rejection(r.status(), r.body_text()))?;
            read_multipart(multipart, uploads).await
        }
        "application/x-www-form-urlencoded" => {
            let Form(fields) = Form::<OrderFields>::from_request(request, &())
                .await
                .map_err(|r| ApiError::from_rejection(r.status(), r.body_text()))?;
            Ok((fields, None))
        }
        "application/json" => {
            let Json(fields) = Json::<OrderFields>::from_request(request, &())
                .await
                .map_err(|r| ApiError::from_rejection(r.status(), r.body_text()))?;
            Ok((fields, None))
        }
        other => Err(ApiError::BadRequest(format!(
            "Unsupported content type '{}'; expected multipart/form-data",
            other
        ))),
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    uploads: &UploadConfig,
) -> Result<(OrderFields, Option<PhotoAttachment>), ApiError> {
    let mut fields = OrderFields::default();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "photo" => {
                if photo.is_some() {
                    return Err(ApiError::BadRequest(
                        "Only one photo may be attached".to_string(),
                    ));
                }
                photo = read_photo(field, uploads).await?;
            }
            "city" => fields.city = Some(field.text().await.map_err(multipart_error)?),
            "warehouse" => fields.warehouse = Some(field.text().await.map_err(multipart_error)?),
            "name" => fields.name = Some(field.text().await.map_err(multipart_error)?),
            "phone" => fields.phone = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    Ok((fields, photo))
}

/// Read the photo part. An empty part (no file chosen) is no photo.
async fn read_photo(
    mut field: Field<'_>,
    uploads: &UploadConfig,
) -> Result<Option<PhotoAttachment>, ApiError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    if !uploads.spool_to_disk {
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(PhotoAttachment::in_memory(
            file_name.as_deref(),
            content_type.as_deref(),
            bytes,
        )));
    }

    let mut spool = PhotoSpool::create(uploads.dir.clone())
        .await
        .map_err(storage_error)?;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        spool.write_chunk(&chunk).await.map_err(storage_error)?;
    }
    if spool.is_empty() {
        return Ok(None);
    }

    let photo = spool
        .finish(file_name.as_deref(), content_type.as_deref())
        .await
        .map_err(storage_error)?;
    tracing::debug!(bytes = photo.len(), "Photo spooled to disk");
    Ok(Some(photo))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::from_rejection(err.status(), err.body_text())
}

fn storage_error(err: std::io::Error) -> ApiError {
    tracing::error!(error = %err, "Failed to store uploaded photo");
    ApiError::Internal("Failed to store uploaded photo".to_string())
}
