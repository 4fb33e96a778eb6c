//! Response envelope shared by every HTTP endpoint.
//!
//! Successful and failed calls both render as
//! `{status_code, message: {th, en}, status, data}`. Paginated payloads put a
//! [`Paginated`] in `data`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Localized message pair (Thai / English).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub th: String,
    pub en: String,
}

impl Message {
    pub fn new(th: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            th: th.into(),
            en: en.into(),
        }
    }

    pub fn success() -> Self {
        Self::new("สำเร็จ", "Success")
    }

    pub fn created() -> Self {
        Self::new("สร้างข้อมูลสำเร็จ", "Created successfully")
    }

    pub fn updated() -> Self {
        Self::new("แก้ไขข้อมูลสำเร็จ", "Updated successfully")
    }

    pub fn deleted() -> Self {
        Self::new("ลบข้อมูลสำเร็จ", "Deleted successfully")
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: Message,
    pub status: ResponseStatus,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: Message, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message,
            status: ResponseStatus::Success,
            data: Some(data),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, Message::success(), data)
    }

    pub fn created(data: T) -> Self {
        Self::success(StatusCode::CREATED, Message::created(), data)
    }

    pub fn updated(data: T) -> Self {
        Self::success(StatusCode::OK, Message::updated(), data)
    }

    pub fn deleted(data: T) -> Self {
        Self::success(StatusCode::OK, Message::deleted(), data)
    }

    pub fn error(status: StatusCode, message: Message, data: Option<T>) -> Self {
        Self {
            status_code: status.as_u16(),
            message,
            status: ResponseStatus::Error,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub page: u64,
    pub size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub list: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(list: Vec<T>, page: u64, size: u64, total_count: u64) -> Self {
        Self {
            page,
            size,
            total_count,
            total_pages: total_pages(total_count, size),
            list,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            size: self.size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            list: self.list.into_iter().map(f).collect(),
        }
    }
}

/// Number of pages needed for `total` items at `size` per page.
pub fn total_pages(total: u64, size: u64) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(size)
}
