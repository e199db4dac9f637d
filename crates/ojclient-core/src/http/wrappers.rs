//! Call wrappers
//!
//! Each wrapper fixes a method, a content type and a parameter placement, and
//! turns optional typed parameters into a [`RequestDescriptor`]. Absent
//! parameters (`None`, or a value serializing to `null`) leave the query and
//! body unset.
//!
//! | wrapper       | method | content type      | params | encoding              |
//! |---------------|--------|-------------------|--------|-----------------------|
//! | `get`         | GET    | default           | query  | comma (set by hook)   |
//! | `post`        | POST   | default (JSON)    | body   | JSON                  |
//! | `post_json`   | POST   | multipart         | body   | form parts            |
//! | `post_sb`     | POST   | urlencoded        | body   | repeated keys         |
//! | `post_uncode` | POST   | urlencoded        | body   | indices               |
//! | `up_file`     | POST   | multipart         | body   | multipart payload     |
//! | `put`         | PUT    | urlencoded        | body   | indices               |
//! | `put_json`    | PUT    | default (JSON)    | body   | JSON                  |
//! | `delete`      | DELETE | default           | query  | brackets              |

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::http::request::{ContentType, MultipartPayload, RequestBody, RequestDescriptor};
use crate::http::serializer::{self, ArrayFormat};
use crate::Result;

/// Typed "no parameters" value for wrapper calls
pub const NO_PARAMS: Option<&'static ()> = None;

fn query_params<T: Serialize + ?Sized>(params: Option<&T>) -> Result<Option<serde_json::Map<String, Value>>> {
    match params {
        Some(params) => serializer::to_param_map(params),
        None => Ok(None),
    }
}

fn json_body<T: Serialize + ?Sized>(params: Option<&T>) -> Result<Option<RequestBody>> {
    let Some(params) = params else {
        return Ok(None);
    };
    match serde_json::to_value(params)? {
        Value::Null => Ok(None),
        value => Ok(Some(RequestBody::Json(value))),
    }
}

/// GET with parameters in the query string
pub fn get<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::GET, path).with_query(query_params(params)?))
}

/// POST with a JSON body
pub fn post<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::POST, path).with_body(json_body(params)?))
}

/// POST with the parameter object sent as multipart form parts
pub fn post_json<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    let body = query_params(params)?
        .map(|map| RequestBody::Multipart(MultipartPayload::from_params(&map)));
    Ok(RequestDescriptor::new(Method::POST, path)
        .with_content_type(ContentType::Multipart)
        .with_body(body))
}

/// Urlencoded request with an explicit array encoding
///
/// `post_sb`, `post_uncode` and `put` are fixed configurations of this.
pub fn form_request<T: Serialize + ?Sized>(
    method: Method,
    path: &str,
    params: Option<&T>,
    format: ArrayFormat,
) -> Result<RequestDescriptor> {
    let body = match params {
        Some(params) => serializer::stringify_params(params, format)?.map(RequestBody::Form),
        None => None,
    };
    Ok(RequestDescriptor::new(method, path)
        .with_content_type(ContentType::FormUrlEncoded)
        .with_body(body))
}

/// POST urlencoded, arrays as repeated keys
pub fn post_sb<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    form_request(Method::POST, path, params, ArrayFormat::Repeat)
}

/// POST urlencoded, default array encoding
pub fn post_uncode<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    form_request(Method::POST, path, params, ArrayFormat::Indices)
}

/// POST a multipart payload as-is
pub fn up_file(path: &str, payload: Option<MultipartPayload>) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::POST, path)
        .with_content_type(ContentType::Multipart)
        .with_body(payload.map(RequestBody::Multipart)))
}

/// PUT urlencoded, default array encoding
pub fn put<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    form_request(Method::PUT, path, params, ArrayFormat::Indices)
}

/// PUT with a JSON body
pub fn put_json<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::PUT, path).with_body(json_body(params)?))
}

/// DELETE with parameters in the query string
pub fn delete<T: Serialize + ?Sized>(path: &str, params: Option<&T>) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::new(Method::DELETE, path).with_query(query_params(params)?))
}
