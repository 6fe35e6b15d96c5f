use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use super::response::ApiError;

/// JSON request body whose rejections use the `{ok:false,error}` envelope.
///
/// Missing content types, malformed JSON and fields of the wrong type all
/// come back as 400 with axum's description of what went wrong.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{StatusCode, header::CONTENT_TYPE};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Login {
        username: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::post("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let JsonBody(login) = JsonBody::<Login>::from_request(
            request(Some("application/json"), r#"{"username":"driver"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(login.username, "driver");
    }

    #[tokio::test]
    async fn test_rejections_are_bad_requests() {
        let cases = [
            request(Some("application/json"), r#"{"username":123}"#),
            request(Some("application/json"), "{}"),
            request(Some("application/json"), "{not json"),
            request(None, r#"{"username":"driver"}"#),
        ];

        for req in cases {
            let err = match JsonBody::<Login>::from_request(req, &()).await {
                Err(err) => err,
                Ok(_) => panic!("expected rejection"),
            };
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert!(!err.message.is_empty());
        }
    }
}
