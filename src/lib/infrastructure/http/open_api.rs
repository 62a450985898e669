//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Contact Relay"),
    paths(send_email::handler, health::handler, environment::handler),
    components(schemas(send_email::SendEmailResponse, ErrorResponse))
)]
pub struct ApiDocs;
