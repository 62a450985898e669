//! Contact form email handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::{
            delivery::DeliveryService,
            mailer::{DeliveryMethod, MailOptions},
        },
        contact::{build_html, build_text},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        form::ContactForm,
        state::AppState,
    },
};

/// Send email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    /// Always `true`
    pub success: bool,

    /// The transport that delivered the email
    #[schema(value_type = String, example = "smtp")]
    pub method: DeliveryMethod,

    /// A human readable confirmation
    #[schema(example = "Correo enviado mediante SMTP.")]
    pub message: String,

    /// The identifier assigned to the email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// The recipients accepted by the SMTP server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_recipients: Option<Vec<String>>,
}

/// Relay a contact form submission by email
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Contact",
    path = "/api/email",
    request_body(
        content = std::collections::HashMap<String, String>,
        description = "Form fields; `remitente`, `nombre`, `correo`, `telefono` and `mensaje` are required",
        example = json!({
            "remitente": "web",
            "nombre": "Ana",
            "correo": "ana@example.com",
            "telefono": "123",
            "mensaje": "Hola"
        })
    ),
    responses(
        (status = StatusCode::OK, description = "Email sent", body = SendEmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid submission", body = ErrorResponse, example = json!({ "error": "Faltan campos obligatorios: telefono" })),
        (status = StatusCode::PAYLOAD_TOO_LARGE, description = "Body too large", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Email could not be sent", body = ErrorResponse, example = json!({ "error": "No se pudo enviar el correo electrónico." })),
    )
)]
pub async fn handler<D: DeliveryService>(
    State(state): State<AppState<D>>,
    ContactForm(submission): ContactForm,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let config = &state.config;

    let entries = submission
        .validate(config.extra_field_limit)
        .map_err(|err| ApiError::new_400(&config.messages.validation_error(&err)))?;

    let subject = format!(
        "{} - {}",
        config.subject_prefix,
        submission.text("nombre").unwrap_or_default()
    );

    let options = MailOptions::new(
        &config.sender,
        &config.recipient,
        submission.text("correo").unwrap_or_default(),
        subject,
        build_html(&entries),
        build_text(&entries),
    );

    let result = state.delivery.send(&options).await.map_err(|err| {
        error!("could not send email: {:#}", anyhow::Error::from(err));
        ApiError::new_500(&config.messages.send_error)
    })?;

    let message = match result.method {
        DeliveryMethod::Brevo => &config.messages.success_brevo,
        DeliveryMethod::Smtp => &config.messages.success_smtp,
    };

    Ok(Json(SendEmailResponse {
        success: true,
        method: result.method,
        message: message.clone(),
        message_id: result.message_id,
        accepted_recipients: result.accepted,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use testresult::TestResult;

    use crate::{
        domain::communication::{
            addresses::Address,
            delivery::{tests::MockDeliveryService, DeliveryError, DeliveryServiceImpl},
            mailer::{tests::MockMailer, DeliveryResult, MailerError},
        },
        infrastructure::http::{
            router,
            state::tests::{test_config, test_state},
        },
    };

    use super::*;

    fn valid_body() -> Value {
        json!({
            "remitente": "a",
            "nombre": " Ana ",
            "correo": " ana@x.com ",
            "telefono": "123",
            "mensaje": "<script>alert(1)</script>"
        })
    }

    fn smtp_result() -> DeliveryResult {
        DeliveryResult {
            method: DeliveryMethod::Smtp,
            message_id: Some("<id@example.com>".to_string()),
            accepted: Some(vec!["inbox@example.com".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_send_email_success() -> TestResult {
        let mut delivery = MockDeliveryService::new();

        delivery
            .expect_send()
            .withf(|options| {
                options.subject == "Nuevo mensaje de formulario - Ana"
                    && options.from == Address::new("web@example.com", Some("Web"))
                    && options.to == vec![Address::new("inbox@example.com", None)]
                    && options.reply_to == Some(Address::new("ana@x.com", None))
                    && options.html.matches("<tr>").count() == 5
                    && !options.html.contains("<script>")
                    && options.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;")
                    && options.text.starts_with("remitente: a\nnombre: Ana\n")
            })
            .times(1)
            .returning(|_| Ok(smtp_result()));

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/api/email")
            .json(&valid_body())
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "method": "smtp",
            "message": "Correo enviado mediante SMTP.",
            "messageId": "<id@example.com>",
            "acceptedRecipients": ["inbox@example.com"]
        }));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_through_brevo() -> TestResult {
        let mut delivery = MockDeliveryService::new();

        delivery.expect_send().times(1).returning(|_| {
            Ok(DeliveryResult {
                method: DeliveryMethod::Brevo,
                message_id: None,
                accepted: None,
            })
        });

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/send")
            .json(&valid_body())
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "method": "brevo",
            "message": "Correo enviado mediante Brevo."
        }));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_form_body() -> TestResult {
        let mut delivery = MockDeliveryService::new();

        delivery
            .expect_send()
            .withf(|options| options.text.ends_with("empresa: ACME"))
            .times(1)
            .returning(|_| Ok(smtp_result()));

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/api/email")
            .form(&[
                ("remitente", "a"),
                ("nombre", "Ana"),
                ("correo", "ana@x.com"),
                ("telefono", "123"),
                ("mensaje", "hi"),
                ("empresa", " ACME "),
            ])
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_missing_fields() -> TestResult {
        let mut delivery = MockDeliveryService::new();
        delivery.expect_send().times(0);

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/api/email")
            .json(&json!({
                "remitente": "a",
                "nombre": "Ana",
                "correo": "ana@x.com",
                "mensaje": "  "
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Faltan campos obligatorios: telefono, mensaje"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_without_body() -> TestResult {
        let response = TestServer::new(router(test_state(MockDeliveryService::new())))?
            .post("/api/email")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Faltan campos obligatorios: remitente, nombre, correo, telefono, mensaje"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_invalid_field_type() -> TestResult {
        let mut body = valid_body();
        body["edad"] = json!(30);

        let response = TestServer::new(router(test_state(MockDeliveryService::new())))?
            .post("/api/email")
            .json(&body)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Todos los campos deben ser cadenas de texto."
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_too_many_extra_fields() -> TestResult {
        let mut config = test_config();
        config.extra_field_limit = 2;

        let state = AppState::new(config, MockDeliveryService::new());

        let mut body = valid_body();
        body["a"] = json!("1");
        body["b"] = json!("2");
        body["c"] = json!("3");
        body["email"] = json!("legacy@x.com");

        let response = TestServer::new(router(state))?
            .post("/api/email")
            .json(&body)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Solo se permiten 2 campos adicionales."
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_delivery_failure() -> TestResult {
        let mut delivery = MockDeliveryService::new();

        delivery.expect_send().times(1).returning(|_| {
            Err(DeliveryError::DeliveryFailed(MailerError::ApiRejected {
                status: 500,
                body: "secret diagnostics".to_string(),
            }))
        });

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/api/email")
            .json(&valid_body())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "No se pudo enviar el correo electrónico."
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_brevo_failure_falls_back_to_smtp() -> TestResult {
        let mut brevo = MockMailer::new();
        let mut smtp = MockMailer::new();

        brevo
            .expect_deliver()
            .times(1)
            .returning(|_| Err(MailerError::UnknownError(anyhow::anyhow!("timeout"))));
        smtp.expect_deliver()
            .times(1)
            .returning(|_| Ok(smtp_result()));

        let delivery = DeliveryServiceImpl::new(Some(Arc::new(brevo)), Arc::new(smtp));

        let response = TestServer::new(router(test_state(delivery)))?
            .post("/api/email")
            .json(&valid_body())
            .await;

        response.assert_status_ok();

        let json = response.json::<SendEmailResponse>();

        assert!(json.success);
        assert_eq!(json.method, DeliveryMethod::Smtp);

        Ok(())
    }

    #[tokio::test]
    async fn test_body_too_large() -> TestResult {
        let large = "x".repeat(60 * 1024);

        let response = TestServer::new(router(test_state(MockDeliveryService::new())))?
            .post("/api/email")
            .form(&[("mensaje", large.as_str())])
            .await;

        assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        Ok(())
    }

    #[tokio::test]
    async fn test_json_body_limit() -> TestResult {
        let mut delivery = MockDeliveryService::new();

        delivery
            .expect_send()
            .times(1)
            .returning(|_| Ok(smtp_result()));

        let server = TestServer::new(router(test_state(delivery)))?;

        let mut body = valid_body();
        body["mensaje"] = json!("x".repeat(60 * 1024));

        let response = server.post("/api/email").json(&body).await;

        response.assert_status_ok();

        body["mensaje"] = json!("x".repeat(101 * 1024));

        let response = server.post("/api/email").json(&body).await;

        assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        Ok(())
    }

    #[tokio::test]
    async fn test_panic_response_has_cors_headers() -> TestResult {
        #[derive(Clone)]
        struct PanickingDelivery;

        #[async_trait::async_trait]
        impl DeliveryService for PanickingDelivery {
            async fn send(&self, _: &MailOptions) -> Result<DeliveryResult, DeliveryError> {
                panic!("transport exploded")
            }
        }

        let response = TestServer::new(router(test_state(PanickingDelivery)))?
            .post("/api/email")
            .json(&valid_body())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.header("access-control-allow-origin"), "*");
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Internal server error"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_cors_headers_are_added() -> TestResult {
        let server = TestServer::new(router(test_state(MockDeliveryService::new())))?;

        let preflight = server.method(Method::OPTIONS, "/api/email").await;

        assert_eq!(preflight.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(preflight.header("access-control-allow-origin"), "*");
        assert_eq!(
            preflight.header("access-control-allow-methods"),
            "POST,OPTIONS"
        );
        assert_eq!(
            preflight.header("access-control-allow-headers"),
            "Content-Type"
        );
        assert_eq!(preflight.header("access-control-max-age"), "600");

        let response = server.post("/api/email").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.header("access-control-allow-origin"), "*");

        Ok(())
    }
}
