use crate::infra::{AppState, LeadTransport};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lead_intake::error::AppError;
use lead_intake::workflows::intake::{
    intake_router, Branch, ExternalRecord, FormValue, IntakeService,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

type LeadService = IntakeService<LeadTransport>;

/// Payload a one-shot form would produce, without delivering it.
#[derive(Debug, Serialize)]
pub(crate) struct LeadPreviewResponse {
    pub(crate) branch: Branch,
    pub(crate) branch_label: String,
    pub(crate) properties: ExternalRecord,
}

pub(crate) fn with_lead_routes(service: Arc<LeadService>) -> axum::Router {
    intake_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/leads/preview",
            axum::routing::post(lead_preview_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn lead_preview_endpoint(
    Extension(service): Extension<Arc<LeadService>>,
    Json(form): Json<BTreeMap<String, Option<FormValue>>>,
) -> Result<Json<LeadPreviewResponse>, AppError> {
    let (branch, properties) = service.preview_form(form)?;
    Ok(Json(LeadPreviewResponse {
        branch,
        branch_label: branch.label(),
        properties,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::DryRunTransport;
    use lead_intake::workflows::intake::properties;

    fn dry_run_service() -> Arc<LeadService> {
        Arc::new(IntakeService::new(Arc::new(LeadTransport::DryRun(
            DryRunTransport::default(),
        ))))
    }

    fn form(entries: &[(&str, &str)]) -> BTreeMap<String, Option<FormValue>> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), Some(FormValue::Text(value.to_string()))))
            .collect()
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn preview_returns_branch_and_properties() {
        let request = form(&[
            ("firstName", "Dana"),
            ("lastName", "Reyes"),
            ("phoneNumber", "7025550147"),
            ("email", "dana@example.com"),
            ("propertyType", "Residential"),
            ("purpose", "Primary"),
            ("action", "Rent/Lease"),
            ("area", "North"),
            ("priceRange", "$2,000 - $2,400"),
            ("bedrooms", "2"),
            ("bathrooms", "2"),
            ("sqft", "1100"),
            ("stories", "1"),
            ("garages", "1"),
        ]);

        let Json(body) = lead_preview_endpoint(Extension(dry_run_service()), Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.branch_label, "Residential / Rent");
        assert!(body.properties.contains(properties::MONTHLY_RENT));
        assert!(!body.properties.contains(properties::PRICE_RANGE));
    }

    #[tokio::test]
    async fn preview_rejects_incomplete_forms() {
        let request = form(&[("firstName", "Dana")]);

        let err = lead_preview_endpoint(Extension(dry_run_service()), Json(request))
            .await
            .expect_err("incomplete form");

        assert!(matches!(err, AppError::Intake(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
