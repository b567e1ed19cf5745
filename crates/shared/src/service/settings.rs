use crate::{
    abstract_trait::{DynSettingsRepository, SettingsServiceTrait},
    domain::{
        request::UpdateSettingsRequest,
        response::{ApiResponse, ErrorResponse, settings::SettingsResponse},
    },
    utils::{Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SettingsService {
    repository: DynSettingsRepository,
    tracer: ServiceTracer,
}

impl SettingsService {
    pub fn new(repository: DynSettingsRepository, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            tracer: ServiceTracer::new("settings-service", metrics),
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    async fn get_settings(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<SettingsResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetSettings",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.repository.find_or_create(user_id).await;
        let settings = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Settings retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Settings retrieved successfully",
            SettingsResponse::from(settings),
        ))
    }

    async fn update_settings(
        &self,
        user_id: i32,
        input: &UpdateSettingsRequest,
    ) -> Result<ApiResponse<SettingsResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateSettings",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        info!("Updating settings for user {user_id}");

        let result = self.repository.update(user_id, input).await;
        let settings = self.tracer.finish(
            &tracing_ctx,
            Method::Put,
            result,
            "Settings updated successfully",
        )?;

        Ok(ApiResponse::success(
            "Settings updated successfully",
            SettingsResponse::from(settings),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abstract_trait::MockSettingsRepositoryTrait, model::settings::UserSettings};

    fn defaults(user_id: i32) -> UserSettings {
        UserSettings {
            settings_id: 1,
            user_id,
            currency: "IDR".into(),
            language: "id".into(),
            theme: "system".into(),
            email_notifications: true,
            budget_alerts: true,
            alert_threshold: 80,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn first_read_returns_defaults() {
        let mut repo = MockSettingsRepositoryTrait::new();
        repo.expect_find_or_create()
            .withf(|user_id| *user_id == 3)
            .returning(|user_id| Ok(defaults(user_id)));

        let service = SettingsService::new(Arc::new(repo), Arc::new(Metrics::new()));
        let response = service.get_settings(3).await.unwrap();

        assert_eq!(response.data.currency, "IDR");
        assert_eq!(response.data.alert_threshold, 80);
    }

    #[tokio::test]
    async fn update_passes_partial_changes() {
        let mut repo = MockSettingsRepositoryTrait::new();
        repo.expect_update()
            .withf(|_, input| input.theme.as_deref() == Some("dark") && input.currency.is_none())
            .returning(|user_id, _| {
                Ok(UserSettings {
                    theme: "dark".into(),
                    ..defaults(user_id)
                })
            });

        let service = SettingsService::new(Arc::new(repo), Arc::new(Metrics::new()));
        let input = UpdateSettingsRequest {
            theme: Some("dark".into()),
            ..Default::default()
        };

        let response = service.update_settings(3, &input).await.unwrap();
        assert_eq!(response.data.theme, "dark");
    }
}
