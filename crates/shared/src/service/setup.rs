use crate::{
    abstract_trait::{DynSetupRepository, SetupServiceTrait},
    domain::{
        request::UpdateSetupRequest,
        response::{ApiResponse, ErrorResponse, setup::SetupResponse},
    },
    model::setup::SetupCategories,
    utils::{Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct SetupService {
    repository: DynSetupRepository,
    tracer: ServiceTracer,
}

impl SetupService {
    pub fn new(repository: DynSetupRepository, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            tracer: ServiceTracer::new("setup-service", metrics),
        }
    }
}

#[async_trait]
impl SetupServiceTrait for SetupService {
    async fn get_setup(&self, user_id: i32) -> Result<ApiResponse<SetupResponse>, ErrorResponse> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "GetSetup",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        match self.repository.find_by_user(user_id).await {
            Ok(Some(config)) => {
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Setup retrieved successfully",
                );

                Ok(ApiResponse::success(
                    "Setup retrieved successfully",
                    SetupResponse::from(SetupCategories::from(config)),
                ))
            }
            Ok(None) => {
                info!("User {user_id} has not completed setup yet");
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Setup not configured yet",
                );

                Ok(ApiResponse::success(
                    "Setup not configured yet",
                    SetupResponse::default(),
                ))
            }
            Err(err) => {
                error!("Failed to load setup for user {user_id}: {err}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());
                Err(ErrorResponse::from(err))
            }
        }
    }

    async fn update_setup(
        &self,
        user_id: i32,
        input: &UpdateSetupRequest,
    ) -> Result<ApiResponse<SetupResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateSetup",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let categories = input.normalized();
        let result = self.repository.upsert(user_id, &categories).await;
        let config = self.tracer.finish(
            &tracing_ctx,
            Method::Put,
            result,
            "Setup saved successfully",
        )?;

        Ok(ApiResponse::success(
            "Setup saved successfully",
            SetupResponse::from(SetupCategories::from(config)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abstract_trait::MockSetupRepositoryTrait, model::setup::SetupConfig};
    use sqlx::types::Json;

    fn service(repo: MockSetupRepositoryTrait) -> SetupService {
        SetupService::new(Arc::new(repo), Arc::new(Metrics::new()))
    }

    #[tokio::test]
    async fn missing_setup_is_empty_and_incomplete() {
        let mut repo = MockSetupRepositoryTrait::new();
        repo.expect_find_by_user().returning(|_| Ok(None));

        let response = service(repo).get_setup(1).await.unwrap();

        assert!(!response.data.is_complete);
        assert!(response.data.needs.is_empty());
    }

    #[tokio::test]
    async fn saves_trimmed_names() {
        let mut repo = MockSetupRepositoryTrait::new();
        repo.expect_upsert()
            .withf(|_, categories| categories.needs == vec!["Rent".to_string()])
            .returning(|user_id, categories| {
                Ok(SetupConfig {
                    setup_id: 1,
                    user_id,
                    needs: Json(categories.needs.clone()),
                    wants: Json(categories.wants.clone()),
                    savings: Json(categories.savings.clone()),
                    income_sources: Json(categories.income_sources.clone()),
                    accounts: Json(categories.accounts.clone()),
                    created_at: None,
                    updated_at: None,
                })
            });

        let input = UpdateSetupRequest {
            needs: vec!["  Rent ".into()],
            income_sources: vec!["Salary".into()],
            accounts: vec!["BCA".into()],
            ..Default::default()
        };

        let response = service(repo).update_setup(1, &input).await.unwrap();

        assert!(response.data.is_complete);
        assert_eq!(response.data.needs, vec!["Rent"]);
    }
}
