use crate::{
    abstract_trait::{BudgetServiceTrait, DynBudgetRepository, DynNotificationService},
    cache::{self, CacheStore, keys},
    domain::{
        request::{
            CopyBudgetRequest, CreateBudgetRequest, FindAllBudgetRequest, UpdateBudgetRequest,
            normalize_page,
        },
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            budget::{BudgetResponse, BudgetSummaryResponse, CategoryShare},
            pagination::Pagination,
        },
    },
    model::{
        budget::{Budget, CategoryAmounts},
        notification::NotificationKind,
    },
    utils::{
        AppError, Method, Metrics, ServiceTracer, checked_sub, percentage, require_year_month,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::{sync::Arc, time::Duration};
use tracing::info;

const SUMMARY_TTL: Duration = Duration::from_secs(5 * 60);

/// Totals and income shares for one budget.
pub fn summarize_budget(budget: &Budget) -> Result<BudgetSummaryResponse, AppError> {
    let total_income = budget.total_income()?;
    let total_expenses = budget.total_expenses()?;
    let total_savings = budget.total_savings()?;
    let remaining = checked_sub(checked_sub(total_income, total_expenses)?, total_savings)?;

    let shares = |amounts: &CategoryAmounts| -> Vec<CategoryShare> {
        amounts
            .iter()
            .map(|(category, amount)| CategoryShare {
                category: category.clone(),
                amount: *amount,
                percentage_of_income: percentage(*amount, total_income),
            })
            .collect()
    };

    Ok(BudgetSummaryResponse {
        year_month: budget.year_month.clone(),
        total_income,
        total_expenses,
        total_savings,
        remaining,
        expenses_percentage: percentage(total_expenses, total_income),
        savings_percentage: percentage(total_savings, total_income),
        remaining_percentage: percentage(remaining, total_income),
        expenses: shares(&budget.expenses),
        savings_allocation: shares(&budget.savings_allocation),
    })
}

#[derive(Clone)]
pub struct BudgetService {
    repository: DynBudgetRepository,
    notifications: DynNotificationService,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl BudgetService {
    pub fn new(
        repository: DynBudgetRepository,
        notifications: DynNotificationService,
        cache: CacheStore,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            notifications,
            cache,
            tracer: ServiceTracer::new("budget-service", metrics),
        }
    }

    async fn find_existing(&self, user_id: i32, year_month: &str) -> Result<Budget, AppError> {
        require_year_month(year_month)?;

        self.repository
            .find_by_month(user_id, year_month)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Budget for {year_month} not found")))
    }

    async fn create(&self, user_id: i32, input: &CreateBudgetRequest) -> Result<Budget, AppError> {
        let budget = self.repository.create(user_id, input).await?;

        cache::invalidate_month(&self.cache, user_id, &budget.year_month).await;

        self.notifications
            .notify(
                user_id,
                NotificationKind::Budget,
                "Budget created",
                &format!("Your budget for {} is ready.", budget.year_month),
            )
            .await;

        Ok(budget)
    }

    async fn summary(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<BudgetSummaryResponse, AppError> {
        let key = keys::budget_summary(user_id, year_month);

        if let Some(summary) = self.cache.get_from_cache::<BudgetSummaryResponse>(&key).await {
            return Ok(summary);
        }

        let budget = self.find_existing(user_id, year_month).await?;
        let summary = summarize_budget(&budget)?;

        self.cache.set_to_cache(&key, &summary, SUMMARY_TTL).await;

        Ok(summary)
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn get_budgets(
        &self,
        user_id: i32,
        req: &FindAllBudgetRequest,
    ) -> Result<ApiResponsePagination<Vec<BudgetResponse>>, ErrorResponse> {
        let (page, page_size) = normalize_page(req.page, req.page_size);

        let tracing_ctx = self.tracer.start_tracing(
            "GetBudgets",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("page", page.to_string()),
            ],
        );

        let result = self
            .repository
            .find_all(user_id, req.year, page, page_size)
            .await;
        let (budgets, total) = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Budgets retrieved successfully",
        )?;

        Ok(ApiResponsePagination::success(
            "Budgets retrieved successfully",
            budgets.into_iter().map(BudgetResponse::from).collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    async fn get_budget(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetBudget",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", year_month.to_string()),
            ],
        );

        let result = self.find_existing(user_id, year_month).await;
        let budget = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Budget retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Budget retrieved successfully",
            BudgetResponse::from(budget),
        ))
    }

    async fn create_budget(
        &self,
        user_id: i32,
        input: &CreateBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "CreateBudget",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", input.year_month.clone()),
            ],
        );

        info!("Creating budget {} for user {user_id}", input.year_month);

        let result = self.create(user_id, input).await;
        let budget = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Budget created successfully",
        )?;

        Ok(ApiResponse::success(
            "Budget created successfully",
            BudgetResponse::from(budget),
        ))
    }

    async fn update_budget(
        &self,
        user_id: i32,
        year_month: &str,
        input: &UpdateBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateBudget",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", year_month.to_string()),
            ],
        );

        let result: Result<Budget, AppError> = async {
            require_year_month(year_month)?;

            let budget = self
                .repository
                .update(user_id, year_month, input)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Budget for {year_month} not found")))?;

            cache::invalidate_month(&self.cache, user_id, year_month).await;

            Ok(budget)
        }
        .await;

        let budget = self.tracer.finish(
            &tracing_ctx,
            Method::Put,
            result,
            "Budget updated successfully",
        )?;

        Ok(ApiResponse::success(
            "Budget updated successfully",
            BudgetResponse::from(budget),
        ))
    }

    async fn delete_budget(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteBudget",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", year_month.to_string()),
            ],
        );

        let result: Result<(), AppError> = async {
            require_year_month(year_month)?;

            if !self.repository.delete(user_id, year_month).await? {
                return Err(AppError::NotFound(format!(
                    "Budget for {year_month} not found"
                )));
            }

            cache::invalidate_month(&self.cache, user_id, year_month).await;

            Ok(())
        }
        .await;

        self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Budget deleted successfully",
        )?;

        Ok(MessageResponse::success("Budget deleted successfully"))
    }

    async fn copy_budget(
        &self,
        user_id: i32,
        year_month: &str,
        input: &CopyBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "CopyBudget",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("source", year_month.to_string()),
                KeyValue::new("target", input.target_year_month.clone()),
            ],
        );

        let result: Result<Budget, AppError> = async {
            require_year_month(&input.target_year_month)?;

            if input.target_year_month == year_month {
                return Err(AppError::BadRequest(
                    "Target month must differ from the source month".to_string(),
                ));
            }

            let source = self.find_existing(user_id, year_month).await?;

            let request = CreateBudgetRequest {
                year_month: input.target_year_month.clone(),
                income: source.income.0,
                expenses: source.expenses.0,
                savings_allocation: source.savings_allocation.0,
            };

            self.create(user_id, &request).await
        }
        .await;

        let budget = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Budget copied successfully",
        )?;

        Ok(ApiResponse::success(
            "Budget copied successfully",
            BudgetResponse::from(budget),
        ))
    }

    async fn get_summary(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<BudgetSummaryResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetBudgetSummary",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", year_month.to_string()),
            ],
        );

        let result = self.summary(user_id, year_month).await;
        let summary = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Budget summary retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Budget summary retrieved successfully",
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{MockBudgetRepositoryTrait, MockNotificationServiceTrait};
    use axum::http::StatusCode;
    use sqlx::types::Json;

    fn amounts(entries: &[(&str, i64)]) -> CategoryAmounts {
        entries
            .iter()
            .map(|(name, amount)| (name.to_string(), *amount))
            .collect()
    }

    fn budget(year_month: &str) -> Budget {
        Budget {
            budget_id: 1,
            user_id: 1,
            year_month: year_month.to_string(),
            income: Json(amounts(&[("Salary", 10_000_000)])),
            expenses: Json(amounts(&[("Food", 2_000_000), ("Rent", 3_000_000)])),
            savings_allocation: Json(amounts(&[("Emergency", 1_000_000)])),
            created_at: None,
            updated_at: None,
        }
    }

    fn service(
        repo: MockBudgetRepositoryTrait,
        notifications: MockNotificationServiceTrait,
    ) -> BudgetService {
        BudgetService::new(
            Arc::new(repo),
            Arc::new(notifications),
            CacheStore::in_memory(),
            Arc::new(Metrics::new()),
        )
    }

    #[test]
    fn summary_computes_totals_and_shares() {
        let summary = summarize_budget(&budget("2025-01")).unwrap();

        assert_eq!(summary.total_income, 10_000_000);
        assert_eq!(summary.total_expenses, 5_000_000);
        assert_eq!(summary.total_savings, 1_000_000);
        assert_eq!(summary.remaining, 4_000_000);
        assert_eq!(summary.expenses_percentage, 50.0);
        assert_eq!(summary.savings_percentage, 10.0);
        assert_eq!(summary.remaining_percentage, 40.0);
        assert_eq!(summary.expenses[0].category, "Food");
        assert_eq!(summary.expenses[0].percentage_of_income, 20.0);
    }

    #[test]
    fn summary_without_income_has_zero_percentages() {
        let mut empty = budget("2025-01");
        empty.income = Json(CategoryAmounts::new());

        let summary = summarize_budget(&empty).unwrap();

        assert_eq!(summary.remaining, -6_000_000);
        assert_eq!(summary.expenses_percentage, 0.0);
        assert_eq!(summary.remaining_percentage, 0.0);
    }

    #[test]
    fn summary_of_oversized_amounts_is_bad_request() {
        let mut huge = budget("2025-01");
        huge.income = Json(amounts(&[("Salary", i64::MAX), ("Bonus", 1)]));

        let err = summarize_budget(&huge).unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_month_is_conflict() {
        let mut repo = MockBudgetRepositoryTrait::new();
        repo.expect_create().returning(|_, input| {
            Err(AppError::Conflict(format!(
                "Budget for {} already exists",
                input.year_month
            )))
        });

        let mut notifications = MockNotificationServiceTrait::new();
        notifications.expect_notify().never();

        let input = CreateBudgetRequest {
            year_month: "2025-01".into(),
            income: amounts(&[("Salary", 1)]),
            expenses: CategoryAmounts::new(),
            savings_allocation: CategoryAmounts::new(),
        };

        let err = service(repo, notifications)
            .create_budget(1, &input)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message, "Budget for 2025-01 already exists");
    }

    #[tokio::test]
    async fn create_emits_budget_notification() {
        let mut repo = MockBudgetRepositoryTrait::new();
        repo.expect_create()
            .returning(|_, input| Ok(budget(&input.year_month)));

        let mut notifications = MockNotificationServiceTrait::new();
        notifications
            .expect_notify()
            .withf(|user_id, kind, _, message| {
                *user_id == 1 && *kind == NotificationKind::Budget && message.contains("2025-02")
            })
            .times(1)
            .returning(|_, _, _, _| ());

        let input = CreateBudgetRequest {
            year_month: "2025-02".into(),
            income: amounts(&[("Salary", 1)]),
            expenses: CategoryAmounts::new(),
            savings_allocation: CategoryAmounts::new(),
        };

        let response = service(repo, notifications)
            .create_budget(1, &input)
            .await
            .unwrap();

        assert_eq!(response.data.year_month, "2025-02");
    }

    #[tokio::test]
    async fn copy_requires_existing_source() {
        let mut repo = MockBudgetRepositoryTrait::new();
        repo.expect_find_by_month().returning(|_, _| Ok(None));
        repo.expect_create().never();

        let input = CopyBudgetRequest {
            target_year_month: "2025-03".into(),
        };

        let err = service(repo, MockNotificationServiceTrait::new())
            .copy_budget(1, "2025-02", &input)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn copy_reuses_source_amounts() {
        let mut repo = MockBudgetRepositoryTrait::new();
        repo.expect_find_by_month()
            .returning(|_, year_month| Ok(Some(budget(year_month))));
        repo.expect_create()
            .withf(|_, input| {
                input.year_month == "2025-03" && input.expenses.get("Rent") == Some(&3_000_000)
            })
            .returning(|_, input| Ok(budget(&input.year_month)));

        let mut notifications = MockNotificationServiceTrait::new();
        notifications.expect_notify().returning(|_, _, _, _| ());

        let input = CopyBudgetRequest {
            target_year_month: "2025-03".into(),
        };

        let response = service(repo, notifications)
            .copy_budget(1, "2025-02", &input)
            .await
            .unwrap();

        assert_eq!(response.data.year_month, "2025-03");
    }

    #[tokio::test]
    async fn summary_is_served_from_cache_on_second_read() {
        let mut repo = MockBudgetRepositoryTrait::new();
        repo.expect_find_by_month()
            .times(1)
            .returning(|_, year_month| Ok(Some(budget(year_month))));

        let service = service(repo, MockNotificationServiceTrait::new());

        let first = service.get_summary(1, "2025-01").await.unwrap();
        let second = service.get_summary(1, "2025-01").await.unwrap();

        assert_eq!(first.data, second.data);
    }

    #[tokio::test]
    async fn malformed_month_is_bad_request() {
        let err = service(
            MockBudgetRepositoryTrait::new(),
            MockNotificationServiceTrait::new(),
        )
        .get_budget(1, "2025-13")
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
