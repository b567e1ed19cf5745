use crate::{
    abstract_trait::{
        DynBudgetRepository, DynNotificationService, DynSettingsRepository,
        DynSpendingRepository, SpendingServiceTrait,
    },
    cache::{self, CacheStore},
    domain::{
        request::{
            CreateSpendingRequest, FindAllSpendingRequest, SpendingSummaryQuery,
            UpdateSpendingRequest, normalize_page,
        },
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            pagination::Pagination,
            spending::{CategoryTotal, SpendingResponse, SpendingSummaryResponse, TypeTotal},
        },
    },
    model::{
        notification::NotificationKind,
        spending::{CategoryType, Spending},
    },
    utils::{
        AppError, Method, Metrics, ServiceTracer, checked_add, checked_sub, checked_total,
        require_year_month,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{error, info};

/// Month totals with categories ordered by amount, largest first.
pub fn summarize_spending(
    year_month: &str,
    spendings: &[Spending],
) -> Result<SpendingSummaryResponse, AppError> {
    let mut categories: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    let mut by_type: BTreeMap<&str, i64> = BTreeMap::new();

    for spending in spendings {
        let entry = categories.entry(spending.category.as_str()).or_default();
        entry.0 = checked_add(entry.0, spending.amount)?;
        entry.1 += 1;

        let type_total = by_type.entry(spending.category_type.as_str()).or_default();
        *type_total = checked_add(*type_total, spending.amount)?;
    }

    let mut categories: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    let type_order = |name: &str| {
        name.parse::<CategoryType>()
            .map(|t| t as u8)
            .unwrap_or(u8::MAX)
    };
    let mut by_type: Vec<TypeTotal> = by_type
        .into_iter()
        .map(|(category_type, total)| TypeTotal {
            category_type: category_type.to_string(),
            total,
        })
        .collect();
    by_type.sort_by_key(|t| type_order(&t.category_type));

    Ok(SpendingSummaryResponse {
        year_month: year_month.to_string(),
        total: checked_total(spendings.iter().map(|s| s.amount))?,
        count: spendings.len() as i64,
        categories,
        by_type,
    })
}

/// Whether a category total moving from `previous` to `current` reaches
/// `threshold` percent of `budgeted` for the first time.
pub fn crosses_threshold(previous: i64, current: i64, budgeted: i64, threshold: i32) -> bool {
    if budgeted <= 0 || threshold <= 0 {
        return false;
    }

    let limit = budgeted as i128 * threshold as i128;

    (previous as i128) * 100 < limit && (current as i128) * 100 >= limit
}

#[derive(Clone)]
pub struct SpendingService {
    repository: DynSpendingRepository,
    budgets: DynBudgetRepository,
    settings: DynSettingsRepository,
    notifications: DynNotificationService,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl SpendingService {
    pub fn new(
        repository: DynSpendingRepository,
        budgets: DynBudgetRepository,
        settings: DynSettingsRepository,
        notifications: DynNotificationService,
        cache: CacheStore,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            budgets,
            settings,
            notifications,
            cache,
            tracer: ServiceTracer::new("spending-service", metrics),
        }
    }

    async fn check_budget_alert(&self, spending: &Spending) -> Result<(), AppError> {
        let user_id = spending.user_id;
        let settings = self.settings.find_or_create(user_id).await?;

        if !settings.budget_alerts {
            return Ok(());
        }

        let Some(budget) = self
            .budgets
            .find_by_month(user_id, &spending.year_month)
            .await?
        else {
            return Ok(());
        };

        let budgeted = match spending.category_type.parse::<CategoryType>() {
            Ok(CategoryType::Savings) => budget
                .savings_allocation
                .get(&spending.category)
                .or_else(|| budget.expenses.get(&spending.category)),
            _ => budget.expenses.get(&spending.category),
        };

        let Some(&budgeted) = budgeted else {
            return Ok(());
        };

        let current = self
            .repository
            .category_total(user_id, &spending.year_month, &spending.category)
            .await?;
        let previous = checked_sub(current, spending.amount)?;

        if crosses_threshold(previous, current, budgeted, settings.alert_threshold) {
            info!(
                "Category {} of user {user_id} reached {}% of its budget",
                spending.category, settings.alert_threshold
            );

            self.notifications
                .notify(
                    user_id,
                    NotificationKind::BudgetAlert,
                    &format!("Budget alert: {}", spending.category),
                    &format!(
                        "You have spent {current} of {budgeted} budgeted for {} in {}, reaching your {}% alert threshold.",
                        spending.category, spending.year_month, settings.alert_threshold
                    ),
                )
                .await;
        }

        Ok(())
    }
}

#[async_trait]
impl SpendingServiceTrait for SpendingService {
    async fn get_spendings(
        &self,
        user_id: i32,
        req: &FindAllSpendingRequest,
    ) -> Result<ApiResponsePagination<Vec<SpendingResponse>>, ErrorResponse> {
        let (page, page_size) = normalize_page(req.page, req.page_size);

        let tracing_ctx = self.tracer.start_tracing(
            "GetSpendings",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("page", page.to_string()),
            ],
        );

        let result = self.repository.find_all(user_id, req).await;
        let (spendings, total) = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Spending retrieved successfully",
        )?;

        Ok(ApiResponsePagination::success(
            "Spending retrieved successfully",
            spendings.into_iter().map(SpendingResponse::from).collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    async fn get_spending(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetSpending",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("spending_id", id.to_string()),
            ],
        );

        let result = match self.repository.find_by_id(user_id, id).await {
            Ok(Some(spending)) => Ok(spending),
            Ok(None) => Err(AppError::NotFound(format!("Spending {id} not found"))),
            Err(err) => Err(err),
        };

        let spending = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Spending retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Spending retrieved successfully",
            SpendingResponse::from(spending),
        ))
    }

    async fn create_spending(
        &self,
        user_id: i32,
        input: &CreateSpendingRequest,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreateSpending",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("category", input.category.clone()),
            ],
        );

        let spending = match self.repository.create(user_id, input).await {
            Ok(spending) => spending,
            Err(err) => {
                error!("Failed to record spending for user {user_id}: {err}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &err.to_string());
                return Err(ErrorResponse::from(err));
            }
        };

        cache::invalidate_month(&self.cache, user_id, &spending.year_month).await;

        if let Err(err) = self.check_budget_alert(&spending).await {
            error!(
                "Budget alert check failed for spending {}: {err}",
                spending.spending_id
            );
        }

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Spending created successfully");

        Ok(ApiResponse::success(
            "Spending created successfully",
            SpendingResponse::from(spending),
        ))
    }

    async fn update_spending(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateSpendingRequest,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateSpending",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("spending_id", id.to_string()),
            ],
        );

        let result: Result<Spending, AppError> = async {
            let existing = self
                .repository
                .find_by_id(user_id, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Spending {id} not found")))?;

            let updated = self
                .repository
                .update(user_id, id, input)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Spending {id} not found")))?;

            cache::invalidate_month(&self.cache, user_id, &existing.year_month).await;
            if updated.year_month != existing.year_month {
                cache::invalidate_month(&self.cache, user_id, &updated.year_month).await;
            }

            Ok(updated)
        }
        .await;

        let spending = self.tracer.finish(
            &tracing_ctx,
            Method::Put,
            result,
            "Spending updated successfully",
        )?;

        Ok(ApiResponse::success(
            "Spending updated successfully",
            SpendingResponse::from(spending),
        ))
    }

    async fn delete_spending(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteSpending",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("spending_id", id.to_string()),
            ],
        );

        let result = match self.repository.delete(user_id, id).await {
            Ok(Some(deleted)) => {
                cache::invalidate_month(&self.cache, user_id, &deleted.year_month).await;
                Ok(())
            }
            Ok(None) => Err(AppError::NotFound(format!("Spending {id} not found"))),
            Err(err) => Err(err),
        };

        self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Spending deleted successfully",
        )?;

        Ok(MessageResponse::success("Spending deleted successfully"))
    }

    async fn get_summary(
        &self,
        user_id: i32,
        query: &SpendingSummaryQuery,
    ) -> Result<ApiResponse<SpendingSummaryResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetSpendingSummary",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", query.year_month.clone()),
            ],
        );

        let result: Result<SpendingSummaryResponse, AppError> = async {
            require_year_month(&query.year_month)?;

            let spendings = self
                .repository
                .find_by_month(user_id, &query.year_month)
                .await?;

            summarize_spending(&query.year_month, &spendings)
        }
        .await;

        let summary = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Spending summary retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Spending summary retrieved successfully",
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockBudgetRepositoryTrait, MockNotificationServiceTrait, MockSettingsRepositoryTrait,
            MockSpendingRepositoryTrait,
        },
        model::{
            budget::{Budget, CategoryAmounts},
            settings::UserSettings,
        },
    };
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use sqlx::types::Json;

    fn spending(id: i32, category: &str, category_type: &str, amount: i64) -> Spending {
        Spending {
            spending_id: id,
            user_id: 1,
            spent_at: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            year_month: "2025-01".into(),
            category: category.into(),
            category_type: category_type.into(),
            account: "BCA".into(),
            description: None,
            amount,
            created_at: None,
            updated_at: None,
        }
    }

    fn settings(budget_alerts: bool, alert_threshold: i32) -> UserSettings {
        UserSettings {
            settings_id: 1,
            user_id: 1,
            currency: "IDR".into(),
            language: "id".into(),
            theme: "system".into(),
            email_notifications: true,
            budget_alerts,
            alert_threshold,
            created_at: None,
            updated_at: None,
        }
    }

    fn food_budget(amount: i64) -> Budget {
        let mut expenses = CategoryAmounts::new();
        expenses.insert("Food".into(), amount);

        Budget {
            budget_id: 1,
            user_id: 1,
            year_month: "2025-01".into(),
            income: Json(CategoryAmounts::new()),
            expenses: Json(expenses),
            savings_allocation: Json(CategoryAmounts::new()),
            created_at: None,
            updated_at: None,
        }
    }

    fn create_request(amount: i64) -> CreateSpendingRequest {
        CreateSpendingRequest {
            spent_at: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            category: "Food".into(),
            category_type: CategoryType::Needs,
            account: "BCA".into(),
            description: None,
            amount,
        }
    }

    struct Mocks {
        spending: MockSpendingRepositoryTrait,
        budgets: MockBudgetRepositoryTrait,
        settings: MockSettingsRepositoryTrait,
        notifications: MockNotificationServiceTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                spending: MockSpendingRepositoryTrait::new(),
                budgets: MockBudgetRepositoryTrait::new(),
                settings: MockSettingsRepositoryTrait::new(),
                notifications: MockNotificationServiceTrait::new(),
            }
        }

        fn into_service(self) -> SpendingService {
            SpendingService::new(
                Arc::new(self.spending),
                Arc::new(self.budgets),
                Arc::new(self.settings),
                Arc::new(self.notifications),
                CacheStore::in_memory(),
                Arc::new(Metrics::new()),
            )
        }
    }

    #[test]
    fn summary_past_i64_is_bad_request() {
        let spendings = vec![
            spending(1, "Food", "needs", i64::MAX),
            spending(2, "Food", "needs", 1),
        ];

        let err = summarize_spending("2025-01", &spendings).unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn summary_orders_categories_by_amount() {
        let spendings = vec![
            spending(1, "Food", "needs", 50_000),
            spending(2, "Coffee", "wants", 20_000),
            spending(3, "Food", "needs", 70_000),
            spending(4, "Emergency", "savings", 100_000),
        ];

        let summary = summarize_spending("2025-01", &spendings).unwrap();

        assert_eq!(summary.total, 240_000);
        assert_eq!(summary.count, 4);
        assert_eq!(
            summary.categories[0],
            CategoryTotal {
                category: "Food".into(),
                total: 120_000,
                count: 2
            }
        );
        assert_eq!(summary.categories[1].category, "Emergency");
        assert_eq!(summary.categories[2].category, "Coffee");

        let types: Vec<&str> = summary
            .by_type
            .iter()
            .map(|t| t.category_type.as_str())
            .collect();
        assert_eq!(types, vec!["needs", "wants", "savings"]);
    }

    #[test]
    fn threshold_crossing_fires_once() {
        assert!(crosses_threshold(700, 800, 1000, 80));
        assert!(crosses_threshold(0, 1200, 1000, 80));
        assert!(!crosses_threshold(800, 900, 1000, 80));
        assert!(!crosses_threshold(100, 700, 1000, 80));
        assert!(!crosses_threshold(0, 500, 0, 80));
    }

    #[tokio::test]
    async fn crossing_the_threshold_emits_an_alert() {
        let mut mocks = Mocks::new();
        mocks
            .spending
            .expect_create()
            .returning(|_, input| Ok(spending(9, &input.category, "needs", input.amount)));
        mocks
            .spending
            .expect_category_total()
            .returning(|_, _, _| Ok(850_000));
        mocks
            .settings
            .expect_find_or_create()
            .returning(|_| Ok(settings(true, 80)));
        mocks
            .budgets
            .expect_find_by_month()
            .returning(|_, _| Ok(Some(food_budget(1_000_000))));
        mocks
            .notifications
            .expect_notify()
            .withf(|_, kind, title, _| *kind == NotificationKind::BudgetAlert && title.contains("Food"))
            .times(1)
            .returning(|_, _, _, _| ());

        let response = mocks
            .into_service()
            .create_spending(1, &create_request(100_000))
            .await
            .unwrap();

        assert_eq!(response.data.amount, 100_000);
    }

    #[tokio::test]
    async fn disabled_alerts_skip_the_budget_lookup() {
        let mut mocks = Mocks::new();
        mocks
            .spending
            .expect_create()
            .returning(|_, input| Ok(spending(9, &input.category, "needs", input.amount)));
        mocks
            .settings
            .expect_find_or_create()
            .returning(|_| Ok(settings(false, 80)));
        mocks.budgets.expect_find_by_month().never();
        mocks.notifications.expect_notify().never();

        mocks
            .into_service()
            .create_spending(1, &create_request(900_000))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn alert_failure_does_not_fail_the_write() {
        let mut mocks = Mocks::new();
        mocks
            .spending
            .expect_create()
            .returning(|_, input| Ok(spending(9, &input.category, "needs", input.amount)));
        mocks
            .settings
            .expect_find_or_create()
            .returning(|_| Err(AppError::InternalError("db down".into())));

        assert!(
            mocks
                .into_service()
                .create_spending(1, &create_request(10))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn other_users_rows_are_not_found() {
        let mut mocks = Mocks::new();
        mocks.spending.expect_find_by_id().returning(|_, _| Ok(None));

        let err = mocks.into_service().get_spending(2, 9).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
