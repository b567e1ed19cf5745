use crate::{
    abstract_trait::{DynBudgetRepository, DynSpendingRepository, ReportServiceTrait},
    cache::{CacheStore, keys},
    domain::response::{
        ApiResponse, ErrorResponse,
        report::{CategoryComparison, MonthRow, MonthlyReportResponse, YearlyReportResponse},
    },
    model::{
        budget::Budget,
        spending::{CategoryType, Spending},
    },
    utils::{
        AppError, Method, Metrics, ServiceTracer, checked_add, checked_sub, checked_total,
        months_of_year, percentage, require_year_month, round2,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::{collections::BTreeMap, sync::Arc, time::Duration};

const REPORT_TTL: Duration = Duration::from_secs(5 * 60);

fn comparison(
    category: &str,
    budgeted: i64,
    actual: i64,
) -> Result<CategoryComparison, AppError> {
    Ok(CategoryComparison {
        category: category.to_string(),
        budgeted,
        actual,
        variance: checked_sub(budgeted, actual)?,
        usage_percentage: percentage(actual, budgeted),
        over_budget: actual > budgeted,
    })
}

/// Budget against actual spending for one month. Spending typed as
/// savings counts towards `actual_savings`, everything else is compared
/// with the expense plan.
pub fn build_monthly_report(
    year_month: &str,
    budget: Option<&Budget>,
    spendings: &[Spending],
) -> Result<MonthlyReportResponse, AppError> {
    let mut actual_by_category: BTreeMap<&str, i64> = BTreeMap::new();
    let mut actual_savings = 0;

    for spending in spendings {
        if spending.category_type.parse::<CategoryType>() == Ok(CategoryType::Savings) {
            actual_savings = checked_add(actual_savings, spending.amount)?;
        } else {
            let actual = actual_by_category.entry(spending.category.as_str()).or_default();
            *actual = checked_add(*actual, spending.amount)?;
        }
    }

    let (categories, total_income, savings_allocation_total) = match budget {
        Some(budget) => (
            budget
                .expenses
                .iter()
                .map(|(category, budgeted)| {
                    let actual = actual_by_category
                        .get(category.as_str())
                        .copied()
                        .unwrap_or(0);
                    comparison(category, *budgeted, actual)
                })
                .collect::<Result<Vec<_>, _>>()?,
            budget.total_income()?,
            budget.total_savings()?,
        ),
        None => (Vec::new(), 0, 0),
    };

    let unbudgeted = actual_by_category
        .iter()
        .filter(|(category, _)| !budget.is_some_and(|b| b.expenses.contains_key(**category)))
        .map(|(category, actual)| comparison(category, 0, *actual))
        .collect::<Result<Vec<CategoryComparison>, _>>()?;

    let total_budgeted = match budget {
        Some(budget) => budget.total_expenses()?,
        None => 0,
    };
    let total_actual = checked_total(actual_by_category.values().copied())?;

    Ok(MonthlyReportResponse {
        year_month: year_month.to_string(),
        has_budget: budget.is_some(),
        total_income,
        savings_allocation_total,
        actual_savings,
        total_budgeted,
        total_actual,
        total_variance: checked_sub(total_budgeted, total_actual)?,
        categories,
        unbudgeted,
    })
}

/// Twelve month rows for `year`; months without data are zero.
pub fn build_yearly_report(
    year: i32,
    budgets: &[Budget],
    monthly_spending: &[(String, i64)],
) -> Result<YearlyReportResponse, AppError> {
    let mut months: Vec<MonthRow> = Vec::with_capacity(12);

    for year_month in months_of_year(year) {
        let budget = budgets.iter().find(|b| b.year_month == year_month);
        let (budgeted_income, budgeted_expenses) = match budget {
            Some(budget) => (budget.total_income()?, budget.total_expenses()?),
            None => (0, 0),
        };
        let actual_spending = checked_total(
            monthly_spending
                .iter()
                .filter(|(month, _)| *month == year_month)
                .map(|(_, total)| *total),
        )?;

        months.push(MonthRow {
            year_month,
            budgeted_income,
            budgeted_expenses,
            actual_spending,
            net: checked_sub(budgeted_income, actual_spending)?,
        });
    }

    let total_actual_spending = checked_total(months.iter().map(|m| m.actual_spending))?;
    let active_months = months.iter().filter(|m| m.actual_spending > 0).count();
    let average_monthly_spending = if active_months == 0 {
        0.0
    } else {
        round2(total_actual_spending as f64 / active_months as f64)
    };

    Ok(YearlyReportResponse {
        year,
        total_budgeted_income: checked_total(months.iter().map(|m| m.budgeted_income))?,
        total_budgeted_expenses: checked_total(months.iter().map(|m| m.budgeted_expenses))?,
        total_actual_spending,
        total_net: checked_total(months.iter().map(|m| m.net))?,
        average_monthly_spending,
        months,
    })
}

#[derive(Clone)]
pub struct ReportService {
    budgets: DynBudgetRepository,
    spendings: DynSpendingRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl ReportService {
    pub fn new(
        budgets: DynBudgetRepository,
        spendings: DynSpendingRepository,
        cache: CacheStore,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            budgets,
            spendings,
            cache,
            tracer: ServiceTracer::new("report-service", metrics),
        }
    }

    async fn monthly(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<MonthlyReportResponse, AppError> {
        require_year_month(year_month)?;

        let key = keys::monthly_report(user_id, year_month);
        if let Some(report) = self.cache.get_from_cache::<MonthlyReportResponse>(&key).await {
            return Ok(report);
        }

        let budget = self.budgets.find_by_month(user_id, year_month).await?;
        let spendings = self.spendings.find_by_month(user_id, year_month).await?;
        let report = build_monthly_report(year_month, budget.as_ref(), &spendings)?;

        self.cache.set_to_cache(&key, &report, REPORT_TTL).await;

        Ok(report)
    }

    async fn yearly(&self, user_id: i32, year: i32) -> Result<YearlyReportResponse, AppError> {
        if !(1900..=9999).contains(&year) {
            return Err(AppError::BadRequest(format!("Invalid year {year}")));
        }

        let key = keys::yearly_report(user_id, year);
        if let Some(report) = self.cache.get_from_cache::<YearlyReportResponse>(&key).await {
            return Ok(report);
        }

        let budgets = self.budgets.find_by_year(user_id, year).await?;
        let monthly = self.spendings.monthly_totals(user_id, year).await?;
        let report = build_yearly_report(year, &budgets, &monthly)?;

        self.cache.set_to_cache(&key, &report, REPORT_TTL).await;

        Ok(report)
    }
}

#[async_trait]
impl ReportServiceTrait for ReportService {
    async fn monthly_report(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<MonthlyReportResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "MonthlyReport",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year_month", year_month.to_string()),
            ],
        );

        let result = self.monthly(user_id, year_month).await;
        let report = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Monthly report generated successfully",
        )?;

        Ok(ApiResponse::success(
            "Monthly report generated successfully",
            report,
        ))
    }

    async fn yearly_report(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<ApiResponse<YearlyReportResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "YearlyReport",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("year", year.to_string()),
            ],
        );

        let result = self.yearly(user_id, year).await;
        let report = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Yearly report generated successfully",
        )?;

        Ok(ApiResponse::success(
            "Yearly report generated successfully",
            report,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{MockBudgetRepositoryTrait, MockSpendingRepositoryTrait},
        model::budget::CategoryAmounts,
    };
    use chrono::NaiveDate;
    use sqlx::types::Json;

    fn budget(year_month: &str, income: i64, expenses: &[(&str, i64)]) -> Budget {
        let mut income_map = CategoryAmounts::new();
        income_map.insert("Salary".into(), income);

        let mut savings = CategoryAmounts::new();
        savings.insert("Emergency".into(), 500_000);

        Budget {
            budget_id: 1,
            user_id: 1,
            year_month: year_month.into(),
            income: Json(income_map),
            expenses: Json(
                expenses
                    .iter()
                    .map(|(name, amount)| (name.to_string(), *amount))
                    .collect(),
            ),
            savings_allocation: Json(savings),
            created_at: None,
            updated_at: None,
        }
    }

    fn spending(category: &str, category_type: &str, amount: i64) -> Spending {
        Spending {
            spending_id: 1,
            user_id: 1,
            spent_at: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
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

    #[test]
    fn monthly_report_compares_budget_and_actual() {
        let budget = budget("2025-01", 10_000_000, &[("Food", 2_000_000), ("Rent", 3_000_000)]);
        let spendings = vec![
            spending("Food", "needs", 2_500_000),
            spending("Rent", "needs", 3_000_000),
            spending("Games", "wants", 200_000),
            spending("Emergency", "savings", 400_000),
        ];

        let report = build_monthly_report("2025-01", Some(&budget), &spendings).unwrap();

        assert!(report.has_budget);
        assert_eq!(report.total_income, 10_000_000);
        assert_eq!(report.savings_allocation_total, 500_000);
        assert_eq!(report.actual_savings, 400_000);
        assert_eq!(report.total_budgeted, 5_000_000);
        assert_eq!(report.total_actual, 5_700_000);
        assert_eq!(report.total_variance, -700_000);

        let food = &report.categories[0];
        assert_eq!(food.category, "Food");
        assert_eq!(food.variance, -500_000);
        assert_eq!(food.usage_percentage, 125.0);
        assert!(food.over_budget);
        assert!(!report.categories[1].over_budget);

        assert_eq!(report.unbudgeted.len(), 1);
        assert_eq!(report.unbudgeted[0].category, "Games");
    }

    #[test]
    fn missing_budget_yields_zero_budgets() {
        let report =
            build_monthly_report("2025-01", None, &[spending("Food", "needs", 100)]).unwrap();

        assert!(!report.has_budget);
        assert!(report.categories.is_empty());
        assert_eq!(report.total_budgeted, 0);
        assert_eq!(report.unbudgeted[0].budgeted, 0);
        assert_eq!(report.unbudgeted[0].usage_percentage, 0.0);
    }

    #[test]
    fn spending_past_i64_is_bad_request() {
        let spendings = vec![
            spending("Food", "needs", i64::MAX),
            spending("Food", "needs", 1),
        ];

        let err = build_monthly_report("2025-01", None, &spendings).unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn yearly_report_averages_active_months() {
        let budgets = vec![
            budget("2025-01", 10_000_000, &[("Food", 2_000_000)]),
            budget("2025-02", 10_000_000, &[("Food", 2_000_000)]),
        ];
        let monthly = vec![
            ("2025-01".to_string(), 3_000_000),
            ("2025-03".to_string(), 1_000_000),
        ];

        let report = build_yearly_report(2025, &budgets, &monthly).unwrap();

        assert_eq!(report.months.len(), 12);
        assert_eq!(report.months[0].net, 7_000_000);
        assert_eq!(report.months[1].actual_spending, 0);
        assert_eq!(report.months[2].net, -1_000_000);
        assert_eq!(report.total_budgeted_income, 20_000_000);
        assert_eq!(report.total_actual_spending, 4_000_000);
        assert_eq!(report.total_net, 16_000_000);
        assert_eq!(report.average_monthly_spending, 2_000_000.0);
    }

    #[tokio::test]
    async fn reports_are_cached_per_period() {
        let mut budgets = MockBudgetRepositoryTrait::new();
        budgets.expect_find_by_month().times(1).returning(|_, _| Ok(None));

        let mut spendings = MockSpendingRepositoryTrait::new();
        spendings.expect_find_by_month().times(1).returning(|_, _| Ok(vec![]));

        let service = ReportService::new(
            Arc::new(budgets),
            Arc::new(spendings),
            CacheStore::in_memory(),
            Arc::new(Metrics::new()),
        );

        service.monthly_report(1, "2025-01").await.unwrap();
        let cached = service.monthly_report(1, "2025-01").await.unwrap();

        assert_eq!(cached.data.year_month, "2025-01");
    }
}
