use crate::{
    abstract_trait::{AssetServiceTrait, DynAssetRepository},
    cache::{CacheStore, keys},
    domain::{
        request::{CreateAssetRequest, FindAllAssetRequest, UpdateAssetRequest, normalize_page},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            asset::{AssetCategoryTotal, AssetResponse, AssetSummaryResponse},
            pagination::Pagination,
        },
    },
    model::asset::{Asset, AssetType},
    utils::{AppError, Method, Metrics, ServiceTracer, checked_add},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tracing::info;

const SUMMARY_TTL: Duration = Duration::from_secs(5 * 60);

/// Net worth split by liquidity, with per-category totals largest first.
pub fn summarize_assets(assets: &[Asset]) -> Result<AssetSummaryResponse, AppError> {
    let mut liquid_total = 0;
    let mut non_liquid_total = 0;
    let mut categories: BTreeMap<&str, i64> = BTreeMap::new();

    for asset in assets {
        match asset.asset_type.parse::<AssetType>() {
            Ok(AssetType::Liquid) => liquid_total = checked_add(liquid_total, asset.value)?,
            _ => non_liquid_total = checked_add(non_liquid_total, asset.value)?,
        }

        let total = categories.entry(asset.category.as_str()).or_default();
        *total = checked_add(*total, asset.value)?;
    }

    let mut categories: Vec<AssetCategoryTotal> = categories
        .into_iter()
        .map(|(category, total)| AssetCategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    Ok(AssetSummaryResponse {
        liquid_total,
        non_liquid_total,
        net_worth: checked_add(liquid_total, non_liquid_total)?,
        count: assets.len() as i64,
        categories,
    })
}

#[derive(Clone)]
pub struct AssetService {
    repository: DynAssetRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl AssetService {
    pub fn new(repository: DynAssetRepository, cache: CacheStore, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            cache,
            tracer: ServiceTracer::new("asset-service", metrics),
        }
    }

    async fn summary(&self, user_id: i32) -> Result<AssetSummaryResponse, AppError> {
        let key = keys::asset_summary(user_id);

        if let Some(summary) = self.cache.get_from_cache::<AssetSummaryResponse>(&key).await {
            return Ok(summary);
        }

        let assets = self.repository.find_all_by_user(user_id).await?;
        let summary = summarize_assets(&assets)?;

        self.cache.set_to_cache(&key, &summary, SUMMARY_TTL).await;

        Ok(summary)
    }

    async fn invalidate(&self, user_id: i32) {
        self.cache
            .delete_from_cache(&keys::asset_summary(user_id))
            .await;
    }
}

#[async_trait]
impl AssetServiceTrait for AssetService {
    async fn get_assets(
        &self,
        user_id: i32,
        req: &FindAllAssetRequest,
    ) -> Result<ApiResponsePagination<Vec<AssetResponse>>, ErrorResponse> {
        let (page, page_size) = normalize_page(req.page, req.page_size);

        let tracing_ctx = self.tracer.start_tracing(
            "GetAssets",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("page", page.to_string()),
            ],
        );

        let result = self
            .repository
            .find_all(user_id, req.asset_type, page, page_size)
            .await;
        let (assets, total) = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Assets retrieved successfully",
        )?;

        Ok(ApiResponsePagination::success(
            "Assets retrieved successfully",
            assets.into_iter().map(AssetResponse::from).collect(),
            Pagination::new(page, page_size, total),
        ))
    }

    async fn get_asset(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetAsset",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("asset_id", id.to_string()),
            ],
        );

        let result = match self.repository.find_by_id(user_id, id).await {
            Ok(Some(asset)) => Ok(asset),
            Ok(None) => Err(AppError::NotFound(format!("Asset {id} not found"))),
            Err(err) => Err(err),
        };

        let asset = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Asset retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Asset retrieved successfully",
            AssetResponse::from(asset),
        ))
    }

    async fn create_asset(
        &self,
        user_id: i32,
        input: &CreateAssetRequest,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "CreateAsset",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("asset_type", input.asset_type.as_str()),
            ],
        );

        info!("Creating asset '{}' for user {user_id}", input.name);

        let result = self.repository.create(user_id, input).await;
        if result.is_ok() {
            self.invalidate(user_id).await;
        }

        let asset = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Asset created successfully",
        )?;

        Ok(ApiResponse::success(
            "Asset created successfully",
            AssetResponse::from(asset),
        ))
    }

    async fn update_asset(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateAssetRequest,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateAsset",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("asset_id", id.to_string()),
            ],
        );

        let result = match self.repository.update(user_id, id, input).await {
            Ok(Some(asset)) => {
                self.invalidate(user_id).await;
                Ok(asset)
            }
            Ok(None) => Err(AppError::NotFound(format!("Asset {id} not found"))),
            Err(err) => Err(err),
        };

        let asset = self.tracer.finish(
            &tracing_ctx,
            Method::Put,
            result,
            "Asset updated successfully",
        )?;

        Ok(ApiResponse::success(
            "Asset updated successfully",
            AssetResponse::from(asset),
        ))
    }

    async fn delete_asset(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<AssetSummaryResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteAsset",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("asset_id", id.to_string()),
            ],
        );

        let result: Result<AssetSummaryResponse, AppError> = async {
            if !self.repository.delete(user_id, id).await? {
                return Err(AppError::NotFound(format!("Asset {id} not found")));
            }

            self.invalidate(user_id).await;
            self.summary(user_id).await
        }
        .await;

        let summary = self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Asset deleted successfully",
        )?;

        Ok(ApiResponse::success("Asset deleted successfully", summary))
    }

    async fn get_summary(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<AssetSummaryResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetAssetSummary",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.summary(user_id).await;
        let summary = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Asset summary retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Asset summary retrieved successfully",
            summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::MockAssetRepositoryTrait;
    use axum::http::StatusCode;

    fn asset(id: i32, asset_type: &str, category: &str, value: i64) -> Asset {
        Asset {
            asset_id: id,
            user_id: 1,
            name: format!("asset-{id}"),
            asset_type: asset_type.into(),
            category: category.into(),
            value,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn summary_splits_liquidity() {
        let assets = vec![
            asset(1, "liquid", "Cash", 5_000_000),
            asset(2, "non_liquid", "Property", 500_000_000),
            asset(3, "liquid", "Cash", 1_000_000),
        ];

        let summary = summarize_assets(&assets).unwrap();

        assert_eq!(summary.liquid_total, 6_000_000);
        assert_eq!(summary.non_liquid_total, 500_000_000);
        assert_eq!(summary.net_worth, 506_000_000);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.categories[0].category, "Property");
        assert_eq!(summary.categories[1].total, 6_000_000);
    }

    #[test]
    fn net_worth_past_i64_is_bad_request() {
        let assets = vec![
            asset(1, "liquid", "Cash", i64::MAX),
            asset(2, "non_liquid", "Property", 1),
        ];

        let err = summarize_assets(&assets).unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_returns_recomputed_summary() {
        let mut repo = MockAssetRepositoryTrait::new();
        repo.expect_delete()
            .withf(|user_id, id| *user_id == 1 && *id == 2)
            .returning(|_, _| Ok(true));
        repo.expect_find_all_by_user()
            .returning(|_| Ok(vec![asset(1, "liquid", "Cash", 5_000_000)]));

        let service = AssetService::new(
            Arc::new(repo),
            CacheStore::in_memory(),
            Arc::new(Metrics::new()),
        );

        let response = service.delete_asset(1, 2).await.unwrap();

        assert_eq!(response.data.net_worth, 5_000_000);
        assert_eq!(response.data.count, 1);
    }

    #[tokio::test]
    async fn deleting_missing_asset_is_not_found() {
        let mut repo = MockAssetRepositoryTrait::new();
        repo.expect_delete().returning(|_, _| Ok(false));
        repo.expect_find_all_by_user().never();

        let service = AssetService::new(
            Arc::new(repo),
            CacheStore::in_memory(),
            Arc::new(Metrics::new()),
        );

        let err = service.delete_asset(1, 2).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stale_summary_is_dropped_after_create() {
        let mut repo = MockAssetRepositoryTrait::new();
        repo.expect_find_all_by_user()
            .times(2)
            .returning(|_| Ok(vec![asset(1, "liquid", "Cash", 100)]));
        repo.expect_create()
            .returning(|_, input| Ok(asset(2, input.asset_type.as_str(), &input.category, input.value)));

        let service = AssetService::new(
            Arc::new(repo),
            CacheStore::in_memory(),
            Arc::new(Metrics::new()),
        );

        service.get_summary(1).await.unwrap();
        service.get_summary(1).await.unwrap();

        let input = CreateAssetRequest {
            name: "Gold".into(),
            asset_type: AssetType::NonLiquid,
            category: "Gold".into(),
            value: 10,
            description: None,
        };
        service.create_asset(1, &input).await.unwrap();
        service.get_summary(1).await.unwrap();
    }
}
