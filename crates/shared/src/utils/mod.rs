mod di;
mod errors;
mod logger;
mod metrics;
mod money;
mod period;
mod telemetry;
mod token;
mod tracing_context;

pub use self::di::DependenciesInject;
pub use self::errors::{AppError, describe_validation_errors};
pub use self::logger::init_logger;
pub use self::metrics::{Method, MethodLabels, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::money::{MAX_AMOUNT, checked_add, checked_sub, checked_total};
pub use self::period::{
    months_of_year, parse_year_month, percentage, require_year_month, round2, validate_year_month,
    year_month_of,
};
pub use self::telemetry::Telemetry;
pub use self::token::{random_token, sha256_hex};
pub use self::tracing_context::{ServiceTracer, TracingContext};
