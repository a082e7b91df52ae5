use tracing::info;

use crate::app_state::AppState;
use crate::domain::perf::service::range_bucket::resolve_timerange;
use crate::core::util::time_util::TimeUtil;

/// Runs only when in PERFGRAPH_DEBUG_MODE
pub async fn run_debug(state: &AppState) {
    info!("🔧 Debug mode: running debug tasks...");

    info!(config = ?state.config, "effective configuration");

    let domain = state.perf_graph_service.default_time_domain();
    let timerange = resolve_timerange(domain.min, TimeUtil::today(), state.config.timerange_policy);
    info!(min = %domain.min, max = %domain.max, ?timerange, "default time domain");

    info!("Debug tasks completed. Exiting...");
}
