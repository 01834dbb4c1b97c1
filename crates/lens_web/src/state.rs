use lens_client::ResearchApi;
use lens_view::RefetchPolicy;

pub struct AppState {
    pub api: ResearchApi,
    pub topics_policy: RefetchPolicy,
}
