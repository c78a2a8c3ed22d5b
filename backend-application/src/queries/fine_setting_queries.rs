use crate::AppState;
use backend_domain::FineSetting;

pub async fn list_fine_settings(state: &AppState) -> Vec<FineSetting> {
    state.fine_settings.read().await.to_sorted_vec()
}
