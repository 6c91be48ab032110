use axum::extract::State;
use axum::Json as JsonResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::AuthData;
use crate::types::response::Login;
use crate::utils::extract::Json;

#[instrument(skip_all, fields(action = %data.action))]
pub(crate) async fn user(
    State(state): State<AppState>,
    Json(data): Json<AuthData>,
) -> Result<JsonResponse<Login>, Error> {
    let login = match data.action.as_str() {
        "signup" => state.user_controller.signup(&data).await?,
        "login" => {
            state
                .user_controller
                .login(&data.email, &data.password)
                .await?
        }
        _ => {
            return Err(Error::Validation(
                "action must be 'signup' or 'login'".into(),
            ));
        }
    };

    Ok(JsonResponse(login))
}
