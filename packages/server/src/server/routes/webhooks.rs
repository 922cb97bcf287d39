use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::webhooks::{WebhookEvent, WebhookSubscription};
use crate::server::app::AppState;
use crate::server::error::{respond, ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub url: Option<String>,
    pub events: Option<Vec<WebhookEvent>>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    message: &'static str,
    subscription: WebhookSubscription,
}

#[derive(Serialize)]
pub struct UnsubscribeResponse {
    message: &'static str,
    removed: bool,
}

#[derive(Serialize)]
pub struct SubscriptionList {
    subscriptions: Vec<WebhookSubscription>,
    total: usize,
}

pub async fn subscribe_webhook_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> ApiResult<SubscribeResponse> {
    let Json(request) = payload?;
    let (Some(url), Some(events)) = (request.url.filter(|u| !u.trim().is_empty()), request.events)
    else {
        return Err(ApiError::bad_request("Missing required fields: url, events"));
    };

    let subscription = state.webhooks.subscribe(url.trim(), events);
    respond(SubscribeResponse {
        message: "Webhook subscribed successfully",
        subscription,
    })
}

pub async fn unsubscribe_webhook_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> ApiResult<UnsubscribeResponse> {
    let Json(request) = payload?;
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::bad_request("Missing required field: url"));
    };

    let removed = state.webhooks.unsubscribe(url.trim());
    respond(UnsubscribeResponse {
        message: if removed {
            "Webhook unsubscribed"
        } else {
            "Webhook not found"
        },
        removed,
    })
}

pub async fn list_webhooks_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<SubscriptionList> {
    let subscriptions = state.webhooks.list();
    respond(SubscriptionList {
        total: subscriptions.len(),
        subscriptions,
    })
}
