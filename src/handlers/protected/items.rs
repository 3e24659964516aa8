// handlers/protected/items.rs - GET/POST /items, GET /items/new

use axum::{
    extract::{Request, State},
    response::Response,
};
use tracing::info;

use crate::api::ItemInput;
use crate::app::AppState;
use crate::config::ItemPolicy;
use crate::database::{with_deadline, Item, User};
use crate::error::AppError;
use crate::middleware::CurrentUser;

/// GET /items - the signed-in user's items, oldest first
pub async fn index(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Response {
    match with_deadline(state.store_deadline, state.items.list_by_owner(user.id)).await {
        Ok(items) => state.presentation.items(&items),
        Err(err) => state.presentation.error(err.into()),
    }
}

/// GET /items/new - the item form
pub async fn new_form(State(state): State<AppState>) -> Response {
    state.presentation.new_item_form()
}

/**
 * POST /items - create an item owned by the signed-in user
 *
 * The owner always comes from the session, never from the body. Price must
 * be an integer no greater than the configured maximum; there is no lower
 * bound.
 */
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    request: Request,
) -> Response {
    let result = match state.presentation.parse_item(request).await {
        Ok(input) => create_item(&state, &user, input).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(item) => state.presentation.created(&item),
        Err(err) => state.presentation.error(err),
    }
}

pub async fn create_item(state: &AppState, owner: &User, input: ItemInput) -> Result<Item, AppError> {
    check_price(&state.policy, input.price)?;

    let item = Item {
        user_id: owner.id,
        name: input.name,
        price: input.price,
    };
    with_deadline(state.store_deadline, state.items.insert(&item)).await?;

    info!("User {} created item '{}' at {}", owner.id, item.name, item.price);
    Ok(item)
}

pub fn check_price(policy: &ItemPolicy, price: i64) -> Result<(), AppError> {
    if price > policy.max_price {
        return Err(AppError::validation(
            format!("Price must be at {} at maximum", group_thousands(policy.max_price)),
            "price",
        ));
    }
    Ok(())
}

// 100000 -> "100,000"
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
