use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::domain::cart::repository::{
    AddCartItemParams, CartRepository, UpdateQuantityParams,
};
use business::domain::cart::sync::SyncOutcome;
use business::domain::shared::value_objects::{CartItemId, ProductId};

use crate::api::cart::dto::{
    AddCartItemRequest, CartItemResponse, CartResponse, ClearResponse, ContainsResponse,
    CountResponse, MigrationResponse, SyncResponse, TotalResponse, UpdateQuantityRequest,
};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::tags::ApiTags;

pub struct CartApi {
    cart: Arc<dyn CartRepository>,
}

impl CartApi {
    pub fn new(cart: Arc<dyn CartRepository>) -> Self {
        Self { cart }
    }
}

/// Cart API
///
/// Every endpoint answers from the on-device cart. Only `/cart/sync` and
/// `/cart/migrate` reach the backend.
#[OpenApi]
impl CartApi {
    /// Get the cart with totals
    #[oai(path = "/cart", method = "get", tag = "ApiTags::Cart")]
    async fn get_cart(&self) -> GetCartResponse {
        match self.cart.get_cart().await {
            Ok(cart) => GetCartResponse::Ok(Json(cart.into())),
            Err(err) => GetCartResponse::InternalError(err.into_error_response().1),
        }
    }

    /// List cart lines
    ///
    /// Returns lines oldest first.
    #[oai(path = "/cart/items", method = "get", tag = "ApiTags::Cart")]
    async fn get_items(&self) -> GetCartItemsResponse {
        match self.cart.get_items().await {
            Ok(items) => {
                let responses: Vec<CartItemResponse> =
                    items.into_iter().map(|i| i.into()).collect();
                GetCartItemsResponse::Ok(Json(responses))
            }
            Err(err) => GetCartItemsResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Add a product to the cart
    ///
    /// Adding a product that is already in the cart increases the quantity
    /// of its existing line.
    #[oai(path = "/cart/items", method = "post", tag = "ApiTags::Cart")]
    async fn add_item(&self, body: Json<AddCartItemRequest>) -> AddCartItemResponse {
        let result = match body.0.into_snapshot() {
            Ok((product, quantity)) => {
                self.cart
                    .add_item(AddCartItemParams { product, quantity })
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(item) => AddCartItemResponse::Created(Json(item.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => AddCartItemResponse::BadRequest(json),
                    _ => AddCartItemResponse::InternalError(json),
                }
            }
        }
    }

    /// Set the quantity of a cart line
    #[oai(path = "/cart/items/:id", method = "put", tag = "ApiTags::Cart")]
    async fn update_quantity(
        &self,
        id: Path<String>,
        body: Json<UpdateQuantityRequest>,
    ) -> UpdateCartItemResponse {
        let params = UpdateQuantityParams {
            id: CartItemId::new(id.0),
            quantity: body.0.quantity,
        };

        match self.cart.update_quantity(params).await {
            Ok(item) => UpdateCartItemResponse::Ok(Json(item.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => UpdateCartItemResponse::BadRequest(json),
                    404 => UpdateCartItemResponse::NotFound(json),
                    _ => UpdateCartItemResponse::InternalError(json),
                }
            }
        }
    }

    /// Remove a cart line
    #[oai(path = "/cart/items/:id", method = "delete", tag = "ApiTags::Cart")]
    async fn remove_item(&self, id: Path<String>) -> RemoveCartItemResponse {
        match self.cart.remove_item(&CartItemId::new(id.0)).await {
            Ok(true) => RemoveCartItemResponse::NoContent,
            Ok(false) => RemoveCartItemResponse::NotFound(ErrorResponse::new(
                "NotFound",
                "cart.not_found",
            )),
            Err(err) => RemoveCartItemResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Empty the cart
    #[oai(path = "/cart", method = "delete", tag = "ApiTags::Cart")]
    async fn clear(&self) -> ClearCartResponse {
        match self.cart.clear().await {
            Ok(cleared) => ClearCartResponse::Ok(Json(ClearResponse { cleared })),
            Err(err) => ClearCartResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Cart total using sale prices where present
    #[oai(path = "/cart/total", method = "get", tag = "ApiTags::Cart")]
    async fn total(&self) -> CartTotalResponse {
        match self.cart.get_total_price().await {
            Ok(total) => CartTotalResponse::Ok(Json(TotalResponse { total })),
            Err(err) => CartTotalResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Number of units in the cart
    #[oai(path = "/cart/count", method = "get", tag = "ApiTags::Cart")]
    async fn count(&self) -> CartCountResponse {
        match self.cart.get_item_count().await {
            Ok(count) => CartCountResponse::Ok(Json(CountResponse { count })),
            Err(err) => CartCountResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Whether a product has a line in the cart
    #[oai(
        path = "/cart/contains/:product_id",
        method = "get",
        tag = "ApiTags::Cart"
    )]
    async fn contains(&self, product_id: Path<String>) -> CartContainsResponse {
        match self.cart.is_in_cart(&ProductId::new(product_id.0.clone())).await {
            Ok(in_cart) => CartContainsResponse::Ok(Json(ContainsResponse {
                product_id: product_id.0,
                in_cart,
            })),
            Err(err) => CartContainsResponse::InternalError(err.into_error_response().1),
        }
    }

    /// Push the local cart to the backend now
    ///
    /// Skips (offline, guest, disabled) are reported with 200. A failed pass
    /// answers 503 and is safe to retry; the local cart is unaffected.
    #[oai(path = "/cart/sync", method = "post", tag = "ApiTags::Cart")]
    async fn sync(&self) -> SyncCartResponse {
        match self.cart.sync_with_remote().await {
            SyncOutcome::Failed(err) => {
                let (_status, json) = err.clone().into_error_response();
                tracing::warn!("Explicit sync failed: {}", json.0.message);
                SyncCartResponse::Unavailable(Json(SyncOutcome::Failed(err).into()))
            }
            outcome => SyncCartResponse::Ok(Json(outcome.into())),
        }
    }

    /// Push a guest cart to the signed-in user's backend cart
    #[oai(path = "/cart/migrate", method = "post", tag = "ApiTags::Cart")]
    async fn migrate(&self) -> Json<MigrationResponse> {
        Json(
            self.cart
                .migrate_guest_cart_to_authenticated_user()
                .await
                .into(),
        )
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetCartResponse {
    #[oai(status = 200)]
    Ok(Json<CartResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetCartItemsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<CartItemResponse>>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum AddCartItemResponse {
    #[oai(status = 201)]
    Created(Json<CartItemResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum UpdateCartItemResponse {
    #[oai(status = 200)]
    Ok(Json<CartItemResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum RemoveCartItemResponse {
    #[oai(status = 204)]
    NoContent,
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum ClearCartResponse {
    #[oai(status = 200)]
    Ok(Json<ClearResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum CartTotalResponse {
    #[oai(status = 200)]
    Ok(Json<TotalResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum CartCountResponse {
    #[oai(status = 200)]
    Ok(Json<CountResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum CartContainsResponse {
    #[oai(status = 200)]
    Ok(Json<ContainsResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum SyncCartResponse {
    #[oai(status = 200)]
    Ok(Json<SyncResponse>),
    #[oai(status = 503)]
    Unavailable(Json<SyncResponse>),
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{local_only_client, milk};

    #[tokio::test]
    async fn should_add_and_list_items() {
        let (cli, _container) = local_only_client().await;

        let resp = cli.post("/cart/items").body_json(&milk(2)).send().await;
        resp.assert_status(StatusCode::CREATED);
        let json = resp.json().await;
        json.value().object().get("quantity").assert_i64(2);

        let resp = cli.get("/cart/items").send().await;
        resp.assert_status_is_ok();
        resp.json().await.value().array().assert_len(1);
    }

    #[tokio::test]
    async fn should_merge_quantities_and_price_the_cart() {
        let (cli, _container) = local_only_client().await;
        cli.post("/cart/items").body_json(&milk(1)).send().await;
        cli.post("/cart/items").body_json(&milk(2)).send().await;
        cli.post("/cart/items")
            .body_json(&json!({
                "product_id": "p-bread",
                "name": "Bread",
                "price": 3.0,
                "sale_price": 2.5,
                "quantity": 2
            }))
            .send()
            .await;

        let resp = cli.get("/cart").send().await;
        resp.assert_status_is_ok();
        let json = resp.json().await;
        let cart = json.value().object();
        cart.get("item_count").assert_i64(5);
        cart.get("line_count").assert_i64(2);
        cart.get("total").assert_f64(8.0);

        let resp = cli.get("/cart/count").send().await;
        resp.json().await.value().object().get("count").assert_i64(5);
        let resp = cli.get("/cart/total").send().await;
        resp.json().await.value().object().get("total").assert_f64(8.0);
    }

    #[tokio::test]
    async fn should_reject_zero_quantity() {
        let (cli, _container) = local_only_client().await;

        let resp = cli.post("/cart/items").body_json(&milk(0)).send().await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.json()
            .await
            .value()
            .object()
            .get("message")
            .assert_string("cart.invalid_quantity");
    }

    #[tokio::test]
    async fn should_update_and_remove_line() {
        let (cli, _container) = local_only_client().await;
        let resp = cli.post("/cart/items").body_json(&milk(1)).send().await;
        let json = resp.json().await;
        let id = json.value().object().get("id").string().to_string();

        let resp = cli
            .put(format!("/cart/items/{}", id))
            .body_json(&json!({ "quantity": 4 }))
            .send()
            .await;
        resp.assert_status_is_ok();
        resp.json().await.value().object().get("quantity").assert_i64(4);

        let resp = cli
            .put(format!("/cart/items/{}", id))
            .body_json(&json!({ "quantity": 0 }))
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);

        cli.delete(format!("/cart/items/{}", id))
            .send()
            .await
            .assert_status(StatusCode::NO_CONTENT);
        cli.delete(format!("/cart/items/{}", id))
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_answer_not_found_for_unknown_line_update() {
        let (cli, _container) = local_only_client().await;

        let resp = cli
            .put("/cart/items/missing")
            .body_json(&json!({ "quantity": 1 }))
            .send()
            .await;

        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_report_membership_and_clear() {
        let (cli, _container) = local_only_client().await;
        cli.post("/cart/items").body_json(&milk(1)).send().await;

        let resp = cli.get("/cart/contains/p-milk").send().await;
        resp.json().await.value().object().get("in_cart").assert_bool(true);

        cli.delete("/cart").send().await.assert_status_is_ok();
        cli.delete("/cart").send().await.assert_status_is_ok();

        let resp = cli.get("/cart/contains/p-milk").send().await;
        resp.json().await.value().object().get("in_cart").assert_bool(false);
    }

    #[tokio::test]
    async fn should_report_skipped_sync_when_running_local_only() {
        let (cli, _container) = local_only_client().await;

        let resp = cli.post("/cart/sync").send().await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        let body = json.value().object();
        body.get("status").assert_string("skipped");
        body.get("reason").assert_string("sync.disabled");
        body.get("success").assert_bool(true);
    }

    #[tokio::test]
    async fn should_defer_migration_when_running_local_only() {
        let (cli, _container) = local_only_client().await;
        cli.post("/cart/items").body_json(&milk(1)).send().await;

        let resp = cli.post("/cart/migrate").send().await;

        resp.assert_status_is_ok();
        resp.json()
            .await
            .value()
            .object()
            .get("status")
            .assert_string("deferred");
    }
}
