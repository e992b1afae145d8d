use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use business::domain::cart::remote::{RemoteCartClient, RemoteCartItem, RemoteError};
use business::domain::shared::value_objects::{ProductId, UserId};

use crate::client::{SupabaseClient, error_for_status, error_for_transport};

const TABLE: &str = "cart_items";
const COLUMNS: &str = "id,product_id,quantity";

/// Identifiers come back as text (uuid) or as numbers depending on the
/// column type.
#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(i64),
}

impl Identifier {
    fn into_string(self) -> String {
        match self {
            Identifier::Text(s) => s,
            Identifier::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CartRowDto {
    id: Identifier,
    product_id: Identifier,
    quantity: i64,
}

impl CartRowDto {
    fn into_domain(self) -> Result<RemoteCartItem, RemoteError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| RemoteError::InvalidResponse)?;
        Ok(RemoteCartItem {
            id: self.id.into_string(),
            product_id: ProductId::new(self.product_id.into_string()),
            quantity,
        })
    }
}

pub struct RemoteCartClientSupabase {
    client: SupabaseClient,
}

impl RemoteCartClientSupabase {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn owner(user_id: &UserId) -> (&'static str, String) {
        ("user_id", format!("eq.{}", user_id))
    }

    fn list_request(&self, user_id: &UserId) -> RequestBuilder {
        self.client.authorized(
            self.client
                .client
                .get(self.client.table_url(TABLE))
                .query(&[Self::owner(user_id), ("select", COLUMNS.to_string())]),
        )
    }

    fn insert_request(&self, user_id: &UserId, product_id: &ProductId, quantity: u32) -> RequestBuilder {
        self.client.authorized(
            self.client
                .client
                .post(self.client.table_url(TABLE))
                .query(&[("select", COLUMNS)])
                .header("Prefer", "return=representation")
                .json(&json!({
                    "user_id": user_id.as_str(),
                    "product_id": product_id.as_str(),
                    "quantity": quantity,
                })),
        )
    }

    fn update_request(&self, user_id: &UserId, item_id: &str, quantity: u32) -> RequestBuilder {
        self.client.authorized(
            self.client
                .client
                .patch(self.client.table_url(TABLE))
                .query(&[
                    ("id", format!("eq.{}", item_id)),
                    Self::owner(user_id),
                    ("select", COLUMNS.to_string()),
                ])
                .header("Prefer", "return=representation")
                .json(&json!({ "quantity": quantity })),
        )
    }

    fn delete_request(&self, user_id: &UserId, item_id: Option<&str>) -> RequestBuilder {
        let mut filters = Vec::with_capacity(2);
        if let Some(item_id) = item_id {
            filters.push(("id", format!("eq.{}", item_id)));
        }
        filters.push(Self::owner(user_id));
        self.client.authorized(
            self.client
                .client
                .delete(self.client.table_url(TABLE))
                .query(&filters),
        )
    }

    async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(target: "Cart -- ", "supabase request failed: {}", e);
            error_for_transport(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(target: "Cart -- ", "supabase answered {}", status);
            return Err(error_for_status(status));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
        response
            .json::<T>()
            .await
            .map_err(|_| RemoteError::InvalidResponse)
    }

    async fn single_row(request: RequestBuilder) -> Result<RemoteCartItem, RemoteError> {
        let rows: Vec<CartRowDto> = Self::decode(Self::send(request).await?).await?;
        rows.into_iter()
            .next()
            .ok_or(RemoteError::InvalidResponse)?
            .into_domain()
    }
}

#[async_trait]
impl RemoteCartClient for RemoteCartClientSupabase {
    async fn get_items(&self, user_id: &UserId) -> Result<Vec<RemoteCartItem>, RemoteError> {
        let rows: Vec<CartRowDto> = Self::decode(Self::send(self.list_request(user_id)).await?).await?;
        rows.into_iter().map(CartRowDto::into_domain).collect()
    }

    async fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        Self::single_row(self.insert_request(user_id, product_id, quantity)).await
    }

    async fn remove_item(&self, user_id: &UserId, item_id: &str) -> Result<(), RemoteError> {
        Self::send(self.delete_request(user_id, Some(item_id))).await?;
        Ok(())
    }

    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: &str,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        Self::single_row(self.update_request(user_id, item_id, quantity)).await
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), RemoteError> {
        Self::send(self.delete_request(user_id, None)).await?;
        Ok(())
    }
}
