//! Order repository - database operations for purchases
//!
//! The line item, shipping address and payment result are embedded
//! documents and live in JSONB columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{Document, DocumentStore, StoreResult};
use afrofood_shared::models::{Order, OrderItem, PaymentResult, ShippingAddress};

/// Order record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_item: Json<OrderItem>,
    pub order_date: DateTime<Utc>,
    pub shipping_address: Json<ShippingAddress>,
    pub payment_method: String,
    pub payment_result: Option<Json<PaymentResult>>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            order_item: record.order_item.0,
            order_date: record.order_date,
            shipping_address: record.shipping_address.0,
            payment_method: record.payment_method,
            payment_result: record.payment_result.map(|json| json.0),
            tax_price: record.tax_price,
            shipping_price: record.shipping_price,
            total_price: record.total_price,
            is_paid: record.is_paid,
            paid_at: record.paid_at,
            is_delivered: record.is_delivered,
            delivered_at: record.delivered_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating an order; totals are already reconciled
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub order_item: OrderItem,
    pub order_date: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_result: Option<PaymentResult>,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Input for updating an order
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub order_item: Option<OrderItem>,
    pub order_date: Option<DateTime<Utc>>,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
    pub payment_result: Option<PaymentResult>,
    pub tax_price: Option<Decimal>,
    pub shipping_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub is_paid: Option<bool>,
    /// `Some(None)` clears the stamp
    pub paid_at: Option<Option<DateTime<Utc>>>,
    pub is_delivered: Option<bool>,
    /// `Some(None)` clears the stamp
    pub delivered_at: Option<Option<DateTime<Utc>>>,
}

impl Document for Order {
    type New = NewOrder;
    type Changes = OrderChanges;

    const KIND: &'static str = "Order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(id: Uuid, new: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            order_item: new.order_item,
            order_date: new.order_date,
            shipping_address: new.shipping_address,
            payment_method: new.payment_method,
            payment_result: new.payment_result,
            tax_price: new.tax_price,
            shipping_price: new.shipping_price,
            total_price: new.total_price,
            is_paid: new.is_paid,
            paid_at: new.paid_at,
            is_delivered: new.is_delivered,
            delivered_at: new.delivered_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: OrderChanges, now: DateTime<Utc>) {
        if let Some(item) = changes.order_item {
            self.order_item = item;
        }
        if let Some(date) = changes.order_date {
            self.order_date = date;
        }
        if let Some(address) = changes.shipping_address {
            self.shipping_address = address;
        }
        if let Some(method) = changes.payment_method {
            self.payment_method = method;
        }
        if changes.payment_result.is_some() {
            self.payment_result = changes.payment_result;
        }
        if let Some(tax) = changes.tax_price {
            self.tax_price = tax;
        }
        if let Some(shipping) = changes.shipping_price {
            self.shipping_price = shipping;
        }
        if let Some(total) = changes.total_price {
            self.total_price = total;
        }
        if let Some(paid) = changes.is_paid {
            self.is_paid = paid;
        }
        if let Some(paid_at) = changes.paid_at {
            self.paid_at = paid_at;
        }
        if let Some(delivered) = changes.is_delivered {
            self.is_delivered = delivered;
        }
        if let Some(delivered_at) = changes.delivered_at {
            self.delivered_at = delivered_at;
        }
        self.updated_at = now;
    }
}

/// Order storage
#[async_trait]
pub trait OrderRepository: DocumentStore<Order> {
    /// Orders placed by one user, oldest first
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;

    /// Remove every order placed by one user, returning how many went
    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64>;
}

/// PostgreSQL order storage
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Order> for PgOrderRepository {
    async fn list(&self) -> StoreResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, user_id, order_item, order_date, shipping_address, payment_method,
                   payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                   is_delivered, delivered_at, created_at, updated_at
            FROM orders
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Order::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let record = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, user_id, order_item, order_date, shipping_address, payment_method,
                   payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                   is_delivered, delivered_at, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Order::from))
    }

    async fn insert(&self, new: NewOrder) -> StoreResult<Order> {
        let record = sqlx::query_as::<_, OrderRecord>(
            r#"
            INSERT INTO orders (
                id, user_id, order_item, order_date, shipping_address, payment_method,
                payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                is_delivered, delivered_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, user_id, order_item, order_date, shipping_address, payment_method,
                      payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                      is_delivered, delivered_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(Json(new.order_item))
        .bind(new.order_date)
        .bind(Json(new.shipping_address))
        .bind(new.payment_method)
        .bind(new.payment_result.map(Json))
        .bind(new.tax_price)
        .bind(new.shipping_price)
        .bind(new.total_price)
        .bind(new.is_paid)
        .bind(new.paid_at)
        .bind(new.is_delivered)
        .bind(new.delivered_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: OrderChanges) -> StoreResult<Option<Order>> {
        let record = sqlx::query_as::<_, OrderRecord>(
            r#"
            UPDATE orders
            SET order_item = COALESCE($2, order_item),
                order_date = COALESCE($3, order_date),
                shipping_address = COALESCE($4, shipping_address),
                payment_method = COALESCE($5, payment_method),
                payment_result = COALESCE($6, payment_result),
                tax_price = COALESCE($7, tax_price),
                shipping_price = COALESCE($8, shipping_price),
                total_price = COALESCE($9, total_price),
                is_paid = COALESCE($10, is_paid),
                paid_at = CASE WHEN $11 THEN $12 ELSE paid_at END,
                is_delivered = COALESCE($13, is_delivered),
                delivered_at = CASE WHEN $14 THEN $15 ELSE delivered_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, order_item, order_date, shipping_address, payment_method,
                      payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                      is_delivered, delivered_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.order_item.map(Json))
        .bind(changes.order_date)
        .bind(changes.shipping_address.map(Json))
        .bind(changes.payment_method)
        .bind(changes.payment_result.map(Json))
        .bind(changes.tax_price)
        .bind(changes.shipping_price)
        .bind(changes.total_price)
        .bind(changes.is_paid)
        .bind(changes.paid_at.is_some())
        .bind(changes.paid_at.flatten())
        .bind(changes.is_delivered)
        .bind(changes.delivered_at.is_some())
        .bind(changes.delivered_at.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Order::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, user_id, order_item, order_date, shipping_address, payment_method,
                   payment_result, tax_price, shipping_price, total_price, is_paid, paid_at,
                   is_delivered, delivered_at, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Order::from).collect())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
