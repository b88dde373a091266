//! Order service
//!
//! Orders belong to the account that placed them. Reads, updates and
//! deletes are limited to the owner and admins.
//!
//! The total is always consistent with the line item, tax and shipping:
//! it is derived when omitted and checked when supplied.

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewOrder, OrderChanges, Repositories};
use afrofood_shared::models::{Order, OrderItem, User};
use afrofood_shared::types::{CreateOrderRequest, UpdateOrderRequest};
use afrofood_shared::validation::{money, validate_order_total, validate_price};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Order service
pub struct OrderService;

impl OrderService {
    /// Every order in the system (admin view)
    pub async fn list_all(repos: &Repositories) -> ApiResult<Vec<Order>> {
        Ok(repos.orders.list().await?)
    }

    /// Orders placed by `user_id`; the caller must be that user or an admin
    pub async fn list_for_user(
        repos: &Repositories,
        principal: &Principal,
        user_id: Uuid,
    ) -> ApiResult<Vec<Order>> {
        principal.ensure_can_act_for(Some(user_id))?;

        if repos.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::not_found::<User>());
        }

        Ok(repos.orders.find_by_user(user_id).await?)
    }

    pub async fn get(repos: &Repositories, principal: &Principal, id: Uuid) -> ApiResult<Order> {
        let order = Self::find(repos, id).await?;
        principal.ensure_can_act_for(Some(order.user_id))?;
        Ok(order)
    }

    /// Place an order owned by the caller
    pub async fn create(
        repos: &Repositories,
        principal: &Principal,
        req: CreateOrderRequest,
    ) -> ApiResult<Order> {
        req.validate()?;
        validate_item(&req.order_item)?;
        validate_charge(req.tax_price)?;
        validate_charge(req.shipping_price)?;

        let expected = req.order_item.line_total() + req.tax_price + req.shipping_price;
        let total_price = match req.total_price {
            Some(total) => {
                validate_order_total(expected, total).map_err(ApiError::Validation)?;
                total
            }
            None => expected,
        };

        let mut order_item = req.order_item;
        order_item.price = money(order_item.price);

        let now = Utc::now();
        let paid_at = if req.is_paid {
            req.paid_at.or(Some(now))
        } else {
            req.paid_at
        };
        let delivered_at = if req.is_delivered {
            req.delivered_at.or(Some(now))
        } else {
            req.delivered_at
        };

        let order = repos
            .orders
            .insert(NewOrder {
                user_id: principal.id(),
                order_item,
                order_date: req.order_date.unwrap_or(now),
                shipping_address: req.shipping_address,
                payment_method: req.payment_method,
                payment_result: req.payment_result,
                tax_price: money(req.tax_price),
                shipping_price: money(req.shipping_price),
                total_price: money(total_price),
                is_paid: req.is_paid,
                paid_at,
                is_delivered: req.is_delivered,
                delivered_at,
            })
            .await?;

        info!(order_id = %order.id, user_id = %order.user_id, total = %order.total_price, "Order placed");
        Ok(order)
    }

    /// Partially update an order, keeping its total consistent
    pub async fn update(
        repos: &Repositories,
        principal: &Principal,
        id: Uuid,
        req: UpdateOrderRequest,
    ) -> ApiResult<Order> {
        req.validate()?;

        let existing = Self::find(repos, id).await?;
        principal.ensure_can_act_for(Some(existing.user_id))?;

        if let Some(item) = &req.order_item {
            validate_item(item)?;
        }
        for charge in [req.tax_price, req.shipping_price].into_iter().flatten() {
            validate_charge(charge)?;
        }

        let pricing_changed =
            req.order_item.is_some() || req.tax_price.is_some() || req.shipping_price.is_some();
        let item_total = req
            .order_item
            .as_ref()
            .unwrap_or(&existing.order_item)
            .line_total();
        let expected = item_total
            + req.tax_price.unwrap_or(existing.tax_price)
            + req.shipping_price.unwrap_or(existing.shipping_price);

        let total_price = match req.total_price {
            Some(total) => {
                validate_order_total(expected, total).map_err(ApiError::Validation)?;
                Some(total)
            }
            None if pricing_changed => Some(expected),
            None => None,
        };

        let now = Utc::now();
        let paid_at = stamp_change(req.is_paid, req.paid_at, existing.paid_at, now);
        let delivered_at =
            stamp_change(req.is_delivered, req.delivered_at, existing.delivered_at, now);

        let changes = OrderChanges {
            order_item: req.order_item.map(|mut item| {
                item.price = money(item.price);
                item
            }),
            order_date: req.order_date,
            shipping_address: req.shipping_address,
            payment_method: req.payment_method,
            payment_result: req.payment_result,
            tax_price: req.tax_price.map(money),
            shipping_price: req.shipping_price.map(money),
            total_price: total_price.map(money),
            is_paid: req.is_paid,
            paid_at,
            is_delivered: req.is_delivered,
            delivered_at,
        };

        repos
            .orders
            .update(id, changes)
            .await?
            .ok_or_else(ApiError::not_found::<Order>)
    }

    pub async fn delete(repos: &Repositories, principal: &Principal, id: Uuid) -> ApiResult<()> {
        let order = Self::find(repos, id).await?;
        principal.ensure_can_act_for(Some(order.user_id))?;

        if !repos.orders.delete(id).await? {
            return Err(ApiError::not_found::<Order>());
        }
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    async fn find(repos: &Repositories, id: Uuid) -> ApiResult<Order> {
        repos
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::not_found::<Order>)
    }
}

/// New value for a paid/delivered timestamp; `Some(None)` clears it
fn stamp_change(
    flag: Option<bool>,
    at: Option<DateTime<Utc>>,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<Option<DateTime<Utc>>> {
    match (flag, at) {
        (Some(false), _) => Some(None),
        (_, Some(at)) => Some(Some(at)),
        (Some(true), None) if current.is_none() => Some(Some(now)),
        _ => None,
    }
}

fn validate_charge(amount: Decimal) -> ApiResult<()> {
    validate_price(amount).map_err(ApiError::Validation)
}

fn validate_item(item: &OrderItem) -> ApiResult<()> {
    if item.quantity < 1 {
        return Err(ApiError::Validation(
            "order_item.quantity must be at least 1".to_string(),
        ));
    }
    if item.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "order_item.name is required".to_string(),
        ));
    }
    validate_price(item.price).map_err(ApiError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::NewUser;
    use afrofood_shared::models::{ShippingAddress, UserProfile};

    async fn account(repos: &Repositories, email: &str, is_admin: bool) -> Principal {
        let user = repos
            .users
            .insert(NewUser {
                first_name: "Ada".to_string(),
                last_name: "Obi".to_string(),
                email: email.to_string(),
                phone_no: None,
                password_hash: "hash".to_string(),
                is_admin,
            })
            .await
            .unwrap();
        Principal {
            profile: UserProfile::from(user),
        }
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn order_request(total: Option<Decimal>) -> CreateOrderRequest {
        CreateOrderRequest {
            order_item: OrderItem {
                meal_id: Uuid::new_v4(),
                name: "Jollof Rice".to_string(),
                quantity: 2,
                price: Decimal::from(400),
                image: None,
            },
            order_date: None,
            shipping_address: ShippingAddress {
                address: "12 Allen Avenue".to_string(),
                city: "Ikeja".to_string(),
                postal_code: "100271".to_string(),
            },
            payment_method: "card".to_string(),
            payment_result: None,
            tax_price: Decimal::from(50),
            shipping_price: Decimal::from(150),
            total_price: total,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
        }
    }

    #[tokio::test]
    async fn test_total_derived_when_omitted() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;

        let order = OrderService::create(&repos, &ada, order_request(None))
            .await
            .unwrap();

        assert_eq!(order.total_price, Decimal::from(1000));
        assert_eq!(order.total_price, order.expected_total());
        assert_eq!(order.total_price.to_string(), "1000.00");
        assert_eq!(order.user_id, ada.id());
    }

    #[tokio::test]
    async fn test_inconsistent_total_rejected() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;

        let err = OrderService::create(&repos, &ada, order_request(Some(Decimal::from(999))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(OrderService::create(&repos, &ada, order_request(Some(dec("1000.00"))))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_other_users_cannot_read_order() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let bola = account(&repos, "bola@example.com", false).await;
        let admin = account(&repos, "admin@example.com", true).await;

        let order = OrderService::create(&repos, &ada, order_request(None))
            .await
            .unwrap();

        assert!(OrderService::get(&repos, &ada, order.id).await.is_ok());
        assert!(OrderService::get(&repos, &admin, order.id).await.is_ok());
        assert!(matches!(
            OrderService::get(&repos, &bola, order.id).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            OrderService::delete(&repos, &bola, order.id).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_marking_paid_stamps_time_and_recomputes_total() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let order = OrderService::create(&repos, &ada, order_request(None))
            .await
            .unwrap();
        assert!(order.paid_at.is_none());

        let updated = OrderService::update(
            &repos,
            &ada,
            order.id,
            UpdateOrderRequest {
                is_paid: Some(true),
                shipping_price: Some(Decimal::ZERO),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.is_paid);
        assert!(updated.paid_at.is_some());
        assert_eq!(updated.total_price, Decimal::from(850));
        assert_eq!(updated.payment_method, "card");
    }

    #[tokio::test]
    async fn test_sub_cent_total_mismatch_rejected() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;

        let request = |total: &str| {
            let mut req = order_request(Some(dec(total)));
            req.order_item.quantity = 3;
            req.order_item.price = dec("0.1");
            req.tax_price = dec("0.2");
            req.shipping_price = Decimal::ZERO;
            req
        };

        assert!(matches!(
            OrderService::create(&repos, &ada, request("0.509")).await,
            Err(ApiError::Validation(_))
        ));
        let order = OrderService::create(&repos, &ada, request("0.5"))
            .await
            .unwrap();
        assert_eq!(order.total_price.to_string(), "0.50");
    }

    #[tokio::test]
    async fn test_fractional_cent_tax_rejected() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let mut req = order_request(None);
        req.tax_price = dec("0.005");

        assert!(matches!(
            OrderService::create(&repos, &ada, req).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unmarking_clears_timestamps() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let mut req = order_request(None);
        req.is_paid = true;
        req.is_delivered = true;
        let order = OrderService::create(&repos, &ada, req).await.unwrap();
        assert!(order.paid_at.is_some());
        assert!(order.delivered_at.is_some());

        let unpaid = OrderService::update(
            &repos,
            &ada,
            order.id,
            UpdateOrderRequest {
                is_paid: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!unpaid.is_paid);
        assert!(unpaid.paid_at.is_none());
        assert!(unpaid.delivered_at.is_some());

        let undelivered = OrderService::update(
            &repos,
            &ada,
            order.id,
            UpdateOrderRequest {
                is_delivered: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!undelivered.is_delivered);
        assert!(undelivered.delivered_at.is_none());

        let stored = repos.orders.find_by_id(order.id).await.unwrap().unwrap();
        assert!(stored.paid_at.is_none());
        assert!(stored.delivered_at.is_none());
    }

    #[tokio::test]
    async fn test_orders_by_user() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let bola = account(&repos, "bola@example.com", false).await;
        OrderService::create(&repos, &ada, order_request(None))
            .await
            .unwrap();

        assert_eq!(
            OrderService::list_for_user(&repos, &ada, ada.id())
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(OrderService::list_for_user(&repos, &bola, bola.id())
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            OrderService::list_for_user(&repos, &bola, ada.id()).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let repos = Repositories::in_memory();
        let ada = account(&repos, "ada@example.com", false).await;
        let mut req = order_request(None);
        req.order_item.quantity = 0;

        assert!(matches!(
            OrderService::create(&repos, &ada, req).await,
            Err(ApiError::Validation(_))
        ));
    }
}
