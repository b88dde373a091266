//! Vendor service
//!
//! Manager passwords are hashed before they reach storage, on create and
//! on update. Meal and review references must resolve when written; the
//! populated view skips references that have since been deleted.

use crate::auth::PasswordService;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewVendor, Repositories, VendorChanges};
use afrofood_shared::models::{Vendor, VendorDetail, VendorManager, DEFAULT_VENDOR_PHONE};
use afrofood_shared::types::{CreateVendorRequest, UpdateVendorRequest};
use afrofood_shared::validation::{validate_coordinates, validate_phone};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Vendor service
pub struct VendorService;

impl VendorService {
    pub async fn list(repos: &Repositories) -> ApiResult<Vec<Vendor>> {
        Ok(repos.vendors.list().await?)
    }

    pub async fn get(repos: &Repositories, id: Uuid) -> ApiResult<Vendor> {
        repos
            .vendors
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::not_found::<Vendor>)
    }

    /// Vendor with its review references replaced by the reviews themselves
    pub async fn get_with_reviews(repos: &Repositories, id: Uuid) -> ApiResult<VendorDetail> {
        let vendor = Self::get(repos, id).await?;
        let reviews = repos.reviews.find_many(&vendor.reviews).await?;
        Ok(vendor.with_reviews(reviews))
    }

    pub async fn create(
        repos: &Repositories,
        passwords: &PasswordService,
        req: CreateVendorRequest,
    ) -> ApiResult<Vendor> {
        req.validate()?;

        if req.manager.name.trim().is_empty() {
            return Err(ApiError::Validation("manager.name is required".to_string()));
        }
        if req.manager.password.is_empty() {
            return Err(ApiError::Validation(
                "manager.password is required".to_string(),
            ));
        }
        if let Some(phone) = req.phone_no.as_deref() {
            validate_phone(phone).map_err(ApiError::Validation)?;
        }
        validate_coordinates(req.location.lat, req.location.lon).map_err(ApiError::Validation)?;
        Self::ensure_references(repos, &req.meals, &req.reviews).await?;

        let password_hash = passwords.hash_async(req.manager.password).await?;

        let vendor = repos
            .vendors
            .insert(NewVendor {
                name: req.name.trim().to_string(),
                address: req.address.trim().to_string(),
                phone_no: req
                    .phone_no
                    .unwrap_or_else(|| DEFAULT_VENDOR_PHONE.to_string()),
                location: req.location,
                manager: VendorManager {
                    name: req.manager.name.trim().to_string(),
                    password_hash,
                },
                verified: req.verified,
                meals: req.meals,
                reviews: req.reviews,
            })
            .await?;

        info!(vendor_id = %vendor.id, "Vendor created");
        Ok(vendor)
    }

    pub async fn update(
        repos: &Repositories,
        passwords: &PasswordService,
        id: Uuid,
        req: UpdateVendorRequest,
    ) -> ApiResult<Vendor> {
        req.validate()?;

        if let Some(phone) = req.phone_no.as_deref() {
            validate_phone(phone).map_err(ApiError::Validation)?;
        }
        if let Some(location) = req.location {
            validate_coordinates(location.lat, location.lon).map_err(ApiError::Validation)?;
        }
        Self::ensure_references(
            repos,
            req.meals.as_deref().unwrap_or_default(),
            req.reviews.as_deref().unwrap_or_default(),
        )
        .await?;

        let (manager_name, manager_password) = match req.manager {
            Some(manager) => (manager.name, manager.password),
            None => (None, None),
        };
        if manager_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::Validation(
                "manager.name cannot be blank".to_string(),
            ));
        }
        let manager_password_hash = match manager_password {
            Some(password) if password.is_empty() => {
                return Err(ApiError::Validation(
                    "manager.password cannot be blank".to_string(),
                ))
            }
            Some(password) => Some(passwords.hash_async(password).await?),
            None => None,
        };

        let changes = VendorChanges {
            name: req.name.map(|n| n.trim().to_string()),
            address: req.address.map(|a| a.trim().to_string()),
            phone_no: req.phone_no,
            location: req.location,
            manager_name: manager_name.map(|n| n.trim().to_string()),
            manager_password_hash,
            verified: req.verified,
            meals: req.meals,
            reviews: req.reviews,
        };

        repos
            .vendors
            .update(id, changes)
            .await?
            .ok_or_else(ApiError::not_found::<Vendor>)
    }

    pub async fn delete(repos: &Repositories, id: Uuid) -> ApiResult<()> {
        if !repos.vendors.delete(id).await? {
            return Err(ApiError::not_found::<Vendor>());
        }
        info!(vendor_id = %id, "Vendor deleted");
        Ok(())
    }

    /// Every referenced meal and review must exist
    async fn ensure_references(
        repos: &Repositories,
        meals: &[Uuid],
        reviews: &[Uuid],
    ) -> ApiResult<()> {
        for id in meals {
            if repos.meals.find_by_id(*id).await?.is_none() {
                return Err(ApiError::Validation(format!("Meal {} does not exist", id)));
            }
        }

        let found = repos.reviews.find_many(reviews).await?;
        if let Some(missing) = reviews
            .iter()
            .find(|id| !found.iter().any(|review| review.id == **id))
        {
            return Err(ApiError::Validation(format!(
                "Review {} does not exist",
                missing
            )));
        }

        Ok(())
    }
}
