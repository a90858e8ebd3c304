//! In-memory stores and fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::bookings::models::{Booking, BookingStatus};
use crate::features::bookings::BookingRepository;
use crate::features::history::models::Complaint;
use crate::features::history::ComplaintRepository;
use crate::features::users::models::{
    Account, AccountInfoUpdate, AccountStatus, DocumentSlot, DriverInfoUpdate, NewAccount,
};
use crate::features::users::AccountRepository;
use crate::shared::constants::{DEFAULT_AVATAR_PATH, ROLE_DRIVER};

/// Active driver account whose password hashes to `password` (cheap bcrypt cost)
pub fn test_account(email: &str, password: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::now_v7(),
        name: Name().fake(),
        first_name: None,
        middle_name: None,
        last_name: None,
        name_extension: None,
        email: email.to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        phone: Some("09171234567".to_string()),
        address: Some(StreetName().fake()),
        dob: None,
        gender: None,
        avatar: Some(DEFAULT_AVATAR_PATH.to_string()),
        role: ROLE_DRIVER.to_string(),
        status: AccountStatus::Active,
        license_number: None,
        license_issue_date: None,
        license_expiry_date: None,
        license_image: None,
        nbi_clearance: None,
        proof_of_address: None,
        years_experience: None,
        previous_jobs: None,
        vehicle_categories: "[]".to_string(),
        total_trips: 0,
        rating: None,
        member_since: Some(now.date_naive()),
        created_at: now,
        updated_at: now,
    }
}

fn store_failure() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<HashMap<Uuid, Account>>,
    fail_inserts: AtomicBool,
    fail_updates: AtomicBool,
}

impl InMemoryAccounts {
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts.into_iter().map(|a| (a.id, a)).collect()),
            ..Default::default()
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.lock().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn insert_account(&self, account: Account) {
        self.accounts.lock().await.insert(account.id, account);
    }

    pub async fn set_document(&self, id: Uuid, slot: DocumentSlot, path: &str) {
        if let Some(account) = self.accounts.lock().await.get_mut(&id) {
            match slot {
                DocumentSlot::Avatar => account.avatar = Some(path.to_string()),
                DocumentSlot::LicenseImage => account.license_image = Some(path.to_string()),
            }
        }
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Account),
    {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))?;
        apply(account);
        account.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.get(id).await)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn insert(&self, new: &NewAccount) -> Result<Account> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        let now = Utc::now();
        let account = Account {
            id: new.id,
            name: new.name.clone(),
            first_name: Some(new.first_name.clone()),
            middle_name: new.middle_name.clone(),
            last_name: Some(new.last_name.clone()),
            name_extension: new.name_extension.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            phone: Some(new.phone.clone()),
            address: Some(new.address.clone()),
            dob: Some(new.dob),
            gender: Some(new.gender.clone()),
            avatar: Some(new.avatar.clone()),
            role: new.role.clone(),
            status: new.status,
            license_number: Some(new.license_number.clone()),
            license_issue_date: None,
            license_expiry_date: Some(new.license_expiry_date),
            license_image: new.license_image.clone(),
            nbi_clearance: new.nbi_clearance.clone(),
            proof_of_address: new.proof_of_address.clone(),
            years_experience: None,
            previous_jobs: None,
            vehicle_categories: "[]".to_string(),
            total_trips: 0,
            rating: None,
            member_since: Some(new.member_since),
            created_at: now,
            updated_at: now,
        };
        self.insert_account(account.clone()).await;
        Ok(account)
    }

    async fn update_account_info(&self, id: Uuid, update: &AccountInfoUpdate) -> Result<()> {
        self.update(id, |account| {
            account.name = update.name.clone();
            account.email = update.email.clone();
            account.phone = Some(update.phone.clone());
            account.address = Some(update.address.clone());
            account.dob = update.dob;
        })
        .await
    }

    async fn update_driver_info(&self, id: Uuid, update: &DriverInfoUpdate) -> Result<()> {
        self.update(id, |account| {
            account.license_number = Some(update.license_number.clone());
            account.license_issue_date = update.license_issue_date;
            account.license_expiry_date = update.license_expiry_date;
            account.years_experience = update.years_experience;
            account.previous_jobs = Some(update.previous_jobs.clone());
            account.vehicle_categories = update.vehicle_categories_json();
        })
        .await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        self.update(id, |account| account.password_hash = password_hash.to_string())
            .await
    }

    async fn update_document(&self, id: Uuid, slot: DocumentSlot, path: &str) -> Result<()> {
        self.update(id, |account| match slot {
            DocumentSlot::Avatar => account.avatar = Some(path.to_string()),
            DocumentSlot::LicenseImage => account.license_image = Some(path.to_string()),
        })
        .await
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// Booking between two Quezon City landmarks with numeric coordinates
pub fn sample_booking(
    driver_id: Uuid,
    reference: &str,
    status: BookingStatus,
    fare: &str,
    scheduled_at: DateTime<Utc>,
) -> Booking {
    Booking {
        id: Uuid::now_v7(),
        reference: reference.to_string(),
        driver_id,
        passenger_name: Name().fake(),
        passenger_phone: "09434325223".to_string(),
        pickup_location: "SM North EDSA".to_string(),
        pickup_lat: "14.6560".to_string(),
        pickup_lng: "121.0320".to_string(),
        dropoff_location: "QC Circle".to_string(),
        dropoff_lat: "14.6488".to_string(),
        dropoff_lng: "121.0499".to_string(),
        scheduled_at,
        distance_km: 4.2,
        duration_minutes: 45,
        payment_method: "Cash".to_string(),
        fare: fare.parse::<Decimal>().unwrap(),
        status,
        completed_at: (status == BookingStatus::Completed).then_some(scheduled_at),
        created_at: scheduled_at,
    }
}

#[derive(Default)]
pub struct InMemoryBookings {
    bookings: Mutex<Vec<Booking>>,
    fail_reads: AtomicBool,
}

impl InMemoryBookings {
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
            ..Default::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookings {
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .iter()
            .filter(|b| b.driver_id == driver_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(bookings)
    }
}

// ============================================================================
// Complaints
// ============================================================================

#[derive(Default)]
pub struct InMemoryComplaints {
    complaints: Mutex<Vec<Complaint>>,
    fail_reads: AtomicBool,
}

impl InMemoryComplaints {
    pub fn with_complaints(complaints: Vec<Complaint>) -> Self {
        Self {
            complaints: Mutex::new(complaints),
            ..Default::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaints {
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Complaint>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        let mut complaints: Vec<Complaint> = self
            .complaints
            .lock()
            .await
            .iter()
            .filter(|c| c.driver_id == driver_id)
            .cloned()
            .collect();
        complaints.sort_by(|a, b| b.filed_at.cmp(&a.filed_at));
        Ok(complaints)
    }

    async fn find_for_driver(&self, driver_id: Uuid, id: Uuid) -> Result<Option<Complaint>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(store_failure());
        }
        Ok(self
            .complaints
            .lock()
            .await
            .iter()
            .find(|c| c.id == id && c.driver_id == driver_id)
            .cloned())
    }
}

// ============================================================================
// Sessions
// ============================================================================

pub fn test_session_user() -> SessionUser {
    SessionUser {
        session_id: Uuid::new_v4(),
        user_id: Uuid::now_v7(),
        name: "Juan Dela Cruz".to_string(),
        email: "juan@example.com".to_string(),
    }
}

async fn inject_session(
    State(user): State<SessionUser>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Serve `router` as if the session gate had already admitted `user`
pub fn with_session(router: Router, user: SessionUser) -> Router {
    router.layer(axum::middleware::from_fn_with_state(user, inject_session))
}
