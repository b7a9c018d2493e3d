use std::sync::Arc;

use crate::database::{BookingStore, StoreError};
use crate::errors::BookingError;
use crate::models::NewMember;

pub const DUPLICATE_MEMBER_MESSAGE: &str = "Member with this email or phone already exists";

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn BookingStore>,
}

impl MemberService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Register a member whose email and phone are not yet in use.
    #[tracing::instrument(skip(self, member), fields(email = %member.email))]
    pub async fn register_member(&self, member: NewMember) -> Result<i64, BookingError> {
        let mut registration = self.store.begin_member_registration().await?;

        if let Some(existing_id) = registration
            .find_by_email_or_phone(&member.email, &member.phone)
            .await?
        {
            tracing::warn!(existing_id, "Rejected duplicate member registration");
            return Err(BookingError::Conflict(DUPLICATE_MEMBER_MESSAGE.to_string()));
        }

        let member_id = match registration.insert_member(&member).await {
            Ok(id) => id,
            Err(StoreError::UniqueViolation(detail)) => {
                tracing::warn!(%detail, "Unique constraint rejected member registration");
                return Err(BookingError::Conflict(DUPLICATE_MEMBER_MESSAGE.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        registration.commit().await?;

        tracing::info!(member_id, "Member registered");
        Ok(member_id)
    }
}
