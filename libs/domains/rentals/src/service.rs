//! Rental Service - request logic over the document store, payments and email

use chrono::Utc;
use email::Notifier;
use mongodb::bson::{doc, oid::ObjectId};
use payments::PaymentService;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{RentalError, RentalResult};
use crate::models::{
    Collection, DeleteAck, InsertAck, Pagination, UpdateAck, UpsertOutcome, UserPayload,
    document_to_json, json_to_document,
};
use crate::repository::DocumentRepository;

pub const WELCOME_SUBJECT: &str = "Welcome to RentEase!";
pub const WELCOME_BODY: &str = "Hope you will find your apartment";

/// Rental service
///
/// Each operation is one store call or one provider call, except
/// [`upsert_user`](Self::upsert_user).
pub struct RentalService<R: DocumentRepository> {
    repository: Arc<R>,
    payments: PaymentService,
    notifier: Notifier,
}

impl<R: DocumentRepository> RentalService<R> {
    pub fn new(repository: R, payments: PaymentService, notifier: Notifier) -> Self {
        Self {
            repository: Arc::new(repository),
            payments,
            notifier,
        }
    }

    async fn find_all_json(&self, collection: Collection) -> RentalResult<Vec<Value>> {
        let documents = self.repository.find_all(collection).await?;
        Ok(documents.into_iter().map(document_to_json).collect())
    }

    async fn insert_json(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> RentalResult<InsertAck> {
        let document = json_to_document(&fields)?;
        self.repository.insert_one(collection, document).await
    }

    #[instrument(skip(self))]
    pub async fn list_coupons(&self) -> RentalResult<Vec<Value>> {
        self.find_all_json(Collection::Coupon).await
    }

    #[instrument(skip(self, coupon))]
    pub async fn add_coupon(&self, coupon: Map<String, Value>) -> RentalResult<InsertAck> {
        self.insert_json(Collection::Coupon, coupon).await
    }

    #[instrument(skip(self))]
    pub async fn list_announcements(&self) -> RentalResult<Vec<Value>> {
        self.find_all_json(Collection::Announcement).await
    }

    #[instrument(skip(self, announcement))]
    pub async fn add_announcement(
        &self,
        announcement: Map<String, Value>,
    ) -> RentalResult<InsertAck> {
        self.insert_json(Collection::Announcement, announcement)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> RentalResult<Vec<Value>> {
        self.find_all_json(Collection::Users).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, email: &str) -> RentalResult<Option<Value>> {
        let user = self
            .repository
            .find_one(Collection::Users, doc! { "email": email })
            .await?;
        Ok(user.map(document_to_json))
    }

    /// `$set` `changes` on the user with `email`. A missing user is not an error.
    #[instrument(skip(self, changes))]
    pub async fn update_user(
        &self,
        email: &str,
        changes: Map<String, Value>,
    ) -> RentalResult<UpdateAck> {
        require_email(email)?;
        let set = json_to_document(&changes)?;
        self.repository
            .update_one(Collection::Users, doc! { "email": email }, set, false)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, email: &str) -> RentalResult<DeleteAck> {
        require_email(email)?;
        self.repository
            .delete_one(Collection::Users, doc! { "email": email })
            .await
    }

    /// Create the user on first sight and send a welcome email.
    ///
    /// A known user is only overwritten when the payload's status is
    /// `Requested`; otherwise the stored record is returned as is. The lookup
    /// and the write are separate calls, so two first-time requests for the
    /// same email can both send a welcome email.
    #[instrument(skip(self, user), fields(email = %user.email()))]
    pub async fn upsert_user(&self, user: UserPayload) -> RentalResult<UpsertOutcome> {
        let filter = doc! { "email": user.email() };
        let existing = self
            .repository
            .find_one(Collection::Users, filter.clone())
            .await?;

        if let Some(existing) = existing {
            if !user.is_requested() {
                debug!("User exists, returning stored record");
                return Ok(UpsertOutcome::Existing(document_to_json(existing)));
            }

            let set = json_to_document(user.fields())?;
            let ack = self
                .repository
                .update_one(Collection::Users, filter, set, false)
                .await?;
            return Ok(UpsertOutcome::Updated(ack));
        }

        let email = user.email().to_string();
        let mut set = json_to_document(&user.into_fields())?;
        set.insert("timestamp", Utc::now().timestamp_millis() as f64);

        let ack = self
            .repository
            .update_one(Collection::Users, filter, set, true)
            .await?;
        info!("User created");

        let report = self.notifier.send(&email, WELCOME_SUBJECT, WELCOME_BODY).await;
        debug!(delivered = report.is_sent(), "Welcome email processed");

        Ok(UpsertOutcome::Created(ack))
    }

    #[instrument(skip(self, payment))]
    pub async fn record_payment(&self, payment: Map<String, Value>) -> RentalResult<InsertAck> {
        self.insert_json(Collection::Payment, payment).await
    }

    #[instrument(skip(self))]
    pub async fn payment_history(&self, email: &str) -> RentalResult<Vec<Value>> {
        let payments = self
            .repository
            .find_many(Collection::Payment, doc! { "email": email })
            .await?;
        Ok(payments.into_iter().map(document_to_json).collect())
    }

    /// Client secret of a new card intent for `rent` dollars.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, rent: &Value) -> RentalResult<String> {
        Ok(self.payments.create_intent(rent).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_apartments(&self, pagination: Pagination) -> RentalResult<Vec<Value>> {
        let apartments = self
            .repository
            .find_page(Collection::Apartment, pagination.skip(), pagination.limit())
            .await?;
        Ok(apartments.into_iter().map(document_to_json).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_apartment(&self, id: ObjectId) -> RentalResult<Option<Value>> {
        let apartment = self
            .repository
            .find_one(Collection::Apartment, doc! { "_id": id })
            .await?;
        Ok(apartment.map(document_to_json))
    }

    #[instrument(skip(self))]
    pub async fn count_apartments(&self) -> RentalResult<u64> {
        self.repository.estimated_count(Collection::Apartment).await
    }
}

fn require_email(email: &str) -> RentalResult<()> {
    if email.is_empty() {
        return Err(RentalError::BadRequest("email is required".to_string()));
    }
    Ok(())
}

impl<R: DocumentRepository> Clone for RentalService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            payments: self.payments.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockDocumentRepository;
    use email::MockSmtpProvider;
    use payments::MockPaymentProvider;
    use mongodb::bson::Document;
    use serde_json::json;

    fn user_doc(email: &str, status: &str) -> Document {
        doc! { "_id": ObjectId::new(), "email": email, "status": status, "name": "Ann" }
    }

    struct Harness {
        service: RentalService<MockDocumentRepository>,
        mail: MockSmtpProvider,
        payments: MockPaymentProvider,
    }

    fn harness(repository: MockDocumentRepository) -> Harness {
        let mail = MockSmtpProvider::new();
        let payments = MockPaymentProvider::new();
        let service = RentalService::new(
            repository,
            PaymentService::new(Arc::new(payments.clone())),
            Notifier::new(Arc::new(mail.clone())),
        );
        Harness {
            service,
            mail,
            payments,
        }
    }

    fn payload(value: Value) -> UserPayload {
        match value {
            Value::Object(fields) => UserPayload::try_from(fields).unwrap(),
            other => panic!("not an object: {other}"),
        }
    }

    fn ack(matched: u64, modified: u64, upserted: bool) -> UpdateAck {
        UpdateAck {
            acknowledged: true,
            matched_count: matched,
            modified_count: modified,
            upserted_count: u64::from(upserted),
            upserted_id: upserted.then(|| json!("665f1c2e9b1e8a3d4c2b1a09")),
        }
    }

    #[tokio::test]
    async fn test_upsert_new_user_inserts_and_welcomes() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one()
            .withf(|c, f| *c == Collection::Users && f.get_str("email").ok() == Some("ann@example.com"))
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_update_one()
            .withf(|c, f, set, upsert| {
                *c == Collection::Users
                    && f.get_str("email").ok() == Some("ann@example.com")
                    && set.get_str("email").ok() == Some("ann@example.com")
                    && set.get_f64("timestamp").is_ok()
                    && *upsert
            })
            .times(1)
            .returning(|_, _, _, _| Ok(ack(0, 0, true)));
        let h = harness(repo);

        let outcome = h
            .service
            .upsert_user(payload(json!({"email": "ann@example.com", "name": "Ann"})))
            .await
            .unwrap();

        assert!(matches!(outcome, UpsertOutcome::Created(ref a) if a.upserted_count == 1));
        let sent = h.mail.sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ann@example.com");
        assert_eq!(sent[0].subject, WELCOME_SUBJECT);
        assert_eq!(sent[0].body_html.as_deref(), Some(WELCOME_BODY));
    }

    #[tokio::test]
    async fn test_upsert_existing_user_returns_stored_record() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one()
            .times(1)
            .returning(|_, _| Ok(Some(user_doc("ann@example.com", "Member"))));
        repo.expect_update_one().times(0);
        let h = harness(repo);

        let outcome = h
            .service
            .upsert_user(payload(json!({"email": "ann@example.com", "name": "Changed"})))
            .await
            .unwrap();

        match outcome {
            UpsertOutcome::Existing(record) => {
                assert_eq!(record["name"], "Ann");
                assert_eq!(record["status"], "Member");
            }
            other => panic!("expected stored record, got {other:?}"),
        }
        assert_eq!(h.mail.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_upsert_requested_user_merges_fields() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one()
            .returning(|_, _| Ok(Some(user_doc("ann@example.com", "Member"))));
        repo.expect_update_one()
            .withf(|_, _, set, upsert| {
                set.get_str("status").ok() == Some("Requested")
                    && set.get_str("phone").ok() == Some("555")
                    && !set.contains_key("name")
                    && !set.contains_key("timestamp")
                    && !*upsert
            })
            .times(1)
            .returning(|_, _, _, _| Ok(ack(1, 1, false)));
        let h = harness(repo);

        let outcome = h
            .service
            .upsert_user(payload(
                json!({"email": "ann@example.com", "status": "Requested", "phone": "555"}),
            ))
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated(ack(1, 1, false)));
        assert_eq!(h.mail.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_upsert_survives_mail_failure() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one().returning(|_, _| Ok(None));
        repo.expect_update_one()
            .returning(|_, _, _, _| Ok(ack(0, 0, true)));
        let service = RentalService::new(
            repo,
            PaymentService::new(Arc::new(MockPaymentProvider::new())),
            Notifier::new(Arc::new(MockSmtpProvider::unreachable())),
        );

        let outcome = service
            .upsert_user(payload(json!({"email": "ann@example.com"})))
            .await
            .unwrap();

        assert!(matches!(outcome, UpsertOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_upsert_store_failure_sends_no_mail() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one()
            .returning(|_, _| Err(RentalError::StoreUnavailable("no servers".into())));
        let h = harness(repo);

        let err = h
            .service
            .upsert_user(payload(json!({"email": "ann@example.com"})))
            .await
            .unwrap_err();

        assert!(matches!(err, RentalError::StoreUnavailable(_)));
        assert_eq!(h.mail.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_apartments_pages() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_page()
            .withf(|c, skip, limit| *c == Collection::Apartment && *skip == 10 && *limit == 5)
            .times(1)
            .returning(|_, _, _| Ok(vec![doc! { "title": "Loft" }]));
        let h = harness(repo);

        let apartments = h.service.list_apartments(Pagination::new(2, 5)).await.unwrap();

        assert_eq!(apartments, vec![json!({"title": "Loft"})]);
    }

    #[tokio::test]
    async fn test_get_apartment_by_object_id() {
        let id = ObjectId::new();
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_one()
            .withf(move |c, f| *c == Collection::Apartment && f.get_object_id("_id").ok() == Some(id))
            .returning(move |_, _| Ok(Some(doc! { "_id": id, "rent": 1200 })));
        let h = harness(repo);

        let apartment = h.service.get_apartment(id).await.unwrap().unwrap();

        assert_eq!(apartment, json!({"_id": id.to_hex(), "rent": 1200}));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_an_error() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_delete_one()
            .withf(|c, f| *c == Collection::Users && f.get_str("email").ok() == Some("ghost@example.com"))
            .returning(|_, _| {
                Ok(DeleteAck {
                    acknowledged: true,
                    deleted_count: 0,
                })
            });
        let h = harness(repo);

        let ack = h.service.delete_user("ghost@example.com").await.unwrap();

        assert_eq!(ack.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_update_user_sets_changes_without_upsert() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_update_one()
            .withf(|c, f, set, upsert| {
                *c == Collection::Users
                    && f.get_str("email").ok() == Some("ann@example.com")
                    && set.get_str("role").ok() == Some("owner")
                    && !*upsert
            })
            .times(1)
            .returning(|_, _, _, _| Ok(ack(1, 1, false)));
        let h = harness(repo);

        let Value::Object(changes) = json!({"role": "owner"}) else {
            unreachable!()
        };
        let ack = h.service.update_user("ann@example.com", changes).await.unwrap();

        assert_eq!(ack.modified_count, 1);
    }

    #[tokio::test]
    async fn test_payment_history_filters_by_email() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_many()
            .withf(|c, f| *c == Collection::Payment && f.get_str("email").ok() == Some("ann@example.com"))
            .returning(|_, _| Ok(vec![doc! { "email": "ann@example.com", "amount": 1200 }]));
        let h = harness(repo);

        let history = h.service.payment_history("ann@example.com").await.unwrap();

        assert_eq!(history, vec![json!({"email": "ann@example.com", "amount": 1200})]);
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let h = harness(MockDocumentRepository::new());

        let secret = h.service.create_payment_intent(&json!(25)).await.unwrap();
        assert!(!secret.is_empty());
        assert_eq!(h.payments.amounts().await, vec![2500]);

        let err = h.service.create_payment_intent(&json!(0)).await.unwrap_err();
        assert!(matches!(err, RentalError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_estimated_count()
            .returning(|_| Err(RentalError::StoreOperationFailed("not authorized".into())));
        let h = harness(repo);

        let err = h.service.count_apartments().await.unwrap_err();

        assert!(matches!(err, RentalError::StoreOperationFailed(m) if m == "not authorized"));
    }
}
