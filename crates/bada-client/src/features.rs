//! Named backend calls.
//!
//! Each method maps to one fixed action and shapes its arguments into the
//! payload keys the backend expects.

use bada_core::{KeyValueStore, Payload, UserId};
use bada_transport::protocol::encode_image;
use serde_json::{Value, json};

use crate::{ApiClient, dispatcher::CallResult};

/// Filter for `purchase.list`. Unset fields are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseFilter {
    pub branch_id: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

fn insert_opt(data: &mut Payload, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        data.insert(key.to_string(), Value::from(value));
    }
}

impl<K> ApiClient<K>
where
    K: KeyValueStore,
{
    /// `auth.login`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn login(&self, email: &str, password: &str) -> CallResult {
        self.call(
            "auth.login",
            payload(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// `auth.validate`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn validate_session(&self) -> CallResult {
        self.call("auth.validate", Payload::new()).await
    }

    /// `auth.logout`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn logout(&self) -> CallResult {
        self.call("auth.logout", Payload::new()).await
    }

    /// `announcement.list`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn announcements(&self) -> CallResult {
        self.call("announcement.list", Payload::new()).await
    }

    /// `announcement.create`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn create_announcement(&self, branch_id: &str, message: &str) -> CallResult {
        self.call(
            "announcement.create",
            payload(json!({ "branchId": branch_id, "message": message })),
        )
        .await
    }

    /// `announcement.update`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn update_announcement(&self, id: &str, message: &str) -> CallResult {
        self.call(
            "announcement.update",
            payload(json!({ "id": id, "message": message })),
        )
        .await
    }

    /// Deactivate an announcement (`announcement.update` with `deactivate`).
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn delete_announcement(&self, id: &str) -> CallResult {
        self.call(
            "announcement.update",
            payload(json!({ "id": id, "deactivate": true })),
        )
        .await
    }

    /// `attendance.checkin` with the device position.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn check_in(&self, employee_id: &UserId, gps_lat: f64, gps_lng: f64) -> CallResult {
        self.call(
            "attendance.checkin",
            payload(json!({ "employeeId": employee_id, "gpsLat": gps_lat, "gpsLng": gps_lng })),
        )
        .await
    }

    /// `attendance.checkout`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn check_out(&self, employee_id: &UserId) -> CallResult {
        self.call(
            "attendance.checkout",
            payload(json!({ "employeeId": employee_id })),
        )
        .await
    }

    /// `attendance.list` for one month.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn attendance(&self, employee_id: &UserId, month: u32, year: i32) -> CallResult {
        self.call(
            "attendance.list",
            payload(json!({ "employeeId": employee_id, "month": month, "year": year })),
        )
        .await
    }

    /// `purchase.upload` with an already base64-encoded receipt image.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn upload_purchase(
        &self,
        image_base64: &str,
        approver_id: &UserId,
        branch_id: &str,
    ) -> CallResult {
        self.call(
            "purchase.upload",
            payload(json!({
                "image_base64": image_base64,
                "approver_id": approver_id,
                "branch_id": branch_id,
            })),
        )
        .await
    }

    /// `purchase.upload` from raw image bytes.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn upload_purchase_bytes(
        &self,
        image: &[u8],
        approver_id: &UserId,
        branch_id: &str,
    ) -> CallResult {
        self.upload_purchase(&encode_image(image), approver_id, branch_id)
            .await
    }

    /// `purchase.list`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn purchases(&self, filter: &PurchaseFilter) -> CallResult {
        let mut data = Payload::new();
        insert_opt(&mut data, "branch_id", filter.branch_id.as_deref());
        insert_opt(&mut data, "status", filter.status.as_deref());
        insert_opt(&mut data, "date_from", filter.date_from.as_deref());
        insert_opt(&mut data, "date_to", filter.date_to.as_deref());
        self.call("purchase.list", data).await
    }

    /// `purchase.approve` (or reject, depending on `status`).
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn approve_purchase(
        &self,
        purchase_id: &str,
        status: &str,
        note: Option<&str>,
    ) -> CallResult {
        let mut data = payload(json!({ "purchase_id": purchase_id, "status": status }));
        insert_opt(&mut data, "note", note);
        self.call("purchase.approve", data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, client_with};
    use bada_core::ApiResult;

    async fn sent_by<F, Fut>(f: F) -> bada_core::Envelope
    where
        F: FnOnce(ApiClient<bada_session::storage::MemoryStore>) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let transport = MockTransport::replying(ApiResult::ok(Value::Null));
        let (client, _rx) = client_with(transport.clone());
        f(client).await;
        transport.last()
    }

    #[tokio::test]
    async fn test_auth_actions() {
        let login = sent_by(|c| async move {
            c.login("a@x.com", "p").await.unwrap();
        })
        .await;
        assert_eq!(login.action, "auth.login");
        assert_eq!(Value::Object(login.data), json!({"email": "a@x.com", "password": "p"}));

        let validate = sent_by(|c| async move {
            c.validate_session().await.unwrap();
        })
        .await;
        assert_eq!(validate.action, "auth.validate");
        assert!(validate.data.is_empty());

        let logout = sent_by(|c| async move {
            c.logout().await.unwrap();
        })
        .await;
        assert_eq!(logout.action, "auth.logout");
    }

    #[tokio::test]
    async fn test_announcement_actions() {
        let list = sent_by(|c| async move {
            c.announcements().await.unwrap();
        })
        .await;
        assert_eq!(list.action, "announcement.list");

        let create = sent_by(|c| async move {
            c.create_announcement("BR002", "Staff meeting").await.unwrap();
        })
        .await;
        assert_eq!(create.action, "announcement.create");
        assert_eq!(
            Value::Object(create.data),
            json!({"branchId": "BR002", "message": "Staff meeting"})
        );

        let update = sent_by(|c| async move {
            c.update_announcement("A1", "Moved to 3pm").await.unwrap();
        })
        .await;
        assert_eq!(update.action, "announcement.update");
        assert_eq!(Value::Object(update.data), json!({"id": "A1", "message": "Moved to 3pm"}));

        let delete = sent_by(|c| async move {
            c.delete_announcement("A1").await.unwrap();
        })
        .await;
        assert_eq!(delete.action, "announcement.update");
        assert_eq!(Value::Object(delete.data), json!({"id": "A1", "deactivate": true}));
    }

    #[tokio::test]
    async fn test_attendance_actions() {
        let id = UserId::Number(7);

        let check_in = sent_by(|c| {
            let id = id.clone();
            async move {
                c.check_in(&id, 25.0857, 55.2094).await.unwrap();
            }
        })
        .await;
        assert_eq!(check_in.action, "attendance.checkin");
        assert_eq!(
            Value::Object(check_in.data),
            json!({"employeeId": 7, "gpsLat": 25.0857, "gpsLng": 55.2094})
        );

        let check_out = sent_by(|c| {
            let id = id.clone();
            async move {
                c.check_out(&id).await.unwrap();
            }
        })
        .await;
        assert_eq!(check_out.action, "attendance.checkout");
        assert_eq!(Value::Object(check_out.data), json!({"employeeId": 7}));

        let list = sent_by(|c| {
            let id = id.clone();
            async move {
                c.attendance(&id, 3, 2026).await.unwrap();
            }
        })
        .await;
        assert_eq!(list.action, "attendance.list");
        assert_eq!(
            Value::Object(list.data),
            json!({"employeeId": 7, "month": 3, "year": 2026})
        );
    }

    #[tokio::test]
    async fn test_purchase_actions_use_snake_case() {
        let upload = sent_by(|c| async move {
            c.upload_purchase("aGk=", &UserId::Text("M-2".into()), "BR003")
                .await
                .unwrap();
        })
        .await;
        assert_eq!(upload.action, "purchase.upload");
        assert_eq!(
            Value::Object(upload.data),
            json!({"image_base64": "aGk=", "approver_id": "M-2", "branch_id": "BR003"})
        );

        let list = sent_by(|c| async move {
            let filter = PurchaseFilter {
                branch_id: Some("BR001".into()),
                status: Some("pending".into()),
                ..PurchaseFilter::default()
            };
            c.purchases(&filter).await.unwrap();
        })
        .await;
        assert_eq!(list.action, "purchase.list");
        assert_eq!(
            Value::Object(list.data),
            json!({"branch_id": "BR001", "status": "pending"})
        );

        let approve = sent_by(|c| async move {
            c.approve_purchase("P9", "approved", Some("ok")).await.unwrap();
        })
        .await;
        assert_eq!(approve.action, "purchase.approve");
        assert_eq!(
            Value::Object(approve.data),
            json!({"purchase_id": "P9", "status": "approved", "note": "ok"})
        );
    }

    #[tokio::test]
    async fn test_upload_bytes_encodes_base64() {
        let upload = sent_by(|c| async move {
            c.upload_purchase_bytes(b"hi", &UserId::Number(2), "BR001")
                .await
                .unwrap();
        })
        .await;
        assert_eq!(upload.data["image_base64"], "aGk=");
    }

    #[tokio::test]
    async fn test_approve_without_note_omits_key() {
        let approve = sent_by(|c| async move {
            c.approve_purchase("P9", "rejected", None).await.unwrap();
        })
        .await;
        assert!(!approve.data.contains_key("note"));
    }
}
