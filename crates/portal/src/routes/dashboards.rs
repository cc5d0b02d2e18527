//! Role-specific landing views.
//!
//! The dashboards' widgets (tickets, catalog, billing) live elsewhere; these
//! handlers only prove the guard admitted the right role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, response::IntoResponse};
use serde::Serialize;

use bsm_core::{Role, SessionIdentity};

use crate::middleware::{AdminOnly, CustomerOnly, RequireRole};

/// Signed-in user view for templates.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user_id: String,
    pub email: String,
}

impl From<&SessionIdentity> for UserView {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            user_id: identity.user_id.to_string(),
            email: identity
                .email
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
        }
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/admin.html")]
pub struct AdminDashboardTemplate {
    pub user: UserView,
}

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/customer.html")]
pub struct CustomerDashboardTemplate {
    pub user: UserView,
}

/// Admin landing view.
pub async fn admin(RequireRole(identity, _): RequireRole<AdminOnly>) -> impl IntoResponse {
    AdminDashboardTemplate {
        user: UserView::from(&identity),
    }
}

/// Customer landing view.
pub async fn customer(RequireRole(identity, _): RequireRole<CustomerOnly>) -> impl IntoResponse {
    CustomerDashboardTemplate {
        user: UserView::from(&identity),
    }
}

/// JSON body of the `/api/*/me` endpoints.
#[derive(Debug, Serialize)]
pub struct MeBody {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
}

impl MeBody {
    fn new(identity: &SessionIdentity, role: Role) -> Self {
        Self {
            user_id: identity.user_id.to_string(),
            email: identity.email.as_ref().map(ToString::to_string),
            role,
        }
    }
}

/// Signed-in admin, as JSON.
pub async fn admin_me(RequireRole(identity, _): RequireRole<AdminOnly>) -> Json<MeBody> {
    Json(MeBody::new(&identity, Role::Admin))
}

/// Signed-in customer, as JSON.
pub async fn customer_me(RequireRole(identity, _): RequireRole<CustomerOnly>) -> Json<MeBody> {
    Json(MeBody::new(&identity, Role::Customer))
}
