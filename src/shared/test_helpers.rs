use axum::{extract::Request, middleware::Next, response::Response, Router};
use fake::{faker::internet::en::SafeEmail, Fake};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

pub fn create_user(roles: &[&str], organization_id: Option<Uuid>) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        email: Some(SafeEmail().fake()),
        organization_id,
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

pub fn create_super_admin_user() -> AuthenticatedUser {
    create_user(&["super_admin"], None)
}

/// Wrap a router so every request carries `user`, as the auth middleware would
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

pub fn with_super_admin_auth(router: Router) -> Router {
    with_user(router, create_super_admin_user())
}
