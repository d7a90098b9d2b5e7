//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions; `PostgreSQL` store in production)
//! 6. Session expiry (sign out when the marketplace rejects the token)
//! 7. Error pages (re-render with the visitor's navigation and flash)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAdmin, RequireAuth, clear_current_user, is_htmx, login_url,
    set_current_user,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{
    SESSION_COOKIE_NAME, create_session_layer, error_page_middleware, session_expiry_middleware,
};
