//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Guarded pages wrap their content in `AuthGuard`.

pub mod callback;
pub mod dashboard;
pub mod forgot_password;
pub mod home;
pub mod login;
