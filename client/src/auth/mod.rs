//! Authentication and session gating.
//!
//! ARCHITECTURE
//! ============
//! `session` defines the data, `provider` the seam to the hosted identity
//! service, `supabase` its concrete client. `guard` is the pure route-guard
//! state machine and `driver` binds it to a provider for one page mount.
//! `callback` completes the OAuth redirect.

pub mod callback;
pub mod driver;
pub mod guard;
pub mod provider;
pub mod session;
pub mod supabase;

#[cfg(test)]
pub(crate) mod testing;
