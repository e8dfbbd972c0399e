//! JSON API routes that live outside the gate matcher set.

pub mod plaid;
