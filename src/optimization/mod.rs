//! Circular debt netting.

pub mod netting;
