//! Client for issuing Token-2022 mints with extensions and administering
//! their Token ACL gating and allow/block lists.
//!
//! Every operation returns an unsigned transaction; signing and sending stay
//! with the caller.

#![allow(clippy::arithmetic_side_effects)]

pub mod catalog;
pub mod client;
pub mod compose;
pub mod config;
pub mod error;
pub mod extension;
pub mod layout;
pub mod token;

pub use {allow_block_list_interface, token_acl_interface};
