//! HTTP handlers

pub mod health;
pub mod modules;
pub mod access;
pub mod franchises;
pub mod groups;
