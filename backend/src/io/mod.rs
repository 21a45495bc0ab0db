//! # IO Module
//!
//! Exposes the domain services to the outside world. Today that is only the
//! JSON REST API in [`rest`].

pub mod rest;
