//! The REST collections managed by the console.

use sync_framework::{PaginationMode, Resource};

/// Customer organisations. The backend pages this list itself.
pub struct Enterprises;

impl Resource for Enterprises {
    const NAME: &'static str = "enterprises";
    const PATH: &'static str = "/enterprises";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "phone"];
    const PAGINATION: PaginationMode = PaginationMode::Server;
}

pub struct Classes;

impl Resource for Classes {
    const NAME: &'static str = "classes";
    const PATH: &'static str = "/classes";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "enterprise.name"];
}

/// Subscription packages sold to enterprises.
pub struct Packages;

impl Resource for Packages {
    const NAME: &'static str = "packages";
    const PATH: &'static str = "/packages";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];
}

/// Discount codes; `isActive` is flipped through the toggle endpoint.
pub struct PromoCodes;

impl Resource for PromoCodes {
    const NAME: &'static str = "promo-codes";
    const PATH: &'static str = "/promo-codes";
    const SEARCH_FIELDS: &'static [&'static str] = &["code", "description"];
    const TOGGLE_FIELD: Option<&'static str> = Some("isActive");
}

pub struct Roles;

impl Resource for Roles {
    const NAME: &'static str = "roles";
    const PATH: &'static str = "/roles";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "permissions"];
}

/// Generated reports. Read-only from the console.
pub struct Reports;

impl Resource for Reports {
    const NAME: &'static str = "reports";
    const PATH: &'static str = "/reports";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "type", "enterprise.name"];
}
