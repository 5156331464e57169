//! # Resource Trait
//!
//! The `Resource` trait describes one REST collection the console keeps in sync
//! (enterprises, classes, promo codes, ...). Resources are zero-sized marker types:
//! records themselves stay opaque, the trait only carries the static facts the
//! generic machinery needs (where the collection lives, which fields are searchable,
//! who paginates).
//!
//! # Architecture Note
//! Parameterising the actor, client and coordinator over `R: Resource` means the
//! list-sync logic is written *once*, while the compiler still stops an enterprise
//! screen from accidentally talking to the promo-code store.

use crate::record::RecordId;

/// Who slices the collection into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// The backend returns one page per request along with page metadata.
    Server,
    /// The backend returns the whole list and the projection pages locally.
    Client,
}

/// Static description of a REST collection.
pub trait Resource: Send + Sync + 'static {
    /// Short label used in logs and error messages (e.g. `"enterprises"`).
    const NAME: &'static str;

    /// Collection path, e.g. `/enterprises`.
    const PATH: &'static str;

    /// Fields matched by the search term. Dotted paths reach into nested objects.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Whether the backend or the projection paginates.
    const PAGINATION: PaginationMode = PaginationMode::Client;

    /// Boolean field flipped by `PATCH path/:id/toggle`, if the resource supports it.
    const TOGGLE_FIELD: Option<&'static str> = None;

    fn collection_path() -> String {
        Self::PATH.trim_end_matches('/').to_string()
    }

    fn item_path(id: &RecordId) -> String {
        format!("{}/{}", Self::collection_path(), id)
    }

    fn toggle_path(id: &RecordId) -> String {
        format!("{}/toggle", Self::item_path(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Coupons;

    impl Resource for Coupons {
        const NAME: &'static str = "coupons";
        const PATH: &'static str = "/coupons/";
        const SEARCH_FIELDS: &'static [&'static str] = &["code"];
        const TOGGLE_FIELD: Option<&'static str> = Some("isActive");
    }

    #[test]
    fn paths_are_built_from_the_collection_root() {
        let id = RecordId::from("p-3");
        assert_eq!(Coupons::collection_path(), "/coupons");
        assert_eq!(Coupons::item_path(&id), "/coupons/p-3");
        assert_eq!(Coupons::toggle_path(&id), "/coupons/p-3/toggle");
        assert_eq!(Coupons::PAGINATION, PaginationMode::Client);
    }
}
