//! Declarative description of one admin API operation.
//!
//! A resource module declares one `RequestDescriptor` per operation as a
//! `const`. Descriptors carry only data: the verb, the path below the
//! resource prefix, which input fields fill URL placeholders, and the
//! response-handling flags the executor honours.

use crate::http::HttpMethod;

/// Where the id of a freshly created resource is reported back to the caller.
///
/// The executor reads the last segment of the `Location` response header and
/// returns it under `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedIdLocation {
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: &'static str,
    pub url_params: &'static [&'static str],
    /// Report a 404 as an empty result instead of an error.
    pub catch_not_found: bool,
    pub created_id: Option<CreatedIdLocation>,
    /// Fetch and merge the current representation before replacing it.
    pub requires_prior_fetch: bool,
}

impl RequestDescriptor {
    pub const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            url_params: &[],
            catch_not_found: false,
            created_id: None,
            requires_prior_fetch: false,
        }
    }

    pub const fn get(path: &'static str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub const fn post(path: &'static str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub const fn put(path: &'static str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub const fn delete(path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// A replace-semantics update: `PUT` preceded by a `GET` of the same path.
    pub const fn update(path: &'static str) -> Self {
        let mut descriptor = Self::new(HttpMethod::Put, path);
        descriptor.requires_prior_fetch = true;
        descriptor
    }

    pub const fn url_params(mut self, names: &'static [&'static str]) -> Self {
        self.url_params = names;
        self
    }

    pub const fn catch_not_found(mut self) -> Self {
        self.catch_not_found = true;
        self
    }

    pub const fn created_id_in_location(mut self, field: &'static str) -> Self {
        self.created_id = Some(CreatedIdLocation { field });
        self
    }

    pub fn is_url_param(&self, name: &str) -> bool {
        self.url_params.contains(&name)
    }

    /// The `GET` an update issues before its `PUT`. Not-found is never
    /// suppressed here: a missing target must fail the update.
    pub(crate) const fn prior_fetch(&self) -> Self {
        Self {
            method: HttpMethod::Get,
            path: self.path,
            url_params: self.url_params,
            catch_not_found: false,
            created_id: None,
            requires_prior_fetch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIND_ROLE: RequestDescriptor = RequestDescriptor::get("/{id}/roles/{roleName}")
        .url_params(&["id", "roleName"])
        .catch_not_found();

    #[test]
    fn builders_compose_in_const_context() {
        assert_eq!(FIND_ROLE.method, HttpMethod::Get);
        assert!(FIND_ROLE.catch_not_found);
        assert!(FIND_ROLE.is_url_param("roleName"));
        assert!(!FIND_ROLE.is_url_param("name"));
        assert!(FIND_ROLE.created_id.is_none());
    }

    #[test]
    fn update_is_a_put_with_prior_fetch() {
        let d = RequestDescriptor::update("/{id}").url_params(&["id"]);
        assert_eq!(d.method, HttpMethod::Put);
        assert!(d.requires_prior_fetch);

        let fetch = d.prior_fetch();
        assert_eq!(fetch.method, HttpMethod::Get);
        assert_eq!(fetch.path, "/{id}");
        assert_eq!(fetch.url_params, &["id"]);
        assert!(!fetch.requires_prior_fetch);
        assert!(!fetch.catch_not_found);
    }

    #[test]
    fn created_id_location_records_field() {
        let d = RequestDescriptor::post("/").created_id_in_location("roleName");
        assert_eq!(d.created_id, Some(CreatedIdLocation { field: "roleName" }));
    }
}
