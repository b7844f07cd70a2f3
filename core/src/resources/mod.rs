//! Declarative operation tables, one module per admin resource.
//!
//! Each module exposes its prefix, one `const` descriptor per operation, an
//! `OPERATIONS` table keyed by operation name and a thin typed facade over
//! the executor. The executor never inspects which resource it serves.

pub mod clients;
pub mod users;

pub use clients::{ClientQuery, Clients, Page};
pub use users::{UserQuery, Users};

#[cfg(test)]
pub(crate) mod tests {
    use crate::descriptor::RequestDescriptor;

    fn placeholders(template: &str) -> Vec<&str> {
        template
            .split('{')
            .skip(1)
            .filter_map(|part| part.split_once('}').map(|(name, _)| name))
            .collect()
    }

    /// Every placeholder except the ambient `realm` is declared as a URL
    /// parameter, and every declared parameter appears in the path.
    pub(crate) fn assert_table_is_consistent(prefix: &str, operations: &[(&str, RequestDescriptor)]) {
        assert_eq!(placeholders(prefix), ["realm"]);
        for (name, d) in operations {
            let used = placeholders(d.path);
            for placeholder in &used {
                assert!(d.is_url_param(placeholder), "{name}: `{placeholder}` is not declared");
            }
            for param in d.url_params {
                assert!(used.contains(param), "{name}: `{param}` is not in {}", d.path);
            }
        }
    }

    #[test]
    fn placeholders_are_listed_in_order() {
        assert_eq!(placeholders("/{id}/roles/{roleName}/users"), ["id", "roleName"]);
        assert!(placeholders("/").is_empty());
    }
}
