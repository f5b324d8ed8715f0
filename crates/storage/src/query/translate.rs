use std::collections::BTreeMap;
use std::str::FromStr;

use crate::entity::{EntityDescriptor, EntityKind};

use super::{
    FieldValue, Inclusion, OrderBy, Pagination, QueryError, QueryOptions, SortDirection,
    StructuredQuery, UnknownFieldPolicy,
};

/// Translates query-string pairs into a [`StructuredQuery`] for `entity`.
///
/// Recognized keys are `filter[<field>]`, `limit`, `offset`, `page`,
/// `page_size`, `order`, `include` and `search`; anything else is ignored.
/// `order` and `include` accept comma-separated lists and may be repeated.
/// When a pagination key is repeated, the last value wins.
///
/// The result depends only on the arguments.
pub fn translate(
    params: &[(String, String)],
    entity: EntityKind,
    options: &QueryOptions,
) -> Result<StructuredQuery, QueryError> {
    let descriptor = entity.descriptor();

    let mut filter = BTreeMap::new();
    let mut paging = PagingParams::default();
    let mut order = Vec::new();
    let mut include = Inclusion::default();
    let mut search = None;

    for (key, value) in params {
        if let Some(name) = filter_field_name(key) {
            let Some(field) = descriptor.filter_field(name) else {
                match options.unknown_fields {
                    UnknownFieldPolicy::Reject => {
                        return Err(QueryError::UnknownFilterField {
                            entity,
                            field: name.to_string(),
                        });
                    }
                    UnknownFieldPolicy::Ignore => {
                        tracing::debug!(%entity, field = name, "Ignoring unknown filter field");
                        continue;
                    }
                }
            };

            let parsed = FieldValue::parse(field, value)?;
            if filter.insert(field.name, parsed).is_some() {
                return Err(QueryError::DuplicateFilter {
                    field: field.name.to_string(),
                });
            }
            continue;
        }

        match key.as_str() {
            "limit" => paging.limit = Some(parse_number("limit", value)?),
            "offset" => paging.offset = Some(parse_number("offset", value)?),
            "page" => paging.page = Some(parse_number("page", value)?),
            "page_size" => paging.page_size = Some(parse_number("page_size", value)?),
            "order" => push_order_terms(descriptor, value, &mut order)?,
            "include" => push_relations(descriptor, value, &mut include)?,
            "search" => {
                let term = value.trim();
                if term.contains('\0') {
                    return Err(QueryError::InvalidSearch);
                }
                search = (!term.is_empty()).then(|| term.to_string());
            }
            _ => {}
        }
    }

    if order.is_empty() {
        order.push(OrderBy {
            field: "created_at",
            direction: SortDirection::Asc,
        });
    }

    Ok(StructuredQuery {
        entity,
        filter,
        search,
        pagination: paging.resolve(options)?,
        order,
        include,
    })
}

/// Reads only the `include` keys, for single-record lookups.
pub fn translate_inclusion(
    params: &[(String, String)],
    entity: EntityKind,
) -> Result<Inclusion, QueryError> {
    let descriptor = entity.descriptor();
    let mut include = Inclusion::default();

    for (_, value) in params.iter().filter(|(key, _)| key == "include") {
        push_relations(descriptor, value, &mut include)?;
    }

    Ok(include)
}

fn filter_field_name(key: &str) -> Option<&str> {
    key.strip_prefix("filter[")?.strip_suffix(']')
}

fn parse_number<T: FromStr>(param: &'static str, raw: &str) -> Result<T, QueryError> {
    raw.trim()
        .parse()
        .map_err(|_| QueryError::InvalidPagination {
            param,
            reason: format!("must be a non-negative integer, got '{raw}'"),
        })
}

fn list_terms(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|term| !term.is_empty())
}

fn push_order_terms(
    descriptor: &EntityDescriptor,
    raw: &str,
    order: &mut Vec<OrderBy>,
) -> Result<(), QueryError> {
    for term in list_terms(raw) {
        let (name, direction) = if let Some(name) = term.strip_prefix('-') {
            (name, SortDirection::Desc)
        } else if let Some((name, direction)) = term.split_once(':') {
            (name, direction.parse()?)
        } else {
            (term, SortDirection::Asc)
        };

        let field = descriptor
            .sort_field(name)
            .ok_or_else(|| QueryError::UnknownOrderField {
                entity: descriptor.kind,
                field: name.to_string(),
            })?;

        if order.iter().any(|existing| existing.field == field.name) {
            return Err(QueryError::DuplicateOrder {
                field: field.name.to_string(),
            });
        }

        order.push(OrderBy {
            field: field.name,
            direction,
        });
    }

    Ok(())
}

fn push_relations(
    descriptor: &EntityDescriptor,
    raw: &str,
    include: &mut Inclusion,
) -> Result<(), QueryError> {
    for term in list_terms(raw) {
        if term == "_count" {
            include.count = true;
            continue;
        }

        let relation = descriptor
            .relation(term)
            .ok_or_else(|| QueryError::UnknownRelation {
                entity: descriptor.kind,
                relation: term.to_string(),
            })?;
        include.relations.insert(relation.name);
    }

    Ok(())
}

#[derive(Debug, Default)]
struct PagingParams {
    limit: Option<u32>,
    offset: Option<u64>,
    page: Option<u32>,
    page_size: Option<u32>,
}

impl PagingParams {
    fn resolve(self, options: &QueryOptions) -> Result<Pagination, QueryError> {
        let by_page = self.page.is_some() || self.page_size.is_some();
        let by_offset = self.limit.is_some() || self.offset.is_some();
        if by_page && by_offset {
            return Err(QueryError::InvalidPagination {
                param: "page",
                reason: "cannot be combined with limit or offset".to_string(),
            });
        }

        let (size_param, size) = match (self.limit, self.page_size) {
            (Some(limit), _) => ("limit", limit),
            (None, Some(page_size)) => ("page_size", page_size),
            (None, None) => ("limit", options.default_page_size),
        };
        if size == 0 || size > options.max_page_size {
            return Err(QueryError::InvalidPagination {
                param: size_param,
                reason: format!("must be between 1 and {}", options.max_page_size),
            });
        }

        let offset = match self.page {
            Some(0) => {
                return Err(QueryError::InvalidPagination {
                    param: "page",
                    reason: "must be >= 1".to_string(),
                });
            }
            Some(page) => u64::from(page - 1) * u64::from(size),
            None => self.offset.unwrap_or(0),
        };

        Ok(Pagination {
            limit: size,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::entity::FieldKind;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn coach_query(pairs: &[(&str, &str)]) -> Result<StructuredQuery, QueryError> {
        translate(&params(pairs), EntityKind::Coach, &QueryOptions::default())
    }

    #[test]
    fn test_whitelisted_filters_pass_through_unchanged() {
        let academy = Uuid::new_v4();
        let academy_id = academy.to_string();
        let query = coach_query(&[
            ("filter[status]", "active"),
            ("filter[name]", "Marta Vidal"),
            ("filter[academy_id]", academy_id.as_str()),
        ])
        .unwrap();

        assert_eq!(query.filter.len(), 3);
        assert_eq!(
            query.filter.get("status"),
            Some(&FieldValue::Text("active".to_string()))
        );
        assert_eq!(
            query.filter.get("name"),
            Some(&FieldValue::Text("Marta Vidal".to_string()))
        );
        assert_eq!(
            query.filter.get("academy_id"),
            Some(&FieldValue::Uuid(academy))
        );
    }

    #[test]
    fn test_unknown_filter_field_is_rejected_by_default() {
        let err = coach_query(&[("filter[tenant_id]", "x")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownFilterField {
                entity: EntityKind::Coach,
                field: "tenant_id".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_filter_field_is_dropped_when_ignored() {
        let options = QueryOptions {
            unknown_fields: UnknownFieldPolicy::Ignore,
            ..QueryOptions::default()
        };
        let query = translate(
            &params(&[("filter[password]", "x"), ("filter[status]", "active")]),
            EntityKind::Coach,
            &options,
        )
        .unwrap();

        assert!(!query.filter.contains_key("password"));
        assert_eq!(query.filter.keys().copied().collect::<Vec<_>>(), vec!["status"]);
    }

    #[test]
    fn test_non_filterable_column_is_not_a_filter() {
        // performance_notes is searchable but not filterable
        let err = translate(
            &params(&[("filter[performance_notes]", "fast")]),
            EntityKind::PlayerProfile,
            &QueryOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.parameter(), "filter[performance_notes]");
    }

    #[test]
    fn test_invalid_uuid_filter_fails_validation() {
        let err = coach_query(&[("filter[id]", "not-a-uuid")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterValue {
                field: "id".to_string(),
                expected: FieldKind::Uuid,
            }
        );
    }

    #[test]
    fn test_nul_in_text_filter_fails_validation() {
        let err = coach_query(&[("filter[status]", "act\u{0}ive")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterValue {
                field: "status".to_string(),
                expected: FieldKind::Text,
            }
        );
        assert_eq!(err.parameter(), "filter[status]");
    }

    #[test]
    fn test_timestamp_filter_is_parsed() {
        let query = coach_query(&[("filter[created_at]", "2025-01-01T00:00:00Z")]).unwrap();
        let Some(FieldValue::Timestamp(at)) = query.filter.get("created_at") else {
            panic!("expected a timestamp filter");
        };
        assert_eq!(at.to_string(), "2025-01-01 00:00:00");

        let err = coach_query(&[("filter[updated_at]", "last week")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterValue {
                field: "updated_at".to_string(),
                expected: FieldKind::Timestamp,
            }
        );
    }

    #[test]
    fn test_duplicate_filter_is_rejected() {
        let err = coach_query(&[("filter[status]", "active"), ("filter[status]", "inactive")])
            .unwrap_err();
        assert!(matches!(err, QueryError::DuplicateFilter { .. }));
    }

    #[test]
    fn test_default_pagination_and_order() {
        let query = coach_query(&[]).unwrap();

        assert_eq!(query.pagination, Pagination { limit: 20, offset: 0 });
        assert_eq!(
            query.order,
            vec![OrderBy {
                field: "created_at",
                direction: SortDirection::Asc,
            }]
        );
        assert!(query.include.is_empty());
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_limit_and_offset() {
        let query = coach_query(&[("limit", "10"), ("offset", "30")]).unwrap();
        assert_eq!(query.pagination, Pagination { limit: 10, offset: 30 });
    }

    #[test]
    fn test_page_and_page_size() {
        let query = coach_query(&[("page", "3"), ("page_size", "25")]).unwrap();
        assert_eq!(query.pagination, Pagination { limit: 25, offset: 50 });
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(coach_query(&[("limit", "0")]).is_err());
        assert!(coach_query(&[("limit", "101")]).is_err());
        assert!(coach_query(&[("limit", "100")]).is_ok());
        assert!(coach_query(&[("page", "0")]).is_err());
        assert!(coach_query(&[("limit", "-5")]).is_err());
        assert!(coach_query(&[("offset", "ten")]).is_err());

        let err = coach_query(&[("page", "2"), ("offset", "10")]).unwrap_err();
        assert_eq!(err.parameter(), "page");
    }

    #[test]
    fn test_configured_page_sizes() {
        let options = QueryOptions {
            default_page_size: 5,
            max_page_size: 8,
            ..QueryOptions::default()
        };
        let query = translate(&[], EntityKind::Player, &options).unwrap();
        assert_eq!(query.pagination.limit, 5);

        let err = translate(&params(&[("page_size", "9")]), EntityKind::Player, &options)
            .unwrap_err();
        assert_eq!(err.parameter(), "page_size");
    }

    #[test]
    fn test_order_terms() {
        let query = coach_query(&[("order", "name:desc, -created_at"), ("order", "status")])
            .unwrap();

        assert_eq!(
            query.order,
            vec![
                OrderBy {
                    field: "name",
                    direction: SortDirection::Desc,
                },
                OrderBy {
                    field: "created_at",
                    direction: SortDirection::Desc,
                },
                OrderBy {
                    field: "status",
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn test_order_rejects_unknown_and_duplicate_fields() {
        assert!(matches!(
            coach_query(&[("order", "tenant_id")]),
            Err(QueryError::UnknownOrderField { .. })
        ));
        assert!(matches!(
            coach_query(&[("order", "name:sideways")]),
            Err(QueryError::InvalidOrderDirection { .. })
        ));
        assert!(matches!(
            coach_query(&[("order", "name,-name")]),
            Err(QueryError::DuplicateOrder { .. })
        ));
    }

    #[test]
    fn test_include_whitelist() {
        let query = coach_query(&[("include", "player,academy"), ("include", "_count")]).unwrap();

        assert_eq!(
            query.include.relations().collect::<Vec<_>>(),
            vec!["academy", "player"]
        );
        assert!(query.include.counts());
    }

    #[test]
    fn test_include_rejects_nested_paths() {
        let err = coach_query(&[("include", "player.user")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownRelation {
                entity: EntityKind::Coach,
                relation: "player.user".to_string(),
            }
        );
    }

    #[test]
    fn test_search_term_with_nul_is_rejected() {
        let err = coach_query(&[("search", "mar\u{0}ta")]).unwrap_err();
        assert_eq!(err, QueryError::InvalidSearch);
        assert_eq!(err.parameter(), "search");
    }

    #[test]
    fn test_search_term_is_trimmed() {
        let query = coach_query(&[("search", "  marta ")]).unwrap();
        assert_eq!(query.search.as_deref(), Some("marta"));

        let query = coach_query(&[("search", "   ")]).unwrap();
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_unrelated_parameters_are_ignored() {
        let query = coach_query(&[("utm_source", "newsletter"), ("limit", "10")]).unwrap();
        assert_eq!(query.pagination.limit, 10);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_translation_is_deterministic() {
        let pairs = [
            ("filter[status]", "active"),
            ("filter[name]", "Leo"),
            ("include", "user,player_profile"),
            ("order", "-name"),
            ("limit", "10"),
        ];
        let mut reversed = pairs;
        reversed.reverse();

        let first = coach_query(&pairs).unwrap();
        assert_eq!(first, coach_query(&pairs).unwrap());
        assert_eq!(first, coach_query(&reversed).unwrap());
    }

    #[test]
    fn test_translate_inclusion_only_reads_include() {
        let include = translate_inclusion(
            &params(&[("include", "coach"), ("filter[nope]", "x"), ("limit", "0")]),
            EntityKind::Player,
        )
        .unwrap();
        assert_eq!(include.relations().collect::<Vec<_>>(), vec!["coach"]);
        assert!(!include.counts());
    }
}
