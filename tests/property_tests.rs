use proptest::prelude::*;
use unsplash_mcp::client::{ContentFilter, Orientation, PhotoQuery};
use unsplash_mcp::tools::search::MAX_PER_PAGE;
use unsplash_mcp::SearchPhotosInput;

fn orientation() -> impl Strategy<Value = Option<Orientation>> {
    prop_oneof![
        Just(None),
        Just(Some(Orientation::Landscape)),
        Just(Some(Orientation::Portrait)),
        Just(Some(Orientation::Squarish)),
    ]
}

proptest! {
    #[test]
    fn test_per_page_bounds(query in "[a-z]{1,20}", page in 1u32..1000, per_page in 0u32..100) {
        let mut input = SearchPhotosInput::new(query);
        input.page = page;
        input.per_page = per_page;

        let in_range = (1..=MAX_PER_PAGE).contains(&per_page);
        prop_assert_eq!(input.validate().is_ok(), in_range);
    }

    #[test]
    fn test_blank_queries_rejected(query in "[ \t\n]{0,10}") {
        prop_assert!(SearchPhotosInput::new(query).validate().is_err());
    }

    #[test]
    fn test_orientation_param_matches_request(
        query in "[a-zA-Z ]{1,30}",
        orientation in orientation(),
        high in any::<bool>(),
    ) {
        let params = PhotoQuery {
            query,
            page: 1,
            per_page: 10,
            orientation,
            content_filter: if high { ContentFilter::High } else { ContentFilter::Low },
        }
        .params();

        let sent: Vec<_> = params
            .iter()
            .filter(|(key, _)| *key == "orientation")
            .map(|(_, value)| value.as_str())
            .collect();
        let expected: Vec<_> = orientation.map(Orientation::as_str).into_iter().collect();
        prop_assert_eq!(sent, expected);
        prop_assert_eq!(params.len(), 4 + usize::from(orientation.is_some()));
    }
}
