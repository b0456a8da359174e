use review_resolver::modules::query::domain::query_builder::{
    ProductQueryBuilder, MAX_QUERY_LENGTH, MAX_VARIANTS,
};

#[test]
fn build_query_never_exceeds_limit() {
    let builder = ProductQueryBuilder::new();
    let long_title = "Ultra Quiet Countertop Blender Professional Grade Motor Stainless Steel \
        Blades Variable Speed Control Pulse Function Large Capacity Pitcher Dishwasher Safe \
        Parts Recipe Book Included Kitchen Appliance";
    let query = builder.build_query(long_title, Some("Model BL-9000 1500W 72oz"));
    assert!(query.chars().count() <= MAX_QUERY_LENGTH, "{}", query);
    assert!(!query.ends_with(' '));
}

#[test]
fn empty_title_gives_no_variants() {
    let builder = ProductQueryBuilder::new();
    assert!(builder.build_variants("", None).is_empty());
}

#[test]
fn variants_start_with_review_and_stay_bounded() {
    let builder = ProductQueryBuilder::new();
    for title in [
        "Echo Dot (5th Gen)",
        "Sony WH-1000XM5 Wireless Noise Canceling Headphones",
        "Apple iPhone 15 Pro Max 256GB",
        "Instant Pot Duo 7-in-1",
    ] {
        let variants = builder.build_variants(title, None);
        assert!(!variants.is_empty(), "{}", title);
        assert!(variants.len() <= MAX_VARIANTS, "{}", title);
        assert!(
            variants.as_slice()[0].ends_with(" review"),
            "{:?}",
            variants
        );

        let mut unique = variants.as_slice().to_vec();
        unique.dedup();
        assert_eq!(unique.len(), variants.len(), "duplicates in {:?}", variants);
    }
}

#[test]
fn variants_are_ordered_review_then_unboxing() {
    let variants = ProductQueryBuilder::new().build_variants("Echo Dot", None);
    let all: Vec<&String> = variants.iter().collect();
    assert_eq!(all[0], "echo dot review");
    assert_eq!(all[1], "echo dot unboxing");
}
