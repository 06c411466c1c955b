//! Message posting and paginated history through the message service.

use crate::in_memory::helpers::{Services, services};
use rstest::rstest;

#[rstest]
#[case(1, 3)]
#[case(2, 2)]
#[case(3, 1)]
#[case(7, 1)]
#[tokio::test(flavor = "multi_thread")]
async fn every_page_size_preserves_order_and_totals(
    services: Services,
    #[case] limit: i64,
    #[case] expected_pages: u64,
) {
    let room = services.room_with_members("General", &["a@x.com"]).await;
    for body in ["m1", "m2", "m3"] {
        services.post(&room, "a@x.com", body).await;
    }

    let mut seen = Vec::new();
    for page in 1..=i64::try_from(expected_pages).expect("small page count") {
        let history = services
            .messages
            .get_room_messages(room.id(), limit, page)
            .await
            .expect("history should load");
        assert_eq!(history.page.total_items(), 3);
        assert_eq!(history.page.total_pages(), expected_pages);
        let timestamps: Vec<_> = history
            .page
            .messages()
            .iter()
            .map(|m| m.created_at())
            .collect();
        assert!(timestamps.windows(2).all(|pair| matches!(pair, [a, b] if a <= b)));
        seen.extend(
            history
                .page
                .messages()
                .iter()
                .map(|m| m.content().as_str().to_owned()),
        );
    }

    assert_eq!(seen, vec!["m1", "m2", "m3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_messages_are_visible_on_next_read(services: Services) {
    let room = services.room_with_members("General", &["a@x.com"]).await;
    services.post(&room, "a@x.com", "first").await;

    let before = services
        .messages
        .get_room_messages(room.id(), 10, 1)
        .await
        .expect("history should load");
    services.post(&room, "a@x.com", "second").await;
    let after = services
        .messages
        .get_room_messages(room.id(), 10, 1)
        .await
        .expect("history should load");

    assert_eq!(before.page.total_items(), 1);
    assert_eq!(after.page.total_items(), 2);
}
