//! Criterion search against the fixture corpus
//!
//! Covers the content, location, type, section, status and date criteria,
//! their logical combinations, paging and sorting, and `find_single`.

mod support;

use ferrum_search::{
    ContentStatus, Criterion, DateTarget, Error, Operator, SortClause, SortTarget, Value,
};
use support::*;

// ============================================================================
// CONTENT COLUMNS
// ============================================================================

#[tokio::test]
async fn content_id_skips_missing_ids() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;

    let result = handler
        .find(&Criterion::content_id([1, 4, 10]), 0, None, &[])
        .await?;
    assert_result(&result, &[4, 10], 2);
    Ok(())
}

#[tokio::test]
async fn content_type_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(&store.handler()?, &Criterion::content_type_id([4]), &[10, 14]).await
}

#[tokio::test]
async fn remote_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::remote_id([USERS_REMOTE_ID, ANONYMOUS_REMOTE_ID]);
    assert_finds(&store.handler()?, &criterion, &[4, 10]).await
}

#[tokio::test]
async fn section_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(
        &store.handler()?,
        &Criterion::section_id([2]),
        &[4, 10, 11, 12, 13, 14, 42],
    )
    .await
}

#[tokio::test]
async fn status_published_first_page() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;

    let result = handler
        .find(&Criterion::status([ContentStatus::Published]), 0, Some(10), &[])
        .await?;
    // Design is archived and Shop is a draft
    assert_result(&result, &[4, 10, 11, 12, 13, 14, 41, 42, 45, 49], 22);
    Ok(())
}

#[tokio::test]
async fn status_draft_and_archived() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::status([ContentStatus::Draft, ContentStatus::Archived]);
    assert_finds(&store.handler()?, &criterion, &[56, 66]).await
}

// ============================================================================
// LOCATIONS AND GROUPS
// ============================================================================

#[tokio::test]
async fn location_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(&store.handler()?, &Criterion::location_id([1, 2, 5]), &[4, 65]).await
}

#[tokio::test]
async fn parent_location_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(
        &store.handler()?,
        &Criterion::parent_location_id([1]),
        &[4, 41, 45, 56, 65],
    )
    .await
}

#[tokio::test]
async fn subtree_includes_root_location() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(
        &store.handler()?,
        &Criterion::subtree(["/1/2/69/"])?,
        &[67, 68, 69, 70, 71, 72, 73, 74],
    )
    .await
}

#[tokio::test]
async fn subtree_counts_multi_location_content_once() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    // Anonymous User sits at two locations below /1/5/
    assert_finds(
        &store.handler()?,
        &Criterion::subtree(["/1/5/"])?,
        &[4, 10, 11, 12, 13, 14, 42, 225],
    )
    .await
}

#[tokio::test]
async fn content_type_group_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    assert_finds(
        &store.handler()?,
        &Criterion::content_type_group_id([2]),
        &[4, 10, 11, 12, 13, 14, 42, 225],
    )
    .await
}

// ============================================================================
// DATE METADATA
// ============================================================================

fn modified(operator: Operator, values: Vec<i64>) -> anyhow::Result<Criterion> {
    let values: Vec<Value> = values.into_iter().map(Value::Int).collect();
    Ok(Criterion::date_metadata(DateTarget::Modified, operator, values)?)
}

#[tokio::test]
async fn date_modified_comparisons() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;

    let gt = modified(Operator::Gt, vec![1_311_154_214])?;
    assert_eq!(find_ids(&handler, &gt).await?, vec![11, 225]);

    let gte = modified(Operator::Gte, vec![1_311_154_214])?;
    assert_eq!(find_ids(&handler, &gte).await?, vec![11, 14, 225]);

    let lt = modified(Operator::Lt, vec![BASE_MODIFIED + 1])?;
    assert_eq!(find_ids(&handler, &lt).await?.len(), 19);

    let within = modified(Operator::In, vec![1_311_154_214, 1_311_154_215])?;
    assert_eq!(find_ids(&handler, &within).await?, vec![11, 14, 225]);

    let between = modified(Operator::Between, vec![1_311_154_213, 1_311_154_215])?;
    assert_eq!(find_ids(&handler, &between).await?, vec![11, 14, 225]);
    Ok(())
}

#[tokio::test]
async fn date_created_between() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::date_metadata(
        DateTarget::Created,
        Operator::Between,
        vec![Value::Int(1_299_780_749), Value::Int(1_311_154_215)],
    )?;
    assert_finds(&store.handler()?, &criterion, &[66, 131, 225]).await
}

// ============================================================================
// LOGICAL COMBINATIONS
// ============================================================================

#[tokio::test]
async fn logical_and() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::and(vec![
        Criterion::content_id([1, 4, 10]),
        Criterion::content_id([4, 12]),
    ])?;
    assert_finds(&store.handler()?, &criterion, &[4]).await
}

#[tokio::test]
async fn logical_or() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::or(vec![
        Criterion::content_id([1, 4, 10]),
        Criterion::content_id([4, 12]),
    ])?;
    assert_finds(&store.handler()?, &criterion, &[4, 10, 12]).await
}

#[tokio::test]
async fn logical_and_not() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::and(vec![
        Criterion::content_id([1, 4, 10]),
        Criterion::not(Criterion::content_id([10, 12])),
    ])?;
    assert_finds(&store.handler()?, &criterion, &[4]).await
}

#[tokio::test]
async fn and_of_two_locations_requires_both_on_the_same_item() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    // Anonymous User is placed at both 45 and 80
    let criterion = Criterion::and(vec![
        Criterion::location_id([45]),
        Criterion::location_id([80]),
    ])?;
    assert_finds(&store.handler()?, &criterion, &[10]).await
}

#[tokio::test]
async fn not_excludes_items_with_any_matching_location() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::and(vec![
        Criterion::content_type_id([4]),
        Criterion::not(Criterion::parent_location_id([12])),
    ])?;
    assert_finds(&store.handler()?, &criterion, &[14]).await
}

#[tokio::test]
async fn or_across_handlers() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let criterion = Criterion::or(vec![
        Criterion::location_id([2]),
        Criterion::content_type_group_id([3]),
        Criterion::section_id([4]),
    ])?;
    assert_finds(
        &store.handler()?,
        &criterion,
        &[45, 65, 68, 69, 70, 71, 72, 73, 74],
    )
    .await
}

// ============================================================================
// PAGING AND SORTING
// ============================================================================

#[tokio::test]
async fn count_is_independent_of_window() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;
    let criterion = Criterion::status([ContentStatus::Published]);

    let page = handler.find(&criterion, 2, Some(3), &[]).await?;
    assert_result(&page, &[11, 12, 13], 22);

    let past_end = handler.find(&criterion, 100, Some(3), &[]).await?;
    assert_result(&past_end, &[], 22);

    let empty_window = handler.find(&criterion, 0, Some(0), &[]).await?;
    assert_result(&empty_window, &[], 22);

    let huge_offset = handler.find(&criterion, u64::MAX, Some(3), &[]).await?;
    assert_result(&huge_offset, &[], 22);
    Ok(())
}

#[tokio::test]
async fn sort_by_modified_falls_back_to_id() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let result = store
        .handler()?
        .find(
            &Criterion::content_type_group_id([2]),
            0,
            None,
            &[SortClause::desc(SortTarget::DateModified)],
        )
        .await?;
    assert_result(&result, &[11, 225, 14, 4, 10, 12, 13, 42], 8);
    Ok(())
}

#[tokio::test]
async fn sort_by_name() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let result = store
        .handler()?
        .find(
            &Criterion::content_type_group_id([2]),
            0,
            Some(4),
            &["content_name:asc".parse::<SortClause>()?],
        )
        .await?;
    assert_result(&result, &[14, 12, 10, 42], 8);
    Ok(())
}

#[tokio::test]
async fn sort_by_content_id_descending() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let result = store
        .handler()?
        .find(
            &Criterion::content_id([4, 10, 12]),
            0,
            None,
            &[SortClause::desc(SortTarget::ContentId)],
        )
        .await?;
    assert_result(&result, &[12, 10, 4], 3);
    Ok(())
}

// ============================================================================
// LOADED CONTENT
// ============================================================================

#[tokio::test]
async fn loaded_content_carries_locations_and_current_fields() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;

    let anonymous = handler.find_single(&Criterion::content_id([10])).await?;
    assert_eq!(anonymous.name, "Anonymous User");
    assert_eq!(anonymous.remote_id, ANONYMOUS_REMOTE_ID);
    assert_eq!(anonymous.status, ContentStatus::Published);
    let locations: Vec<i64> = anonymous.locations.iter().map(|l| l.id).collect();
    assert_eq!(locations, vec![45, 80]);
    assert_eq!(anonymous.fields.len(), 1);

    let editors = handler.find_single(&Criterion::content_id([13])).await?;
    assert_eq!(editors.current_version, 2);
    let values: Vec<Option<String>> = editors
        .fields
        .iter()
        .map(|f| f.sort_key_string.clone())
        .collect();
    assert_eq!(values, vec![Some("editors".to_string())]);
    Ok(())
}

#[tokio::test]
async fn page_order_survives_loading() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let result = store
        .handler()?
        .find(
            &Criterion::content_id([4, 10, 65]),
            0,
            None,
            &[SortClause::desc(SortTarget::ContentId)],
        )
        .await?;
    let names: Vec<&str> = result.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Anonymous User", "Users"]);
    Ok(())
}

// ============================================================================
// FIND SINGLE
// ============================================================================

#[tokio::test]
async fn find_single_requires_exactly_one_match() -> anyhow::Result<()> {
    let store = TestStore::new().await?;
    let handler = store.handler()?;

    let found = handler.find_single(&Criterion::content_id([10])).await?;
    assert_eq!(found.id, 10);

    let err = handler
        .find_single(&Criterion::content_id([4, 10, 12, 23]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResultCount { count: 3 }));

    let err = handler
        .find_single(&Criterion::content_id([999]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResultCount { count: 0 }));
    Ok(())
}
