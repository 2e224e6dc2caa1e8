use ferrum_search::{Criterion, SearchHandler, SearchResult};

/// Run `criterion` unpaged and unsorted, returning the matched ids.
pub async fn find_ids(handler: &SearchHandler, criterion: &Criterion) -> anyhow::Result<Vec<i64>> {
    let result = handler.find(criterion, 0, None, &[]).await?;
    Ok(result.ids())
}

/// Assert both the page content and the total count.
pub fn assert_result(result: &SearchResult, expected_ids: &[i64], expected_count: i64) {
    assert_eq!(
        result.ids(),
        expected_ids,
        "unexpected content ids for count {}",
        result.count
    );
    assert_eq!(
        result.count, expected_count,
        "expected total count {expected_count}, got {}",
        result.count
    );
}

pub async fn assert_finds(
    handler: &SearchHandler,
    criterion: &Criterion,
    expected_ids: &[i64],
) -> anyhow::Result<()> {
    let result = handler.find(criterion, 0, None, &[]).await?;
    assert_result(&result, expected_ids, expected_ids.len() as i64);
    Ok(())
}
