//! Paged retrieval of an account's historical posts.

use tracing::{debug, info, instrument};

use crate::{
    client::{TimelineRequest, TwitterApiClient, MAX_TIMELINE_PAGE},
    error::TwitterResult,
    types::Status,
};

/// Upper bound on pages read for one account. The platform only serves the
/// most recent 3 200 posts, which is 16 full pages.
pub const MAX_HISTORY_PAGES: usize = 16;

/// Fetch up to `limit` of the account's most recent posts, newest first.
///
/// Pages backwards with `max_id` until enough posts are collected, a page
/// comes back empty, or the cursor stops moving.
#[instrument(skip(client))]
pub async fn fetch_history(
    client: &TwitterApiClient,
    screen_name: &str,
    limit: usize,
) -> TwitterResult<Vec<Status>> {
    let mut statuses: Vec<Status> = Vec::new();
    let mut request = TimelineRequest::new(screen_name);

    for page in 1..=MAX_HISTORY_PAGES {
        if statuses.len() >= limit {
            break;
        }

        let wanted = limit - statuses.len();
        request.count = u32::try_from(wanted)
            .unwrap_or(MAX_TIMELINE_PAGE)
            .min(MAX_TIMELINE_PAGE);

        let batch = client.user_timeline(&request).await?;
        debug!(page, received = batch.len(), "Fetched timeline page");

        let Some(oldest) = batch.iter().map(Status::status_id).min() else {
            break;
        };

        let before = statuses.len();
        statuses.extend(
            batch
                .into_iter()
                .filter(|s| request.max_id.map_or(true, |max| s.status_id() <= max)),
        );

        let next_max = oldest.saturating_sub(1);
        if statuses.len() == before || oldest == 0 || request.max_id == Some(next_max) {
            break;
        }
        request.max_id = Some(next_max);
    }

    statuses.truncate(limit);
    info!(screen_name, count = statuses.len(), "Fetched account history");
    Ok(statuses)
}
