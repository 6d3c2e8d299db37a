use crate::error::Result;
use crate::github::CommitSource;
use crate::model::{CommitRecord, LocTotals};
use tracing::debug;

/// Walk the whole default-branch history of `owner/repo` and sum the lines
/// of commits authored by `identity`. Repositories without a default branch
/// contribute nothing.
pub fn aggregate<S: CommitSource + ?Sized>(
    source: &mut S,
    owner: &str,
    repo: &str,
    identity: &str,
) -> Result<LocTotals> {
    let mut totals = LocTotals::default();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = match source.fetch_commit_page(owner, repo, cursor.as_deref())? {
            Some(page) => page,
            None => {
                debug!(%owner, %repo, "no default branch");
                return Ok(LocTotals::default());
            }
        };
        pages += 1;

        for record in authored_by(&page.records, identity) {
            totals.add(record.additions, record.deletions);
        }

        match page.next_token {
            Some(next) if !page.records.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    debug!(%owner, %repo, pages, additions = totals.additions, deletions = totals.deletions, "history walked");
    Ok(totals)
}

pub fn authored_by<'a>(
    records: &'a [CommitRecord],
    identity: &'a str,
) -> impl Iterator<Item = &'a CommitRecord> + 'a {
    records
        .iter()
        .filter(move |r| r.author.as_deref() == Some(identity))
}
