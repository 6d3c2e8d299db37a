use super::queries::{
    self, ContributionsData, CountedHistory, GraphQlResponse, HistoryPage, RepositoryConnection,
    RepositoryData, UserData, UserId, UserRepositories,
};
use super::CommitSource;
use crate::error::{GhstatError, Result};
use crate::model::{Affiliation, CommitPage, CommitRecord, RepositorySnapshot};
use crate::stats::{QueryKind, QueryStats};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// Blocking GraphQL client. Every request is counted in [`QueryStats`].
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
    login: String,
    stats: QueryStats,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str, login: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ghstat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
            token: token.to_string(),
            login: login.to_string(),
            stats: QueryStats::default(),
        })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }

    fn query<T: DeserializeOwned>(
        &mut self,
        kind: QueryKind,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        self.stats.record(kind);
        debug!(query = %kind, %variables, "graphql request");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GhstatError::RateLimited {
                context: kind.to_string(),
            });
        }
        if !status.is_success() {
            return Err(GhstatError::Api {
                status: status.as_u16(),
                context: kind.to_string(),
            });
        }

        let body: GraphQlResponse<T> = response.json()?;
        if !body.errors.is_empty() {
            let message = body
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GhstatError::GraphQl {
                context: kind.to_string(),
                message,
            });
        }
        body.data.ok_or_else(|| GhstatError::GraphQl {
            context: kind.to_string(),
            message: "response carried no data".to_string(),
        })
    }

    fn user<T: DeserializeOwned>(
        &mut self,
        kind: QueryKind,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let data: UserData<T> = self.query(kind, query, variables)?;
        data.user.ok_or_else(|| GhstatError::GraphQl {
            context: kind.to_string(),
            message: format!("user '{}' not found", self.login),
        })
    }

    /// Account node id, used to recognise commits authored by the account.
    pub fn user_id(&mut self) -> Result<String> {
        let login = self.login.clone();
        let user: UserId = self.user(QueryKind::UserId, queries::USER_ID, json!({ "login": login }))?;
        Ok(user.id)
    }

    fn repositories_page(
        &mut self,
        kind: QueryKind,
        query: &str,
        affiliations: &[Affiliation],
        cursor: Option<&str>,
    ) -> Result<RepositoryConnection> {
        let variables = json!({
            "owner_affiliation": affiliations,
            "login": self.login,
            "cursor": cursor,
        });
        let data: UserRepositories = self.user(kind, query, variables)?;
        Ok(data.repositories)
    }

    /// Every repository reachable through `affiliations` with its current
    /// default-branch commit count, in listing order.
    pub fn repository_snapshot(
        &mut self,
        affiliations: &[Affiliation],
    ) -> Result<Vec<RepositorySnapshot>> {
        let mut snapshot = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.repositories_page(
                QueryKind::RepositoryListing,
                queries::REPOSITORIES,
                affiliations,
                cursor.as_deref(),
            )?;
            snapshot.extend(page.edges.iter().map(|edge| {
                RepositorySnapshot::new(edge.node.name_with_owner.clone(), edge.node.commit_count())
            }));
            match next_cursor(page.page_info.has_next_page, page.page_info.end_cursor, page.edges.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(snapshot)
    }

    pub fn repository_count(&mut self, affiliations: &[Affiliation]) -> Result<u64> {
        let page = self.repositories_page(
            QueryKind::RepositoryListing,
            queries::REPOSITORIES,
            affiliations,
            None,
        )?;
        Ok(page.total_count)
    }

    pub fn star_count(&mut self, affiliations: &[Affiliation]) -> Result<u64> {
        let mut stars = 0;
        let mut cursor: Option<String> = None;
        loop {
            let page = self.repositories_page(
                QueryKind::Stars,
                queries::STARS,
                affiliations,
                cursor.as_deref(),
            )?;
            stars += page
                .edges
                .iter()
                .filter_map(|e| e.node.stargazers.as_ref())
                .map(|s| s.total_count)
                .sum::<u64>();
            match next_cursor(page.page_info.has_next_page, page.page_info.end_cursor, page.edges.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(stars)
    }

    /// Contributions inside one window of at most a year.
    pub fn contributions(&mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<u64> {
        let variables = json!({
            "start_date": from.to_rfc3339(),
            "end_date": to.to_rfc3339(),
            "login": self.login,
        });
        let data: ContributionsData =
            self.user(QueryKind::Contributions, queries::CONTRIBUTIONS, variables)?;
        Ok(data.contributions_collection.contribution_calendar.total_contributions)
    }

    /// Sum of contributions, walking year-long windows back from `until`
    /// while the window end is still after `since`.
    pub fn total_contributions(
        &mut self,
        until: DateTime<Utc>,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        let mut total = 0;
        for (from, to) in yearly_windows(until, since) {
            total += self.contributions(from, to)?;
        }
        Ok(total)
    }
}

fn next_cursor(has_next: bool, end_cursor: Option<String>, empty_page: bool) -> Option<String> {
    if empty_page || !has_next {
        return None;
    }
    end_cursor
}

/// `(from, to)` windows of 365 days, newest first.
pub fn yearly_windows(until: DateTime<Utc>, since: DateTime<Utc>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut windows = Vec::new();
    let mut end = until;
    while end > since {
        let start = end - ChronoDuration::days(365);
        windows.push((start, end));
        end = start;
    }
    windows
}

impl CommitSource for GitHubClient {
    fn fetch_commit_count(&mut self, owner: &str, repo: &str) -> Result<u64> {
        let variables = json!({ "repo_name": repo, "owner": owner });
        let data: RepositoryData<CountedHistory> =
            self.query(QueryKind::CommitHistory, queries::COMMIT_COUNT, variables)?;
        Ok(data
            .repository
            .and_then(|r| r.default_branch_ref)
            .and_then(|b| b.target.history)
            .map(|h| h.total_count)
            .unwrap_or(0))
    }

    fn fetch_commit_page(
        &mut self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<Option<CommitPage>> {
        let variables = json!({ "repo_name": repo, "owner": owner, "cursor": cursor });
        let data: RepositoryData<HistoryPage> =
            self.query(QueryKind::CommitHistory, queries::COMMIT_HISTORY, variables)?;

        let repository = data.repository.ok_or_else(|| GhstatError::GraphQl {
            context: QueryKind::CommitHistory.to_string(),
            message: format!("repository {owner}/{repo} not found"),
        })?;
        let history = match repository.default_branch_ref.and_then(|b| b.target.history) {
            Some(history) => history,
            None => return Ok(None),
        };

        let records = history
            .edges
            .iter()
            .map(|edge| CommitRecord {
                author: edge.node.author_id().map(str::to_string),
                additions: edge.node.additions,
                deletions: edge.node.deletions,
            })
            .collect();
        let next_token = next_cursor(
            history.page_info.has_next_page,
            history.page_info.end_cursor,
            history.edges.is_empty(),
        );
        Ok(Some(CommitPage { records, next_token }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn windows_cover_range_newest_first() {
        let until = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let since = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let windows = yearly_windows(until, since);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].1, until);
        assert_eq!(windows[0].0, windows[1].1);
        assert!(windows[2].0 <= since);
    }

    #[test]
    fn no_windows_when_since_is_after_until() {
        let until = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let since = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert!(yearly_windows(until, since).is_empty());
    }

    #[test]
    fn cursor_stops_on_last_or_empty_page() {
        assert_eq!(next_cursor(true, Some("c".into()), false), Some("c".to_string()));
        assert_eq!(next_cursor(false, Some("c".into()), false), None);
        assert_eq!(next_cursor(true, Some("c".into()), true), None);
        assert_eq!(next_cursor(true, None, false), None);
    }
}
