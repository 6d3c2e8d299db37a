//! GraphQL v4 documents and the slices of their responses that are read.

use serde::Deserialize;

pub const USER_ID: &str = r#"
query ($login: String!) {
    user(login: $login) {
        id
    }
}"#;

pub const REPOSITORIES: &str = r#"
query ($owner_affiliation: [RepositoryAffiliation], $login: String!, $cursor: String) {
    user(login: $login) {
        repositories(first: 100, after: $cursor, ownerAffiliations: $owner_affiliation) {
            totalCount
            edges {
                node {
                    ... on Repository {
                        nameWithOwner
                        defaultBranchRef {
                            target {
                                ... on Commit {
                                    history {
                                        totalCount
                                    }
                                }
                            }
                        }
                    }
                }
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}"#;

pub const STARS: &str = r#"
query ($owner_affiliation: [RepositoryAffiliation], $login: String!, $cursor: String) {
    user(login: $login) {
        repositories(first: 100, after: $cursor, ownerAffiliations: $owner_affiliation) {
            totalCount
            edges {
                node {
                    ... on Repository {
                        nameWithOwner
                        stargazers {
                            totalCount
                        }
                    }
                }
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}"#;

pub const COMMIT_COUNT: &str = r#"
query ($repo_name: String!, $owner: String!) {
    repository(name: $repo_name, owner: $owner) {
        defaultBranchRef {
            target {
                ... on Commit {
                    history {
                        totalCount
                    }
                }
            }
        }
    }
}"#;

pub const COMMIT_HISTORY: &str = r#"
query ($repo_name: String!, $owner: String!, $cursor: String) {
    repository(name: $repo_name, owner: $owner) {
        defaultBranchRef {
            target {
                ... on Commit {
                    history(first: 100, after: $cursor) {
                        totalCount
                        edges {
                            node {
                                ... on Commit {
                                    committedDate
                                }
                                author {
                                    user {
                                        id
                                    }
                                }
                                deletions
                                additions
                            }
                        }
                        pageInfo {
                            endCursor
                            hasNextPage
                        }
                    }
                }
            }
        }
    }
}"#;

pub const CONTRIBUTIONS: &str = r#"
query ($start_date: DateTime!, $end_date: DateTime!, $login: String!) {
    user(login: $login) {
        contributionsCollection(from: $start_date, to: $end_date) {
            contributionCalendar {
                totalContributions
            }
        }
    }
}"#;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct UserId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRepositories {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub total_count: u64,
    #[serde(default)]
    pub edges: Vec<RepositoryEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryEdge {
    pub node: RepositoryNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name_with_owner: String,
    #[serde(default)]
    pub stargazers: Option<TotalCount>,
    #[serde(default)]
    pub default_branch_ref: Option<BranchRef<CountedHistory>>,
}

impl RepositoryNode {
    pub fn commit_count(&self) -> u64 {
        self.default_branch_ref
            .as_ref()
            .and_then(|b| b.target.history.as_ref())
            .map(|h| h.total_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryData<H> {
    pub repository: Option<RepositoryBranch<H>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryBranch<H> {
    pub default_branch_ref: Option<BranchRef<H>>,
}

#[derive(Debug, Deserialize)]
pub struct BranchRef<H> {
    pub target: BranchTarget<H>,
}

/// The target is only a commit for ordinary branches; anything else comes
/// back without a `history` field.
#[derive(Debug, Deserialize)]
pub struct BranchTarget<H> {
    pub history: Option<H>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedHistory {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    #[serde(default)]
    pub edges: Vec<HistoryEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEdge {
    pub node: HistoryNode,
}

#[derive(Debug, Deserialize)]
pub struct HistoryNode {
    pub author: Option<CommitAuthor>,
    pub additions: u64,
    pub deletions: u64,
}

impl HistoryNode {
    pub fn author_id(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.user.as_ref())
            .map(|u| u.id.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct CommitAuthor {
    pub user: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsData {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_page_reads_authors() {
        let body = r#"{
            "data": {
                "repository": {
                    "defaultBranchRef": {
                        "target": {
                            "history": {
                                "totalCount": 2,
                                "edges": [
                                    {"node": {"committedDate": "2024-01-01T00:00:00Z",
                                              "author": {"user": {"id": "U_1"}},
                                              "additions": 10, "deletions": 2}},
                                    {"node": {"committedDate": "2024-01-02T00:00:00Z",
                                              "author": {"user": null},
                                              "additions": 5, "deletions": 1}}
                                ],
                                "pageInfo": {"endCursor": "abc", "hasNextPage": true}
                            }
                        }
                    }
                }
            }
        }"#;
        let parsed: GraphQlResponse<RepositoryData<HistoryPage>> =
            serde_json::from_str(body).unwrap();
        let history = parsed
            .data
            .unwrap()
            .repository
            .unwrap()
            .default_branch_ref
            .unwrap()
            .target
            .history
            .unwrap();
        assert_eq!(history.edges.len(), 2);
        assert_eq!(history.edges[0].node.author_id(), Some("U_1"));
        assert_eq!(history.edges[1].node.author_id(), None);
        assert_eq!(history.page_info.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn empty_repository_has_no_branch() {
        let body = r#"{"data": {"repository": {"defaultBranchRef": null}}}"#;
        let parsed: GraphQlResponse<RepositoryData<HistoryPage>> =
            serde_json::from_str(body).unwrap();
        assert!(parsed.data.unwrap().repository.unwrap().default_branch_ref.is_none());
    }

    #[test]
    fn listing_reads_commit_counts() {
        let body = r#"{"data": {"user": {"repositories": {
            "totalCount": 2,
            "edges": [
                {"node": {"nameWithOwner": "u/a",
                          "defaultBranchRef": {"target": {"history": {"totalCount": 42}}}}},
                {"node": {"nameWithOwner": "u/empty", "defaultBranchRef": null}}
            ],
            "pageInfo": {"endCursor": null, "hasNextPage": false}
        }}}}"#;
        let parsed: GraphQlResponse<UserData<UserRepositories>> =
            serde_json::from_str(body).unwrap();
        let repos = parsed.data.unwrap().user.unwrap().repositories;
        assert_eq!(repos.total_count, 2);
        assert_eq!(repos.edges[0].node.commit_count(), 42);
        assert_eq!(repos.edges[1].node.commit_count(), 0);
        assert!(parsed.errors.is_empty());
    }
}
